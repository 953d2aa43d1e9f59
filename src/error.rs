//! Unified error type for the codec.
//!
//! Every fallible codec operation funnels into [`Error`], so callers in the
//! surrounding RPC stack handle encode, decode and registry failures through
//! one type.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level codec error
// ---------------------------------------------------------------------------

/// Every fallible operation in the codec funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// Decode was handed a payload it cannot interpret. `kind` names what was
    /// received (e.g. `"number"`, `"response message"`).
    UnsupportedPayload { kind: &'static str },
    /// A wire `Type` key has no entry in the registry.
    UnknownType(String),
    /// A value's Rust type was never registered, so it has no wire key.
    UnregisteredType(&'static str),
    /// A key or Rust type was registered twice.
    DuplicateRegistration(String),
    /// The envelope is valid JSON but a required field is missing or has the
    /// wrong JSON type.
    MalformedEnvelope(&'static str),
    /// `Content` did not deserialize into the type named by its key.
    Content {
        key: String,
        source: serde_json::Error,
    },
    /// JSON text could not be parsed or a value could not be serialized.
    Json(serde_json::Error),
    /// Byte payload is not valid UTF-8.
    Utf8(core::str::Utf8Error),
    /// Payload exceeds the configured size limit.
    PayloadTooLarge { len: usize, max: usize },
    /// Request carries more arguments than the configured limit.
    TooManyArguments { count: usize, max: usize },
    /// Codec configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPayload { kind } => write!(f, "unsupported payload type: {kind}"),
            Self::UnknownType(key) => write!(f, "cannot resolve argument type: {key}"),
            Self::UnregisteredType(name) => write!(f, "type not registered: {name}"),
            Self::DuplicateRegistration(key) => write!(f, "duplicate registration: {key}"),
            Self::MalformedEnvelope(field) => write!(f, "malformed envelope: bad field `{field}`"),
            Self::Content { key, source } => write!(f, "content of `{key}`: {source}"),
            Self::Json(e) => write!(f, "json: {e}"),
            Self::Utf8(e) => write!(f, "utf-8: {e}"),
            Self::PayloadTooLarge { len, max } => {
                write!(f, "payload of {len} bytes exceeds limit of {max}")
            }
            Self::TooManyArguments { count, max } => {
                write!(f, "{count} arguments exceeds limit of {max}")
            }
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Content { source, .. } => Some(source),
            Self::Json(e) => Some(e),
            Self::Utf8(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<core::str::Utf8Error> for Error {
    fn from(e: core::str::Utf8Error) -> Self {
        Self::Utf8(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn unknown_type_names_the_key() {
        let e = Error::UnknownType("acme.Widget".into());
        assert!(e.to_string().contains("acme.Widget"));
    }

    #[test]
    fn unsupported_payload_names_the_kind() {
        let e = Error::UnsupportedPayload { kind: "number" };
        assert_eq!(e.to_string(), "unsupported payload type: number");
    }

    #[test]
    fn json_error_exposes_source() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = Error::from(parse);
        assert!(e.source().is_some());
    }
}
