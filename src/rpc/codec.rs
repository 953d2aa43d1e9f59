//! Self-describing JSON message codec.
//!
//! Wire format (UTF-8 JSON text):
//! ```text
//! request:  {"ServiceId": "<id>", "Arguments": [{"Type": "<key>", "Content": <value>}, ...]}
//! response: {"Type": "<key>", "Content": <value>}
//! ```
//!
//! Every argument and result carries its own type key, so one codec handles
//! heterogeneous argument lists without a per-service schema. Keys are
//! resolved through the shared [`TypeRegistry`]; both peers must register
//! the same keys.

use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;
use serde_json::{Map, Value};

use super::message::{Message, MessageKind, Request, Response};
use super::registry::TypeRegistry;
use super::value::AnyValue;
use crate::config::CodecConfig;
use crate::error::{Error, Result};

const FIELD_SERVICE_ID: &str = "ServiceId";
const FIELD_ARGUMENTS: &str = "Arguments";
const FIELD_TYPE: &str = "Type";
const FIELD_CONTENT: &str = "Content";

/// Input accepted by [`Codec::decode`].
#[derive(Debug)]
pub enum Payload<'a> {
    /// Already decoded. Returned as-is when the kind matches.
    Message(Message),
    /// Parsed JSON; must be an object.
    Json(Value),
    /// UTF-8 JSON text as bytes (straight off the transport).
    Bytes(&'a [u8]),
    /// JSON text.
    Text(&'a str),
}

impl<'a> From<&'a [u8]> for Payload<'a> {
    fn from(b: &'a [u8]) -> Self {
        Self::Bytes(b)
    }
}

impl<'a> From<&'a str> for Payload<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl From<Value> for Payload<'_> {
    fn from(v: Value) -> Self {
        Self::Json(v)
    }
}

impl From<Message> for Payload<'_> {
    fn from(m: Message) -> Self {
        Self::Message(m)
    }
}

/// Wire form of one value.
#[derive(Serialize)]
struct TypedValue<'a> {
    #[serde(rename = "Type")]
    key: &'a str,
    #[serde(rename = "Content")]
    content: Value,
}

#[derive(Serialize)]
struct RequestEnvelope<'a> {
    #[serde(rename = "ServiceId")]
    service_id: &'a str,
    #[serde(rename = "Arguments")]
    arguments: Vec<TypedValue<'a>>,
}

/// Message codec used by the RPC stack.
///
/// Implementations hold no per-call state and may be shared across threads.
pub trait Codec: Send + Sync {
    /// Serialize a message to wire bytes.
    fn encode(&self, message: &Message) -> Result<Vec<u8>>;

    /// Reconstruct a message of `kind` from `payload`.
    fn decode(&self, payload: Payload<'_>, kind: MessageKind) -> Result<Message>;
}

/// JSON codec backed by a [`TypeRegistry`].
#[derive(Debug, Clone)]
pub struct JsonCodec {
    registry: Arc<TypeRegistry>,
    config: CodecConfig,
}

impl JsonCodec {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            config: CodecConfig::default(),
        }
    }

    pub fn with_config(registry: Arc<TypeRegistry>, config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn encode_request(&self, request: &Request) -> Result<Vec<u8>> {
        self.check_arguments(request.arguments.len())?;

        let arguments = request
            .arguments
            .iter()
            .map(|arg| self.wrap(arg))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "codec: encode request {} ({} args)",
            request.service_id,
            arguments.len()
        );
        self.to_bytes(&RequestEnvelope {
            service_id: &request.service_id,
            arguments,
        })
    }

    pub fn encode_response(&self, response: &Response) -> Result<Vec<u8>> {
        let wrapped = self.wrap(&response.result)?;
        debug!("codec: encode response ({})", wrapped.key);
        self.to_bytes(&wrapped)
    }

    pub fn decode_request<'a>(&self, payload: impl Into<Payload<'a>>) -> Result<Request> {
        match payload.into() {
            Payload::Message(Message::Request(request)) => Ok(request),
            other => self.request_from_object(self.to_object(other)?),
        }
    }

    pub fn decode_response<'a>(&self, payload: impl Into<Payload<'a>>) -> Result<Response> {
        match payload.into() {
            Payload::Message(Message::Response(response)) => Ok(response),
            other => self.response_from_object(self.to_object(other)?),
        }
    }

    // ── Internals ─────────────────────────────────────────────

    fn wrap<'a>(&'a self, value: &AnyValue) -> Result<TypedValue<'a>> {
        let (key, content) = self.registry.encode(value)?;
        Ok(TypedValue { key, content })
    }

    fn to_bytes<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }

    fn check_arguments(&self, count: usize) -> Result<()> {
        if count > self.config.max_arguments {
            return Err(Error::TooManyArguments {
                count,
                max: self.config.max_arguments,
            });
        }
        Ok(())
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len > self.config.max_payload_bytes {
            return Err(Error::PayloadTooLarge {
                len,
                max: self.config.max_payload_bytes,
            });
        }
        Ok(())
    }

    /// Bring a payload that missed the fast path down to a JSON object.
    ///
    /// A message reaching this point is of the other kind.
    fn to_object(&self, payload: Payload<'_>) -> Result<Map<String, Value>> {
        let value = match payload {
            Payload::Message(m) => {
                return Err(Error::UnsupportedPayload {
                    kind: m.kind().as_str(),
                });
            }
            Payload::Json(v) => v,
            Payload::Bytes(bytes) => {
                self.check_len(bytes.len())?;
                serde_json::from_str(core::str::from_utf8(bytes)?)?
            }
            Payload::Text(text) => {
                self.check_len(text.len())?;
                serde_json::from_str(text)?
            }
        };

        match value {
            Value::Object(map) => Ok(map),
            other => Err(Error::UnsupportedPayload {
                kind: json_kind(&other),
            }),
        }
    }

    fn request_from_object(&self, mut obj: Map<String, Value>) -> Result<Request> {
        let Some(Value::String(service_id)) = obj.remove(FIELD_SERVICE_ID) else {
            return Err(Error::MalformedEnvelope(FIELD_SERVICE_ID));
        };
        let Some(Value::Array(raw_args)) = obj.remove(FIELD_ARGUMENTS) else {
            return Err(Error::MalformedEnvelope(FIELD_ARGUMENTS));
        };
        self.check_arguments(raw_args.len())?;

        let arguments = raw_args
            .into_iter()
            .map(|arg| self.resolve(arg))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "codec: decoded request {} ({} args)",
            service_id,
            arguments.len()
        );
        Ok(Request {
            service_id,
            arguments,
        })
    }

    fn response_from_object(&self, obj: Map<String, Value>) -> Result<Response> {
        let result = self.resolve(Value::Object(obj))?;
        debug!("codec: decoded response ({})", result.type_name());
        Ok(Response { result })
    }

    /// Turn one `{"Type", "Content"}` pair back into a value.
    fn resolve(&self, typed: Value) -> Result<AnyValue> {
        let Value::Object(mut fields) = typed else {
            return Err(Error::MalformedEnvelope(FIELD_TYPE));
        };
        let Some(Value::String(key)) = fields.remove(FIELD_TYPE) else {
            return Err(Error::MalformedEnvelope(FIELD_TYPE));
        };
        let content = fields.remove(FIELD_CONTENT).unwrap_or(Value::Null);

        match self.registry.decode(&key, content) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("codec: cannot resolve `{}`: {}", key, e);
                Err(e)
            }
        }
    }
}

impl Codec for JsonCodec {
    fn encode(&self, message: &Message) -> Result<Vec<u8>> {
        match message {
            Message::Request(r) => self.encode_request(r),
            Message::Response(r) => self.encode_response(r),
        }
    }

    fn decode(&self, payload: Payload<'_>, kind: MessageKind) -> Result<Message> {
        match kind {
            MessageKind::Request => self.decode_request(payload).map(Message::Request),
            MessageKind::Response => self.decode_response(payload).map(Message::Response),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Tests ────────────────────────────────────────────────────
