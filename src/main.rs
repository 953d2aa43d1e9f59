//! tagwire-inspect: decode a wire payload and print what it carries.
//!
//! ```text
//! tagwire-inspect <request|response> [FILE]
//! ```
//!
//! Reads FILE (or stdin), decodes it against the builtin type registry and
//! prints one line per argument or the single result. Set `RUST_LOG=debug`
//! to see the codec's own trace.
#![deny(unused_must_use)]

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use log::info;

use tagwire::{AnyValue, Codec, JsonCodec, Message, MessageKind, Payload, TypeRegistry};

fn parse_kind(arg: &str) -> Result<MessageKind> {
    match arg {
        "request" | "req" => Ok(MessageKind::Request),
        "response" | "resp" => Ok(MessageKind::Response),
        other => bail!("unknown message kind `{other}` (expected request or response)"),
    }
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    if let Some(p) = path {
        return std::fs::read(p).with_context(|| format!("reading {p}"));
    }
    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .context("reading stdin")?;
    Ok(buf)
}

/// Render builtin values; anything else shows only its Rust type.
fn describe(value: &AnyValue) -> String {
    macro_rules! try_show {
        ($($t:ty),*) => {
            $(
                if let Some(v) = value.downcast_ref::<$t>() {
                    return format!("{v:?}");
                }
            )*
        };
    }
    try_show!(
        bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, char, String, (),
        serde_json::Value, Vec<u8>, Vec<String>
    );
    format!("{value:?}")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(kind_arg) = args.first() else {
        bail!("usage: tagwire-inspect <request|response> [FILE]");
    };
    let kind = parse_kind(kind_arg)?;
    let input = read_input(args.get(1).map(String::as_str))?;

    let codec = JsonCodec::new(Arc::new(TypeRegistry::with_builtins()));
    info!("decoding {} bytes as {}", input.len(), kind.as_str());

    match codec.decode(Payload::Bytes(&input), kind)? {
        Message::Request(req) => {
            println!("service: {}", req.service_id);
            for (i, arg) in req.arguments.iter().enumerate() {
                println!("  arg[{i}]: {}", describe(arg));
            }
        }
        Message::Response(resp) => {
            println!("result: {}", describe(&resp.result));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_aliases() {
        assert_eq!(parse_kind("req").unwrap(), MessageKind::Request);
        assert_eq!(parse_kind("response").unwrap(), MessageKind::Response);
        assert!(parse_kind("event").is_err());
    }

    #[test]
    fn describe_builtin_and_opaque() {
        assert_eq!(describe(&AnyValue::new(5i64)), "5");
        assert_eq!(describe(&AnyValue::from("hi")), "\"hi\"");
        struct Opaque;
        assert!(describe(&AnyValue::new(Opaque)).starts_with("AnyValue<"));
    }
}
