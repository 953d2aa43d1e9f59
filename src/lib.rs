//! Tagwire message codec library.
//!
//! Encodes RPC requests and responses as JSON in which every argument and
//! result carries a type key, and decodes them back into the exact Rust
//! types through a [`TypeRegistry`](rpc::TypeRegistry).

#![deny(unused_must_use)]

pub mod config;
pub mod rpc;

mod error;

pub use config::CodecConfig;
pub use error::{Error, Result};
pub use rpc::{AnyValue, Codec, JsonCodec, Message, MessageKind, Payload, Request, Response, TypeRegistry};
