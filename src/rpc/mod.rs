//! Transport-agnostic RPC message codec.
//!
//! Converts requests and responses to self-describing JSON and back.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      Codec Stack                           │
//! │                                                            │
//! │  ┌──────────┐   ┌──────────┐   ┌────────────────────────┐  │
//! │  │ Message  │──▶│  Codec   │──▶│ bytes (to transport)   │  │
//! │  │ Req/Resp │   │ (JSON)   │   └────────────────────────┘  │
//! │  └──────────┘   └──────────┘                               │
//! │       ▲              │                                     │
//! │       │              ▼                                     │
//! │  ┌──────────┐   ┌──────────┐                               │
//! │  │ AnyValue │◀─▶│ Registry │   (wire key ↔ Rust type)      │
//! │  └──────────┘   └──────────┘                               │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod message;
pub mod registry;
pub mod value;

pub use codec::{Codec, JsonCodec, Payload};
pub use message::{Message, MessageKind, Request, Response};
pub use registry::TypeRegistry;
pub use value::AnyValue;
