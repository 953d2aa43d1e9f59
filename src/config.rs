//! Codec configuration parameters
//!
//! Limits and output options for [`JsonCodec`](crate::rpc::codec::JsonCodec).
//! Defaults are generous; deployments that accept untrusted peers should
//! tighten `max_payload_bytes`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Core codec configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest byte/text payload accepted by decode
    pub max_payload_bytes: usize,
    /// Largest argument list accepted by encode and decode
    pub max_arguments: usize,
    /// Emit indented JSON
    pub pretty: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: 1024 * 1024, // 1 MiB
            max_arguments: 64,
            pretty: false,
        }
    }
}

impl CodecConfig {
    /// Reject limits that would make every message fail.
    pub fn validate(&self) -> Result<()> {
        if self.max_payload_bytes == 0 {
            return Err(Error::Config("max_payload_bytes must be non-zero"));
        }
        if self.max_arguments == 0 {
            return Err(Error::Config("max_arguments must be non-zero"));
        }
        Ok(())
    }
}
