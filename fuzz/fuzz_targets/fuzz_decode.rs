//! Fuzz target: `JsonCodec::decode`
//!
//! Drives arbitrary byte sequences through request and response decoding
//! and asserts that the codec never panics. Any request that does decode
//! must re-encode, and the re-encoding must decode to the same service id
//! and argument count. Non-finite floats travel as "NaN" / "Infinity" /
//! "-Infinity" strings, so they survive the second pass too.
//!
//! cargo fuzz run fuzz_decode

#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use tagwire::{JsonCodec, TypeRegistry};

fuzz_target!(|data: &[u8]| {
    let codec = JsonCodec::new(Arc::new(TypeRegistry::with_builtins()));

    if let Ok(req) = codec.decode_request(data) {
        let wire = codec.encode_request(&req).expect("decoded request must re-encode");
        let again = codec
            .decode_request(&wire[..])
            .expect("re-encoded request must decode");
        assert_eq!(again.service_id, req.service_id);
        assert_eq!(again.arguments.len(), req.arguments.len());
    }

    let _ = codec.decode_response(data);
});
