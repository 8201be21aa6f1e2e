//! JPXDecode (JPEG 2000) implementation.
//!
//! Pass-through for JPEG 2000 data. Like DCTDecode, the encoded image bytes
//! are retained as-is; no pixel data is decoded since image metadata is all
//! the rest of the crate needs.

use crate::decoders::StreamDecoder;
use crate::error::Result;

/// JPXDecode filter implementation.
pub struct JpxDecoder;

impl StreamDecoder for JpxDecoder {
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }

    fn name(&self) -> &str {
        "JPXDecode"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpx_decode_passthrough() {
        let decoder = JpxDecoder;
        let data = b"\x00\x00\x00\x0cjP  \r\n\x87\n";
        let output = decoder.decode(data).unwrap();
        assert_eq!(output, data);
    }

    #[test]
    fn test_jpx_decoder_name() {
        assert_eq!(JpxDecoder.name(), "JPXDecode");
    }
}
