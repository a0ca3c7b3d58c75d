// SPDX-License-Identifier: MIT OR Apache-2.0
//! Newline-delimited JSON encoding of [`Frame`]s.

use crate::error::ProtocolError;
use crate::frame::Frame;

/// Encoder/decoder for one-frame-per-line JSON.
pub struct JsonlCodec;

impl JsonlCodec {
    /// Encode a frame as a single JSON line (trailing newline included).
    pub fn encode(frame: &Frame) -> Result<String, ProtocolError> {
        let mut line = serde_json::to_string(frame).map_err(ProtocolError::Serialize)?;
        line.push('\n');
        Ok(line)
    }

    /// Decode one line into a frame.
    pub fn decode(line: &str) -> Result<Frame, ProtocolError> {
        serde_json::from_str(line.trim_end()).map_err(ProtocolError::Deserialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_appends_newline() {
        let line = JsonlCodec::encode(&Frame::ListTools { id: "1".into() }).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn decode_tolerates_trailing_whitespace() {
        let frame = JsonlCodec::decode("{\"t\":\"list_tools\",\"id\":\"1\"}\r\n").unwrap();
        assert_eq!(frame, Frame::ListTools { id: "1".into() });
    }

    #[test]
    fn decode_garbage_is_an_error() {
        let err = JsonlCodec::decode("not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Deserialize(_)));
    }
}
