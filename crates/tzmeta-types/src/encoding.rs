//! Byte/text codec for stored metadata values.
//!
//! TZIP-16 stores metadata values as hex-encoded UTF-8 bytes inside
//! big-maps. This module decodes that representation and parses the result
//! as JSON. Failure of either step propagates as a decoding error, never
//! swallowed.

use serde_json::Value;

use crate::error::MetadataError;

/// Decode an even-length hex digit stream into UTF-8 text.
///
/// # Examples
///
/// ```
/// use tzmeta_types::encoding::hex_to_utf8;
///
/// assert_eq!(hex_to_utf8("74657a6f73").unwrap(), "tezos");
/// assert!(hex_to_utf8("74657a6f7").is_err());
/// ```
pub fn hex_to_utf8(hex_str: &str) -> Result<String, MetadataError> {
    let bytes = hex::decode(hex_str)
        .map_err(|e| MetadataError::Decoding(format!("invalid hex value '{}': {}", hex_str, e)))?;
    String::from_utf8(bytes)
        .map_err(|e| MetadataError::Decoding(format!("stored bytes are not UTF-8: {}", e)))
}

/// Parse UTF-8 text as JSON. Strict: malformed JSON is an error.
pub fn parse_json(text: &str) -> Result<Value, MetadataError> {
    serde_json::from_str(text)
        .map_err(|e| MetadataError::Decoding(format!("invalid JSON value: {}", e)))
}

/// Decode a hex-encoded UTF-8 JSON document in one step.
pub fn hex_to_json(hex_str: &str) -> Result<Value, MetadataError> {
    let text = hex_to_utf8(hex_str)?;
    parse_json(&text)
}

/// Percent-decode a store key (`%2F` -> `/` and so on).
///
/// Unrecognized or truncated escape sequences are kept verbatim; keys are
/// opaque strings and a literal `%` is a legal key character.
pub fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
