//! Hex text form of a program image.
//!
//! Whitespace-separated two-digit hex bytes, any number per line.

use std::fmt::Write as _;

use super::format::format_bytes;

/// Bytes written per line by [`format_hex`].
pub const BYTES_PER_LINE: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    #[error("line {line}: invalid hex byte `{token}`")]
    InvalidByte { line: usize, token: String },
}

/// Parse hex image text into bytes.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, HexError> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        for token in line.split_whitespace() {
            let valid = token.len() == 2 && token.bytes().all(|b| b.is_ascii_hexdigit());
            let byte = valid
                .then(|| u8::from_str_radix(token, 16).ok())
                .flatten()
                .ok_or_else(|| HexError::InvalidByte {
                    line: idx + 1,
                    token: token.to_string(),
                })?;
            out.push(byte);
        }
    }
    Ok(out)
}

/// Format bytes as hex image text, 16 bytes per line.
pub fn format_hex(bytes: &[u8]) -> String {
    let mut out = String::new();
    for chunk in bytes.chunks(BYTES_PER_LINE) {
        writeln!(out, "{}", format_bytes(chunk)).unwrap();
    }
    out
}
