//! JSON value escaper (component B): renders a byte range as a JSON
//! string, a byte array, or `null`, depending on size and printability.

use crate::fields::{is_utf8_printable, JSON_THRESHOLD};
use std::io::Write;

use crate::errors::SdError;

/// Escapes `bytes` as a JSON value and writes it to `sink`.
///
/// - `show_all` disables the [`JSON_THRESHOLD`] size cutoff.
/// - Values at or above the threshold (and not `show_all`) become the
///   literal `null`.
/// - Non-printable values become a `[ b0, b1, … ]` array of decimal byte
///   values (`[  ]` for an empty input).
/// - Otherwise the value is escaped as a JSON string: `"` and `\` are
///   backslash-escaped, `\n` becomes the two-character `\n`, bytes below
///   `0x20` become `\u00XX`, everything else is copied through as-is
///   (already-UTF-8 bytes are treated as opaque, never re-encoded).
pub fn json_escape<W: Write>(sink: &mut W, bytes: &[u8], show_all: bool) -> Result<(), SdError> {
    if !show_all && bytes.len() >= JSON_THRESHOLD {
        sink.write_all(b"null").map_err(SdError::from)?;
        return Ok(());
    }

    if !is_utf8_printable(bytes) {
        sink.write_all(b"[ ").map_err(SdError::from)?;
        for (i, b) in bytes.iter().enumerate() {
            if i > 0 {
                sink.write_all(b", ").map_err(SdError::from)?;
            }
            write!(sink, "{}", b).map_err(SdError::from)?;
        }
        sink.write_all(b" ]").map_err(SdError::from)?;
        return Ok(());
    }

    sink.write_all(b"\"").map_err(SdError::from)?;
    for &b in bytes {
        match b {
            b'"' | b'\\' => {
                sink.write_all(&[b'\\', b]).map_err(SdError::from)?;
            }
            b'\n' => {
                sink.write_all(b"\\n").map_err(SdError::from)?;
            }
            b if b < 0x20 => {
                write!(sink, "\\u{:04x}", b).map_err(SdError::from)?;
            }
            b => {
                sink.write_all(&[b]).map_err(SdError::from)?;
            }
        }
    }
    sink.write_all(b"\"").map_err(SdError::from)?;

    Ok(())
}

/// Convenience wrapper returning the escaped form as an owned `String`,
/// for callers that don't already hold a sink (e.g. building a key).
pub fn json_escape_to_string(bytes: &[u8], show_all: bool) -> Result<String, SdError> {
    let mut buf = Vec::new();
    json_escape(&mut buf, bytes, show_all)?;
    Ok(String::from_utf8(buf).expect("json_escape only emits ASCII/UTF-8-passthrough bytes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escape(bytes: &[u8], show_all: bool) -> String {
        json_escape_to_string(bytes, show_all).unwrap()
    }

    #[test]
    fn ascii_printable_roundtrips_as_string_literal() {
        assert_eq!(escape(b"hello world", false), "\"hello world\"");
    }

    #[test]
    fn quote_and_backslash_are_escaped() {
        assert_eq!(escape(b"a\"b\\c", false), "\"a\\\"b\\\\c\"");
    }

    #[test]
    fn newline_escapes_to_two_chars() {
        assert_eq!(escape(b"a\nb", false), "\"a\\nb\"");
    }

    #[test]
    fn control_byte_0x1f_escapes_to_unicode_escape() {
        assert_eq!(escape(&[0x1f], false), "\"\\u001f\"");
    }

    #[test]
    fn binary_value_becomes_byte_array() {
        assert_eq!(escape(&[0, 1, 2], false), "[ 0, 1, 2 ]");
        assert_eq!(escape(&[], false), "[  ]");
    }

    #[test]
    fn threshold_boundary_4096_is_null_4095_is_escaped() {
        let at = vec![b'a'; 4096];
        let under = vec![b'a'; 4095];
        assert_eq!(escape(&at, false), "null");
        assert!(escape(&under, false).starts_with('"'));
    }

    #[test]
    fn show_all_disables_threshold() {
        let at = vec![b'a'; 4096];
        assert_ne!(escape(&at, true), "null");
    }
}
