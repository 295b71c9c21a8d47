//! MIME content encoding utilities.
//!
//! Supports Quoted-Printable, Base64 (plain and line-chunked), and RFC 2047
//! header words. All encoders are pure and succeed for arbitrary input.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::borrow::Cow;
use std::fmt::Write as _;

/// Maximum encoded line length (RFC 2045).
const MAX_LINE_LENGTH: usize = 76;

/// Returns the input as UTF-8 text.
///
/// Valid UTF-8 is borrowed unchanged. Anything else is reinterpreted as
/// Latin-1 and converted, so the result is always well-formed.
#[must_use]
pub fn ensure_utf8(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().copied().map(char::from).collect()),
    }
}

/// Encodes text using Quoted-Printable encoding (RFC 2045).
///
/// Input is UTF-8-normalized first via [`ensure_utf8`]. Output lines are kept
/// within [`MAX_LINE_LENGTH`] characters using soft line breaks.
#[must_use]
pub fn encode_quoted_printable(bytes: &[u8]) -> String {
    let text = ensure_utf8(bytes);
    let mut result = String::with_capacity(text.len());
    let mut line_length = 0;

    for byte in text.as_bytes() {
        // Soft line break before the next encoded unit would overflow
        if line_length >= MAX_LINE_LENGTH - 3 {
            result.push_str("=\r\n");
            line_length = 0;
        }

        match byte {
            // Printable ASCII except '='
            b'!'..=b'<' | b'>'..=b'~' => {
                result.push(char::from(*byte));
                line_length += 1;
            }
            b' ' => {
                result.push(' ');
                line_length += 1;
            }
            // Everything else gets escaped as =XX
            _ => {
                result.push('=');
                let _ = write!(result, "{byte:02X}");
                line_length += 3;
            }
        }
    }

    result
}

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Encodes data as Base64 hard-wrapped into 76-character CRLF-terminated
/// lines, the MIME attachment convention.
#[must_use]
pub fn encode_base64_chunked(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut result = String::with_capacity(encoded.len() + 2 * encoded.len().div_ceil(MAX_LINE_LENGTH));

    for chunk in encoded.as_bytes().chunks(MAX_LINE_LENGTH) {
        result.extend(chunk.iter().copied().map(char::from));
        result.push_str("\r\n");
    }

    result
}

/// Encodes text as an RFC 2047 Base64 encoded-word: `=?UTF-8?B?...?=`.
///
/// Always encodes, even pure-ASCII input. Used for the subject and the
/// sender display name, where Base64 stays well-formed for any length.
#[must_use]
pub fn encode_header_word(text: &str) -> String {
    format!("=?UTF-8?B?{}?=", STANDARD.encode(text.as_bytes()))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ensure_utf8_passthrough() {
        let text = "Héllo, Wørld!";
        assert_eq!(ensure_utf8(text.as_bytes()), text);
    }

    #[test]
    fn test_ensure_utf8_latin1_fallback() {
        // 0xE9 is 'é' in Latin-1 but invalid on its own in UTF-8
        let bytes = b"caf\xE9";
        assert_eq!(ensure_utf8(bytes), "café");
    }

    #[test]
    fn test_quoted_printable_ascii() {
        assert_eq!(encode_quoted_printable(b"Hello, World!"), "Hello, World!");
    }

    #[test]
    fn test_quoted_printable_escapes() {
        let encoded = encode_quoted_printable("Héllo".as_bytes());
        assert_eq!(encoded, "H=C3=A9llo");

        let encoded = encode_quoted_printable(b"a=b");
        assert_eq!(encoded, "a=3Db");
    }

    #[test]
    fn test_quoted_printable_soft_line_break() {
        let long = "x".repeat(200);
        let encoded = encode_quoted_printable(long.as_bytes());
        assert!(encoded.contains("=\r\n"));
        assert_eq!(encoded.replace("=\r\n", ""), long);
    }

    #[test]
    fn test_base64_encode() {
        assert_eq!(encode_base64(b"Hello, World!"), "SGVsbG8sIFdvcmxkIQ==");
    }

    #[test]
    fn test_base64_chunked_empty() {
        assert_eq!(encode_base64_chunked(b""), "");
    }

    #[test]
    fn test_base64_chunked_lines() {
        let data = vec![0u8; 100]; // 136 base64 chars -> two lines
        let chunked = encode_base64_chunked(&data);
        let lines: Vec<&str> = chunked.split_terminator("\r\n").collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 76);
        assert!(chunked.ends_with("\r\n"));
    }

    #[test]
    fn test_header_word() {
        assert_eq!(encode_header_word("Hello"), "=?UTF-8?B?SGVsbG8=?=");
        assert!(encode_header_word("Héllo").starts_with("=?UTF-8?B?"));
        assert!(encode_header_word("").ends_with("?="));
    }

    proptest! {
        #[test]
        fn quoted_printable_lines_fit(text in ".*") {
            let encoded = encode_quoted_printable(text.as_bytes());
            for line in encoded.split("\r\n") {
                prop_assert!(line.len() <= MAX_LINE_LENGTH);
            }
        }

        #[test]
        fn base64_chunking_preserves_payload(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let chunked = encode_base64_chunked(&data);
            for line in chunked.split_terminator("\r\n") {
                prop_assert!(line.len() <= MAX_LINE_LENGTH);
            }
            prop_assert_eq!(chunked.replace("\r\n", ""), encode_base64(&data));
        }
    }
}
