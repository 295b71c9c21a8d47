//! Multipart wire-format serialization.

use crate::error::Result;
use crate::part::Part;

/// Serializes an ordered part list delimited by `boundary`.
///
/// Each part is emitted as `--boundary` CRLF, its header lines, one blank
/// line, the body, then a blank line; the sequence closes with
/// `--boundary--`. Nested multiparts must already be rendered into their
/// part's body, so one pass treats them as opaque bytes.
///
/// # Errors
///
/// Every part is validated first; a part without headers or body fails with
/// [`crate::Error::ContentRequiresHeaders`] /
/// [`crate::Error::ContentRequiresBody`].
pub fn render_multipart(boundary: &str, parts: &[Part]) -> Result<Vec<u8>> {
    let mut out = Vec::new();

    for part in parts {
        part.validate()?;
        out.extend_from_slice(b"--");
        out.extend_from_slice(boundary.as_bytes());
        out.extend_from_slice(b"\r\n");
        for (name, value) in part.headers.iter() {
            if value.is_empty() {
                continue;
            }
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&part.body);
        out.extend_from_slice(b"\r\n\r\n");
    }

    out.extend_from_slice(b"--");
    out.extend_from_slice(boundary.as_bytes());
    out.extend_from_slice(b"--");

    Ok(out)
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
    use crate::error::Error;
    use crate::header::Headers;

    fn part(content_type: &str, body: &[u8]) -> Part {
        let mut headers = Headers::new();
        headers.set("Content-Type", content_type);
        Part::new(headers, body.to_vec())
    }

    #[test]
    fn test_delimiter_counts() {
        let parts = vec![
            part("text/plain", b"one"),
            part("text/plain", b"two"),
            part("text/plain", b"three"),
        ];
        let rendered = render_multipart("B", &parts).unwrap();
        let text = String::from_utf8(rendered).unwrap();

        assert_eq!(text.matches("--B\r\n").count(), 3);
        assert_eq!(text.matches("--B--").count(), 1);
        assert!(text.ends_with("--B--"));
    }

    #[test]
    fn test_part_layout() {
        let rendered = render_multipart("xyz", &[part("text/plain", b"hi")]).unwrap();
        assert_eq!(
            String::from_utf8(rendered).unwrap(),
            "--xyz\r\nContent-Type: text/plain\r\n\r\nhi\r\n\r\n--xyz--"
        );
    }

    #[test]
    fn test_empty_part_list_renders_closer_only() {
        let rendered = render_multipart("B", &[]).unwrap();
        assert_eq!(rendered, b"--B--");
    }

    #[test]
    fn test_malformed_part_aborts() {
        let broken = Part::new(Headers::new(), b"body".to_vec());
        let result = render_multipart("B", &[part("text/plain", b"ok"), broken]);
        assert_eq!(result.unwrap_err(), Error::ContentRequiresHeaders);

        let empty = part("text/plain", b"");
        let result = render_multipart("B", &[empty]);
        assert_eq!(result.unwrap_err(), Error::ContentRequiresBody);
    }
}
