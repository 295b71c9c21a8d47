//! MIME structure selection and tree building.
//!
//! Classifies the content present on a message and materializes either a
//! single part or a multipart tree, serialized to wire bytes along with the
//! envelope headers the structure requires.

use crate::attachment::Attachment;
use crate::boundary::BoundarySet;
use crate::encoding::{encode_base64_chunked, ensure_utf8};
use crate::error::{Error, Result};
use crate::header::Headers;
use crate::part::Part;
use crate::writer::render_multipart;

/// Content snapshot for one message.
///
/// `text` and `html` are already quoted-printable encoded by the caller's
/// setters; `alternative` is raw prepared markup; `attachments` holds only
/// the files that could actually be read.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodySource<'a> {
    /// Quoted-printable encoded plain-text body.
    pub text: Option<&'a str>,
    /// Quoted-printable encoded HTML body.
    pub html: Option<&'a str>,
    /// Raw alternative body.
    pub alternative: Option<&'a str>,
    /// Readable attachments, in attachment-list order.
    pub attachments: &'a [Attachment],
}

impl BodySource<'_> {
    fn filled_text(&self) -> Option<&str> {
        self.text.filter(|body| !body.is_empty())
    }

    fn filled_html(&self) -> Option<&str> {
        self.html.filter(|body| !body.is_empty())
    }

    fn filled_alternative(&self) -> Option<&str> {
        self.alternative.filter(|body| !body.is_empty())
    }

    fn has_files(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Checks whether more than one content kind is present.
    ///
    /// The alternative body never counts towards multiplicity; it only rides
    /// along once a multipart structure is chosen.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        let kinds = usize::from(self.filled_html().is_some())
            + usize::from(self.filled_text().is_some())
            + usize::from(self.has_files());
        kinds > 1
    }
}

/// A built message body: envelope headers to merge plus the body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireBody {
    /// `MIME-Version`, `Content-Type` and `Content-Transfer-Encoding` values
    /// for the envelope. Empty values clear the corresponding header.
    pub headers: Headers,
    /// Serialized body.
    pub body: Vec<u8>,
}

/// Builds the wire body for the given content.
///
/// Single-part when only one content kind is present (HTML preferred over
/// text), flat `multipart/alternative` for multiple bodies without files,
/// and `multipart/mixed` wrapping a nested alternative part plus one part
/// per attachment when files are present.
///
/// # Errors
///
/// Returns [`Error::EmptyMessageBody`] when no renderable content remains,
/// or a part-validation error from serialization.
pub fn build(source: &BodySource<'_>, boundaries: &mut BoundarySet) -> Result<WireBody> {
    if !source.is_multipart() {
        return build_single(source);
    }

    let mut alternatives = alternative_parts(source);
    let mut headers = Headers::new();
    headers.set("MIME-Version", "1.0");

    let outer = boundaries.get(0).to_owned();
    let parts = if source.has_files() {
        headers.set(
            "Content-Type",
            format!("multipart/mixed; boundary=\"{outer}\""),
        );
        let mut parts = Vec::new();
        if !alternatives.is_empty() {
            let inner = boundaries.get(1).to_owned();
            parts.push(nest_alternatives(&inner, &mut alternatives)?);
        }
        for attachment in source.attachments {
            parts.push(attachment_part(attachment));
        }
        parts
    } else {
        headers.set(
            "Content-Type",
            format!("multipart/alternative; boundary=\"{outer}\""),
        );
        alternatives
    };

    if parts.is_empty() {
        return Err(Error::EmptyMessageBody);
    }

    let body = render_multipart(&outer, &parts)?;
    Ok(WireBody { headers, body })
}

/// Single-part selection: HTML wins over text; no body at all is an error.
fn build_single(source: &BodySource<'_>) -> Result<WireBody> {
    let mut headers = Headers::new();
    let body = if let Some(html) = source.filled_html() {
        headers.set("MIME-Version", "1.0");
        headers.set("Content-Type", "text/html; charset=\"UTF-8\"");
        headers.set("Content-Transfer-Encoding", "quoted-printable");
        html
    } else if let Some(text) = source.filled_text() {
        headers.set("MIME-Version", "");
        headers.set("Content-Type", "text/plain; charset=\"UTF-8\"");
        headers.set("Content-Transfer-Encoding", "quoted-printable");
        text
    } else {
        return Err(Error::EmptyMessageBody);
    };

    Ok(WireBody {
        headers,
        body: body.as_bytes().to_vec(),
    })
}

/// Collects the alternative list in its contract order: alternative body
/// first, then text, then HTML, so clients render the richest part last.
fn alternative_parts(source: &BodySource<'_>) -> Vec<Part> {
    let mut parts = Vec::new();

    if let Some(alternative) = source.filled_alternative() {
        let mut headers = Headers::new();
        headers.set("Content-Type", "multipart/alternative");
        let body = ensure_utf8(alternative.as_bytes()).into_owned().into_bytes();
        parts.push(Part::new(headers, body));
    }

    if let Some(text) = source.filled_text() {
        let mut headers = Headers::new();
        headers.set("Content-Type", "text/plain; charset=\"UTF-8\"");
        headers.set("Content-Transfer-Encoding", "quoted-printable");
        parts.push(Part::new(headers, text.as_bytes().to_vec()));
    }

    if let Some(html) = source.filled_html() {
        let mut headers = Headers::new();
        headers.set("Content-Type", "text/html; charset=\"UTF-8\"");
        headers.set("Content-Transfer-Encoding", "quoted-printable");
        parts.push(Part::new(headers, html.as_bytes().to_vec()));
    }

    parts
}

/// Wraps the alternative list into one nested `multipart/alternative` part,
/// tagging each inner content type with `format=flowed`.
fn nest_alternatives(boundary: &str, alternatives: &mut [Part]) -> Result<Part> {
    for part in alternatives.iter_mut() {
        if let Some(content_type) = part.headers.get("Content-Type") {
            let flowed = format!("{content_type}; format=flowed");
            part.headers.set("Content-Type", flowed);
        }
    }
    let body = render_multipart(boundary, alternatives)?;

    let mut headers = Headers::new();
    headers.set(
        "Content-Type",
        format!("multipart/alternative; boundary=\"{boundary}\""),
    );
    Ok(Part::new(headers, body))
}

/// One base64 attachment part.
fn attachment_part(attachment: &Attachment) -> Part {
    let mut headers = Headers::new();
    headers.set(
        "Content-Type",
        format!("{}; name=\"{}\"", attachment.mime_type(), attachment.name()),
    );
    headers.set("Content-Transfer-Encoding", "base64");
    headers.set(
        "Content-Disposition",
        format!("attachment; filename=\"{}\"", attachment.name()),
    );
    Part::new(
        headers,
        encode_base64_chunked(attachment.content()).into_bytes(),
    )
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
    use std::fs;

    fn build_str(source: &BodySource<'_>, boundaries: &mut BoundarySet) -> (Headers, String) {
        let wire = build(source, boundaries).unwrap();
        (wire.headers, String::from_utf8(wire.body).unwrap())
    }

    fn sample_attachment(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> Attachment {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        Attachment::from_path(&path).unwrap()
    }

    #[test]
    fn test_text_only_is_single_part() {
        let source = BodySource {
            text: Some("Hello"),
            ..BodySource::default()
        };
        let (headers, body) = build_str(&source, &mut BoundarySet::new());

        assert_eq!(body, "Hello");
        assert_eq!(
            headers.get("Content-Type"),
            Some("text/plain; charset=\"UTF-8\"")
        );
        assert_eq!(
            headers.get("Content-Transfer-Encoding"),
            Some("quoted-printable")
        );
        assert_eq!(headers.get("MIME-Version"), Some(""));
        assert!(!body.contains("--"));
    }

    #[test]
    fn test_html_wins_single_part() {
        let source = BodySource {
            html: Some("<b>Hi</b>"),
            ..BodySource::default()
        };
        let (headers, body) = build_str(&source, &mut BoundarySet::new());

        assert_eq!(body, "<b>Hi</b>");
        assert_eq!(
            headers.get("Content-Type"),
            Some("text/html; charset=\"UTF-8\"")
        );
        assert_eq!(headers.get("MIME-Version"), Some("1.0"));
    }

    #[test]
    fn test_no_content_fails() {
        let result = build(&BodySource::default(), &mut BoundarySet::new());
        assert_eq!(result.unwrap_err(), Error::EmptyMessageBody);
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let source = BodySource {
            text: Some(""),
            html: Some(""),
            alternative: Some(""),
            ..BodySource::default()
        };
        let result = build(&source, &mut BoundarySet::new());
        assert_eq!(result.unwrap_err(), Error::EmptyMessageBody);
    }

    #[test]
    fn test_alternative_alone_does_not_make_multipart() {
        // The alternative body rides along with a multipart structure, it
        // never causes one by itself.
        let source = BodySource {
            alternative: Some("<x-markup/>"),
            ..BodySource::default()
        };
        assert!(!source.is_multipart());
        let result = build(&source, &mut BoundarySet::new());
        assert_eq!(result.unwrap_err(), Error::EmptyMessageBody);
    }

    #[test]
    fn test_text_and_html_is_flat_alternative() {
        let source = BodySource {
            text: Some("Hello"),
            html: Some("<b>Hi</b>"),
            ..BodySource::default()
        };
        let mut boundaries = BoundarySet::new();
        let (headers, body) = build_str(&source, &mut boundaries);
        let outer = boundaries.get(0).to_owned();

        assert_eq!(
            headers.get("Content-Type"),
            Some(format!("multipart/alternative; boundary=\"{outer}\"").as_str())
        );
        assert_eq!(body.matches(&format!("--{outer}\r\n")).count(), 2);
        assert!(body.ends_with(&format!("--{outer}--")));
        // Plain text before HTML, so the richest part renders last
        let text_at = body.find("text/plain").unwrap();
        let html_at = body.find("text/html").unwrap();
        assert!(text_at < html_at);
        assert!(!body.contains("format=flowed"));
    }

    #[test]
    fn test_alternative_body_rides_first_unencoded() {
        let source = BodySource {
            text: Some("Hello"),
            html: Some("<b>Hi</b>"),
            alternative: Some("raw markup"),
            ..BodySource::default()
        };
        let mut boundaries = BoundarySet::new();
        let (_, body) = build_str(&source, &mut boundaries);

        let alt_at = body.find("Content-Type: multipart/alternative\r\n").unwrap();
        let text_at = body.find("text/plain").unwrap();
        assert!(alt_at < text_at);
        assert!(body.contains("raw markup"));
    }

    #[test]
    fn test_files_nest_the_alternative_list() {
        let dir = tempfile::tempdir().unwrap();
        let attachments = vec![sample_attachment(&dir, "report.pdf", b"%PDF")];
        let source = BodySource {
            text: Some("Hello"),
            html: Some("<b>Hi</b>"),
            attachments: &attachments,
            ..BodySource::default()
        };
        let mut boundaries = BoundarySet::new();
        let (headers, body) = build_str(&source, &mut boundaries);
        let outer = boundaries.get(0).to_owned();
        let inner = boundaries.get(1).to_owned();

        assert_eq!(
            headers.get("Content-Type"),
            Some(format!("multipart/mixed; boundary=\"{outer}\"").as_str())
        );
        // Outer level: nested alternative plus one attachment
        assert_eq!(body.matches(&format!("--{outer}\r\n")).count(), 2);
        assert_eq!(body.matches(&format!("--{outer}--")).count(), 1);
        // Inner level: text then html, flowed
        assert_eq!(body.matches(&format!("--{inner}\r\n")).count(), 2);
        assert_eq!(body.matches(&format!("--{inner}--")).count(), 1);
        assert!(body.contains("text/plain; charset=\"UTF-8\"; format=flowed"));
        assert!(body.contains("text/html; charset=\"UTF-8\"; format=flowed"));
        let inner_at = body.find(&format!("multipart/alternative; boundary=\"{inner}\"")).unwrap();
        let file_at = body.find("Content-Disposition: attachment").unwrap();
        assert!(inner_at < file_at);
    }

    #[test]
    fn test_attachment_part_shape() {
        let dir = tempfile::tempdir().unwrap();
        let attachments = vec![sample_attachment(&dir, "notes.txt", b"hello attachment")];
        let source = BodySource {
            text: Some("Hello"),
            attachments: &attachments,
            ..BodySource::default()
        };
        let (_, body) = build_str(&source, &mut BoundarySet::new());

        assert!(body.contains("Content-Type: text/plain; name=\"notes.txt\""));
        assert!(body.contains("Content-Transfer-Encoding: base64"));
        assert!(body.contains("Content-Disposition: attachment; filename=\"notes.txt\""));
        assert!(body.contains("aGVsbG8gYXR0YWNobWVudA=="));
    }

    #[test]
    fn test_text_with_file_keeps_text_nested() {
        let dir = tempfile::tempdir().unwrap();
        let attachments = vec![sample_attachment(&dir, "a.txt", b"x")];
        let source = BodySource {
            text: Some("Hello"),
            attachments: &attachments,
            ..BodySource::default()
        };
        let mut boundaries = BoundarySet::new();
        let (headers, body) = build_str(&source, &mut boundaries);

        assert!(
            headers
                .get("Content-Type")
                .unwrap()
                .starts_with("multipart/mixed")
        );
        // A lone text body still gets wrapped in its own alternative block
        let inner = boundaries.get(1).to_owned();
        assert!(body.contains(&format!("--{inner}\r\n")));
        assert!(body.contains("text/plain; charset=\"UTF-8\"; format=flowed"));
    }

    #[test]
    fn test_boundaries_stable_across_rebuilds() {
        let source = BodySource {
            text: Some("Hello"),
            html: Some("<b>Hi</b>"),
            ..BodySource::default()
        };
        let mut boundaries = BoundarySet::new();
        let first = build(&source, &mut boundaries).unwrap();
        let second = build(&source, &mut boundaries).unwrap();
        assert_eq!(first, second);
    }
}
