//! The mutable email message model and its send pipeline.

use crate::config::SenderConfig;
use crate::dispatch::{DeliveryReport, Dispatcher, RecipientStatus};
use crate::error::{Error, Result};
use crate::recipient::Recipient;
use chrono::Utc;
use mailforge_mime::encoding::{encode_header_word, encode_quoted_printable};
use mailforge_mime::{Attachment, BodySource, BoundarySet, Headers, build};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Header slots every message starts with, in serialization order. Empty
/// slots are omitted from the rendered header block.
const DEFAULT_HEADERS: [&str; 11] = [
    "MIME-Version",
    "Content-Type",
    "Content-Transfer-Encoding",
    "Date",
    "From",
    "Sender",
    "X-Sender",
    "Reply-To",
    "Return-Path",
    "Organization",
    "Bcc",
];

/// One outgoing email message.
///
/// Mutated through setters, then consumed by [`Email::send`] or
/// [`Email::send_batch`]. Boundaries are allocated once per instance, so
/// repeated sends of the same message serialize identically.
#[derive(Debug, Clone)]
pub struct Email {
    headers: Headers,
    subject: String,
    text_body: Option<String>,
    html_body: Option<String>,
    alt_body: Option<String>,
    files: Vec<PathBuf>,
    boundaries: BoundarySet,
}

impl Email {
    /// Creates an empty message with default headers and the configured
    /// sender applied.
    #[must_use]
    pub fn new(config: &SenderConfig) -> Self {
        let mut headers = Headers::new();
        for name in DEFAULT_HEADERS {
            headers.set(name, "");
        }
        headers.set("Date", Utc::now().to_rfc2822());

        let mut email = Self {
            headers,
            subject: String::new(),
            text_body: None,
            html_body: None,
            alt_body: None,
            files: Vec::new(),
            boundaries: BoundarySet::new(),
        };
        email.set_sender(
            &config.address,
            config.display_name.as_deref(),
            config.allow_reply,
        );
        email
    }

    /// Creates a message with subject and body in one step.
    ///
    /// The text fills both renderings: the plain body from the tag-stripped
    /// text, the HTML body from the text with newlines turned into `<br />`.
    #[must_use]
    pub fn with_text(config: &SenderConfig, subject: &str, text: &str) -> Self {
        let mut email = Self::new(config);
        email.set_subject(subject);
        email.set_text(text);
        email
    }

    /// Sets a header value, preserving slot order.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.set(name, value);
    }

    /// Gets a header value.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Sets the sender.
    ///
    /// With a display name the `From` header becomes
    /// `=?UTF-8?B?...?= <address>`; `Sender` always carries the bare
    /// address. When `allow_reply` is set and no return path exists yet,
    /// replies are directed back at the sender.
    pub fn set_sender(&mut self, address: &str, display_name: Option<&str>, allow_reply: bool) {
        let from = display_name.map_or_else(
            || address.to_string(),
            |name| format!("{} <{address}>", encode_header_word(name)),
        );
        self.headers.set("From", from);
        self.headers.set("Sender", address);
        if allow_reply
            && self
                .headers
                .get("Return-Path")
                .is_none_or(str::is_empty)
        {
            self.set_reply_to(address);
        }
    }

    /// Directs replies to the given address (`Reply-To` and `Return-Path`).
    pub fn set_reply_to(&mut self, address: &str) {
        self.headers.set("Return-Path", address);
        self.headers.set("Reply-To", address);
    }

    /// Sets the subject, stored in its wire form.
    ///
    /// Base64 encoded-words stay well-formed for long subjects where
    /// quoted-printable words would break.
    pub fn set_subject(&mut self, subject: &str) {
        self.subject = encode_header_word(subject);
    }

    /// The subject in its wire form.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Fills text and HTML bodies from one string.
    pub fn set_text(&mut self, text: &str) {
        self.set_text_body(&strip_tags(text));
        self.set_html_body(&newlines_to_br(text));
    }

    /// Sets the plain-text body, quoted-printable encoded.
    pub fn set_text_body(&mut self, body: &str) {
        self.text_body = Some(encode_quoted_printable(body.as_bytes()));
    }

    /// Sets the HTML body: wrapped in a `<div dir="ltr">`, stripped of bare
    /// line breaks, quoted-printable encoded.
    pub fn set_html_body(&mut self, body: &str) {
        let mut wrapped = format!("<div dir=\"ltr\">{body}</div>");
        wrapped.retain(|c| c != '\r' && c != '\n');
        self.html_body = Some(encode_quoted_printable(wrapped.as_bytes()));
    }

    /// Sets the alternative body, kept raw.
    pub fn set_alt_body(&mut self, body: &str) {
        self.alt_body = Some(body.to_string());
    }

    /// Adds a file to the attachment list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateAttachment`] if the path is already listed.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if self.contains_file(&path) {
            return Err(Error::DuplicateAttachment(path));
        }
        self.files.push(path);
        Ok(())
    }

    /// Checks whether the path is in the attachment list.
    #[must_use]
    pub fn contains_file(&self, path: &Path) -> bool {
        self.files.iter().any(|listed| listed == path)
    }

    /// Removes a file from the attachment list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttachmentNotFound`] if the path is not listed.
    pub fn remove_file(&mut self, path: &Path) -> Result<()> {
        match self.files.iter().position(|listed| listed == path) {
            Some(index) => {
                self.files.remove(index);
                Ok(())
            }
            None => Err(Error::AttachmentNotFound(path.to_path_buf())),
        }
    }

    /// Sends the message to a single recipient.
    ///
    /// The address is passed through as given; validation is the batch
    /// loop's concern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecipient`] for an empty address,
    /// [`Error::Mime`] when no body can be built, or
    /// [`Error::DeliveryFailed`] when the dispatcher reports failure.
    pub fn send<D: Dispatcher>(
        &mut self,
        dispatcher: &mut D,
        recipient: &str,
    ) -> Result<DeliveryReport> {
        if recipient.is_empty() {
            return Err(Error::InvalidRecipient);
        }
        let (header_block, body, skipped_attachments) = self.prepare()?;
        let mut report = DeliveryReport {
            skipped_attachments,
            ..DeliveryReport::default()
        };

        if dispatcher.dispatch(recipient, &self.subject, &body, &header_block) {
            report
                .outcomes
                .push((recipient.to_string(), RecipientStatus::Sent));
            Ok(report)
        } else {
            Err(Error::DeliveryFailed {
                recipient: recipient.to_string(),
                report,
            })
        }
    }

    /// Sends the message to a list of recipients.
    ///
    /// Duplicates are dropped up front. Each remaining entry is resolved
    /// against the dispatcher's address validator; entries without a usable
    /// address are recorded as skipped. The first dispatch failure aborts
    /// the remaining loop and surfaces as [`Error::DeliveryFailed`] carrying
    /// the outcomes accumulated so far.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecipient`] for an empty list, [`Error::Mime`]
    /// when no body can be built, or [`Error::DeliveryFailed`] on the first
    /// failed dispatch.
    pub fn send_batch<D: Dispatcher>(
        &mut self,
        dispatcher: &mut D,
        recipients: &[Recipient],
    ) -> Result<DeliveryReport> {
        if recipients.is_empty() {
            return Err(Error::InvalidRecipient);
        }
        let (header_block, body, skipped_attachments) = self.prepare()?;
        let mut report = DeliveryReport {
            skipped_attachments,
            ..DeliveryReport::default()
        };

        let mut seen = HashSet::new();
        for recipient in recipients {
            if !seen.insert(recipient) {
                continue;
            }
            let Some(address) = recipient.resolve(|candidate| dispatcher.validate_address(candidate))
            else {
                report
                    .outcomes
                    .push((recipient.to_string(), RecipientStatus::Skipped));
                continue;
            };
            if dispatcher.dispatch(address, &self.subject, &body, &header_block) {
                report
                    .outcomes
                    .push((address.to_string(), RecipientStatus::Sent));
            } else {
                return Err(Error::DeliveryFailed {
                    recipient: address.to_string(),
                    report,
                });
            }
        }

        Ok(report)
    }

    /// Builds the wire body, merges the structural headers into the message
    /// and renders the header block.
    fn prepare(&mut self) -> Result<(String, Vec<u8>, Vec<PathBuf>)> {
        let (attachments, skipped) = self.load_attachments();
        let source = BodySource {
            text: self.text_body.as_deref(),
            html: self.html_body.as_deref(),
            alternative: self.alt_body.as_deref(),
            attachments: &attachments,
        };
        tracing::debug!(
            multipart = source.is_multipart(),
            attachments = attachments.len(),
            "building message body"
        );
        let wire = build(&source, &mut self.boundaries)?;

        for (name, value) in wire.headers.iter() {
            self.headers.set(name, value);
        }
        let header_block = format!("{}\r\n", self.headers);
        Ok((header_block, wire.body, skipped))
    }

    /// Loads readable attachments; unreadable paths are skipped and
    /// collected for the delivery report.
    fn load_attachments(&self) -> (Vec<Attachment>, Vec<PathBuf>) {
        let mut loaded = Vec::new();
        let mut skipped = Vec::new();
        for path in &self.files {
            match Attachment::from_path(path) {
                Ok(attachment) => loaded.push(attachment),
                Err(error) => {
                    tracing::warn!(
                        path = %path.display(),
                        %error,
                        "skipping unreadable attachment"
                    );
                    skipped.push(path.clone());
                }
            }
        }
        (loaded, skipped)
    }
}

/// Drops `<...>` tag runs, keeping the text between them.
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            ch if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Turns line breaks into `<br />` markers.
fn newlines_to_br(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "<br />\n")
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

    fn config() -> SenderConfig {
        SenderConfig::new("no-reply@example.com")
    }

    #[test]
    fn test_default_headers() {
        let email = Email::new(&config());
        let names: Vec<&str> = email.headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, DEFAULT_HEADERS);
        assert!(!email.header("Date").unwrap().is_empty());
    }

    #[test]
    fn test_sender_with_display_name() {
        let sender = SenderConfig::new("news@example.com").with_display_name("Example");
        let email = Email::new(&sender);
        assert_eq!(
            email.header("From"),
            Some("=?UTF-8?B?RXhhbXBsZQ==?= <news@example.com>")
        );
        assert_eq!(email.header("Sender"), Some("news@example.com"));
        assert_eq!(email.header("Reply-To"), Some("news@example.com"));
        assert_eq!(email.header("Return-Path"), Some("news@example.com"));
    }

    #[test]
    fn test_no_reply_sender_leaves_reply_headers_empty() {
        let sender = SenderConfig::new("no-reply@example.com").no_reply();
        let email = Email::new(&sender);
        assert_eq!(email.header("Reply-To"), Some(""));
        assert_eq!(email.header("Return-Path"), Some(""));
    }

    #[test]
    fn test_sender_keeps_existing_return_path() {
        let mut email = Email::new(&config());
        email.set_reply_to("support@example.com");
        email.set_sender("other@example.com", None, true);
        assert_eq!(email.header("Reply-To"), Some("support@example.com"));
        assert_eq!(email.header("Return-Path"), Some("support@example.com"));
    }

    #[test]
    fn test_subject_is_escaped() {
        let mut email = Email::new(&config());
        email.set_subject("Test");
        assert_eq!(email.subject(), "=?UTF-8?B?VGVzdA==?=");
    }

    #[test]
    fn test_set_text_fills_both_bodies() {
        let mut email = Email::new(&config());
        email.set_text("Hello <b>World</b>\nBye");

        assert_eq!(email.text_body.as_deref(), Some("Hello World=0ABye"));
        let html = email.html_body.as_deref().unwrap();
        assert!(html.starts_with("<div dir=\"ltr\">"));
        assert!(html.contains("<br />"));
        assert!(!html.contains("=0A"));
    }

    #[test]
    fn test_html_body_wrapped_and_unfolded() {
        let mut email = Email::new(&config());
        email.set_html_body("<p>one</p>\r\n<p>two</p>");
        assert_eq!(
            email.html_body.as_deref(),
            Some("<div dir=\"ltr\"><p>one</p><p>two</p></div>")
        );
    }

    #[test]
    fn test_alt_body_kept_raw() {
        let mut email = Email::new(&config());
        email.set_alt_body("already prepared = markup");
        assert_eq!(email.alt_body.as_deref(), Some("already prepared = markup"));
    }

    #[test]
    fn test_duplicate_attachment_rejected() {
        let mut email = Email::new(&config());
        email.add_file("a.txt").unwrap();
        let error = email.add_file("a.txt").unwrap_err();
        assert!(matches!(error, Error::DuplicateAttachment(path) if path == Path::new("a.txt")));
        assert!(email.contains_file(Path::new("a.txt")));
    }

    #[test]
    fn test_remove_missing_attachment_rejected() {
        let mut email = Email::new(&config());
        email.add_file("a.txt").unwrap();
        email.remove_file(Path::new("a.txt")).unwrap();
        assert!(!email.contains_file(Path::new("a.txt")));

        let error = email.remove_file(Path::new("a.txt")).unwrap_err();
        assert!(matches!(error, Error::AttachmentNotFound(_)));
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("a<b>c</b>d"), "acd");
        assert_eq!(strip_tags("no tags"), "no tags");
        assert_eq!(strip_tags("<only><tags/>"), "");
    }

    #[test]
    fn test_newlines_to_br() {
        assert_eq!(newlines_to_br("a\nb"), "a<br />\nb");
        assert_eq!(newlines_to_br("a\r\nb"), "a<br />\nb");
        assert_eq!(newlines_to_br("plain"), "plain");
    }
}
