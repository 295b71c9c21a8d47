//! End-to-end send pipeline tests with a recording dispatcher.

#![allow(clippy::unwrap_used)]

use mailforge_core::{
    DeliveryReport, Dispatcher, Email, Error, Recipient, RecipientStatus, SenderConfig,
};
use std::fs;
use std::path::Path;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[derive(Debug)]
struct Call {
    recipient: String,
    subject: String,
    body: String,
    header_block: String,
}

/// Test double recording every dispatch attempt.
#[derive(Debug, Default)]
struct MockDispatcher {
    calls: Vec<Call>,
    fail_for: Option<String>,
}

impl Dispatcher for MockDispatcher {
    fn dispatch(
        &mut self,
        recipient: &str,
        subject: &str,
        body: &[u8],
        header_block: &str,
    ) -> bool {
        let ok = self.fail_for.as_deref() != Some(recipient);
        self.calls.push(Call {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: String::from_utf8_lossy(body).into_owned(),
            header_block: header_block.to_string(),
        });
        ok
    }
}

fn config() -> SenderConfig {
    SenderConfig::new("no-reply@example.com").with_display_name("Example")
}

/// Pulls the boundary parameter out of a rendered header block.
fn boundary_of(header_block: &str) -> String {
    let start = header_block.find("boundary=\"").unwrap() + "boundary=\"".len();
    let rest = &header_block[start..];
    rest[..rest.find('"').unwrap()].to_string()
}

#[test]
fn text_body_only_is_single_part() {
    init_tracing();
    let mut dispatcher = MockDispatcher::default();
    let mut email = Email::new(&config());
    email.set_subject("Greetings");
    email.set_text_body("Hello, World!");

    let report = email.send(&mut dispatcher, "user@example.com").unwrap();
    assert_eq!(report.sent(), 1);

    let call = &dispatcher.calls[0];
    assert_eq!(call.recipient, "user@example.com");
    assert_eq!(call.subject, "=?UTF-8?B?R3JlZXRpbmdz?=");
    assert_eq!(call.body, "Hello, World!");
    assert!(
        call.header_block
            .contains("Content-Type: text/plain; charset=\"UTF-8\"\r\n")
    );
    assert!(
        call.header_block
            .contains("Content-Transfer-Encoding: quoted-printable\r\n")
    );
    assert!(!call.header_block.contains("boundary"));
    assert!(!call.header_block.contains("MIME-Version"));
    assert!(call.header_block.ends_with("\r\n\r\n"));
}

#[test]
fn html_body_sets_mime_version() {
    let mut dispatcher = MockDispatcher::default();
    let mut email = Email::new(&config());
    email.set_html_body("<b>Hi</b>");

    email.send(&mut dispatcher, "user@example.com").unwrap();

    let call = &dispatcher.calls[0];
    assert!(call.header_block.contains("MIME-Version: 1.0\r\n"));
    assert!(
        call.header_block
            .contains("Content-Type: text/html; charset=\"UTF-8\"\r\n")
    );
    assert_eq!(call.body, "<div dir=\"ltr\"><b>Hi</b></div>");
}

#[test]
fn constructor_text_builds_alternative() {
    let mut dispatcher = MockDispatcher::default();
    let mut email = Email::with_text(&config(), "Hi", "Hello!");

    email.send(&mut dispatcher, "user@example.com").unwrap();

    let call = &dispatcher.calls[0];
    assert!(
        call.header_block
            .contains("Content-Type: multipart/alternative; boundary=\"")
    );
    let boundary = boundary_of(&call.header_block);
    assert_eq!(call.body.matches(&format!("--{boundary}\r\n")).count(), 2);
    assert!(call.body.ends_with(&format!("--{boundary}--")));
}

#[test]
fn attachment_nests_the_alternative_parts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    fs::write(&path, b"%PDF-1.4 fake report").unwrap();

    let mut dispatcher = MockDispatcher::default();
    let mut email = Email::new(&config());
    email.set_subject("Report");
    email.set_text_body("Hello");
    email.set_html_body("<b>Hi</b>");
    email.add_file(&path).unwrap();

    let report = email.send(&mut dispatcher, "user@example.com").unwrap();
    assert!(report.skipped_attachments.is_empty());

    let call = &dispatcher.calls[0];
    assert!(
        call.header_block
            .contains("Content-Type: multipart/mixed; boundary=\"")
    );
    let outer = boundary_of(&call.header_block);

    // Outer level: the nested alternative block plus one attachment part
    assert_eq!(call.body.matches(&format!("--{outer}\r\n")).count(), 2);
    assert_eq!(call.body.matches(&format!("--{outer}--")).count(), 1);

    let inner = boundary_of(&call.body);
    assert_ne!(outer, inner);
    assert_eq!(call.body.matches(&format!("--{inner}\r\n")).count(), 2);

    // Inner order: plain text first, HTML last
    let text_at = call.body.find("text/plain; charset=\"UTF-8\"; format=flowed").unwrap();
    let html_at = call.body.find("text/html; charset=\"UTF-8\"; format=flowed").unwrap();
    assert!(text_at < html_at);

    // Attachment part follows the alternative block
    let attachment_at = call
        .body
        .find("Content-Type: application/pdf; name=\"report.pdf\"")
        .unwrap();
    assert!(html_at < attachment_at);
    assert!(
        call.body
            .contains("Content-Disposition: attachment; filename=\"report.pdf\"")
    );
    assert!(call.body.contains("Content-Transfer-Encoding: base64"));
}

#[test]
fn empty_message_fails_before_dispatch() {
    let mut dispatcher = MockDispatcher::default();
    let mut email = Email::new(&config());

    let error = email.send(&mut dispatcher, "user@example.com").unwrap_err();
    assert!(matches!(
        error,
        Error::Mime(mailforge_mime::Error::EmptyMessageBody)
    ));
    assert!(dispatcher.calls.is_empty());
}

#[test]
fn empty_recipient_is_rejected() {
    let mut dispatcher = MockDispatcher::default();
    let mut email = Email::with_text(&config(), "Hi", "Hello!");

    assert!(matches!(
        email.send(&mut dispatcher, "").unwrap_err(),
        Error::InvalidRecipient
    ));
    assert!(matches!(
        email.send_batch(&mut dispatcher, &[]).unwrap_err(),
        Error::InvalidRecipient
    ));
    assert!(dispatcher.calls.is_empty());
}

#[test]
fn boundaries_are_stable_across_sends() {
    let mut dispatcher = MockDispatcher::default();
    let mut email = Email::with_text(&config(), "Hi", "Hello!");

    email.send(&mut dispatcher, "first@example.com").unwrap();
    email.send(&mut dispatcher, "second@example.com").unwrap();

    assert_eq!(dispatcher.calls[0].body, dispatcher.calls[1].body);
    assert_eq!(
        boundary_of(&dispatcher.calls[0].header_block),
        boundary_of(&dispatcher.calls[1].header_block)
    );
}

#[test]
fn batch_dedupes_and_skips_unresolvable() {
    let mut dispatcher = MockDispatcher::default();
    let mut email = Email::with_text(&config(), "Hi", "Hello!");

    let recipients = vec![
        Recipient::from("a@example.com"),
        Recipient::from("not-an-address"),
        Recipient::Record {
            mail: None,
            email: Some("b@example.com".to_string()),
        },
        Recipient::from("a@example.com"), // duplicate, dropped up front
    ];
    let report = email.send_batch(&mut dispatcher, &recipients).unwrap();

    let dispatched: Vec<&str> = dispatcher
        .calls
        .iter()
        .map(|call| call.recipient.as_str())
        .collect();
    assert_eq!(dispatched, vec!["a@example.com", "b@example.com"]);
    assert_eq!(
        report.outcomes,
        vec![
            ("a@example.com".to_string(), RecipientStatus::Sent),
            ("not-an-address".to_string(), RecipientStatus::Skipped),
            ("b@example.com".to_string(), RecipientStatus::Sent),
        ]
    );
}

#[test]
fn batch_aborts_on_first_failure() {
    let mut dispatcher = MockDispatcher {
        fail_for: Some("down@example.com".to_string()),
        ..MockDispatcher::default()
    };
    let mut email = Email::with_text(&config(), "Hi", "Hello!");

    let recipients = vec![
        Recipient::from("a@example.com"),
        Recipient::from("down@example.com"),
        Recipient::from("c@example.com"),
    ];
    let error = email.send_batch(&mut dispatcher, &recipients).unwrap_err();

    // The failing recipient was attempted, the rest of the list was not
    assert_eq!(dispatcher.calls.len(), 2);
    match error {
        Error::DeliveryFailed { recipient, report } => {
            assert_eq!(recipient, "down@example.com");
            assert_eq!(
                report.outcomes,
                vec![("a@example.com".to_string(), RecipientStatus::Sent)]
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn batch_of_only_unresolvable_recipients_sends_nothing() {
    let mut dispatcher = MockDispatcher::default();
    let mut email = Email::with_text(&config(), "Hi", "Hello!");

    let recipients = vec![Recipient::from("nope"), Recipient::from("still-nope")];
    let report: DeliveryReport = email.send_batch(&mut dispatcher, &recipients).unwrap();

    assert!(dispatcher.calls.is_empty());
    assert_eq!(report.sent(), 0);
    assert_eq!(report.skipped(), 2);
}

#[test]
fn unreadable_attachment_is_reported_not_fatal() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone.pdf");

    let mut dispatcher = MockDispatcher::default();
    let mut email = Email::new(&config());
    email.set_text_body("Hello");
    email.set_html_body("<b>Hi</b>");
    email.add_file(&missing).unwrap();

    let report = email.send(&mut dispatcher, "user@example.com").unwrap();
    assert_eq!(report.skipped_attachments, vec![missing]);

    // With no readable file left the structure stays a flat alternative
    let call = &dispatcher.calls[0];
    assert!(
        call.header_block
            .contains("Content-Type: multipart/alternative; boundary=\"")
    );
    assert!(!call.body.contains("Content-Disposition"));
}

#[test]
fn alternative_body_rides_along_raw() {
    let mut dispatcher = MockDispatcher::default();
    let mut email = Email::new(&config());
    email.set_text_body("Hello");
    email.set_html_body("<b>Hi</b>");
    email.set_alt_body("watch: calendar-invite");

    email.send(&mut dispatcher, "user@example.com").unwrap();

    let call = &dispatcher.calls[0];
    let alt_at = call
        .body
        .find("Content-Type: multipart/alternative\r\n")
        .unwrap();
    let text_at = call.body.find("text/plain").unwrap();
    assert!(alt_at < text_at);
    assert!(call.body.contains("watch: calendar-invite"));
}

#[test]
fn repeated_send_after_mutation_reuses_boundaries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, b"notes").unwrap();

    let mut dispatcher = MockDispatcher::default();
    let mut email = Email::with_text(&config(), "Hi", "Hello!");
    email.send(&mut dispatcher, "user@example.com").unwrap();
    let flat_boundary = boundary_of(&dispatcher.calls[0].header_block);

    email.add_file(&path).unwrap();
    email.send(&mut dispatcher, "user@example.com").unwrap();
    let mixed_boundary = boundary_of(&dispatcher.calls[1].header_block);

    // Same outer boundary token, now delimiting a mixed structure
    assert_eq!(flat_boundary, mixed_boundary);
    assert!(
        dispatcher.calls[1]
            .header_block
            .contains("multipart/mixed")
    );
    assert!(!email.contains_file(Path::new("absent.txt")));
}
