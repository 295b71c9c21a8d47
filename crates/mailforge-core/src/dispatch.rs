//! Delivery dispatch contract and batch reporting.

use std::path::PathBuf;

/// Outcome of one recipient in a send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientStatus {
    /// Message handed to the dispatcher successfully.
    Sent,
    /// No usable address resolved; skipped before any dispatch attempt.
    Skipped,
}

/// Per-recipient outcomes of a send, plus the attachments dropped while
/// building the body.
///
/// On a dispatch failure the loop aborts, so the report inside the error
/// covers only what happened up to that point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Outcomes in processing order.
    pub outcomes: Vec<(String, RecipientStatus)>,
    /// Attachment paths excluded because they could not be read.
    pub skipped_attachments: Vec<PathBuf>,
}

impl DeliveryReport {
    /// Number of recipients the message was dispatched to.
    #[must_use]
    pub fn sent(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, status)| *status == RecipientStatus::Sent)
            .count()
    }

    /// Number of recipients skipped for lack of a usable address.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.sent()
    }
}

/// Delivery capability consumed by the send operation.
///
/// Implementations perform the actual transport (SMTP session, sendmail
/// pipe, test double). The engine calls [`Dispatcher::dispatch`] once per
/// resolved recipient and stops at the first failure.
pub trait Dispatcher {
    /// Hands one finished message to the transport.
    ///
    /// `header_block` is the full CRLF-terminated header block including the
    /// trailing blank line. Returns false when delivery failed.
    fn dispatch(&mut self, recipient: &str, subject: &str, body: &[u8], header_block: &str)
    -> bool;

    /// Validates a candidate recipient address.
    ///
    /// The default is the structural check in [`is_valid_address`];
    /// transports with stricter rules can override it.
    fn validate_address(&self, address: &str) -> bool {
        is_valid_address(address)
    }
}

/// Basic structural email address validation.
#[must_use]
pub fn is_valid_address(address: &str) -> bool {
    let address = address.trim();

    // Must contain exactly one @
    let parts: Vec<&str> = address.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() {
        return false;
    }

    // Domain must contain at least one dot and no empty labels
    if domain.is_empty() || !domain.contains('.') {
        return false;
    }
    if domain.split('.').any(str::is_empty) {
        return false;
    }

    true
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

    #[test]
    fn test_valid_addresses() {
        assert!(is_valid_address("user@example.com"));
        assert!(is_valid_address("user.name@example.com"));
        assert!(is_valid_address("user@sub.example.com"));
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("user"));
        assert!(!is_valid_address("@example.com"));
        assert!(!is_valid_address("user@"));
        assert!(!is_valid_address("user@example"));
        assert!(!is_valid_address("user@@example.com"));
        assert!(!is_valid_address("user@example..com"));
    }

    #[test]
    fn test_report_counts() {
        let report = DeliveryReport {
            outcomes: vec![
                ("a@example.com".to_string(), RecipientStatus::Sent),
                ("nope".to_string(), RecipientStatus::Skipped),
                ("b@example.com".to_string(), RecipientStatus::Sent),
            ],
            skipped_attachments: Vec::new(),
        };
        assert_eq!(report.sent(), 2);
        assert_eq!(report.skipped(), 1);
    }
}
