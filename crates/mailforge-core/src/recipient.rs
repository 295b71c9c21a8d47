//! Recipient forms accepted by batch sends.

use std::fmt;

/// A batch send target.
///
/// Either a bare address, or a contact-style record carrying `mail` /
/// `email` fields, resolved in that order. Records whose fields are all
/// empty or invalid resolve to nothing and are skipped by the send loop.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Recipient {
    /// Bare email address.
    Address(String),
    /// Contact record with optional address fields.
    Record {
        /// Primary address field, consulted first.
        mail: Option<String>,
        /// Fallback address field.
        email: Option<String>,
    },
}

impl Recipient {
    /// Resolves to a bare address accepted by `is_valid`, if any.
    pub fn resolve(&self, is_valid: impl Fn(&str) -> bool) -> Option<&str> {
        match self {
            Self::Address(address) => Some(address.as_str()).filter(|a| is_valid(a)),
            Self::Record { mail, email } => mail
                .as_deref()
                .filter(|a| !a.is_empty() && is_valid(a))
                .or_else(|| email.as_deref().filter(|a| !a.is_empty() && is_valid(a))),
        }
    }
}

impl fmt::Display for Recipient {
    /// Best-effort form for reports: the address, or the first populated
    /// record field.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => f.write_str(address),
            Self::Record { mail, email } => {
                let field = mail
                    .as_deref()
                    .filter(|a| !a.is_empty())
                    .or(email.as_deref())
                    .unwrap_or_default();
                f.write_str(field)
            }
        }
    }
}

impl From<&str> for Recipient {
    fn from(address: &str) -> Self {
        Self::Address(address.to_string())
    }
}

impl From<String> for Recipient {
    fn from(address: String) -> Self {
        Self::Address(address)
    }
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
    use crate::dispatch::is_valid_address;

    #[test]
    fn test_address_resolution() {
        let recipient = Recipient::from("user@example.com");
        assert_eq!(recipient.resolve(is_valid_address), Some("user@example.com"));

        let bad = Recipient::from("not-an-address");
        assert_eq!(bad.resolve(is_valid_address), None);
    }

    #[test]
    fn test_record_prefers_mail_field() {
        let recipient = Recipient::Record {
            mail: Some("first@example.com".to_string()),
            email: Some("second@example.com".to_string()),
        };
        assert_eq!(recipient.resolve(is_valid_address), Some("first@example.com"));
    }

    #[test]
    fn test_record_falls_back_to_email_field() {
        let recipient = Recipient::Record {
            mail: Some("broken".to_string()),
            email: Some("second@example.com".to_string()),
        };
        assert_eq!(
            recipient.resolve(is_valid_address),
            Some("second@example.com")
        );

        let empty = Recipient::Record {
            mail: None,
            email: None,
        };
        assert_eq!(empty.resolve(is_valid_address), None);
    }

    #[test]
    fn test_display_form() {
        assert_eq!(Recipient::from("a@example.com").to_string(), "a@example.com");
        let record = Recipient::Record {
            mail: None,
            email: Some("b@example.com".to_string()),
        };
        assert_eq!(record.to_string(), "b@example.com");
    }
}
