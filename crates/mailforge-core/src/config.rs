//! Sender configuration.

/// Sender identity and reply policy, injected at message construction.
///
/// Replaces any reliance on ambient process-wide configuration: the caller
/// decides who messages come from and whether replies are welcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderConfig {
    /// Address used for the `From` and `Sender` headers.
    pub address: String,
    /// Display name rendered into the `From` header, base64-escaped.
    pub display_name: Option<String>,
    /// When true, `Reply-To` and `Return-Path` point back at the sender.
    pub allow_reply: bool,
}

impl SenderConfig {
    /// Creates a configuration for the given sender address.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            display_name: None,
            allow_reply: true,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Marks the sender address as not accepting replies.
    #[must_use]
    pub fn no_reply(mut self) -> Self {
        self.allow_reply = false;
        self
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

    #[test]
    fn test_defaults() {
        let config = SenderConfig::new("no-reply@example.com");
        assert_eq!(config.address, "no-reply@example.com");
        assert_eq!(config.display_name, None);
        assert!(config.allow_reply);
    }

    #[test]
    fn test_builders() {
        let config = SenderConfig::new("news@example.com")
            .with_display_name("Example News")
            .no_reply();
        assert_eq!(config.display_name.as_deref(), Some("Example News"));
        assert!(!config.allow_reply);
    }
}
