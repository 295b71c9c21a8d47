//! Insertion-ordered email header map.

use std::fmt;

/// Collection of email headers.
///
/// Preserves insertion order, which is also serialization order. Names are
/// matched case-insensitively; the casing of the first insertion wins.
/// Empty values act as placeholders and are omitted when rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header value, replacing an existing one in place.
    ///
    /// A replaced header keeps its position and original name casing; a new
    /// header is appended.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Gets the value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Removes a header entirely.
    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    /// Returns an iterator over all headers in insertion order, placeholders
    /// included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Checks whether the collection holds no headers at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of headers, placeholders included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for Headers {
    /// Renders `Name: value\r\n` lines in insertion order, skipping headers
    /// whose value is empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            if !value.is_empty() {
                write!(f, "{name}: {value}\r\n")?;
            }
        }
        Ok(())
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
    fn test_set_get() {
        let mut headers = Headers::new();
        headers.set("Content-Type", "text/plain");
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(headers.get("content-type"), Some("text/plain")); // Case insensitive
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut headers = Headers::new();
        headers.set("MIME-Version", "");
        headers.set("Content-Type", "text/plain");
        headers.set("mime-version", "1.0");

        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["MIME-Version", "Content-Type"]);
        assert_eq!(headers.get("MIME-Version"), Some("1.0"));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut headers = Headers::new();
        headers.set("Date", "today");
        headers.set("From", "a@example.com");
        headers.set("Reply-To", "b@example.com");

        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Date", "From", "Reply-To"]);
    }

    #[test]
    fn test_remove() {
        let mut headers = Headers::new();
        headers.set("Subject", "Test");
        headers.remove("subject");
        assert_eq!(headers.get("Subject"), None);
        assert!(headers.is_empty());
    }

    #[test]
    fn test_display_skips_empty_values() {
        let mut headers = Headers::new();
        headers.set("MIME-Version", "");
        headers.set("From", "a@example.com");
        headers.set("Organization", "");

        assert_eq!(headers.to_string(), "From: a@example.com\r\n");
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn test_display_crlf_terminated() {
        let mut headers = Headers::new();
        headers.set("From", "a@example.com");
        headers.set("To", "b@example.com");

        assert_eq!(
            headers.to_string(),
            "From: a@example.com\r\nTo: b@example.com\r\n"
        );
    }
}
