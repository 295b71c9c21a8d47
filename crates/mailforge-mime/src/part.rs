//! MIME content parts.

use crate::error::{Error, Result};
use crate::header::Headers;

/// One block of a multipart message: its own headers plus an encoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body, already transfer-encoded.
    pub body: Vec<u8>,
}

impl Part {
    /// Creates a new part.
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self { headers, body }
    }

    /// Checks the part is well-formed for serialization.
    ///
    /// A part without headers or without a body is a build defect, never
    /// silently skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContentRequiresHeaders`] or
    /// [`Error::ContentRequiresBody`].
    pub fn validate(&self) -> Result<()> {
        if self.headers.is_empty() {
            return Err(Error::ContentRequiresHeaders);
        }
        if self.body.is_empty() {
            return Err(Error::ContentRequiresBody);
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

    fn text_headers() -> Headers {
        let mut headers = Headers::new();
        headers.set("Content-Type", "text/plain; charset=\"UTF-8\"");
        headers
    }

    #[test]
    fn test_valid_part() {
        let part = Part::new(text_headers(), b"Hello".to_vec());
        assert!(part.validate().is_ok());
    }

    #[test]
    fn test_missing_headers() {
        let part = Part::new(Headers::new(), b"Hello".to_vec());
        assert_eq!(part.validate(), Err(Error::ContentRequiresHeaders));
    }

    #[test]
    fn test_missing_body() {
        let part = Part::new(text_headers(), Vec::new());
        assert_eq!(part.validate(), Err(Error::ContentRequiresBody));
    }
}
