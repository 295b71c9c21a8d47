//! Attachment file views.

use std::fs;
use std::io;
use std::path::Path;

/// Read-only view over an attachment file: sniffed mime type, base name and
/// byte content, captured at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    name: String,
    mime_type: String,
    content: Vec<u8>,
}

impl Attachment {
    /// Loads an attachment from the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the path carries no
    /// file name.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
        let content = fs::read(path)?;
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_owned();

        Ok(Self {
            name,
            mime_type,
            content,
        })
    }

    /// Base name used for the `name` and `filename` parameters.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sniffed mime type, `application/octet-stream` when unknown.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Raw file content.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
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
    fn test_load_sniffs_type_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        fs::write(&path, b"%PDF-1.4 fake").unwrap();

        let attachment = Attachment::from_path(&path).unwrap();
        assert_eq!(attachment.name(), "report.pdf");
        assert_eq!(attachment.mime_type(), "application/pdf");
        assert_eq!(attachment.content(), b"%PDF-1.4 fake");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.weird");
        fs::write(&path, b"bytes").unwrap();

        let attachment = Attachment::from_path(&path).unwrap();
        assert_eq!(attachment.mime_type(), "application/octet-stream");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        assert!(Attachment::from_path(&path).is_err());
    }
}
