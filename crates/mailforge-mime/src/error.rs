//! Error types for MIME composition.

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME composition error types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// No renderable content after structure selection.
    #[error("Message has no renderable body")]
    EmptyMessageBody,

    /// A content part reached serialization without headers.
    #[error("Content part requires headers")]
    ContentRequiresHeaders,

    /// A content part reached serialization without a body.
    #[error("Content part requires a body")]
    ContentRequiresBody,
}
