//! Error types for message construction and delivery.

use crate::dispatch::DeliveryReport;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or sending a message.
#[derive(Debug, Error)]
pub enum Error {
    /// MIME composition failed.
    #[error("MIME error: {0}")]
    Mime(#[from] mailforge_mime::Error),

    /// No usable recipient address was supplied.
    #[error("No usable recipient address supplied")]
    InvalidRecipient,

    /// The file is already in the attachment list.
    #[error("File is already attached: {}", .0.display())]
    DuplicateAttachment(PathBuf),

    /// The file is not in the attachment list.
    #[error("File is not attached: {}", .0.display())]
    AttachmentNotFound(PathBuf),

    /// The dispatcher reported a failed delivery; the loop aborted there.
    #[error("Delivery failed for {recipient}")]
    DeliveryFailed {
        /// Address whose dispatch failed.
        recipient: String,
        /// Outcomes accumulated before the failure.
        report: DeliveryReport,
    },
}
