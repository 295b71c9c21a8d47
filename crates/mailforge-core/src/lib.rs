//! # mailforge-core
//!
//! Email message model and delivery orchestration.
//!
//! This crate provides:
//! - The mutable [`Email`] message model with header, body and attachment
//!   setters
//! - Explicit [`SenderConfig`] injected at construction (no ambient state)
//! - The [`Dispatcher`] contract consumed at send time
//! - Recipient resolution for bare addresses and contact-style records
//! - Batch sends with per-recipient [`DeliveryReport`] outcomes
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailforge_core::{Email, SenderConfig};
//!
//! let config = SenderConfig::new("no-reply@example.com").with_display_name("Example");
//! let mut email = Email::with_text(&config, "Welcome", "Hello and welcome!");
//! email.add_file("guide.pdf")?;
//!
//! let report = email.send(&mut dispatcher, "user@example.com")?;
//! assert!(report.skipped_attachments.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod dispatch;
mod error;
mod message;
mod recipient;

pub use config::SenderConfig;
pub use dispatch::{DeliveryReport, Dispatcher, RecipientStatus, is_valid_address};
pub use error::{Error, Result};
pub use message::Email;
pub use recipient::Recipient;
