//! # mailforge-mime
//!
//! MIME message composition and serialization library for email.
//!
//! ## Features
//!
//! - **Content encoding**: Base64, Quoted-Printable, RFC 2047 header words
//! - **Boundary allocation**: unique, cached multipart boundaries
//! - **Structure selection**: single-part, multipart/alternative, or nested
//!   multipart/mixed depending on the content present
//! - **Serialization**: exact RFC 2045/2046 wire format with CRLF line
//!   termination and boundary delimiters
//!
//! ## Quick Start
//!
//! ### Building a message body
//!
//! ```ignore
//! use mailforge_mime::{BodySource, BoundarySet, build};
//!
//! let mut boundaries = BoundarySet::new();
//! let source = BodySource {
//!     text: Some("Hello, World!"),
//!     html: Some("<b>Hello, World!</b>"),
//!     ..BodySource::default()
//! };
//!
//! let wire = build(&source, &mut boundaries)?; // multipart/alternative
//! println!("{}", wire.headers);
//! ```
//!
//! ### Encoding
//!
//! ```ignore
//! use mailforge_mime::encoding::{encode_base64_chunked, encode_quoted_printable};
//!
//! let body = encode_quoted_printable("Héllo, Wørld!".as_bytes());
//! let attachment = encode_base64_chunked(&[0u8; 128]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod attachment;
mod boundary;
mod builder;
mod error;
mod header;
mod part;
mod writer;

pub mod encoding;

pub use attachment::Attachment;
pub use boundary::BoundarySet;
pub use builder::{BodySource, WireBody, build};
pub use error::{Error, Result};
pub use header::Headers;
pub use part::Part;
pub use writer::render_multipart;
