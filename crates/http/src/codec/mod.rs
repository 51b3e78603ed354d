//! HTTP/1 message framing codecs
//!
//! This module turns a fully buffered message into borrowed views: it fixes the line
//! terminator, parses the header block and locates the body. Nothing here copies the
//! input buffer.
//!
//! # Architecture
//!
//! The codec module is organized into several components:
//!
//! - Line handling:
//!   - [`Eol`]: detects the message's line terminator and enforces it afterwards
//!
//! - Header handling:
//!   - [`HeaderTable`]: parses a header block into a case-insensitive field table
//!
//! - Body handling:
//!   - [`Entity`]: locates a fixed-length, chunked or close-delimited body
//!
//! - Value codecs ([`segment`]):
//!   - version literal, token lists, HTTP dates, decimal numbers
//!
//! # Example
//!
//! ```
//! use micro_http_framing::codec::{Entity, Eol, HeaderTable};
//! use micro_http_framing::protocol::{InputCursor, Limits, MessageKind};
//!
//! let raw = b"Transfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n0\r\n\r\n";
//! let limits = Limits::default();
//! let eol = Eol::crlf();
//! let mut cursor = InputCursor::new(raw);
//!
//! let mut header = HeaderTable::new();
//! header.parse(&mut cursor, &eol, &limits)?;
//!
//! let mut entity = Entity::new();
//! let has_body = entity.parse(&mut cursor, &eol, &header, &limits, &MessageKind::Request)?;
//!
//! assert!(has_body);
//! assert_eq!(entity.segments()[0], "Wiki");
//! # Ok::<(), micro_http_framing::protocol::ProtocolError>(())
//! ```

mod body;
mod eol;
mod header;
pub mod segment;

pub use body::Entity;
pub use eol::Eol;
pub use header::HeaderTable;
