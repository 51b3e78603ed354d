//! HTTP/1 message framing over a zero-copy byte cursor
//!
//! This crate parses the parts of an HTTP/1 message that decide where it starts and
//! ends: it fixes the message's line terminator, parses the header block into a
//! case-insensitive field table, and locates the body as fixed-length, chunked or
//! connection-close delimited. Everything it produces borrows the caller's buffer.
//!
//! # Features
//!
//! - CRLF, LFCR and bare LF line terminators, one per message
//! - Legacy folded header lines
//! - Duplicate header fields kept in wire order
//! - Chunked bodies with trailer fields
//! - Resource limits on line length, field count, field size and body size
//! - HTTP date parsing and a cached formatted "now"
//!
//! # Example
//!
//! ```
//! use http::{Method, StatusCode, Version};
//! use micro_http_framing::codec::segment::parse_version;
//! use micro_http_framing::codec::{Entity, Eol, HeaderTable};
//! use micro_http_framing::protocol::{InputCursor, Limits, MessageKind, ProtocolError};
//!
//! fn read_reply(raw: &[u8], limits: &Limits) -> Result<Vec<u8>, ProtocolError> {
//!     let mut cursor = InputCursor::new(raw);
//!
//!     let version = parse_version(&mut cursor).ok_or(ProtocolError::malformed("bad version"))?;
//!     assert_eq!(version, Version::HTTP_11);
//!
//!     // the status line fixes the terminator for the whole message
//!     let mut eol = Eol::new();
//!     while cursor.peek().is_some_and(|b| b != b'\r' && b != b'\n') {
//!         cursor.advance(1);
//!     }
//!     if !eol.set(&mut cursor) {
//!         return Err(ProtocolError::malformed("unterminated status line"));
//!     }
//!
//!     let mut header = HeaderTable::new();
//!     header.parse(&mut cursor, &eol, limits)?;
//!
//!     let mut entity = Entity::new();
//!     let kind = MessageKind::reply(StatusCode::OK, &Method::GET);
//!     entity.parse(&mut cursor, &eol, &header, limits, &kind)?;
//!
//!     Ok(entity.to_bytes().to_vec())
//! }
//!
//! let raw = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello";
//! match read_reply(raw, &Limits::default()) {
//!     Ok(body) => assert_eq!(body, b"hello"),
//!     Err(e) => {
//!         e.log();
//!         panic!("{e}");
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: cursor, segments, limits, message kind and errors
//! - [`codec`]: line terminators, header table, body framing and value codecs
//!
//! # Error Handling
//!
//! Every violation is a [`protocol::ProtocolError`] carrying the status code to
//! answer with. Boolean and `Option` results are kept for "does not apply here"
//! and never mean the input is invalid.

pub mod codec;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
