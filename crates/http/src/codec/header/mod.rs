//! MIME header block parsing
//!
//! # Components
//!
//! - [`HeaderTable`]: parses a header block into a case-insensitive field table
//!   - Keeps fields in wire order, duplicates included
//!   - Supports legacy folded continuation lines
//!   - Enforces line, field size and field count limits
//!
//! The same table type holds both the message header and the trailer of a chunked
//! body.

mod header_table;

pub use header_table::HeaderTable;
