//! Small independent parsers and formatters for header values.
//!
//! - [`parse_version`]: `HTTP/x.y` literal at a cursor
//! - [`token_find`] / [`last_token`]: comma separated token lists
//! - [`parse_http_date`] / [`fmt_http_date`] / [`DateCache`]: HTTP dates
//! - [`parse_number`]: unsigned decimal values

mod date;
mod number;
mod token;
mod version;

pub use date::{fmt_http_date, parse_http_date, DateCache};
pub use number::parse_number;
pub use token::{last_token, token_find, tokens};
pub use version::parse_version;
