//! Data types shared by the framing codecs.
//!
//! # Architecture
//!
//! - **Input** ([`cursor`]): zero-copy access to the buffered message
//!   - [`InputCursor`]: sequential read position with snapshot/rewind
//!   - [`Segment`]: an `(offset, length)` view into the buffer
//!
//! - **Policy** ([`limits`]): resource bounds
//!   - [`Limits`]: immutable caps consulted on every line, field and body
//!   - [`LimitsConfig`]: deserializable source of [`Limits`]
//!
//! - **Message** ([`message`]): framing decision inputs and outputs
//!   - [`MessageKind`]: request, or reply with status and request method
//!   - [`Framing`]: how the body is delimited
//!
//! - **Errors** ([`error`]):
//!   - [`ProtocolError`]: status classification plus static diagnostic
//!   - [`NumberError`]: decimal parser failures
//!   - [`ConfigError`]: rejected limits configuration

mod cursor;
pub use cursor::InputCursor;
pub use cursor::Segment;

mod limits;
pub use limits::Limits;
pub use limits::LimitsConfig;
pub use limits::{DEFAULT_MAX_ENTITY_SIZE, DEFAULT_MAX_FIELD_NUM, DEFAULT_MAX_FIELD_SIZE, DEFAULT_MAX_LINE};

mod message;
pub use message::Framing;
pub use message::MessageKind;

mod error;
pub use error::ConfigError;
pub use error::ErrorKind;
pub use error::NumberError;
pub use error::ProtocolError;
