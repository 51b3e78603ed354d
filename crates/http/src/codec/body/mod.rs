//! HTTP body framing
//!
//! Locates the body of a fully buffered message and records it as borrowed
//! segments. Chunk payloads are located, never decoded or copied.
//!
//! # Components
//!
//! - [`Entity`]: body segments plus the trailer of a chunked body
//! - `ChunkedDecoder`: walks size-prefixed chunks up to the last chunk
//! - `LengthDecoder`: takes exactly `Content-Length` bytes
//!
//! The framing decision itself is made by [`Framing::detect`](crate::protocol::Framing::detect).

mod chunked_decoder;
mod entity;
mod length_decoder;

pub use entity::Entity;
