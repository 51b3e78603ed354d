use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::codec::body::chunked_decoder::ChunkedDecoder;
use crate::codec::body::length_decoder::LengthDecoder;
use crate::codec::{Eol, HeaderTable};
use crate::ensure;
use crate::protocol::{Framing, InputCursor, Limits, MessageKind, ProtocolError, Segment};

/// The body of one message as borrowed segments.
///
/// A fixed-length or close-delimited body is one segment; a chunked body is one
/// segment per non-empty chunk, and its trailer fields land in [`Entity::trailer`].
/// Like [`HeaderTable`], an entity borrows the parsed buffer and is not `Clone`.
#[derive(Debug, Default)]
pub struct Entity<'a> {
    segments: Vec<Segment<'a>>,
    /// Trailer fields of a chunked body, empty otherwise.
    pub trailer: HeaderTable<'a>,
}

impl<'a> Entity<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locates the body following `header` and records it.
    ///
    /// Returns `Ok(true)` when the message has body framing (chunked, `Content-Length`
    /// including zero, or a close-delimited reply) and `Ok(false)` when it has no
    /// body at all. The entity is cleared first, and cleared again on failure.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` for any framing violation: unusable `Content-Length`,
    /// a truncated or malformed chunked body, a malformed trailer, or a body larger
    /// than the entity limit.
    pub fn parse(
        &mut self,
        cursor: &mut InputCursor<'a>,
        eol: &Eol,
        header: &HeaderTable<'_>,
        limits: &Limits,
        kind: &MessageKind,
    ) -> Result<bool, ProtocolError> {
        self.clear();

        let result = self.parse_body(cursor, eol, header, limits, kind);
        if result.is_err() {
            self.clear();
        }
        result
    }

    fn parse_body(
        &mut self,
        cursor: &mut InputCursor<'a>,
        eol: &Eol,
        header: &HeaderTable<'_>,
        limits: &Limits,
        kind: &MessageKind,
    ) -> Result<bool, ProtocolError> {
        let framing = Framing::detect(header, kind, limits)?;
        debug!(?framing, "message framing");

        match framing {
            Framing::Empty => Ok(false),

            Framing::Length(length) => {
                let body = LengthDecoder::new(length).decode(cursor)?;
                self.push(body);
                Ok(true)
            }

            Framing::Chunked => {
                let mut decoder = ChunkedDecoder::new(eol, limits);
                while let Some(chunk) = decoder.next_chunk(cursor)? {
                    self.push(chunk);
                }
                self.trailer.parse(cursor, eol, limits)?;
                Ok(true)
            }

            Framing::UntilClose => {
                ensure!(cursor.remaining() <= limits.entity_size(), ProtocolError::too_large("body exceeds entity limit"));
                let body = cursor.rest();
                self.push(body);
                Ok(true)
            }
        }
    }

    fn push(&mut self, segment: Segment<'a>) {
        if !segment.is_empty() {
            self.segments.push(segment);
        }
    }

    /// Removes every body segment and trailer field.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.trailer.clear();
    }

    /// Body segments in wire order.
    #[inline]
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// Total body length in bytes.
    pub fn len(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Copies the body into one contiguous buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.len());
        for segment in &self.segments {
            buf.put_slice(segment.as_bytes());
        }
        buf.freeze()
    }
}
