//! Body delimited by the `Content-Length` header, see
//! [RFC 9112 Section 6.2](https://www.rfc-editor.org/rfc/rfc9112#section-6.2).

use crate::protocol::{InputCursor, ProtocolError, Segment};

/// Takes a body of a known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LengthDecoder {
    length: u64,
}

impl LengthDecoder {
    pub(crate) fn new(length: u64) -> Self {
        Self { length }
    }

    /// Consumes exactly `length` bytes as one segment.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if fewer bytes remain than declared.
    pub(crate) fn decode<'a>(&self, cursor: &mut InputCursor<'a>) -> Result<Segment<'a>, ProtocolError> {
        usize::try_from(self.length)
            .ok()
            .and_then(|length| cursor.take_segment(length))
            .ok_or(ProtocolError::malformed("body shorter than content-length"))
    }
}
