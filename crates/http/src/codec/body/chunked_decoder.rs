//! Decoder for HTTP chunked transfer encoding.
//!
//! Walks the chunks of a body framed as specified in
//! [RFC 9112 Section 7.1](https://www.rfc-editor.org/rfc/rfc9112#section-7.1):
//! - Each chunk starts with its size in hexadecimal
//! - Followed by optional whitespace and ignored extensions, then the line terminator
//! - Then the chunk data and another line terminator
//! - A zero-sized chunk ends the body and is followed by the trailer block
//!
//! Every line uses the terminator fixed for the message, and each chunk size line is
//! bounded by the line limit.

use tracing::trace;

use crate::codec::Eol;
use crate::ensure;
use crate::protocol::{InputCursor, Limits, ProtocolError, Segment};

/// Reads chunks until the last chunk, tracking the cumulative body size.
#[derive(Debug)]
pub(crate) struct ChunkedDecoder<'e> {
    eol: &'e Eol,
    limits: &'e Limits,
    total: usize,
}

impl<'e> ChunkedDecoder<'e> {
    pub(crate) fn new(eol: &'e Eol, limits: &'e Limits) -> Self {
        Self { eol, limits, total: 0 }
    }

    /// Reads the next chunk's data, or `None` once the zero-sized last chunk is read.
    ///
    /// After `None` the cursor is positioned at the trailer block.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the size line is malformed or too long, the data is
    /// truncated or not followed by the line terminator, or the body grows past the
    /// entity limit.
    pub(crate) fn next_chunk<'a>(&mut self, cursor: &mut InputCursor<'a>) -> Result<Option<Segment<'a>>, ProtocolError> {
        let line = self.eol.read_line(cursor, self.limits.line())?;
        let size = parse_chunk_size(line.as_bytes())?;
        trace!(size, "read chunk size");

        if size == 0 {
            trace!(total = self.total, "finished reading chunked data");
            return Ok(None);
        }

        let total = usize::try_from(size)
            .ok()
            .and_then(|size| self.total.checked_add(size))
            .filter(|total| *total <= self.limits.entity_size())
            .ok_or(ProtocolError::too_large("chunked body exceeds entity limit"))?;

        let data = cursor.take_segment(total - self.total).ok_or(ProtocolError::malformed("truncated chunk"))?;
        ensure!(self.eol.check(cursor), ProtocolError::malformed("invalid chunk terminator"));

        self.total = total;
        Ok(Some(data))
    }
}

/// Parses the hexadecimal size at the start of a chunk size line.
///
/// Spaces or tabs may follow the digits, and a `;` starts extensions, which are
/// ignored.
fn parse_chunk_size(line: &[u8]) -> Result<u64, ProtocolError> {
    let digits = line.iter().take_while(|b| b.is_ascii_hexdigit()).count();
    ensure!(digits > 0, ProtocolError::malformed("invalid chunk size line: Invalid Size"));

    let (hex, rest) = line.split_at(digits);
    let size = hex
        .iter()
        .try_fold(0u64, |size, b| {
            let digit = char::from(*b).to_digit(16)?;
            size.checked_mul(16)?.checked_add(u64::from(digit))
        })
        .ok_or(ProtocolError::malformed("invalid overflow chunked length"))?;

    let rest = match rest.iter().position(|b| !matches!(b, b' ' | b'\t')) {
        Some(i) => &rest[i..],
        None => &[],
    };
    ensure!(rest.is_empty() || rest[0] == b';', ProtocolError::malformed("invalid chunk size linear white space"));

    Ok(size)
}
