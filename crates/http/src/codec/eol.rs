//! Line terminator detection and enforcement.
//!
//! The first terminator seen in a message (CRLF, LFCR or bare LF) becomes the only
//! one accepted for the rest of that message. Mixing terminators inside one message
//! is how request splitting slips past intermediaries that disagree on where a line
//! ends, so a differing terminator is never treated as a line end.

use memchr::memchr2;

use crate::ensure;
use crate::protocol::{InputCursor, ProtocolError, Segment};

/// The line terminator fixed for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Eol {
    c1: u8,
    c2: Option<u8>,
}

impl Eol {
    /// An unset convention; [`check`](Self::check) matches nothing until [`set`](Self::set) succeeds.
    pub const fn new() -> Self {
        Self { c1: 0, c2: None }
    }

    /// A fixed CRLF convention.
    pub const fn crlf() -> Self {
        Self { c1: b'\r', c2: Some(b'\n') }
    }

    /// Consumes the terminator at `cursor` and records it.
    ///
    /// Accepts CRLF, LFCR or a bare LF. Returns false and leaves the cursor unmoved
    /// if no terminator starts there.
    pub fn set(&mut self, cursor: &mut InputCursor<'_>) -> bool {
        let (c1, c2) = match (cursor.peek(), cursor.peek_at(1)) {
            (Some(b'\r'), Some(b'\n')) => (b'\r', Some(b'\n')),
            (Some(b'\n'), Some(b'\r')) => (b'\n', Some(b'\r')),
            (Some(b'\n'), _) => (b'\n', None),
            _ => return false,
        };

        *self = Self { c1, c2 };
        cursor.advance(self.len());
        true
    }

    /// Consumes the recorded terminator if the cursor is positioned exactly at it.
    ///
    /// On mismatch the cursor is left unmoved.
    pub fn check(&self, cursor: &mut InputCursor<'_>) -> bool {
        if !self.is_set() || cursor.peek() != Some(self.c1) {
            return false;
        }

        if let Some(c2) = self.c2 {
            if cursor.peek_at(1) != Some(c2) {
                return false;
            }
        }

        cursor.advance(self.len());
        true
    }

    /// Reads one line and consumes its terminator, returning the line content.
    ///
    /// The line ends at the first CR or LF, which must begin the recorded terminator.
    /// At most `max_len + 1` bytes are scanned.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the line is longer than `max_len`, is not terminated
    /// before the end of input, or ends with a different terminator. The cursor is
    /// left unmoved in every error case.
    pub fn read_line<'a>(&self, cursor: &mut InputCursor<'a>, max_len: usize) -> Result<Segment<'a>, ProtocolError> {
        let unread = cursor.unread();
        let window = &unread[..unread.len().min(max_len.saturating_add(1))];

        let Some(len) = memchr2(b'\r', b'\n', window) else {
            ensure!(window.len() <= max_len, ProtocolError::too_large("line too long"));
            return Err(ProtocolError::malformed("unterminated line"));
        };

        let mut end = *cursor;
        end.advance(len);
        let line = end.segment_since(cursor);
        ensure!(self.check(&mut end), ProtocolError::malformed("unexpected line terminator"));

        *cursor = end;
        Ok(line)
    }

    /// Returns true once a terminator has been recorded.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.c1 != 0
    }

    /// Length in bytes of the recorded terminator.
    #[inline]
    pub fn len(&self) -> usize {
        match (self.is_set(), self.c2) {
            (false, _) => 0,
            (true, None) => 1,
            (true, Some(_)) => 2,
        }
    }

    /// Returns true if no terminator has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.is_set()
    }
}
