//! Zero-copy read position and byte views over a borrowed message buffer.
//!
//! Every parser in this crate walks an [`InputCursor`] and hands out [`Segment`]s.
//! Both borrow the buffer owned by the connection layer, so nothing produced by a
//! parse can outlive the bytes it points into.

use std::borrow::Cow;
use std::fmt;
use std::str::Utf8Error;

use bytes::Buf;

/// A sequential read position over an externally owned buffer.
///
/// The cursor is `Copy`: copying it takes a snapshot, assigning the snapshot back
/// rewinds to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> InputCursor<'a> {
    /// Creates a cursor positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Returns the byte at the current position without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    /// Returns the byte `n` positions ahead of the current one without consuming it.
    #[inline]
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.buf.get(self.pos.checked_add(n)?).copied()
    }

    /// Moves the cursor forward by `n` bytes, clamped to the end of the buffer.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n).min(self.buf.len());
    }

    /// Number of bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Returns true when no bytes are left.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// Absolute offset of the cursor within the underlying buffer.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The unread bytes as a slice, without consuming them.
    #[inline]
    pub fn unread(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Consumes and returns every remaining byte.
    pub fn rest(&mut self) -> Segment<'a> {
        let segment = Segment::new(self.pos, &self.buf[self.pos..]);
        self.pos = self.buf.len();
        segment
    }

    /// Consumes the next `n` bytes, or returns `None` and leaves the cursor unmoved
    /// when fewer than `n` remain.
    ///
    /// Named apart from [`Buf::take`], which consumes the cursor by value.
    pub fn take_segment(&mut self, n: usize) -> Option<Segment<'a>> {
        if n > self.remaining() {
            return None;
        }
        let start = self.pos;
        self.pos += n;
        Some(Segment::new(start, &self.buf[start..self.pos]))
    }

    /// Returns the bytes consumed between `snapshot` and the current position.
    ///
    /// `snapshot` must be an earlier copy of this cursor.
    pub fn segment_since(&self, snapshot: &InputCursor<'a>) -> Segment<'a> {
        debug_assert!(std::ptr::eq(self.buf, snapshot.buf));
        debug_assert!(snapshot.pos <= self.pos);
        Segment::new(snapshot.pos, &self.buf[snapshot.pos..self.pos])
    }

    /// Returns the segment `[start, end)` of the underlying buffer.
    pub(crate) fn slice(&self, start: usize, end: usize) -> Segment<'a> {
        Segment::new(start, &self.buf[start..end])
    }
}

impl Buf for InputCursor<'_> {
    fn remaining(&self) -> usize {
        InputCursor::remaining(self)
    }

    fn chunk(&self) -> &[u8] {
        self.unread()
    }

    fn advance(&mut self, cnt: usize) {
        assert!(cnt <= InputCursor::remaining(self), "cannot advance past the end of the buffer");
        self.pos += cnt;
    }
}

/// A read-only `(offset, length)` view into a message buffer.
///
/// The offset is absolute within the buffer the producing cursor was created over.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Segment<'a> {
    offset: usize,
    bytes: &'a [u8],
}

impl<'a> Segment<'a> {
    pub(crate) fn new(offset: usize, bytes: &'a [u8]) -> Self {
        Self { offset, bytes }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Views the segment as UTF-8 text.
    pub fn to_str(&self) -> Result<&'a str, Utf8Error> {
        std::str::from_utf8(self.bytes)
    }

    /// ASCII case-insensitive comparison against `other`.
    pub fn eq_ignore_ascii_case(&self, other: &[u8]) -> bool {
        self.bytes.eq_ignore_ascii_case(other)
    }

    /// Returns the value with every folded line break collapsed into a single space.
    ///
    /// A line break here is any run of CR/LF bytes followed by spaces or tabs. Values
    /// that were never folded are returned borrowed.
    pub fn unfold(&self) -> Cow<'a, [u8]> {
        if !self.bytes.iter().any(|b| matches!(b, b'\r' | b'\n')) {
            return Cow::Borrowed(self.bytes);
        }

        let mut out = Vec::with_capacity(self.bytes.len());
        let mut iter = self.bytes.iter().copied().peekable();
        while let Some(b) = iter.next() {
            if matches!(b, b'\r' | b'\n') {
                while iter.next_if(|b| matches!(b, b'\r' | b'\n' | b' ' | b'\t')).is_some() {}
                out.push(b' ');
            } else {
                out.push(b);
            }
        }
        Cow::Owned(out)
    }
}

impl AsRef<[u8]> for Segment<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl PartialEq<[u8]> for Segment<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.bytes == other
    }
}

impl PartialEq<&[u8]> for Segment<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.bytes == *other
    }
}

impl PartialEq<&str> for Segment<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl fmt::Debug for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("offset", &self.offset)
            .field("bytes", &String::from_utf8_lossy(self.bytes))
            .finish()
    }
}
