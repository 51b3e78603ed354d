//! MIME header block parser and case-insensitive field table.
//!
//! The table keeps every field in an arena in the order it appeared on the wire.
//! After the block is read, one bucket per field is allocated and each field is
//! chained into the bucket chosen by an FNV hash of its lowercased name. Chains hold
//! arena indices rather than pointers, so lookups walk a chain in insertion order and
//! ordered iteration is a plain walk over the arena.
//!
//! # Limits
//!
//! Each raw line is bounded by [`Limits::line`], each field's name plus value by
//! [`Limits::field_size`], and the number of fields by [`Limits::field_num`]. The
//! first breach aborts the parse and leaves the table empty.

use std::hash::Hasher;

use fnv::FnvHasher;
use tracing::trace;

use crate::codec::Eol;
use crate::ensure;
use crate::protocol::{InputCursor, Limits, ProtocolError, Segment};

#[derive(Debug, Clone, Copy)]
struct Field<'a> {
    key: Segment<'a>,
    val: Segment<'a>,
    /// Bytes charged against the field size limit.
    size: usize,
    /// Next field in the same bucket, in insertion order.
    next: Option<usize>,
}

/// Parsed header fields of one message.
///
/// Duplicate names are kept as separate fields. Keys and values borrow the parsed
/// buffer, so the table deliberately does not implement `Clone`.
#[derive(Debug, Default)]
pub struct HeaderTable<'a> {
    fields: Vec<Field<'a>>,
    buckets: Box<[Option<usize>]>,
}

impl<'a> HeaderTable<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses header lines up to and including the empty line that closes the block.
    ///
    /// A line starting with a space or tab continues the previous field's value. The
    /// table is cleared first, and cleared again if parsing fails.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if:
    /// - a line is malformed, unterminated, or ends with a different terminator
    /// - a line, a field, or the field count exceeds `limits`
    pub fn parse(&mut self, cursor: &mut InputCursor<'a>, eol: &Eol, limits: &Limits) -> Result<(), ProtocolError> {
        self.clear();

        if let Err(e) = self.parse_fields(cursor, eol, limits) {
            self.clear();
            return Err(e);
        }

        self.index();
        trace!(fields = self.fields.len(), "parsed header block");
        Ok(())
    }

    fn parse_fields(&mut self, cursor: &mut InputCursor<'a>, eol: &Eol, limits: &Limits) -> Result<(), ProtocolError> {
        loop {
            let line = eol.read_line(cursor, limits.line())?;

            match line.as_bytes().first() {
                None => return Ok(()),
                Some(b' ' | b'\t') => self.continue_field(cursor, line, eol, limits)?,
                Some(_) => {
                    ensure!(self.fields.len() < limits.field_num(), ProtocolError::too_many("too many header fields"));
                    let field = parse_field(cursor, line)?;
                    ensure!(field.size <= limits.field_size(), ProtocolError::too_large("header field too large"));
                    self.fields.push(field);
                }
            }
        }
    }

    /// Extends the last field's value over a folded continuation line.
    ///
    /// A continuation line counts towards the field size in full, its terminator and
    /// indentation included, even when it is blank.
    fn continue_field(
        &mut self,
        cursor: &InputCursor<'a>,
        line: Segment<'a>,
        eol: &Eol,
        limits: &Limits,
    ) -> Result<(), ProtocolError> {
        let field = self.fields.last_mut().ok_or(ProtocolError::malformed("header block starts with continuation"))?;

        field.size = field.size.saturating_add(eol.len() + line.len());
        ensure!(field.size <= limits.field_size(), ProtocolError::too_large("header field too large"));

        let bytes = line.as_bytes();
        let content = bytes.trim_ascii();
        if content.is_empty() {
            return Ok(());
        }

        let content_start = line.offset() + (bytes.len() - bytes.trim_ascii_start().len());
        let content_end = content_start + content.len();
        let val_start = if field.val.is_empty() { content_start } else { field.val.offset() };

        field.val = cursor.slice(val_start, content_end);
        Ok(())
    }

    /// Chains every field into a bucket table sized to the field count.
    fn index(&mut self) {
        let count = self.fields.len();
        self.fields.shrink_to_fit();
        if count == 0 {
            return;
        }

        let mut buckets = vec![None; count].into_boxed_slice();
        // walking backwards and pushing to the chain head leaves chains in insertion order
        for (i, field) in self.fields.iter_mut().enumerate().rev() {
            let bucket = bucket_of(field.key.as_bytes(), count);
            field.next = buckets[bucket];
            buckets[bucket] = Some(i);
        }
        self.buckets = buckets;
    }

    /// Removes every field and releases the table storage.
    pub fn clear(&mut self) {
        self.fields = Vec::new();
        self.buckets = Box::default();
    }

    /// Number of fields stored, duplicates included.
    #[inline]
    pub fn size(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Name of the `i`-th field in wire order.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.size()`.
    pub fn key(&self, i: usize) -> Segment<'a> {
        self.fields[i].key
    }

    /// Value of the `i`-th field in wire order.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.size()`.
    pub fn val(&self, i: usize) -> Segment<'a> {
        self.fields[i].val
    }

    /// Iterates `(name, value)` pairs in wire order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Segment<'a>, Segment<'a>)> + '_ {
        self.fields.iter().map(|field| (field.key, field.val))
    }

    /// Value of the first field named `key`, compared case-insensitively.
    pub fn lookup(&self, key: &str) -> Option<Segment<'a>> {
        self.lookup_all(key).next()
    }

    /// Values of every field named `key`, in wire order.
    pub fn lookup_all<'t>(&'t self, key: &'t str) -> impl Iterator<Item = Segment<'a>> + 't {
        let head = if self.buckets.is_empty() { None } else { self.buckets[bucket_of(key.as_bytes(), self.buckets.len())] };

        std::iter::successors(head, move |&i| self.fields[i].next)
            .map(move |i| &self.fields[i])
            .filter(move |field| field.key.eq_ignore_ascii_case(key.as_bytes()))
            .map(|field| field.val)
    }

    /// Returns true if at least one field is named `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }
}

/// Splits a `name: value` line. The value has surrounding whitespace removed.
fn parse_field<'a>(cursor: &InputCursor<'a>, line: Segment<'a>) -> Result<Field<'a>, ProtocolError> {
    let bytes = line.as_bytes();
    let colon = bytes.iter().position(|b| *b == b':').ok_or(ProtocolError::malformed("header field without colon"))?;

    let name = &bytes[..colon];
    ensure!(!name.is_empty(), ProtocolError::malformed("empty header field name"));
    ensure!(name.iter().all(|b| is_token_char(*b)), ProtocolError::malformed("invalid header field name"));

    let raw_val = &bytes[colon + 1..];
    let val = raw_val.trim_ascii();
    let val_start = line.offset() + colon + 1 + (raw_val.len() - raw_val.trim_ascii_start().len());

    Ok(Field {
        key: cursor.slice(line.offset(), line.offset() + colon),
        val: cursor.slice(val_start, val_start + val.len()),
        size: colon + val.len(),
        next: None,
    })
}

/// `tchar` from RFC 9110, the characters allowed in a field name.
fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

fn bucket_of(key: &[u8], count: usize) -> usize {
    let mut hasher = FnvHasher::default();
    for b in key {
        hasher.write_u8(b.to_ascii_lowercase());
    }
    (hasher.finish() % count as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ErrorKind;
    use indoc::indoc;

    /// Skips the start line, fixes the terminator from it and parses the header block.
    fn parse_message<'a>(raw: &'a [u8], limits: &Limits) -> (HeaderTable<'a>, Result<(), ProtocolError>, InputCursor<'a>) {
        let mut cursor = InputCursor::new(raw);
        while cursor.peek().is_some_and(|b| !matches!(b, b'\r' | b'\n')) {
            cursor.advance(1);
        }
        let mut eol = Eol::new();
        assert!(eol.set(&mut cursor));

        let mut header = HeaderTable::new();
        let result = header.parse(&mut cursor, &eol, limits);
        (header, result, cursor)
    }

    #[test]
    fn from_curl() {
        let str = indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        123"##};

        let (header, result, mut cursor) = parse_message(str.as_bytes(), &Limits::default());
        result.unwrap();

        assert_eq!(header.size(), 3);
        assert_eq!(header.lookup("host").unwrap(), "127.0.0.1:8080");
        assert_eq!(header.lookup("USER-AGENT").unwrap(), "curl/7.79.1");
        assert_eq!(header.lookup("Accept").unwrap(), "*/*");
        assert_eq!(header.lookup("Content-Length"), None);

        assert_eq!(cursor.rest(), "123");
    }

    #[test]
    fn from_edge() {
        let str = indoc! {r##"
        GET /index/?a=1&b=2&a=3 HTTP/1.1
        Host: 127.0.0.1:8080
        Connection: keep-alive
        Cache-Control: max-age=0
        sec-ch-ua: "#Not_A Brand";v="99", "Microsoft Edge";v="109", "Chromium";v="109"
        sec-ch-ua-mobile: ?0
        sec-ch-ua-platform: "macOS"
        Upgrade-Insecure-Requests: 1
        User-Agent: Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36 Edg/109.0.1518.52
        Accept: text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9
        Sec-Fetch-Site: none
        Sec-Fetch-Mode: navigate
        Sec-Fetch-User: ?1
        Sec-Fetch-Dest: document
        Accept-Encoding: gzip, deflate, br
        Accept-Language: zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7

        "##};

        let (header, result, cursor) = parse_message(str.as_bytes(), &Limits::default());
        result.unwrap();
        assert!(cursor.is_at_end());

        assert_eq!(header.size(), 15);
        assert_eq!(header.lookup("connection").unwrap(), "keep-alive");
        assert_eq!(header.lookup("cache-control").unwrap(), "max-age=0");
        assert_eq!(
            header.lookup("Sec-Ch-Ua").unwrap(),
            r##""#Not_A Brand";v="99", "Microsoft Edge";v="109", "Chromium";v="109""##
        );
        assert_eq!(header.lookup("sec-ch-ua-platform").unwrap(), "\"macOS\"");
        assert_eq!(header.lookup("accept-encoding").unwrap(), "gzip, deflate, br");
        assert_eq!(header.lookup("Accept-Language").unwrap(), "zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7");

        // every stored field is reachable through lookup
        for (key, _) in header.iter() {
            assert!(header.contains(key.to_str().unwrap()));
        }
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let raw = b"GET / HTTP/1.1\r\nSet-Cookie: a=1\r\nHost: x\r\nset-cookie: b=2\r\nSET-COOKIE: c=3\r\n\r\n";
        let (header, result, _) = parse_message(raw, &Limits::default());
        result.unwrap();

        assert_eq!(header.size(), 4);
        assert_eq!(header.lookup("set-cookie").unwrap(), "a=1");
        let all: Vec<_> = header.lookup_all("Set-Cookie").map(|v| v.as_bytes()).collect();
        assert_eq!(all, [&b"a=1"[..], b"b=2", b"c=3"]);

        assert_eq!(header.key(2), "set-cookie");
        assert_eq!(header.val(2), "b=2");
        assert_eq!(header.key(1), "Host");
    }

    #[test]
    fn value_whitespace_is_trimmed() {
        let raw = b"GET / HTTP/1.1\r\nX-A:\t  spaced out \t\r\nX-Empty:\r\nX-B:tight\r\n\r\n";
        let (header, result, _) = parse_message(raw, &Limits::default());
        result.unwrap();

        assert_eq!(header.lookup("x-a").unwrap(), "spaced out");
        assert!(header.lookup("x-empty").unwrap().is_empty());
        assert_eq!(header.lookup("x-b").unwrap(), "tight");
    }

    #[test]
    fn folded_value() {
        let raw = b"GET / HTTP/1.1\r\nX-Folded: first\r\n   second\r\n\tthird  \r\nX-Late:\r\n  only\r\nHost: x\r\n\r\n";
        let (header, result, _) = parse_message(raw, &Limits::default());
        result.unwrap();

        assert_eq!(header.size(), 3);
        let folded = header.lookup("x-folded").unwrap();
        assert_eq!(folded, "first\r\n   second\r\n\tthird");
        assert_eq!(&folded.unfold()[..], b"first second third");
        assert_eq!(header.lookup("x-late").unwrap(), "only");
        assert_eq!(header.lookup("host").unwrap(), "x");
    }

    #[test]
    fn lfcr_terminators() {
        let raw = b"GET / HTTP/1.1\n\rHost: x\n\rAccept: y\n\r\n\rbody";
        let (header, result, mut cursor) = parse_message(raw, &Limits::default());
        result.unwrap();
        assert_eq!(header.size(), 2);
        assert_eq!(cursor.rest(), "body");
    }

    #[test]
    fn malformed_lines() {
        let cases: [&[u8]; 6] = [
            b"GET / HTTP/1.1\r\n continuation first\r\n\r\n",
            b"GET / HTTP/1.1\r\nNo colon here\r\n\r\n",
            b"GET / HTTP/1.1\r\n: no name\r\n\r\n",
            b"GET / HTTP/1.1\r\nHost : space before colon\r\n\r\n",
            b"GET / HTTP/1.1\r\nHost: x\nAccept: y\r\n\r\n",
            b"GET / HTTP/1.1\r\nHost: x\r\n",
        ];

        for raw in cases {
            let (header, result, _) = parse_message(raw, &Limits::default());
            assert_eq!(result.unwrap_err().kind(), ErrorKind::Malformed);
            assert_eq!(header.size(), 0);
            assert_eq!(header.lookup("host"), None);
        }
    }

    #[test]
    fn too_many_fields() {
        let limits = Limits::new(1024, 2, 1024, 1024);
        let raw = b"GET / HTTP/1.1\r\nA: 1\r\nB: 2\r\nC: 3\r\n\r\n";
        let (header, result, _) = parse_message(raw, &limits);

        let e = result.unwrap_err();
        assert_eq!(e.kind(), ErrorKind::LimitExceeded);
        assert_eq!(e.message(), "too many header fields");
        assert!(header.is_empty());
        assert_eq!(header.lookup("a"), None);

        let exact = b"GET / HTTP/1.1\r\nA: 1\r\nB: 2\r\n\r\n";
        let (header, result, _) = parse_message(exact, &limits);
        result.unwrap();
        assert_eq!(header.size(), 2);
    }

    #[test]
    fn line_and_field_size() {
        let long_line = Limits::new(8, 8, 1024, 1024);
        let (header, result, _) = parse_message(b"GET\r\nHost: 123456789\r\n\r\n", &long_line);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::LimitExceeded);
        assert!(header.is_empty());

        let big_field = Limits::new(1024, 8, 8, 1024);
        let (_, result, _) = parse_message(b"GET\r\nHost: 12345\r\n\r\n", &big_field);
        let e = result.unwrap_err();
        assert_eq!(e.kind(), ErrorKind::LimitExceeded);
        assert_eq!(e.message(), "header field too large");

        // a folded continuation counts towards the same field
        let (_, result, _) = parse_message(b"GET\r\nHost: 12\r\n 34\r\n\r\n", &big_field);
        assert_eq!(result.unwrap_err().message(), "header field too large");
    }

    #[test]
    fn blank_continuations_count_towards_field_size() {
        let limits = Limits::new(64, 2, 16, 64);
        let mut raw = b"GET / HTTP/1.1\r\nA: 1\r\n".to_vec();
        raw.extend(b"   \r\n".repeat(1000));
        raw.extend(b"\r\n");

        let (header, result, _) = parse_message(&raw, &limits);
        let e = result.unwrap_err();
        assert_eq!(e.kind(), ErrorKind::LimitExceeded);
        assert_eq!(e.message(), "header field too large");
        assert!(header.is_empty());

        // a couple of blank lines still fit: 2 + 5 + 5 bytes
        let (header, result, _) = parse_message(b"GET / HTTP/1.1\r\nA: 1\r\n   \r\n\t \t\r\n\r\n", &limits);
        result.unwrap();
        assert_eq!(header.lookup("a").unwrap(), "1");
    }

    #[test]
    fn clear_is_idempotent() {
        let raw = b"GET / HTTP/1.1\r\nHost: x\r\n\r\n";
        let (mut header, result, _) = parse_message(raw, &Limits::default());
        result.unwrap();
        assert_eq!(header.size(), 1);

        header.clear();
        header.clear();
        assert_eq!(header.size(), 0);
        assert_eq!(header.lookup("host"), None);
        assert_eq!(header.lookup_all("host").count(), 0);
    }

    #[test]
    fn reparse_replaces_previous_fields() {
        let limits = Limits::default();
        let eol = Eol::crlf();
        let mut header = HeaderTable::new();

        let first = b"Host: a\r\nAccept: b\r\n\r\n";
        header.parse(&mut InputCursor::new(first), &eol, &limits).unwrap();
        assert_eq!(header.size(), 2);

        let second = b"Host: c\r\n\r\n";
        header.parse(&mut InputCursor::new(second), &eol, &limits).unwrap();
        assert_eq!(header.size(), 1);
        assert_eq!(header.lookup("host").unwrap(), "c");
        assert_eq!(header.lookup("accept"), None);

        header.parse(&mut InputCursor::new(b"bad\r\n\r\n"), &eol, &limits).unwrap_err();
        assert!(header.is_empty());
    }

    #[test]
    fn empty_block() {
        let mut header = HeaderTable::new();
        header.parse(&mut InputCursor::new(b"\r\n"), &Eol::crlf(), &Limits::default()).unwrap();
        assert_eq!(header.size(), 0);
        assert_eq!(header.lookup("anything"), None);
    }
}
