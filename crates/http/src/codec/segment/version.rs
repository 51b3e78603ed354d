use http::Version;

use crate::protocol::InputCursor;

const VERSION_LEN: usize = 8;

/// Matches a `HTTP/0.9`, `HTTP/1.0` or `HTTP/1.1` literal at the cursor.
///
/// The match is case-sensitive. On success the cursor moves past the literal; on
/// `None` it is left unmoved and the caller decides whether that is fatal.
pub fn parse_version(cursor: &mut InputCursor<'_>) -> Option<Version> {
    let version = match cursor.unread().get(..VERSION_LEN)? {
        b"HTTP/1.1" => Version::HTTP_11,
        b"HTTP/1.0" => Version::HTTP_10,
        b"HTTP/0.9" => Version::HTTP_09,
        _ => return None,
    };

    cursor.advance(VERSION_LEN);
    Some(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_versions() {
        let mut cursor = InputCursor::new(b"HTTP/1.1 200 OK");
        assert_eq!(parse_version(&mut cursor), Some(Version::HTTP_11));
        assert_eq!(cursor.peek(), Some(b' '));

        assert_eq!(parse_version(&mut InputCursor::new(b"HTTP/1.0")), Some(Version::HTTP_10));
        assert_eq!(parse_version(&mut InputCursor::new(b"HTTP/0.9\r\n")), Some(Version::HTTP_09));
    }

    #[test]
    fn unknown_version_does_not_advance() {
        for raw in [&b"http/1.1"[..], b"HTTP/2.0", b"HTTP/1.", b"", b"ICY 200"] {
            let mut cursor = InputCursor::new(raw);
            assert_eq!(parse_version(&mut cursor), None);
            assert_eq!(cursor.position(), 0);
        }
    }
}
