/// Splits a comma separated list into its trimmed, non-empty elements.
pub fn tokens(value: &[u8]) -> impl DoubleEndedIterator<Item = &[u8]> {
    value.split(|b| *b == b',').map(<[u8]>::trim_ascii).filter(|token| !token.is_empty())
}

/// Returns true if `token` is one of the elements of the comma separated `value`.
///
/// Elements are compared whole and case-insensitively, so `clos` never matches
/// `close`.
pub fn token_find(value: &[u8], token: &str) -> bool {
    tokens(value).any(|element| element.eq_ignore_ascii_case(token.as_bytes()))
}

/// Returns the final element of the comma separated `value`.
pub fn last_token(value: &[u8]) -> Option<&[u8]> {
    tokens(value).next_back()
}
