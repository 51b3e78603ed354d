use crate::protocol::NumberError;

/// Parses a whole segment as an unsigned decimal integer.
///
/// There is no partial success: signs, whitespace and any other non-digit fail.
pub fn parse_number(digits: &[u8]) -> Result<u64, NumberError> {
    if digits.is_empty() {
        return Err(NumberError::Empty);
    }

    digits.iter().try_fold(0u64, |num, &b| {
        if !b.is_ascii_digit() {
            return Err(NumberError::InvalidDigit);
        }
        num.checked_mul(10)
            .and_then(|num| num.checked_add(u64::from(b - b'0')))
            .ok_or(NumberError::Overflow)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_numbers() {
        assert_eq!(parse_number(b"123"), Ok(123));
        assert_eq!(parse_number(b"0"), Ok(0));
        assert_eq!(parse_number(b"007"), Ok(7));
        assert_eq!(parse_number(b"18446744073709551615"), Ok(u64::MAX));
    }

    #[test]
    fn invalid_numbers() {
        assert_eq!(parse_number(b""), Err(NumberError::Empty));
        assert_eq!(parse_number(b"12a"), Err(NumberError::InvalidDigit));
        assert_eq!(parse_number(b"+1"), Err(NumberError::InvalidDigit));
        assert_eq!(parse_number(b" 1"), Err(NumberError::InvalidDigit));
        assert_eq!(parse_number(b"99999999999999999999"), Err(NumberError::Overflow));
    }
}
