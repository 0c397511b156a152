//! UTF-8 well-formedness checking.
//!
//! Every sequence is checked in three steps: the leading byte fixes the
//! length, all continuation bytes must be `10xxxxxx`, and for the four
//! boundary leads (`E0`, `ED`, `F0`, `F4`) the first continuation byte is
//! narrowed further. Narrowing the first continuation byte is enough to
//! exclude overlong forms, surrogates and values past U+10FFFF without
//! assembling the scalar.

use super::classify::{classify_leading_byte, is_continuation, LeadByte};
use crate::error::{Error, Result};

/// Length of the well-formed sequence at the start of `buf`, if any.
fn sequence_len(buf: &[u8]) -> Option<usize> {
    let (&lead, rest) = buf.split_first()?;
    let trailing = classify_leading_byte(lead) as usize;
    if rest.len() < trailing {
        return None;
    }

    let class = LeadByte::from_byte(lead);
    if class == LeadByte::Ascii {
        return Some(1);
    }

    let first = class.first_continuation_range()?;
    let continuation = &rest[..trailing];
    if !continuation.iter().all(|&b| is_continuation(b)) {
        return None;
    }
    if !first.contains(&continuation[0]) {
        return None;
    }

    Some(trailing + 1)
}

/// Returns true if the whole buffer is well-formed UTF-8.
///
/// The result is deliberately just a boolean. Use [`valid_up_to`] when the
/// position of the first malformed sequence matters.
pub fn is_valid_utf8(buf: &[u8]) -> bool {
    valid_up_to(buf) == buf.len()
}

/// Returns the length of the longest well-formed prefix of `buf`.
pub fn valid_up_to(buf: &[u8]) -> usize {
    let mut position = 0;
    while position < buf.len() {
        match sequence_len(&buf[position..]) {
            Some(len) => position += len,
            None => break,
        }
    }
    position
}

/// Decodes the scalar at the start of `buf`.
///
/// Returns the scalar and the number of bytes it occupies, or `None` if
/// `buf` is empty or starts with a malformed sequence.
pub fn decode_scalar(buf: &[u8]) -> Option<(u32, usize)> {
    let len = sequence_len(buf)?;
    let lead = buf[0];
    if len == 1 {
        return Some((u32::from(lead), 1));
    }

    // 2-byte leads keep 5 bits, 3-byte leads 4, 4-byte leads 3.
    let mut value = u32::from(lead & (0x7F >> len));
    for &byte in &buf[1..len] {
        value = (value << 6) | u32::from(byte & 0x3F);
    }
    Some((value, len))
}

/// A scalar decoded from a buffer, with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedScalar {
    /// Byte offset of the sequence in the buffer
    pub offset: usize,
    /// The scalar value
    pub value: u32,
    /// Encoded length in bytes
    pub len: usize,
}

/// Iterator over the scalars of a buffer.
///
/// Yields one [`Error::InvalidUtf8`] at the first malformed sequence and
/// then stops.
#[derive(Debug, Clone)]
pub struct Scalars<'a> {
    buf: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Scalars<'a> {
    /// Creates an iterator over the scalars of `buf`
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            offset: 0,
            failed: false,
        }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.offset..]
    }
}

impl Iterator for Scalars<'_> {
    type Item = Result<DecodedScalar>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.buf.len() {
            return None;
        }

        match decode_scalar(self.remaining()) {
            Some((value, len)) => {
                let decoded = DecodedScalar {
                    offset: self.offset,
                    value,
                    len,
                };
                self.offset += len;
                Some(Ok(decoded))
            }
            None => {
                self.failed = true;
                Some(Err(Error::invalid_utf8(self.offset)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::QuickCheck;

    #[test]
    fn test_empty_is_valid() {
        assert!(is_valid_utf8(&[]));
        assert_eq!(valid_up_to(&[]), 0);
    }

    #[test]
    fn test_valid_mixed_text() {
        assert!(is_valid_utf8("plain ascii".as_bytes()));
        assert!(is_valid_utf8("Aé€𐍈".as_bytes()));
        assert!(is_valid_utf8(&[0xF4, 0x8F, 0xBF, 0xBF])); // U+10FFFF
        assert!(is_valid_utf8(&[0xED, 0x9F, 0xBF])); // U+D7FF
        assert!(is_valid_utf8(&[0xEE, 0x80, 0x80])); // U+E000
    }

    #[test]
    fn test_overlong_rejection() {
        assert!(!is_valid_utf8(&[0xC0, 0x80]));
        assert!(!is_valid_utf8(&[0xC1, 0xBF]));
        assert!(!is_valid_utf8(&[0xE0, 0x80, 0x80]));
        assert!(!is_valid_utf8(&[0xE0, 0x9F, 0xBF]));
        assert!(!is_valid_utf8(&[0xF0, 0x80, 0x80, 0x80]));
        assert!(!is_valid_utf8(&[0xF0, 0x8F, 0xBF, 0xBF]));
    }

    #[test]
    fn test_surrogate_rejection() {
        assert!(!is_valid_utf8(&[0xED, 0xA0, 0x80]));
        assert!(!is_valid_utf8(&[0xED, 0xBF, 0xBF]));
    }

    #[test]
    fn test_out_of_range_rejection() {
        assert!(!is_valid_utf8(&[0xF4, 0x90, 0x80, 0x80]));
        assert!(!is_valid_utf8(&[0xF5, 0x80, 0x80, 0x80]));
        assert!(!is_valid_utf8(&[0xF8, 0x88, 0x80, 0x80, 0x80]));
        assert!(!is_valid_utf8(&[0xFC, 0x84, 0x80, 0x80, 0x80, 0x80]));
        assert!(!is_valid_utf8(&[0xFF]));
    }

    #[test]
    fn test_truncation_rejection() {
        assert!(!is_valid_utf8(&[0xE2, 0x82]));
        assert!(!is_valid_utf8(&[b'a', 0xC3]));
        assert!(!is_valid_utf8(&[0xF0, 0x9F, 0x98]));
        assert_eq!(valid_up_to(&[b'a', b'b', 0xE2, 0x82]), 2);
    }

    #[test]
    fn test_bad_continuation() {
        assert!(!is_valid_utf8(&[0x80]));
        assert!(!is_valid_utf8(&[0xC3, 0x41]));
        assert!(!is_valid_utf8(&[0xE2, 0x82, 0xC0]));
        assert!(!is_valid_utf8(&[0xF0, 0x9F, 0x98, 0x7F]));
    }

    #[test]
    fn test_valid_up_to_stops_at_first_error() {
        let data = b"ok \xC3\xA9 \xFF more";
        assert_eq!(valid_up_to(data), 6);
        assert!(!is_valid_utf8(data));
    }

    #[test]
    fn test_decode_scalar() {
        assert_eq!(decode_scalar(b"A"), Some((0x41, 1)));
        assert_eq!(decode_scalar(&[0xC3, 0xA9, b'x']), Some((0xE9, 2)));
        assert_eq!(decode_scalar(&[0xE2, 0x82, 0xAC]), Some((0x20AC, 3)));
        assert_eq!(decode_scalar(&[0xF0, 0x90, 0x8D, 0x88]), Some((0x10348, 4)));
        assert_eq!(decode_scalar(&[0xF4, 0x8F, 0xBF, 0xBF]), Some((0x10FFFF, 4)));
        assert_eq!(decode_scalar(&[0xED, 0xA0, 0x80]), None);
        assert_eq!(decode_scalar(&[]), None);
    }

    #[test]
    fn test_scalars_iterator() {
        let decoded: Vec<_> = Scalars::new("a€".as_bytes())
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(
            decoded,
            vec![
                DecodedScalar { offset: 0, value: 0x61, len: 1 },
                DecodedScalar { offset: 1, value: 0x20AC, len: 3 },
            ]
        );
    }

    #[test]
    fn test_scalars_stops_after_error() {
        let mut scalars = Scalars::new(&[b'a', 0xC0, 0x80, b'b']);
        assert_eq!(scalars.next().unwrap().unwrap().value, 0x61);
        match scalars.next() {
            Some(Err(Error::InvalidUtf8 { valid_up_to })) => assert_eq!(valid_up_to, 1),
            other => panic!("expected InvalidUtf8, got {other:?}"),
        }
        assert!(scalars.next().is_none());
        assert_eq!(scalars.remaining(), &[0xC0, 0x80, b'b']);
    }

    #[test]
    fn test_all_two_byte_inputs_match_std() {
        for hi in 0..=0xFFu8 {
            for lo in 0..=0xFFu8 {
                let buf = [hi, lo];
                assert_eq!(
                    is_valid_utf8(&buf),
                    std::str::from_utf8(&buf).is_ok(),
                    "{buf:02x?}"
                );
            }
        }
    }

    #[test]
    fn test_agrees_with_std_quickcheck() {
        fn prop(bytes: Vec<u8>) -> bool {
            let std_result = std::str::from_utf8(&bytes);
            is_valid_utf8(&bytes) == std_result.is_ok()
                && valid_up_to(&bytes)
                    == std_result.map_or_else(|e| e.valid_up_to(), |_| bytes.len())
        }
        QuickCheck::new()
            .tests(2000)
            .quickcheck(prop as fn(Vec<u8>) -> bool);
    }

    #[test]
    fn test_decodes_like_std_quickcheck() {
        fn prop(text: String) -> bool {
            let ours: Vec<u32> = Scalars::new(text.as_bytes())
                .map(|r| r.map(|d| d.value))
                .collect::<Result<_>>()
                .unwrap_or_default();
            let theirs: Vec<u32> = text.chars().map(u32::from).collect();
            ours == theirs
        }
        QuickCheck::new()
            .tests(1000)
            .quickcheck(prop as fn(String) -> bool);
    }
}
