//! Latin-1 to UTF-8 upgrading.
//!
//! Latin-1 bytes are Unicode scalars U+0000..=U+00FF, so each input byte
//! becomes one output byte below 0x80 and two output bytes above. The
//! bounded routine always reports the full length the conversion needs,
//! even when the output buffer is too small to hold it, so callers can
//! size a buffer and retry.

use tracing::trace;

/// Result of a bounded upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Upgrade {
    /// Bytes the complete conversion requires, excluding the terminator
    pub needed: usize,
    /// Bytes actually written, always a whole-character prefix
    pub written: usize,
}

impl Upgrade {
    /// Returns true if the whole conversion fit in the output buffer
    pub fn is_complete(&self) -> bool {
        self.written == self.needed
    }
}

/// Upgrades Latin-1 `input` into `output`.
///
/// Writing stops at the first character that does not fit, but `needed`
/// keeps counting to the end of the input. If `needed < output.len()` a NUL
/// byte is stored right after the converted text; it is not counted.
pub fn upgrade_latin1_to_utf8(input: &[u8], output: &mut [u8]) -> Upgrade {
    let capacity = output.len();
    let mut needed = 0;
    let mut written = 0;

    for &byte in input {
        let width = if byte < 0x80 { 1 } else { 2 };

        if written == needed && needed + width <= capacity {
            if width == 1 {
                output[needed] = byte;
            } else {
                output[needed] = 0xC0 | (byte >> 6);
                output[needed + 1] = 0x80 | (byte & 0x3F);
            }
            written += width;
        }
        needed += width;
    }

    if needed < capacity {
        output[needed] = 0;
    }

    Upgrade { needed, written }
}

/// Upgrades Latin-1 `input` into a freshly allocated buffer.
pub fn upgrade_latin1_to_vec(input: &[u8]) -> Vec<u8> {
    Latin1.upgrade_to_vec(input)
}

/// A single-byte legacy encoding that can be upgraded to UTF-8.
///
/// Implementations must honour the same contract as
/// [`upgrade_latin1_to_utf8`]: never write past `output`, always report
/// the full required length.
pub trait LegacyCodec: Send + Sync {
    /// Human-readable encoding name
    fn name(&self) -> &'static str;

    /// Upgrade `input` into `output`
    fn upgrade(&self, input: &[u8], output: &mut [u8]) -> Upgrade;

    /// Measure, allocate and fill in two passes
    fn upgrade_to_vec(&self, input: &[u8]) -> Vec<u8> {
        let needed = self.upgrade(input, &mut []).needed;
        let mut out = vec![0; needed];
        let upgrade = self.upgrade(input, &mut out);
        trace!(
            "{} upgrade: {} input bytes -> {} output bytes",
            self.name(),
            input.len(),
            upgrade.written
        );
        out.truncate(upgrade.written);
        out
    }
}

/// ISO-8859-1, where byte value equals code point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latin1;

impl LegacyCodec for Latin1 {
    fn name(&self) -> &'static str {
        "latin1"
    }

    fn upgrade(&self, input: &[u8], output: &mut [u8]) -> Upgrade {
        upgrade_latin1_to_utf8(input, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::validate::is_valid_utf8;
    use pretty_assertions::assert_eq;
    use quickcheck::QuickCheck;

    #[test]
    fn test_upgrade_concrete_case() {
        let mut out = [0xAAu8; 8];
        let upgrade = upgrade_latin1_to_utf8(&[0x41, 0xE9], &mut out);
        assert_eq!(upgrade, Upgrade { needed: 3, written: 3 });
        assert_eq!(&out[..4], &[0x41, 0xC3, 0xA9, 0x00]);
        assert_eq!(out[4], 0xAA);
    }

    #[test]
    fn test_undersized_buffer_reports_needed() {
        let mut out = [0u8; 1];
        let upgrade = upgrade_latin1_to_utf8(&[0x41, 0xE9], &mut out);
        assert_eq!(upgrade.needed, 3);
        assert_eq!(upgrade.written, 1);
        assert!(!upgrade.is_complete());
        assert_eq!(out, [0x41]);
    }

    #[test]
    fn test_never_splits_a_character() {
        let mut out = [0xAAu8; 2];
        let upgrade = upgrade_latin1_to_utf8(&[0x41, 0xE9, 0x42], &mut out);
        assert_eq!(upgrade, Upgrade { needed: 4, written: 1 });
        // The second slot is left alone: no half sequence, no later ASCII.
        assert_eq!(out, [0x41, 0xAA]);
    }

    #[test]
    fn test_exact_fit_has_no_terminator() {
        let mut out = [0xAAu8; 3];
        let upgrade = upgrade_latin1_to_utf8(&[0x41, 0xE9], &mut out);
        assert!(upgrade.is_complete());
        assert_eq!(out, [0x41, 0xC3, 0xA9]);
    }

    #[test]
    fn test_empty_input_and_output() {
        let upgrade = upgrade_latin1_to_utf8(&[], &mut []);
        assert_eq!(upgrade, Upgrade::default());

        let mut out = [0xAAu8; 1];
        assert_eq!(upgrade_latin1_to_utf8(&[], &mut out).needed, 0);
        assert_eq!(out, [0x00]);

        assert_eq!(upgrade_latin1_to_utf8(&[0xFF, 0x80], &mut []).needed, 4);
    }

    #[test]
    fn test_full_latin1_range() {
        let input: Vec<u8> = (0..=0xFFu8).collect();
        let expected: String = input.iter().map(|&b| char::from(b)).collect();
        assert_eq!(upgrade_latin1_to_vec(&input), expected.as_bytes());
    }

    #[test]
    fn test_legacy_codec_trait() {
        let codec: &dyn LegacyCodec = &Latin1;
        assert_eq!(codec.name(), "latin1");
        assert_eq!(codec.upgrade_to_vec(b"caf\xE9"), "café".as_bytes());
    }

    #[test]
    fn test_ascii_idempotence_quickcheck() {
        fn prop(bytes: Vec<u8>) -> bool {
            let ascii: Vec<u8> = bytes.into_iter().map(|b| b & 0x7F).collect();
            let mut out = vec![0u8; ascii.len()];
            let upgrade = upgrade_latin1_to_utf8(&ascii, &mut out);
            upgrade.needed == ascii.len() && upgrade.written == ascii.len() && out == ascii
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop as fn(Vec<u8>) -> bool);
    }

    #[test]
    fn test_bounded_output_quickcheck() {
        fn prop(input: Vec<u8>, capacity: u8) -> bool {
            let full = upgrade_latin1_to_vec(&input);
            let mut out = vec![0u8; capacity as usize];
            let upgrade = upgrade_latin1_to_utf8(&input, &mut out);

            let expected_needed = input.len() + input.iter().filter(|&&b| b >= 0x80).count();
            upgrade.needed == expected_needed
                && full.len() == expected_needed
                && upgrade.written <= out.len()
                && out[..upgrade.written] == full[..upgrade.written]
                && is_valid_utf8(&out[..upgrade.written])
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop as fn(Vec<u8>, u8) -> bool);
    }
}
