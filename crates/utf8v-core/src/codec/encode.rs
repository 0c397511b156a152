//! Scalar to UTF-8 encoding.
//!
//! Encoding always targets a 4-byte slot. Slots that do not hold part of
//! the sequence are filled with [`SENTINEL`], which can never appear in
//! well-formed UTF-8, so a caller holding only the array can still tell
//! where the sequence ends.

use crate::error::{Error, Result};
use std::ops::RangeInclusive;

/// Filler for slots that hold no byte of the encoded sequence.
pub const SENTINEL: u8 = 0xFF;

/// U+FFFD, substituted for scalars past [`MAX_LEGAL_SCALAR`].
pub const REPLACEMENT_CHARACTER: u32 = 0xFFFD;

/// Largest scalar UTF-8 may encode.
pub const MAX_LEGAL_SCALAR: u32 = 0x10_FFFF;

/// Largest value accepted as a scalar at all.
pub const MAX_SCALAR: u32 = 0x7FFF_FFFF;

/// UTF-16 surrogate block.
pub const SURROGATES: RangeInclusive<u32> = 0xD800..=0xDFFF;

/// Longest legal UTF-8 sequence.
pub const MAX_SEQUENCE_LEN: usize = 4;

/// Lead byte marks, indexed by sequence length.
const FIRST_BYTE_MARK: [u8; 5] = [0x00, 0x00, 0xC0, 0xE0, 0xF0];

/// How surrogate scalars are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionMode {
    /// Encode surrogates like any other BMP scalar
    #[default]
    Lenient,
    /// Refuse to encode surrogates
    Strict,
}

/// Outcome of encoding one scalar into a caller buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOutcome {
    /// Bytes written to the buffer
    pub written: usize,
    /// Length of the full sequence
    pub needed: usize,
    /// The scalar was illegal and U+FFFD was encoded instead
    pub replaced: bool,
}

impl EncodeOutcome {
    /// Returns true if the whole sequence fit
    pub fn is_complete(&self) -> bool {
        self.written == self.needed
    }
}

/// Encodes `value` into `out`, writing as many leading bytes as fit.
///
/// Scalars above [`MAX_LEGAL_SCALAR`] are replaced with U+FFFD. In
/// [`ConversionMode::Strict`] a surrogate is rejected before anything is
/// written.
pub fn encode_scalar_into(
    value: u32,
    mode: ConversionMode,
    out: &mut [u8],
) -> Result<EncodeOutcome> {
    if mode == ConversionMode::Strict && SURROGATES.contains(&value) {
        return Err(Error::SurrogateScalar { value });
    }

    let (scalar, needed, replaced) = match value {
        0..=0x7F => (value, 1, false),
        0x80..=0x7FF => (value, 2, false),
        0x800..=0xFFFF => (value, 3, false),
        0x1_0000..=MAX_LEGAL_SCALAR => (value, 4, false),
        _ => (REPLACEMENT_CHARACTER, 3, true),
    };

    let mut sequence = [0u8; MAX_SEQUENCE_LEN];
    let mut rest = scalar;
    for slot in sequence[1..needed].iter_mut().rev() {
        *slot = 0x80 | (rest & 0x3F) as u8;
        rest >>= 6;
    }
    sequence[0] = FIRST_BYTE_MARK[needed] | rest as u8;

    let written = needed.min(out.len());
    out[..written].copy_from_slice(&sequence[..written]);

    Ok(EncodeOutcome {
        written,
        needed,
        replaced,
    })
}

/// A sentinel-padded UTF-8 sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Encoded {
    bytes: [u8; MAX_SEQUENCE_LEN],
    len: usize,
    replaced: bool,
}

impl Encoded {
    /// All slots set to [`SENTINEL`], nothing written.
    pub const FAILED: Self = Self {
        bytes: [SENTINEL; MAX_SEQUENCE_LEN],
        len: 0,
        replaced: false,
    };

    /// Number of valid leading bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if encoding produced nothing
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The valid bytes only
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The full padded array
    pub fn as_array(&self) -> &[u8; MAX_SEQUENCE_LEN] {
        &self.bytes
    }

    /// Returns true if the input was illegal and U+FFFD was encoded instead
    pub fn was_replaced(&self) -> bool {
        self.replaced
    }
}

impl AsRef<[u8]> for Encoded {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Encodes one scalar leniently.
pub fn encode_scalar_to_utf8(value: u32) -> Encoded {
    encode_scalar_with(value, ConversionMode::Lenient)
}

/// Encodes one scalar with an explicit surrogate policy.
///
/// Returns [`Encoded::FAILED`] when nothing could be encoded.
pub fn encode_scalar_with(value: u32, mode: ConversionMode) -> Encoded {
    let mut bytes = [SENTINEL; MAX_SEQUENCE_LEN];
    match encode_scalar_into(value, mode, &mut bytes) {
        Ok(outcome) if outcome.written > 0 => Encoded {
            bytes,
            len: outcome.written,
            replaced: outcome.replaced,
        },
        _ => Encoded::FAILED,
    }
}

/// Concatenates the lenient encodings of several scalars.
pub fn encode_scalars(values: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * MAX_SEQUENCE_LEN);
    for &value in values {
        out.extend_from_slice(encode_scalar_to_utf8(value).as_bytes());
    }
    out
}

/// Parses `U+20AC`, `0x20AC` or `8364` into a scalar.
pub fn parse_scalar_literal(literal: &str) -> Result<u32> {
    let trimmed = literal.trim();
    let (digits, radix) = match trimmed
        .strip_prefix("U+")
        .or_else(|| trimmed.strip_prefix("u+"))
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (trimmed, 10),
    };

    // from_str_radix tolerates a sign; a literal must be digits only.
    if digits.starts_with('+') {
        return Err(Error::invalid_scalar_literal(literal));
    }
    let value = u64::from_str_radix(digits, radix)
        .map_err(|_| Error::invalid_scalar_literal(literal))?;
    u32::try_from(value)
        .ok()
        .filter(|v| *v <= MAX_SCALAR)
        .ok_or(Error::ScalarOutOfRange {
            value,
            max: MAX_SCALAR,
        })
}
