//! Leading-byte classification.
//!
//! A UTF-8 sequence announces its own length in its first byte. The table
//! below maps every byte value to the number of continuation bytes that
//! must follow it. It is purely structural: `0xC0`, `0xF5` and the old
//! 5- and 6-byte leads all get a non-zero count even though no legal
//! sequence starts with them. [`LeadByte`] carries the legality rules that
//! the table deliberately leaves out.

use std::ops::RangeInclusive;

/// Continuation bytes expected after each possible leading byte.
#[rustfmt::skip]
pub const TRAILING_BYTES: [u8; 256] = [
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, 0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, // 0x1F
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, 0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, // 0x3F
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, 0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, // 0x5F
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, 0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, // 0x7F
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, 0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, // 0x9F
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, 0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, // 0xBF
    1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1, 1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1, // 0xDF
    2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2, 3,3,3,3,3,3,3,3,4,4,4,4,5,5,5,5, // 0xFF
];

/// Full range a continuation byte may take.
pub const CONTINUATION: RangeInclusive<u8> = 0x80..=0xBF;

/// Returns the number of continuation bytes that structurally follow `byte`.
///
/// Total over all byte values; ASCII and bare continuation bytes give 0.
#[inline]
pub fn classify_leading_byte(byte: u8) -> u8 {
    TRAILING_BYTES[byte as usize]
}

/// Returns true if `byte` is a continuation byte (`10xxxxxx`).
#[inline]
pub fn is_continuation(byte: u8) -> bool {
    CONTINUATION.contains(&byte)
}

/// Legality class of a sequence's first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadByte {
    /// `0x00..=0x7F`, a complete sequence on its own
    Ascii,
    /// `0x80..=0xC1`: bare continuation byte or overlong 2-byte lead
    Illegal,
    /// `0xC2..=0xDF`
    Two,
    /// `0xE0`: values below U+0800 would be overlong
    ThreeLow,
    /// `0xE1..=0xEC` and `0xEE..=0xEF`
    Three,
    /// `0xED`: upper half would land in the surrogate block
    ThreeSurrogate,
    /// `0xF0`: values below U+10000 would be overlong
    FourLow,
    /// `0xF1..=0xF3`
    Four,
    /// `0xF4`: upper part would exceed U+10FFFF
    FourHigh,
    /// `0xF5..=0xFF`, beyond the last legal scalar
    TooLarge,
}

impl LeadByte {
    /// Classifies a leading byte.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x00..=0x7F => Self::Ascii,
            0x80..=0xC1 => Self::Illegal,
            0xC2..=0xDF => Self::Two,
            0xE0 => Self::ThreeLow,
            0xED => Self::ThreeSurrogate,
            0xE1..=0xEF => Self::Three,
            0xF0 => Self::FourLow,
            0xF1..=0xF3 => Self::Four,
            0xF4 => Self::FourHigh,
            0xF5..=0xFF => Self::TooLarge,
        }
    }

    /// Range the first continuation byte must fall in.
    ///
    /// `None` for leads that never start a multi-byte sequence.
    pub fn first_continuation_range(self) -> Option<RangeInclusive<u8>> {
        match self {
            Self::Ascii | Self::Illegal | Self::TooLarge => None,
            Self::Two | Self::Three | Self::Four => Some(CONTINUATION),
            Self::ThreeLow => Some(0xA0..=0xBF),
            Self::ThreeSurrogate => Some(0x80..=0x9F),
            Self::FourLow => Some(0x90..=0xBF),
            Self::FourHigh => Some(0x80..=0x8F),
        }
    }

    /// Returns true if some well-formed sequence starts with this class.
    pub fn is_legal(self) -> bool {
        !matches!(self, Self::Illegal | Self::TooLarge)
    }
}

impl From<u8> for LeadByte {
    fn from(byte: u8) -> Self {
        Self::from_byte(byte)
    }
}
