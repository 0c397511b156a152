//! The UTF-8 codec.
//!
//! Four leaf operations sharing one set of legality rules:
//!
//! - [`classify_leading_byte`]: structural sequence length from a leading byte
//! - [`is_valid_utf8`]: whole-buffer well-formedness check
//! - [`encode_scalar_to_utf8`]: one scalar to a sentinel-padded 4-byte slot
//! - [`upgrade_latin1_to_utf8`]: Latin-1 to UTF-8 into a bounded buffer
//!
//! All of them are pure functions over caller-owned buffers. Nothing is
//! cached between calls and nothing borrowed outlives the call, so every
//! operation may run concurrently from any number of threads.
//!
//! ## Example
//!
//! ```
//! use utf8v_core::codec::{encode_scalar_to_utf8, is_valid_utf8, upgrade_latin1_to_utf8};
//!
//! assert!(is_valid_utf8("Aé".as_bytes()));
//! assert!(!is_valid_utf8(&[0xC0, 0x80]));
//!
//! assert_eq!(encode_scalar_to_utf8(0x20AC).as_bytes(), &[0xE2, 0x82, 0xAC]);
//!
//! let mut out = [0u8; 1];
//! let upgrade = upgrade_latin1_to_utf8(&[0x41, 0xE9], &mut out);
//! assert_eq!((upgrade.needed, upgrade.written), (3, 1));
//! ```

mod classify;
mod encode;
mod latin1;
mod validate;

pub use classify::{
    classify_leading_byte, is_continuation, LeadByte, CONTINUATION, TRAILING_BYTES,
};
pub use encode::{
    encode_scalar_into, encode_scalar_to_utf8, encode_scalar_with, encode_scalars,
    parse_scalar_literal, ConversionMode, EncodeOutcome, Encoded, MAX_LEGAL_SCALAR, MAX_SCALAR,
    MAX_SEQUENCE_LEN, REPLACEMENT_CHARACTER, SENTINEL, SURROGATES,
};
pub use latin1::{upgrade_latin1_to_utf8, upgrade_latin1_to_vec, Latin1, LegacyCodec, Upgrade};
pub use validate::{decode_scalar, is_valid_utf8, valid_up_to, DecodedScalar, Scalars};
