//! # utf8v-core
//!
//! UTF-8 validation, scalar encoding and Latin-1 upgrading for
//! line-oriented text protocols.
//!
//! This crate provides:
//! - A validator that rejects overlong forms, surrogates and values past U+10FFFF
//! - A scalar encoder with a fixed 4-byte output and U+FFFD fallback
//! - A Latin-1 upgrader that reports the required length for undersized buffers
//! - A line normalizer that forwards UTF-8 untouched and upgrades everything else
//!
//! ## Architecture
//!
//! - [`codec`]: the byte-level codec operations
//! - [`normalize`]: per-line normalization built on the codec
//! - [`file`]: whole-file wrappers for callers working on paths
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```
//! use utf8v_core::{LineNormalizer, Outcome};
//!
//! let normalizer = LineNormalizer::new();
//!
//! let line = normalizer.normalize(b"PRIVMSG #chan :caf\xE9");
//! assert_eq!(line.outcome, Outcome::Upgraded);
//! assert_eq!(&*line.bytes, "PRIVMSG #chan :café".as_bytes());
//! ```
//!
//! ## Extensibility
//!
//! - [`LegacyCodec`]: plug another single-byte encoding into the normalizer

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod codec;
pub mod error;
pub mod file;
pub mod normalize;

// Re-export primary types for convenience
pub use codec::{
    classify_leading_byte, encode_scalar_to_utf8, is_valid_utf8, upgrade_latin1_to_utf8,
    ConversionMode, Encoded, Latin1, LegacyCodec, Upgrade,
};
pub use error::{Error, Result};
pub use normalize::{LineNormalizer, Normalized, NormalizerConfig, Outcome};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
