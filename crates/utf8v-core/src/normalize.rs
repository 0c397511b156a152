//! Incoming-line normalization.
//!
//! Peers on line-oriented chat protocols send whatever their client was
//! configured for, and in practice that is UTF-8 or Latin-1. A line is
//! forwarded untouched when it is plain ASCII or already well-formed UTF-8.
//! Anything else is assumed to be in the legacy encoding and upgraded into
//! a bounded buffer; if the upgraded line does not fit it is cut at the
//! last whole character.

use crate::codec::{is_valid_utf8, Latin1, LegacyCodec};
use std::borrow::Cow;
use tracing::{debug, trace};

/// Default upper bound for an upgraded line, in bytes.
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 2048;

/// Configuration for the line normalizer
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Maximum size of an upgraded line
    pub max_output_bytes: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

impl NormalizerConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum size of an upgraded line
    pub fn max_output_bytes(mut self, max: usize) -> Self {
        self.max_output_bytes = max;
        self
    }
}

/// What the normalizer did to a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Line was ASCII or valid UTF-8 and is returned as-is
    Unchanged,
    /// Line was upgraded from the legacy encoding
    Upgraded,
    /// Line was upgraded but cut to fit the output bound
    Truncated {
        /// Bytes the full upgrade would have needed
        needed: usize,
    },
}

/// A normalized line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized<'a> {
    /// The UTF-8 bytes to forward
    pub bytes: Cow<'a, [u8]>,
    /// How the bytes were produced
    pub outcome: Outcome,
}

impl Normalized<'_> {
    /// Returns true if the input was returned without copying
    pub fn is_unchanged(&self) -> bool {
        self.outcome == Outcome::Unchanged
    }
}

/// Normalizes raw protocol lines to UTF-8
#[derive(Debug, Clone)]
pub struct LineNormalizer<C = Latin1> {
    config: NormalizerConfig,
    codec: C,
}

impl Default for LineNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineNormalizer {
    /// Creates a Latin-1 normalizer with default configuration
    pub fn new() -> Self {
        Self::with_config(NormalizerConfig::default())
    }

    /// Creates a Latin-1 normalizer with custom configuration
    pub fn with_config(config: NormalizerConfig) -> Self {
        Self::with_codec(config, Latin1)
    }
}

impl<C: LegacyCodec> LineNormalizer<C> {
    /// Creates a normalizer that upgrades from `codec`
    pub fn with_codec(config: NormalizerConfig, codec: C) -> Self {
        Self { config, codec }
    }

    /// The active configuration
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalizes one line, without its line terminator.
    pub fn normalize<'a>(&self, line: &'a [u8]) -> Normalized<'a> {
        if line.is_ascii() || is_valid_utf8(line) {
            return Normalized {
                bytes: Cow::Borrowed(line),
                outcome: Outcome::Unchanged,
            };
        }

        let mut buf = vec![0u8; self.config.max_output_bytes];
        let upgrade = self.codec.upgrade(line, &mut buf);
        buf.truncate(upgrade.written);

        let outcome = if upgrade.is_complete() {
            trace!(
                "Upgraded {} byte line from {} ({} bytes)",
                line.len(),
                self.codec.name(),
                upgrade.written
            );
            Outcome::Upgraded
        } else {
            debug!(
                "Truncated upgraded line: needed {} bytes, limit {}",
                upgrade.needed, self.config.max_output_bytes
            );
            Outcome::Truncated {
                needed: upgrade.needed,
            }
        };

        Normalized {
            bytes: Cow::Owned(buf),
            outcome,
        }
    }
}
