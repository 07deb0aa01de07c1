//! # Stream Configuration
//!
//! Initial allocation and growth policy for [`crate::BitStream`].
//!
//! Loaded once at startup, usually from the client's TOML settings:
//!
//! ```toml
//! initial_capacity_bits = 4096
//!
//! [growth]
//! policy = "linear"
//! words = 64
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{BitStreamError, BitStreamResult};
use crate::WORD_BITS;

/// How the backing store grows when a write runs past its last word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum GrowthPolicy {
    /// At least double the word count.
    #[default]
    Double,
    /// Add a fixed number of words.
    Linear {
        /// Words added per growth step (must be non-zero).
        words: usize,
    },
}

impl GrowthPolicy {
    /// Word count after growing `current` words so that index `required`
    /// becomes addressable.
    #[must_use]
    pub fn grown_len(self, current: usize, required: usize) -> usize {
        let target = match self {
            Self::Double => current.saturating_mul(2).max(1),
            Self::Linear { words } => current.saturating_add(words.max(1)),
        };
        target.max(required + 1)
    }
}

/// Bit stream configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitStreamConfig {
    /// Bits allocated up front (rounded up to whole words).
    pub initial_capacity_bits: u64,
    /// Growth policy once the allocation is exhausted.
    pub growth: GrowthPolicy,
}

impl Default for BitStreamConfig {
    fn default() -> Self {
        Self {
            initial_capacity_bits: u64::from(WORD_BITS),
            growth: GrowthPolicy::Double,
        }
    }
}

impl BitStreamConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::InvalidConfig`] if the text is not a valid
    /// configuration, plus everything [`Self::validate`] rejects.
    pub fn from_toml_str(text: &str) -> BitStreamResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| BitStreamError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        tracing::debug!(
            "Loaded bit stream config: {} bits, {:?}",
            config.initial_capacity_bits,
            config.growth
        );
        Ok(config)
    }

    /// Checks the configuration for values no stream can be built from.
    ///
    /// # Errors
    ///
    /// [`BitStreamError::ZeroCapacity`] for a zero initial capacity and
    /// [`BitStreamError::InvalidConfig`] for a zero linear growth step.
    pub fn validate(&self) -> BitStreamResult<()> {
        if self.initial_capacity_bits == 0 {
            return Err(BitStreamError::ZeroCapacity);
        }
        if let GrowthPolicy::Linear { words: 0 } = self.growth {
            return Err(BitStreamError::InvalidConfig(
                "linear growth step must be at least one word".to_string(),
            ));
        }
        Ok(())
    }
}
