//! Per-call configuration.
//!
//! A [`ResolutionConfig`] is assembled through its builder, validated once,
//! and then immutable; calls receive their own copy, so nothing a caller
//! does later can affect a call already in flight.

use std::time::Duration;

use crate::error::{ResolutionError, Result};

/// Default whole-call time budget.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default pacing delay between route discovery and the resolution pass.
pub const DEFAULT_RESOLUTION_GAP: Duration = Duration::from_secs(1);

/// Immutable knobs for one resolution call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionConfig {
    timeout: Duration,
    gap: Duration,
    skip_resolution: bool,
}

impl ResolutionConfig {
    /// Start building a config from the defaults.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Whole-call budget; covers discovery, the gap and the resolution pass
    /// together. Always positive.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Pacing delay inserted between discovery and the resolution pass.
    /// Zero means no pause.
    #[must_use]
    pub fn gap(&self) -> Duration {
        self.gap
    }

    /// When set, the stream stage stops after discovery and reuses each
    /// route's own link instead of resolving playable URLs.
    #[must_use]
    pub fn skip_resolution(&self) -> bool {
        self.skip_resolution
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            gap: DEFAULT_RESOLUTION_GAP,
            skip_resolution: false,
        }
    }
}

/// Builder for [`ResolutionConfig`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    timeout: Duration,
    gap: Duration,
    skip_resolution: bool,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        let defaults = ResolutionConfig::default();
        Self {
            timeout: defaults.timeout,
            gap: defaults.gap,
            skip_resolution: defaults.skip_resolution,
        }
    }
}

impl ConfigBuilder {
    /// Override the whole-call budget. Must be positive.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the pacing gap. Zero disables the pause.
    #[must_use]
    pub fn gap(mut self, gap: Duration) -> Self {
        self.gap = gap;
        self
    }

    /// Stop the stream stage after discovery; no playable URLs are fetched.
    #[must_use]
    pub fn skip_resolution(mut self) -> Self {
        self.skip_resolution = true;
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::InvalidInput`] when the timeout is zero.
    /// The gap has no lower bound to check since durations are unsigned.
    pub fn build(self) -> Result<ResolutionConfig> {
        if self.timeout.is_zero() {
            return Err(ResolutionError::invalid_input(
                "timeout must be greater than zero",
            ));
        }
        Ok(ResolutionConfig {
            timeout: self.timeout,
            gap: self.gap,
            skip_resolution: self.skip_resolution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ResolutionConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.gap(), Duration::from_secs(1));
        assert!(!config.skip_resolution());
    }

    #[test]
    fn builder_overrides_stick() {
        let config = ResolutionConfig::builder()
            .timeout(Duration::from_millis(2500))
            .gap(Duration::ZERO)
            .skip_resolution()
            .build()
            .unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(2500));
        assert_eq!(config.gap(), Duration::ZERO);
        assert!(config.skip_resolution());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ResolutionConfig::builder()
            .timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidInput { .. }));
    }

    #[test]
    fn zero_gap_is_allowed() {
        let config = ResolutionConfig::builder().gap(Duration::ZERO).build().unwrap();
        assert_eq!(config.gap(), Duration::ZERO);
    }
}
