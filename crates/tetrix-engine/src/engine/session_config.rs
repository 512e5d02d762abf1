use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

use super::shape_seed::ShapeSeed;

/// Construction parameters of a [`Session`](super::Session).
///
/// Every field has a default, and deserialisation fills in whatever a partial
/// document leaves out:
///
/// ```
/// use tetrix_engine::SessionConfig;
///
/// let config: SessionConfig = serde_json::from_str(r#"{ "width": 12 }"#).unwrap();
/// assert_eq!(config.width, 12);
/// assert_eq!(config.height, SessionConfig::default().height);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Board width in cells.
    pub width: usize,
    /// Board height in cells.
    pub height: usize,
    pub gravity: GravityConfig,
    pub scoring: ScoringConfig,
    /// Seed for the shape generator; a random one is drawn when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<ShapeSeed>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 22,
            gravity: GravityConfig::default(),
            scoring: ScoringConfig::default(),
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Narrowest board on which every shape can spawn.
    pub const MIN_WIDTH: usize = 5;
    /// Lowest board on which every shape can spawn.
    pub const MIN_HEIGHT: usize = 4;
    pub const MAX_WIDTH: usize = 1024;
    pub const MAX_HEIGHT: usize = 1024;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(Self::MIN_WIDTH..=Self::MAX_WIDTH).contains(&self.width)
            || !(Self::MIN_HEIGHT..=Self::MAX_HEIGHT).contains(&self.height)
        {
            return Err(ConfigError::BoardSize {
                width: self.width,
                height: self.height,
            });
        }
        self.gravity.validate()?;
        self.scoring.validate()
    }
}

/// Timer intervals the driver should use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityConfig {
    /// Gravity interval numerator; the interval at level `n` is `base / (1 + n)`.
    pub base_interval_ms: u64,
    /// Pause after a line clear before the next piece spawns.
    pub settle_delay_ms: u64,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: 1000,
            settle_delay_ms: 500,
        }
    }
}

impl GravityConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.base_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "base_interval_ms",
            });
        }
        if self.settle_delay_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "settle_delay_ms",
            });
        }
        Ok(())
    }

    /// Returns the gravity interval at `level`.
    ///
    /// ```
    /// use std::time::Duration;
    /// use tetrix_engine::GravityConfig;
    ///
    /// let gravity = GravityConfig::default();
    /// assert_eq!(gravity.interval(1), Duration::from_millis(500));
    /// assert_eq!(gravity.interval(2), Duration::from_nanos(333_333_333));
    /// ```
    #[must_use]
    pub fn interval(&self, level: usize) -> Duration {
        // Divides in nanoseconds so the interval keeps shrinking at high levels.
        let divisor = u32::try_from(level.saturating_add(1)).unwrap_or(u32::MAX);
        Duration::from_millis(self.base_interval_ms) / divisor
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Points and level pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points for locking a piece, added to the hard-drop height.
    pub lock_bonus: usize,
    /// Points per removed line.
    pub line_score: usize,
    /// The level goes up every this many locked pieces.
    pub pieces_per_level: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            lock_bonus: 7,
            line_score: 10,
            pieces_per_level: 25,
        }
    }
}

impl ScoringConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.pieces_per_level == 0 {
            return Err(ConfigError::ZeroPiecesPerLevel);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(SessionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_board_size_limits() {
        let mut config = SessionConfig {
            width: SessionConfig::MIN_WIDTH,
            height: SessionConfig::MIN_HEIGHT,
            ..SessionConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));

        config.width -= 1;
        assert_eq!(
            config.validate(),
            Err(ConfigError::BoardSize {
                width: SessionConfig::MIN_WIDTH - 1,
                height: SessionConfig::MIN_HEIGHT,
            })
        );

        config.width = 10;
        config.height = SessionConfig::MAX_HEIGHT + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut config = SessionConfig::default();
        config.gravity.settle_delay_ms = 0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "settle_delay_ms must be greater than zero");

        let mut config = SessionConfig::default();
        config.gravity.base_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = SessionConfig::default();
        config.scoring.pieces_per_level = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPiecesPerLevel));
    }

    #[test]
    fn test_interval_strictly_decreases() {
        let gravity = GravityConfig::default();
        for level in 1..1000 {
            assert!(
                gravity.interval(level + 1) < gravity.interval(level),
                "interval did not shrink after level {level}"
            );
        }
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: SessionConfig = serde_json::from_str(
            r#"{
                "height": 30,
                "gravity": { "settle_delay_ms": 250 },
                "seed": "000102030405060708090a0b0c0d0e0f"
            }"#,
        )
        .unwrap();
        assert_eq!(config.width, 10);
        assert_eq!(config.height, 30);
        assert_eq!(config.gravity.base_interval_ms, 1000);
        assert_eq!(config.gravity.settle_delay_ms, 250);
        assert_eq!(config.scoring, ScoringConfig::default());
        assert_eq!(
            config.seed,
            Some(ShapeSeed::from_bytes([
                0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15
            ]))
        );
    }

    #[test]
    fn test_seed_omitted_when_absent() {
        let json = serde_json::to_value(SessionConfig::default()).unwrap();
        assert!(json.get("seed").is_none());
    }
}
