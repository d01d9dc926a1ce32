//! Field configuration.
//!
//! Every value has a default matching the stock look, so a JSON file only
//! needs the keys it changes:
//!
//! ```json
//! {
//!   "tiers": { "low": { "particle_count": 6, "connection_distance": 90.0, "draw_every_nth_frame": 4 } },
//!   "palette": { "background": { "r": 0, "g": 0, "b": 0, "a": 1.0 } }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::particle::Rgba;
use crate::tier::{PerformanceTier, TierConfig};

/// Shortest connection distance a config may ask for, in pixels.
pub const MIN_CONNECTION_DISTANCE: f32 = 1.0;

/// Per-tier workload table.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TierTable {
    pub high: TierConfig,
    pub medium: TierConfig,
    pub low: TierConfig,
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            high: TierConfig::HIGH,
            medium: TierConfig::MEDIUM,
            low: TierConfig::LOW,
        }
    }
}

impl TierTable {
    pub fn get(&self, tier: PerformanceTier) -> TierConfig {
        match tier {
            PerformanceTier::High => self.high,
            PerformanceTier::Medium => self.medium,
            PerformanceTier::Low => self.low,
        }
    }
}

/// Colors used by the field and the overlay.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Palette {
    /// Painted over the whole surface at the start of each drawn frame.
    pub background: Rgba,
    /// Connection line color. Its alpha is replaced by the distance fade.
    pub connection: Rgba,
    /// Scroll overlay color at full opacity.
    pub overlay: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::new(20, 10, 35, 0.8),
            connection: Rgba::new(150, 150, 255, 1.0),
            overlay: Rgba::new(20, 10, 35, 0.7),
        }
    }
}

/// Linear mapping from scroll offset to overlay opacity and offset.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    /// Scroll distance (pixels) at which the overlay is fully opaque.
    pub fade_distance: f32,
    /// Vertical translation per scrolled pixel.
    pub parallax: f32,
    /// Upper bound of the vertical translation (pixels).
    pub max_offset: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            fade_distance: 300.0,
            parallax: 0.1,
            max_offset: 30.0,
        }
    }
}

/// Complete background configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    pub tiers: TierTable,
    pub palette: Palette,
    pub overlay: OverlayConfig,
    /// Connection line width in pixels.
    pub line_width: f32,
    /// Peak connection alpha, reached as the distance goes to zero.
    pub connection_alpha: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            tiers: TierTable::default(),
            palette: Palette::default(),
            overlay: OverlayConfig::default(),
            line_width: 0.5,
            connection_alpha: 0.08,
        }
    }
}

impl FieldConfig {
    /// Workload for a tier.
    pub fn tier(&self, tier: PerformanceTier) -> TierConfig {
        self.tiers.get(tier)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the tier table and the overlay mapping.
    ///
    /// Going up a tier must never lower the particle count or connection
    /// distance, nor raise the frame interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for tier in PerformanceTier::ALL {
            let config = self.tier(tier);
            if config.draw_every_nth_frame < 1 {
                return Err(ConfigError::Invalid(format!(
                    "{} tier: draw_every_nth_frame must be at least 1",
                    tier
                )));
            }
            if config.connection_distance < MIN_CONNECTION_DISTANCE
                || !config.connection_distance.is_finite()
            {
                return Err(ConfigError::Invalid(format!(
                    "{} tier: connection_distance must be at least {} px",
                    tier, MIN_CONNECTION_DISTANCE
                )));
            }
        }

        for pair in PerformanceTier::ALL.windows(2) {
            let (upper, lower) = (self.tier(pair[0]), self.tier(pair[1]));
            if upper.particle_count < lower.particle_count
                || upper.connection_distance < lower.connection_distance
                || upper.draw_every_nth_frame > lower.draw_every_nth_frame
            {
                return Err(ConfigError::Invalid(format!(
                    "{} tier must not be lighter than {} tier",
                    pair[0], pair[1]
                )));
            }
        }

        if self.overlay.fade_distance <= 0.0 || self.overlay.fade_distance.is_nan() {
            return Err(ConfigError::Invalid(
                "overlay.fade_distance must be positive".into(),
            ));
        }
        if self.overlay.parallax < 0.0 || self.overlay.parallax.is_nan() {
            return Err(ConfigError::Invalid(
                "overlay.parallax must not be negative".into(),
            ));
        }
        if self.overlay.max_offset < 0.0 || self.overlay.max_offset.is_nan() {
            return Err(ConfigError::Invalid(
                "overlay.max_offset must not be negative".into(),
            ));
        }
        if self.line_width < 0.0 || self.connection_alpha < 0.0 {
            return Err(ConfigError::Invalid(
                "line_width and connection_alpha must not be negative".into(),
            ));
        }

        Ok(())
    }
}
