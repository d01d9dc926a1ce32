//! Device performance tiers.
//!
//! The background scales its workload to a coarse classification of the
//! host: how many particles to simulate, how far apart two particles may be
//! and still be connected, and how many display refreshes pass between two
//! drawn frames.
//!
//! Tier selection is a strategy ([`TierDetector`]) so callers and tests can
//! supply fixed signals instead of probing the real machine:
//!
//! ```ignore
//! use particle_field::{DeviceSignals, PerformanceTier, TierDetector, DefaultTierPolicy};
//!
//! let signals = DeviceSignals::new(Some(8.0), Some(8));
//! assert_eq!(DefaultTierPolicy.detect(&signals), PerformanceTier::High);
//!
//! // Any closure works as a detector
//! let always_low = |_: &DeviceSignals| PerformanceTier::Low;
//! assert_eq!(always_low.detect(&signals), PerformanceTier::Low);
//! ```

use serde::{Deserialize, Serialize};

/// Environment variable consulted by [`DeviceSignals::probe`] for device memory in GB.
pub const DEVICE_MEMORY_ENV: &str = "PARTICLE_FIELD_DEVICE_MEMORY";

/// Memory assumed when the signal is unavailable.
pub const DEFAULT_MEMORY_GB: f32 = 4.0;

/// Core count assumed when the signal is unavailable.
pub const DEFAULT_CORES: u32 = 4;

/// Coarse device capability classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    High,
    Medium,
    Low,
}

impl PerformanceTier {
    /// All tiers, from most to least capable.
    pub const ALL: [PerformanceTier; 3] = [
        PerformanceTier::High,
        PerformanceTier::Medium,
        PerformanceTier::Low,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PerformanceTier::High => "high",
            PerformanceTier::Medium => "medium",
            PerformanceTier::Low => "low",
        }
    }
}

impl std::fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Workload parameters for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Number of particles to simulate.
    pub particle_count: usize,
    /// Maximum distance (pixels) at which two particles are connected.
    /// Also the side of a spatial grid cell.
    pub connection_distance: f32,
    /// Draw (and move) only on every nth display refresh. Always >= 1.
    pub draw_every_nth_frame: u32,
}

impl TierConfig {
    pub const HIGH: TierConfig = TierConfig {
        particle_count: 30,
        connection_distance: 150.0,
        draw_every_nth_frame: 1,
    };

    pub const MEDIUM: TierConfig = TierConfig {
        particle_count: 20,
        connection_distance: 120.0,
        draw_every_nth_frame: 2,
    };

    pub const LOW: TierConfig = TierConfig {
        particle_count: 10,
        connection_distance: 100.0,
        draw_every_nth_frame: 3,
    };

    /// Built-in parameters for a tier.
    pub fn for_tier(tier: PerformanceTier) -> Self {
        match tier {
            PerformanceTier::High => Self::HIGH,
            PerformanceTier::Medium => Self::MEDIUM,
            PerformanceTier::Low => Self::LOW,
        }
    }
}

/// Coarse, optional hints about the host device.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceSignals {
    /// Approximate device memory in GB.
    pub memory_gb: Option<f32>,
    /// Approximate logical core count.
    pub cores: Option<u32>,
}

impl DeviceSignals {
    pub fn new(memory_gb: Option<f32>, cores: Option<u32>) -> Self {
        Self { memory_gb, cores }
    }

    /// Read the signals available on this machine.
    ///
    /// Core count comes from the OS. There is no portable memory query, so
    /// memory is only known when [`DEVICE_MEMORY_ENV`] is set.
    pub fn probe() -> Self {
        let cores = std::thread::available_parallelism()
            .ok()
            .map(|n| n.get() as u32);
        let memory_gb = std::env::var(DEVICE_MEMORY_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<f32>().ok())
            .filter(|gb| gb.is_finite() && *gb >= 0.0);
        Self { memory_gb, cores }
    }

    /// Memory with the missing-signal default applied.
    pub fn memory_or_default(&self) -> f32 {
        self.memory_gb.unwrap_or(DEFAULT_MEMORY_GB)
    }

    /// Core count with the missing-signal default applied.
    pub fn cores_or_default(&self) -> u32 {
        self.cores.unwrap_or(DEFAULT_CORES)
    }
}

/// Strategy mapping device signals to a tier.
pub trait TierDetector {
    fn detect(&self, signals: &DeviceSignals) -> PerformanceTier;
}

impl<F> TierDetector for F
where
    F: Fn(&DeviceSignals) -> PerformanceTier,
{
    fn detect(&self, signals: &DeviceSignals) -> PerformanceTier {
        self(signals)
    }
}

/// `High` with >= 4 GB and >= 4 cores, `Medium` with >= 2 GB and >= 2 cores,
/// `Low` otherwise. Missing signals count as 4 GB / 4 cores.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTierPolicy;

impl TierDetector for DefaultTierPolicy {
    fn detect(&self, signals: &DeviceSignals) -> PerformanceTier {
        let memory = signals.memory_or_default();
        let cores = signals.cores_or_default();

        if memory >= 4.0 && cores >= 4 {
            PerformanceTier::High
        } else if memory >= 2.0 && cores >= 2 {
            PerformanceTier::Medium
        } else {
            PerformanceTier::Low
        }
    }
}
