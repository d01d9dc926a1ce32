//! # particle-field
//!
//! Animated particle-field backgrounds: a few dozen drifting, translucent
//! points joined by faint lines when they come close, drawn behind
//! arbitrary foreground content, plus a translucent overlay that darkens as
//! the page scrolls.
//!
//! The workload adapts to the device: a coarse [`PerformanceTier`] derived
//! from memory and core count picks the particle count, the connection
//! distance and how often the field is redrawn.
//!
//! ## Quick Start
//!
//! ```ignore
//! use particle_field::prelude::*;
//!
//! fn main() {
//!     BackgroundBuilder::new(())
//!         .with_config(FieldConfig::default())
//!         .run()
//!         .unwrap();
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Canvas
//!
//! All drawing goes through the small [`Canvas`] trait. The native host
//! implements it on a wgpu surface; [`RecordingCanvas`] records the calls
//! so the field can run headless.
//!
//! ### Tiers
//!
//! | Tier | Particles | Connection distance | Draws |
//! |------|-----------|---------------------|-------|
//! | High | 30 | 150 px | every frame |
//! | Medium | 20 | 120 px | every 2nd frame |
//! | Low | 10 | 100 px | every 3rd frame |
//!
//! Tier selection is pluggable through [`TierDetector`]; the table is part
//! of [`FieldConfig`].
//!
//! ### Driving a background by hand
//!
//! ```ignore
//! let mut canvas = RecordingCanvas::new(Viewport::default());
//! let mut background = BackgroundBuilder::new(())
//!     .with_seed(42)
//!     .mount(Some(&mut canvas), Viewport::new(1280, 720));
//!
//! loop {
//!     background.on_scroll(read_scroll_offset());
//!     background.on_frame(&mut canvas);
//!     // paint canvas.take_commands(), then background.overlay_style()
//! }
//! ```
//!
//! ## Spatial Grid
//!
//! Connection lines are found through a uniform grid rebuilt on every drawn
//! frame, with cells as wide as the connection distance. Each particle only
//! looks at the 3×3 block of cells around its own.

pub mod background;
pub mod canvas;
pub mod config;
pub mod error;
pub mod field;
pub mod gpu;
pub mod overlay;
pub mod particle;
pub mod scheduler;
pub mod spatial;
pub mod tier;
mod window;

pub use background::{BackgroundBuilder, DynamicBackground, FrameReport};
pub use canvas::{Canvas, DrawCommand, RecordingCanvas, Viewport};
pub use config::{FieldConfig, OverlayConfig, Palette, TierTable};
pub use error::{BackgroundError, ConfigError, GpuError};
pub use field::{ParticleField, TickOutcome};
pub use glam::Vec2;
pub use overlay::{OverlayStyle, ScrollOverlay};
pub use particle::{Particle, Rgba};
pub use scheduler::{FrameCallback, FrameHandle, FrameQueue};
pub use spatial::SpatialGrid;
pub use tier::{DefaultTierPolicy, DeviceSignals, PerformanceTier, TierConfig, TierDetector};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use particle_field::prelude::*;
/// ```
///
/// This imports:
/// - [`BackgroundBuilder`] - the component builder
/// - [`Canvas`], [`RecordingCanvas`], [`Viewport`] - drawing surfaces
/// - [`FieldConfig`] - tier table, palette and overlay mapping
/// - [`PerformanceTier`], [`DeviceSignals`] - tier selection
/// - [`Vec2`] - glam vector type
pub mod prelude {
    pub use crate::background::{BackgroundBuilder, DynamicBackground, FrameReport};
    pub use crate::canvas::{Canvas, DrawCommand, RecordingCanvas, Viewport};
    pub use crate::config::FieldConfig;
    pub use crate::field::{ParticleField, TickOutcome};
    pub use crate::overlay::OverlayStyle;
    pub use crate::particle::Rgba;
    pub use crate::tier::{DeviceSignals, PerformanceTier, TierConfig, TierDetector};
    pub use crate::Vec2;
}
