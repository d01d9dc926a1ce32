//! The mountable background component.
//!
//! [`BackgroundBuilder`] collects the configuration; [`mount`](BackgroundBuilder::mount)
//! turns it into a live [`DynamicBackground`] that the host drives with
//! resize, scroll and per-refresh events until it is unmounted.
//!
//! ```ignore
//! use particle_field::prelude::*;
//!
//! let mut canvas = RecordingCanvas::new(Viewport::default());
//! let mut background = BackgroundBuilder::new("page content")
//!     .with_signals(DeviceSignals::new(Some(8.0), Some(8)))
//!     .with_seed(7)
//!     .mount(Some(&mut canvas), Viewport::new(1280, 720));
//!
//! background.on_scroll(120.0);
//! let report = background.on_frame(&mut canvas);
//! assert!(report.scroll_committed);
//!
//! background.unmount();
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::canvas::{Canvas, RecordingCanvas, Viewport};
use crate::config::FieldConfig;
use crate::error::BackgroundError;
use crate::field::{ParticleField, TickOutcome};
use crate::overlay::{OverlayStyle, ScrollOverlay};
use crate::scheduler::{FrameCallback, FrameHandle, FrameQueue};
use crate::tier::{DefaultTierPolicy, DeviceSignals, PerformanceTier, TierDetector};

/// Builder for a [`DynamicBackground`] wrapping foreground content `F`.
pub struct BackgroundBuilder<F> {
    children: F,
    config: FieldConfig,
    detector: Box<dyn TierDetector>,
    signals: Option<DeviceSignals>,
    seed: Option<u64>,
}

impl<F> BackgroundBuilder<F> {
    /// Start with default config, the default tier policy and signals
    /// probed from the host at mount time.
    pub fn new(children: F) -> Self {
        Self {
            children,
            config: FieldConfig::default(),
            detector: Box::new(DefaultTierPolicy),
            signals: None,
            seed: None,
        }
    }

    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the tier policy.
    pub fn with_detector<D: TierDetector + 'static>(mut self, detector: D) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// Use these signals instead of probing the host.
    pub fn with_signals(mut self, signals: DeviceSignals) -> Self {
        self.signals = Some(signals);
        self
    }

    /// Seed particle generation for reproducible fields.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Mount the component.
    ///
    /// With `canvas` set to `None` the component still mounts and listens,
    /// but never draws.
    ///
    /// The config is used as given; call [`FieldConfig::validate`] first for
    /// configs that did not come from [`FieldConfig::load`]. An invalid one
    /// never panics, but may draw nothing or no connections.
    pub fn mount<C: Canvas + ?Sized>(
        self,
        canvas: Option<&mut C>,
        viewport: Viewport,
    ) -> DynamicBackground<F> {
        let signals = self.signals.unwrap_or_else(DeviceSignals::probe);
        let tier = self.detector.detect(&signals);
        tracing::info!(
            "particle field tier: {} (memory {} GB, {} cores)",
            tier,
            signals.memory_or_default(),
            signals.cores_or_default()
        );

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let overlay = ScrollOverlay::new(self.config.overlay, self.config.palette.overlay);
        let mut queue = FrameQueue::new();

        let (field, tick) = match canvas {
            Some(canvas) => {
                let field = ParticleField::new(&self.config, tier, canvas, viewport, &mut rng);
                (Some(field), Some(queue.request(FrameCallback::Tick)))
            }
            None => {
                tracing::debug!("no drawing surface available, particle field disabled");
                (None, None)
            }
        };

        DynamicBackground {
            children: self.children,
            config: self.config,
            tier,
            field,
            overlay,
            queue,
            tick,
            scroll_commit: None,
            resize_listener: true,
            scroll_listener: true,
            rng,
        }
    }

    /// Open a native window and run the background in it until closed.
    ///
    /// Fails with [`BackgroundError::Config`] before any window is created
    /// if the config does not validate.
    pub fn run(self) -> Result<(), BackgroundError>
    where
        F: 'static,
    {
        self.config.validate()?;
        crate::window::run(self)
    }
}

/// What one display refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Set when a field tick ran this refresh.
    pub tick: Option<TickOutcome>,
    /// Whether a pending scroll offset was applied to the overlay.
    pub scroll_committed: bool,
}

impl FrameReport {
    /// Whether the field was redrawn.
    pub fn drew(&self) -> bool {
        matches!(self.tick, Some(TickOutcome::Drawn { .. }))
    }
}

/// A mounted particle-field background behind foreground content `F`.
pub struct DynamicBackground<F> {
    children: F,
    config: FieldConfig,
    tier: PerformanceTier,
    field: Option<ParticleField>,
    overlay: ScrollOverlay,
    queue: FrameQueue,
    tick: Option<FrameHandle>,
    scroll_commit: Option<FrameHandle>,
    resize_listener: bool,
    scroll_listener: bool,
    rng: StdRng,
}

impl<F> DynamicBackground<F> {
    /// Viewport resized. Returns whether the canvas was reallocated.
    pub fn on_resize<C: Canvas + ?Sized>(&mut self, canvas: &mut C, viewport: Viewport) -> bool {
        if !self.resize_listener || self.field.is_none() {
            return false;
        }
        ParticleField::fit(canvas, viewport)
    }

    /// Page scrolled to `offset`. Bursts within one refresh coalesce into
    /// a single overlay update.
    pub fn on_scroll(&mut self, offset: f32) {
        if !self.scroll_listener {
            return;
        }
        if self.overlay.observe(offset) {
            self.scroll_commit = Some(self.queue.request(FrameCallback::CommitScroll));
        }
    }

    /// Service everything due on this display refresh.
    pub fn on_frame<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> FrameReport {
        self.service(Some(canvas))
    }

    /// Service a refresh on a host with no drawing surface. Scroll commits
    /// still apply; a pending tick is carried over to the next refresh.
    pub fn on_frame_without_canvas(&mut self) -> FrameReport {
        self.service(None::<&mut RecordingCanvas>)
    }

    fn service<C: Canvas + ?Sized>(&mut self, mut canvas: Option<&mut C>) -> FrameReport {
        let mut report = FrameReport::default();

        for callback in self.queue.take_due() {
            match callback {
                FrameCallback::Tick => {
                    self.tick = None;
                    if let Some(field) = &mut self.field {
                        if let Some(canvas) = canvas.as_deref_mut() {
                            report.tick = Some(field.tick(canvas));
                        }
                        self.tick = Some(self.queue.request(FrameCallback::Tick));
                    }
                }
                FrameCallback::CommitScroll => {
                    self.scroll_commit = None;
                    report.scroll_committed |= self.overlay.commit();
                }
            }
        }

        report
    }

    /// Rebuild the field for `tier`, e.g. after the host re-evaluated its
    /// signals. The frame counter restarts and particles are regenerated.
    pub fn reconfigure<C: Canvas + ?Sized>(&mut self, tier: PerformanceTier, canvas: &mut C) {
        if !self.is_mounted() {
            return;
        }
        if let Some(handle) = self.tick.take() {
            self.queue.cancel(handle);
        }

        tracing::info!("particle field reconfigured to tier {}", tier);
        self.tier = tier;
        let viewport = canvas.size();
        self.field = Some(ParticleField::new(
            &self.config,
            tier,
            canvas,
            viewport,
            &mut self.rng,
        ));
        self.tick = Some(self.queue.request(FrameCallback::Tick));
    }

    /// Stop animating and detach the listeners. Idempotent.
    pub fn unmount(&mut self) {
        if let Some(handle) = self.tick.take() {
            self.queue.cancel(handle);
        }
        if let Some(handle) = self.scroll_commit.take() {
            self.queue.cancel(handle);
        }
        self.overlay.discard_pending();
        self.resize_listener = false;
        self.scroll_listener = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.resize_listener || self.scroll_listener
    }

    /// Whether a tick is waiting for the next refresh.
    pub fn is_animating(&self) -> bool {
        self.tick.is_some_and(|handle| self.queue.is_pending(handle))
    }

    pub fn tier(&self) -> PerformanceTier {
        self.tier
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// `None` when mounted without a canvas.
    pub fn field(&self) -> Option<&ParticleField> {
        self.field.as_ref()
    }

    pub fn overlay(&self) -> &ScrollOverlay {
        &self.overlay
    }

    pub fn overlay_style(&self) -> OverlayStyle {
        self.overlay.style()
    }

    pub fn children(&self) -> &F {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut F {
        &mut self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::tier::TierConfig;

    fn mount(canvas: &mut RecordingCanvas) -> DynamicBackground<()> {
        BackgroundBuilder::new(())
            .with_signals(DeviceSignals::new(Some(8.0), Some(8)))
            .with_seed(3)
            .mount(Some(canvas), Viewport::new(800, 600))
    }

    #[test]
    fn test_mount_sizes_canvas_and_schedules_tick() {
        let mut canvas = RecordingCanvas::new(Viewport::default());
        let background = mount(&mut canvas);

        assert_eq!(background.tier(), PerformanceTier::High);
        assert_eq!(canvas.size(), Viewport::new(800, 600));
        assert!(background.is_animating());
        assert!(canvas.commands().is_empty());
        assert_eq!(
            background.field().map(|f| f.particles().len()),
            Some(TierConfig::HIGH.particle_count)
        );
    }

    #[test]
    fn test_frame_ticks_and_reschedules() {
        let mut canvas = RecordingCanvas::new(Viewport::default());
        let mut background = mount(&mut canvas);

        for _ in 0..5 {
            let report = background.on_frame(&mut canvas);
            assert!(report.drew());
            assert!(background.is_animating());
        }
        assert_eq!(canvas.clear_count(), 5);
    }

    #[test]
    fn test_detector_override() {
        let mut canvas = RecordingCanvas::new(Viewport::default());
        let background = BackgroundBuilder::new(())
            .with_detector(|_: &DeviceSignals| PerformanceTier::Low)
            .with_signals(DeviceSignals::new(Some(16.0), Some(16)))
            .mount(Some(&mut canvas), Viewport::new(100, 100));
        assert_eq!(background.tier(), PerformanceTier::Low);
    }

    #[test]
    fn test_reconfigure_restarts_field() {
        let mut canvas = RecordingCanvas::new(Viewport::default());
        let mut background = mount(&mut canvas);
        background.on_frame(&mut canvas);
        background.on_frame(&mut canvas);

        background.reconfigure(PerformanceTier::Medium, &mut canvas);
        let field = background.field().map(|f| (f.frame_count(), f.particles().len()));
        assert_eq!(field, Some((0, TierConfig::MEDIUM.particle_count)));
        assert_eq!(background.tier(), PerformanceTier::Medium);

        // Exactly one tick pending: frame 1 of Medium is throttled
        let report = background.on_frame(&mut canvas);
        assert_eq!(report.tick, Some(TickOutcome::Skipped));
    }

    #[test]
    fn test_unmount_is_idempotent() {
        let mut canvas = RecordingCanvas::new(Viewport::default());
        let mut background = mount(&mut canvas);
        background.unmount();
        background.unmount();
        assert!(!background.is_mounted());
        assert!(!background.is_animating());
        assert_eq!(background.on_frame(&mut canvas), FrameReport::default());
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let mut config = FieldConfig::default();
        config.tiers.high.connection_distance = 0.0;

        let result = BackgroundBuilder::new(()).with_config(config).run();
        assert!(matches!(
            result,
            Err(BackgroundError::Config(ConfigError::Invalid(_)))
        ));
    }

    #[test]
    fn test_unvalidated_config_does_not_panic() {
        let mut config = FieldConfig::default();
        config.tiers.high.connection_distance = 0.0;
        config.overlay.max_offset = -1.0;

        let mut canvas = RecordingCanvas::new(Viewport::default());
        let mut background = BackgroundBuilder::new(())
            .with_config(config)
            .with_signals(DeviceSignals::new(Some(8.0), Some(8)))
            .with_seed(9)
            .mount(Some(&mut canvas), Viewport::new(640, 480));

        background.on_scroll(50.0);
        let report = background.on_frame(&mut canvas);
        assert!(report.drew());
        assert!(report.scroll_committed);
        assert_eq!(canvas.lines().count(), 0);
        assert_eq!(background.overlay_style().translate_y, 0.0);
    }

    #[test]
    fn test_frame_without_canvas_commits_scroll() {
        let mut background = BackgroundBuilder::new(())
            .with_signals(DeviceSignals::new(Some(8.0), Some(8)))
            .mount(None::<&mut RecordingCanvas>, Viewport::new(800, 600));

        background.on_scroll(150.0);
        let report = background.on_frame_without_canvas();
        assert_eq!(report.tick, None);
        assert!(report.scroll_committed);
        assert_eq!(background.overlay_style().opacity, 0.5);
    }

    #[test]
    fn test_frame_without_canvas_keeps_tick_pending() {
        let mut canvas = RecordingCanvas::new(Viewport::default());
        let mut background = mount(&mut canvas);

        assert_eq!(background.on_frame_without_canvas().tick, None);
        assert!(background.is_animating());
        assert!(background.on_frame(&mut canvas).drew());
    }

    #[test]
    fn test_children_are_untouched() {
        let mut canvas = RecordingCanvas::new(Viewport::default());
        let mut background = BackgroundBuilder::new(vec!["hero", "footer"])
            .with_seed(1)
            .mount(Some(&mut canvas), Viewport::new(10, 10));
        background.children_mut().push("comments");
        assert_eq!(background.children(), &vec!["hero", "footer", "comments"]);
    }
}
