//! The particle field renderer.
//!
//! A [`ParticleField`] owns a small set of drifting particles and draws
//! them, plus a faint line between every pair closer than the tier's
//! connection distance, each time [`tick`](ParticleField::tick) is called
//! on a drawn frame. Lower tiers draw only every nth tick; particles only
//! move on drawn ticks.
//!
//! ```ignore
//! use particle_field::prelude::*;
//!
//! let config = FieldConfig::default();
//! let mut canvas = RecordingCanvas::new(Viewport::new(1280, 720));
//! let mut field = ParticleField::new(
//!     &config,
//!     PerformanceTier::Medium,
//!     &mut canvas,
//!     Viewport::new(1280, 720),
//!     &mut rand::thread_rng(),
//! );
//!
//! assert_eq!(field.tick(&mut canvas), TickOutcome::Skipped); // frame 1 of every 2
//! assert!(matches!(field.tick(&mut canvas), TickOutcome::Drawn { .. }));
//! ```

use glam::Vec2;
use rand::Rng;

use crate::canvas::{Canvas, Viewport};
use crate::config::FieldConfig;
use crate::particle::{Particle, Rgba};
use crate::spatial::SpatialGrid;
use crate::tier::{PerformanceTier, TierConfig};

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Throttled: nothing moved, nothing was drawn.
    Skipped,
    /// The field was cleared and redrawn.
    Drawn {
        particles: usize,
        /// Lines drawn. Each close pair is usually counted twice, once from
        /// each end.
        connections: usize,
    },
}

/// Animated particle field for one mounted background.
#[derive(Debug, Clone)]
pub struct ParticleField {
    tier: PerformanceTier,
    tier_config: TierConfig,
    background: Rgba,
    connection: Rgba,
    connection_alpha: f32,
    line_width: f32,
    particles: Vec<Particle>,
    frame_count: u64,
}

impl ParticleField {
    /// Size `canvas` to `viewport` and scatter the tier's particles over it.
    pub fn new<C, R>(
        config: &FieldConfig,
        tier: PerformanceTier,
        canvas: &mut C,
        viewport: Viewport,
        rng: &mut R,
    ) -> Self
    where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        let tier_config = config.tier(tier);
        Self::fit(canvas, viewport);

        let bounds = canvas.size().size();
        let particles = (0..tier_config.particle_count)
            .map(|_| Particle::random(rng, bounds))
            .collect();

        Self {
            tier,
            tier_config,
            background: config.palette.background,
            connection: config.palette.connection,
            connection_alpha: config.connection_alpha,
            line_width: config.line_width,
            particles,
            frame_count: 0,
        }
    }

    /// Match the canvas to the viewport. Does nothing when the sizes already
    /// agree, since reallocating a canvas clears it. Returns whether the
    /// canvas was resized.
    ///
    /// Particles are left where they are; any now outside the surface
    /// bounce back in on their own.
    pub fn fit<C: Canvas + ?Sized>(canvas: &mut C, viewport: Viewport) -> bool {
        if canvas.size() == viewport {
            return false;
        }
        tracing::debug!(
            "resizing field canvas to {}x{}",
            viewport.width,
            viewport.height
        );
        canvas.set_size(viewport);
        true
    }

    /// Advance one display refresh.
    ///
    /// On throttled refreshes this only bumps the frame counter and makes no
    /// canvas calls at all.
    pub fn tick<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> TickOutcome {
        self.frame_count += 1;

        let every = u64::from(self.tier_config.draw_every_nth_frame.max(1));
        if self.frame_count % every != 0 {
            return TickOutcome::Skipped;
        }

        let bounds = canvas.size().size();
        canvas.clear();
        canvas.fill_rect(Vec2::ZERO, bounds, self.background);

        for particle in &mut self.particles {
            particle.advance(bounds);
        }

        let connections = self.draw(canvas, bounds);

        TickOutcome::Drawn {
            particles: self.particles.len(),
            connections,
        }
    }

    fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, bounds: Vec2) -> usize {
        let max_distance = self.tier_config.connection_distance;
        let grid = SpatialGrid::build(&self.particles, max_distance, bounds);
        let mut connections = 0;

        for (index, particle) in self.particles.iter().enumerate() {
            canvas.fill_circle(particle.position, particle.radius, particle.color);

            for other_index in grid.neighborhood(particle.position) {
                if other_index == index {
                    continue;
                }
                let other = &self.particles[other_index];
                let distance = particle.position.distance(other.position);
                if distance < max_distance {
                    let alpha = self.connection_alpha * (1.0 - distance / max_distance);
                    canvas.stroke_line(
                        particle.position,
                        other.position,
                        self.connection.with_alpha(alpha),
                        self.line_width,
                    );
                    connections += 1;
                }
            }
        }

        connections
    }

    pub fn tier(&self) -> PerformanceTier {
        self.tier
    }

    pub fn tier_config(&self) -> TierConfig {
        self.tier_config
    }

    /// Ticks seen since creation, drawn or not.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, RecordingCanvas};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(tier: PerformanceTier, canvas: &mut RecordingCanvas) -> ParticleField {
        let viewport = canvas.size();
        ParticleField::new(
            &FieldConfig::default(),
            tier,
            canvas,
            viewport,
            &mut StdRng::seed_from_u64(42),
        )
    }

    fn still(x: f32, y: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            radius: 1.0,
            color: Rgba::new(50, 150, 200, 0.3),
        }
    }

    #[test]
    fn test_new_generates_tier_particles() {
        for tier in PerformanceTier::ALL {
            let mut canvas = RecordingCanvas::new(Viewport::new(800, 600));
            let field = field(tier, &mut canvas);
            assert_eq!(field.particles().len(), TierConfig::for_tier(tier).particle_count);
            assert_eq!(field.tier(), tier);
            // Canvas already had the right size
            assert_eq!(canvas.resize_count(), 0);
        }
    }

    #[test]
    fn test_new_sizes_canvas() {
        let mut canvas = RecordingCanvas::new(Viewport::new(0, 0));
        let field = ParticleField::new(
            &FieldConfig::default(),
            PerformanceTier::High,
            &mut canvas,
            Viewport::new(640, 480),
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(canvas.size(), Viewport::new(640, 480));
        assert_eq!(canvas.resize_count(), 1);
        for p in field.particles() {
            assert!(p.position.x <= 640.0 && p.position.y <= 480.0);
        }
    }

    #[test]
    fn test_throttling_per_tier() {
        for tier in PerformanceTier::ALL {
            let mut canvas = RecordingCanvas::new(Viewport::new(800, 600));
            let mut field = field(tier, &mut canvas);
            let every = TierConfig::for_tier(tier).draw_every_nth_frame as u64;

            for frame in 1..=12u64 {
                let before = canvas.commands().len();
                let outcome = field.tick(&mut canvas);
                let issued = &canvas.commands()[before..];

                if frame % every == 0 {
                    assert!(matches!(outcome, TickOutcome::Drawn { .. }));
                    assert_eq!(
                        issued.iter().filter(|c| **c == DrawCommand::Clear).count(),
                        1
                    );
                } else {
                    assert_eq!(outcome, TickOutcome::Skipped);
                    assert!(issued.is_empty());
                }
            }
            assert_eq!(field.frame_count(), 12);
            assert_eq!(canvas.clear_count() as u64, 12 / every);
        }
    }

    #[test]
    fn test_particles_move_only_on_drawn_frames() {
        let mut canvas = RecordingCanvas::new(Viewport::new(800, 600));
        let mut field = field(PerformanceTier::Low, &mut canvas);
        let start: Vec<Vec2> = field.particles().iter().map(|p| p.position).collect();

        field.tick(&mut canvas);
        field.tick(&mut canvas);
        let after_skips: Vec<Vec2> = field.particles().iter().map(|p| p.position).collect();
        assert_eq!(start, after_skips);

        field.tick(&mut canvas);
        let moved = field
            .particles()
            .iter()
            .zip(&start)
            .any(|(p, s)| p.position != *s);
        assert!(moved);
    }

    #[test]
    fn test_drawn_frame_layout() {
        let mut canvas = RecordingCanvas::new(Viewport::new(400, 300));
        let mut field = field(PerformanceTier::High, &mut canvas);
        field.particles_mut().iter_mut().for_each(|p| p.velocity = Vec2::ZERO);

        field.tick(&mut canvas);
        let commands = canvas.commands();

        assert_eq!(commands[0], DrawCommand::Clear);
        assert_eq!(
            commands[1],
            DrawCommand::FillRect {
                origin: Vec2::ZERO,
                size: Vec2::new(400.0, 300.0),
                color: Rgba::new(20, 10, 35, 0.8),
            }
        );
        assert_eq!(canvas.circles().count(), 30);
    }

    #[test]
    fn test_connection_alpha_fades_with_distance() {
        let mut canvas = RecordingCanvas::new(Viewport::new(500, 500));
        let mut field = field(PerformanceTier::High, &mut canvas);
        field.particles = vec![still(100.0, 100.0), still(175.0, 100.0)];

        let outcome = field.tick(&mut canvas);
        assert_eq!(
            outcome,
            TickOutcome::Drawn {
                particles: 2,
                connections: 2
            }
        );

        for line in canvas.lines() {
            if let DrawCommand::StrokeLine { color, width, .. } = line {
                // 75px of 150px: half of the 0.08 peak
                assert!((color.a - 0.04).abs() < 1e-6);
                assert_eq!((color.r, color.g, color.b), (150, 150, 255));
                assert_eq!(*width, 0.5);
            }
        }
    }

    #[test]
    fn test_no_connection_at_or_beyond_distance() {
        let mut canvas = RecordingCanvas::new(Viewport::new(500, 500));
        let mut field = field(PerformanceTier::High, &mut canvas);
        field.particles = vec![still(100.0, 100.0), still(250.0, 100.0), still(100.0, 260.0)];

        field.tick(&mut canvas);
        assert_eq!(canvas.lines().count(), 0);
    }

    #[test]
    fn test_connections_are_symmetric() {
        let mut canvas = RecordingCanvas::new(Viewport::new(800, 600));
        let mut field = field(PerformanceTier::High, &mut canvas);
        field.tick(&mut canvas);

        let particles = field.particles().to_vec();
        let lines: Vec<(Vec2, Vec2)> = canvas
            .lines()
            .filter_map(|c| match c {
                DrawCommand::StrokeLine { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect();

        let inside = |p: &Particle| {
            p.position.x >= 0.0 && p.position.x < 800.0 && p.position.y >= 0.0 && p.position.y < 600.0
        };

        for (i, a) in particles.iter().enumerate() {
            for b in particles.iter().skip(i + 1) {
                if inside(a) && inside(b) && a.position.distance(b.position) < 150.0 {
                    assert!(lines.contains(&(a.position, b.position)));
                    assert!(lines.contains(&(b.position, a.position)));
                }
            }
        }
        // No line was drawn between far-apart particles
        for (from, to) in &lines {
            assert!(from.distance(*to) < 150.0);
        }
    }

    #[test]
    fn test_fit_skips_same_size() {
        let mut canvas = RecordingCanvas::new(Viewport::new(800, 600));
        assert!(!ParticleField::fit(&mut canvas, Viewport::new(800, 600)));
        assert!(ParticleField::fit(&mut canvas, Viewport::new(1024, 768)));
        assert!(!ParticleField::fit(&mut canvas, Viewport::new(1024, 768)));
        assert_eq!(canvas.resize_count(), 1);
    }

    #[test]
    fn test_shrunk_surface_reflects_outside_particles() {
        let mut canvas = RecordingCanvas::new(Viewport::new(800, 600));
        let mut field = field(PerformanceTier::High, &mut canvas);
        field.particles = vec![Particle {
            velocity: Vec2::new(0.2, 0.0),
            ..still(700.0, 100.0)
        }];

        ParticleField::fit(&mut canvas, Viewport::new(400, 600));
        field.tick(&mut canvas);

        // Position kept, velocity turned back toward the surface
        let p = field.particles()[0];
        assert!(p.position.x > 700.0);
        assert!(p.velocity.x < 0.0);
    }
}
