//! Particles and colors.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Smallest generated radius (inclusive).
pub const MIN_RADIUS: f32 = 0.5;
/// Largest generated radius (exclusive).
pub const MAX_RADIUS: f32 = 2.0;
/// Largest absolute generated velocity component, in pixels per frame (exclusive).
pub const MAX_SPEED: f32 = 0.25;

/// An sRGB color with straight alpha, in the CSS `rgba()` convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in [0, 1].
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Normalized `[r, g, b, a]` for GPU upload.
    pub fn to_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a.clamp(0.0, 1.0),
        ]
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// A drifting point of the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in surface pixels.
    pub position: Vec2,
    /// Velocity in pixels per drawn frame.
    pub velocity: Vec2,
    pub radius: f32,
    pub color: Rgba,
}

impl Particle {
    /// A particle placed uniformly inside `bounds` with a slow random
    /// drift and a translucent blue-leaning color.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: Vec2) -> Self {
        let position = Vec2::new(rng.gen::<f32>() * bounds.x, rng.gen::<f32>() * bounds.y);
        let radius = rng.gen::<f32>() * (MAX_RADIUS - MIN_RADIUS) + MIN_RADIUS;
        let velocity = Vec2::new(
            rng.gen::<f32>() * 2.0 * MAX_SPEED - MAX_SPEED,
            rng.gen::<f32>() * 2.0 * MAX_SPEED - MAX_SPEED,
        );
        let color = Rgba::new(
            (rng.gen::<f32>() * 100.0) as u8,
            (rng.gen::<f32>() * 150.0 + 100.0) as u8,
            (rng.gen::<f32>() * 255.0) as u8,
            rng.gen::<f32>() * 0.4 + 0.1,
        );

        Self {
            position,
            velocity,
            radius,
            color,
        }
    }

    /// Move by one frame of velocity, then reflect the velocity on any axis
    /// whose coordinate left `[0, bounds]`.
    ///
    /// The position is not clamped; a particle outside the bounds (for
    /// example after the surface shrank) walks back in on later frames.
    pub fn advance(&mut self, bounds: Vec2) {
        self.position += self.velocity;

        if self.position.x < 0.0 || self.position.x > bounds.x {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < 0.0 || self.position.y > bounds.y {
            self.velocity.y = -self.velocity.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_particles_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = Vec2::new(800.0, 600.0);

        for _ in 0..2000 {
            let p = Particle::random(&mut rng, bounds);
            assert!(p.radius >= MIN_RADIUS && p.radius < MAX_RADIUS, "radius {}", p.radius);
            assert!(p.velocity.x >= -MAX_SPEED && p.velocity.x < MAX_SPEED);
            assert!(p.velocity.y >= -MAX_SPEED && p.velocity.y < MAX_SPEED);
            assert!(p.position.x >= 0.0 && p.position.x <= bounds.x);
            assert!(p.position.y >= 0.0 && p.position.y <= bounds.y);
            assert!(p.color.r < 100);
            assert!(p.color.g >= 100 && p.color.g < 250);
            assert!(p.color.a >= 0.1 && p.color.a < 0.5);
        }
    }

    #[test]
    fn test_random_particle_on_empty_surface() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = Particle::random(&mut rng, Vec2::ZERO);
        assert_eq!(p.position, Vec2::ZERO);
    }

    fn particle(position: Vec2, velocity: Vec2) -> Particle {
        Particle {
            position,
            velocity,
            radius: 1.0,
            color: Rgba::new(0, 0, 0, 1.0),
        }
    }

    #[test]
    fn test_reflects_at_right_edge() {
        let bounds = Vec2::new(100.0, 100.0);
        let mut p = particle(Vec2::new(100.0, 50.0), Vec2::new(0.2, 0.0));
        p.advance(bounds);
        assert!(p.velocity.x < 0.0);
        assert_eq!(p.velocity.y, 0.0);
    }

    #[test]
    fn test_reflects_at_left_edge() {
        let bounds = Vec2::new(100.0, 100.0);
        let mut p = particle(Vec2::new(0.0, 50.0), Vec2::new(-0.2, 0.0));
        p.advance(bounds);
        assert!(p.velocity.x > 0.0);
    }

    #[test]
    fn test_reflects_vertically() {
        let bounds = Vec2::new(100.0, 100.0);

        let mut bottom = particle(Vec2::new(50.0, 100.0), Vec2::new(0.0, 0.1));
        bottom.advance(bounds);
        assert!(bottom.velocity.y < 0.0);

        let mut top = particle(Vec2::new(50.0, 0.0), Vec2::new(0.0, -0.1));
        top.advance(bounds);
        assert!(top.velocity.y > 0.0);
    }

    #[test]
    fn test_no_reflection_inside() {
        let bounds = Vec2::new(100.0, 100.0);
        let mut p = particle(Vec2::new(50.0, 50.0), Vec2::new(0.2, -0.1));
        p.advance(bounds);
        assert!((p.position - Vec2::new(50.2, 49.9)).length() < 1e-4);
        assert_eq!(p.velocity, Vec2::new(0.2, -0.1));
    }

    #[test]
    fn test_rgba_css_string() {
        let color = Rgba::new(20, 10, 35, 0.8);
        assert_eq!(color.to_string(), "rgba(20, 10, 35, 0.8)");
        assert_eq!(color.with_alpha(0.5).a, 0.5);

        let [r, g, b, a] = Rgba::new(255, 0, 51, 1.5).to_array();
        assert_eq!((r, g, b, a), (1.0, 0.0, 0.2, 1.0));
    }
}
