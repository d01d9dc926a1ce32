//! Scroll-linked overlay.
//!
//! A translucent layer over the field that darkens and slides down as the
//! page scrolls. Scroll events arrive in bursts; the offset is only
//! committed once per display refresh.

use crate::config::OverlayConfig;
use crate::particle::Rgba;

/// How to paint the overlay for the current scroll offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub color: Rgba,
    /// Multiplier on `color.a`, in [0, 1].
    pub opacity: f32,
    /// Downward translation in pixels.
    pub translate_y: f32,
}

#[derive(Debug, Clone)]
pub struct ScrollOverlay {
    config: OverlayConfig,
    color: Rgba,
    offset: f32,
    pending: Option<f32>,
}

impl ScrollOverlay {
    pub fn new(config: OverlayConfig, color: Rgba) -> Self {
        Self {
            config,
            color,
            offset: 0.0,
            pending: None,
        }
    }

    /// Record a raw scroll offset. Returns `true` if this is the first
    /// observation since the last commit, i.e. a commit must be scheduled.
    pub fn observe(&mut self, offset: f32) -> bool {
        self.pending.replace(offset).is_none()
    }

    /// Apply the latest observed offset. Returns `true` if there was one.
    pub fn commit(&mut self) -> bool {
        match self.pending.take() {
            Some(offset) => {
                self.offset = offset;
                true
            }
            None => false,
        }
    }

    /// Drop an observation that will never be committed.
    pub fn discard_pending(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Committed scroll offset.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn opacity(&self) -> f32 {
        (self.offset / self.config.fade_distance).clamp(0.0, 1.0)
    }

    pub fn translate_y(&self) -> f32 {
        // Zero wins if an unvalidated config inverts the bounds
        (self.offset * self.config.parallax)
            .min(self.config.max_offset)
            .max(0.0)
    }

    pub fn style(&self) -> OverlayStyle {
        OverlayStyle {
            color: self.color,
            opacity: self.opacity(),
            translate_y: self.translate_y(),
        }
    }
}
