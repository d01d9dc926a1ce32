//! The 2D drawing surface the field renders into.
//!
//! [`Canvas`] is deliberately small: it is the subset of an immediate-mode
//! 2D context the particle field needs. The native host implements it on a
//! wgpu surface ([`GpuCanvas`](crate::gpu::GpuCanvas)); [`RecordingCanvas`]
//! keeps the calls in memory for headless use and tests.

use glam::Vec2;

use crate::particle::Rgba;

/// Size of the visible area in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Immediate-mode 2D drawing context.
pub trait Canvas {
    /// Current pixel dimensions of the backing buffer.
    fn size(&self) -> Viewport;

    /// Reallocate the backing buffer. Contents are lost.
    fn set_size(&mut self, size: Viewport);

    /// Erase everything to transparent.
    fn clear(&mut self);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32);
}

/// One recorded [`Canvas`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect { origin: Vec2, size: Vec2, color: Rgba },
    FillCircle { center: Vec2, radius: f32, color: Rgba },
    StrokeLine { from: Vec2, to: Vec2, color: Rgba, width: f32 },
}

/// A canvas that records calls instead of rasterizing them.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    size: Viewport,
    commands: Vec<DrawCommand>,
    resizes: usize,
}

impl RecordingCanvas {
    pub fn new(size: Viewport) -> Self {
        Self {
            size,
            commands: Vec::new(),
            resizes: 0,
        }
    }

    /// Every draw call since creation or the last [`take_commands`](Self::take_commands).
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of times the backing buffer was reallocated.
    pub fn resize_count(&self) -> usize {
        self.resizes
    }

    pub fn clear_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear))
            .count()
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokeLine { .. }))
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> Viewport {
        self.size
    }

    fn set_size(&mut self, size: Viewport) {
        self.size = size;
        self.resizes += 1;
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { origin, size, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        self.commands.push(DrawCommand::StrokeLine { from, to, color, width });
    }
}
