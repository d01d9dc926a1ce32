//! CPU tessellation of canvas shapes into triangle lists.
//!
//! Every shape becomes one quad (two triangles). Circles carry a local
//! coordinate in which the circle edge sits at length 1, so the fragment
//! shader can anti-alias them; rects and lines use a zero local coordinate
//! and are filled solid.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::particle::Rgba;

/// Extra pixels around a circle so the anti-aliased edge is not clipped.
const CIRCLE_MARGIN: f32 = 1.0;

/// Narrowest line rasterized. Thinner lines are drawn at this width with
/// their alpha scaled down to match the coverage.
const MIN_LINE_WIDTH: f32 = 1.0;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ShapeVertex {
    /// Surface pixels, origin top-left.
    pub position: [f32; 2],
    /// Circle-space coordinate, zero for solid shapes.
    pub local: [f32; 2],
    /// Straight-alpha color.
    pub color: [f32; 4],
}

impl ShapeVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Push the quad with corners `corners` (in order: a, b, c, d around the
/// quad) as two triangles.
fn quad(out: &mut Vec<ShapeVertex>, corners: [Vec2; 4], locals: [Vec2; 4], color: [f32; 4]) {
    for i in [0, 1, 2, 0, 2, 3] {
        out.push(ShapeVertex {
            position: corners[i].to_array(),
            local: locals[i].to_array(),
            color,
        });
    }
}

pub fn rect(out: &mut Vec<ShapeVertex>, origin: Vec2, size: Vec2, color: Rgba) {
    let corners = [
        origin,
        origin + Vec2::new(size.x, 0.0),
        origin + size,
        origin + Vec2::new(0.0, size.y),
    ];
    quad(out, corners, [Vec2::ZERO; 4], color.to_array());
}

pub fn circle(out: &mut Vec<ShapeVertex>, center: Vec2, radius: f32, color: Rgba) {
    if radius <= 0.0 {
        return;
    }
    let half = radius + CIRCLE_MARGIN;
    let scale = half / radius;
    let offsets = [
        Vec2::new(-1.0, -1.0),
        Vec2::new(1.0, -1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(-1.0, 1.0),
    ];
    quad(
        out,
        offsets.map(|o| center + o * half),
        offsets.map(|o| o * scale),
        color.to_array(),
    );
}

pub fn line(out: &mut Vec<ShapeVertex>, from: Vec2, to: Vec2, color: Rgba, width: f32) {
    let Some(direction) = (to - from).try_normalize() else {
        return;
    };
    let drawn_width = width.max(MIN_LINE_WIDTH);
    let coverage = (width / drawn_width).clamp(0.0, 1.0);
    let normal = direction.perp() * (drawn_width * 0.5);

    let mut color = color.to_array();
    color[3] *= coverage;

    quad(
        out,
        [from - normal, to - normal, to + normal, from + normal],
        [Vec2::ZERO; 4],
        color,
    );
}
