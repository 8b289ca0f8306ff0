// SPDX-License-Identifier: MIT OR Apache-2.0
//! Line-list generation for path overlays.
//!
//! The drawer accumulates colored line vertices into a bounded buffer that a
//! renderer uploads once per frame. Lines that would overflow the buffer are
//! dropped.

use crate::path::ObjectPath;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Side length of the quads drawn around a path
pub const QUAD_SIZE: f32 = 0.08;

/// Default number of line segments between two keyframes
pub const DEFAULT_PATH_DETAIL: u32 = 10;

/// Four corners, counter-clockwise from the top left
pub type Quad = [Vec3; 4];

/// Vertex layout of the line list: position followed by color
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    /// World-space position
    pub position: [f32; 3],
    /// Linear RGB color
    pub color: [f32; 3],
}

impl LineVertex {
    /// Create a vertex
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }
}

/// Bounded line-list builder
#[derive(Debug, Clone)]
pub struct DebugDrawer {
    vertices: Vec<LineVertex>,
    max_vertices: usize,
    color: Vec3,
}

impl DebugDrawer {
    /// Create a drawer holding at most `max_vertices` vertices
    pub fn new(max_vertices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(max_vertices),
            max_vertices,
            color: Vec3::ONE,
        }
    }

    /// Color applied to lines added from now on
    pub fn set_color(&mut self, color: Vec3) {
        self.color = color;
    }

    /// Current line color
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Add a line. Returns false when the buffer is full.
    pub fn add_line(&mut self, a: Vec3, b: Vec3) -> bool {
        if self.max_vertices - self.vertices.len() < 2 {
            return false;
        }
        self.vertices.push(LineVertex::new(a, self.color));
        self.vertices.push(LineVertex::new(b, self.color));
        true
    }

    /// Add the outline of a quad
    pub fn add_quad(&mut self, quad: &Quad) {
        for i in 0..4 {
            self.add_line(quad[i], quad[(i + 1) % 4]);
        }
    }

    /// Add a path as a tube of quads joined at the corners.
    ///
    /// `detail` is the number of samples taken per segment. Paths with fewer
    /// than two keyframes draw nothing.
    pub fn add_path(&mut self, path: &ObjectPath, detail: u32) {
        let samples = sample_path(path, detail);
        if samples.len() < 2 {
            return;
        }

        let last = samples.len() - 1;
        let mut previous: Option<Quad> = None;
        for (i, &(position, up)) in samples.iter().enumerate() {
            let forward = if i == 0 {
                samples[1].0 - position
            } else if i == last {
                position - samples[i - 1].0
            } else {
                (position - samples[i - 1].0).normalize_or_zero()
                    + (samples[i + 1].0 - position).normalize_or_zero()
            };
            let quad = quad_facing(position, forward, up);

            // The first and last quads cap the tube.
            if i == 0 || i == last {
                self.add_quad(&quad);
            }
            if let Some(prev) = previous {
                if i != last {
                    self.add_quad(&quad);
                }
                for corner in 0..4 {
                    self.add_line(prev[corner], quad[corner]);
                }
            }
            previous = Some(quad);
        }
    }

    /// Add a path as a plain polyline through its sampled positions
    pub fn add_polyline(&mut self, path: &ObjectPath, detail: u32) {
        let samples = sample_path(path, detail);
        for pair in samples.windows(2) {
            if !self.add_line(pair[0].0, pair[1].0) {
                break;
            }
        }
    }

    /// Accumulated vertices
    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    /// Accumulated vertices as raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Number of accumulated vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True if nothing has been added since the last clear
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Maximum number of vertices
    pub fn capacity(&self) -> usize {
        self.max_vertices
    }

    /// Drop all accumulated vertices
    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}

/// Positions and up vectors along a path, `detail` samples per segment plus
/// the closing point
fn sample_path(path: &ObjectPath, detail: u32) -> Vec<(Vec3, Vec3)> {
    let segments = path.segment_count();
    if segments == 0 {
        return Vec::new();
    }
    let detail = detail.max(1);
    let step = 1.0 / detail as f32;

    let mut samples = Vec::with_capacity(segments * detail as usize + 1);
    for segment in 0..segments {
        for i in 0..detail {
            if let Some(frame) = path.sample_at(segment, i as f32 * step) {
                samples.push((frame.position, frame.up));
            }
        }
    }
    if let Some(frame) = path.sample_at(segments - 1, 1.0) {
        samples.push((frame.position, frame.up));
    }
    samples
}

/// Quad centered at `center` facing along `forward`
fn quad_facing(center: Vec3, forward: Vec3, up: Vec3) -> Quad {
    let forward = forward.normalize_or_zero();
    let forward = if forward == Vec3::ZERO { Vec3::Z } else { forward };
    let mut right = forward.cross(up);
    if right.length_squared() < 1e-12 {
        right = forward.any_orthonormal_vector();
    }
    let up = right.cross(forward);
    build_quad(center, up, right)
}

fn build_quad(center: Vec3, up: Vec3, right: Vec3) -> Quad {
    let up_offset = up.normalize() * QUAD_SIZE / 2.0;
    let right_offset = right.normalize() * QUAD_SIZE / 2.0;
    [
        center + up_offset - right_offset,
        center - up_offset - right_offset,
        center - up_offset + right_offset,
        center + up_offset + right_offset,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_path(keyframes: usize) -> ObjectPath {
        let mut path = ObjectPath::new("Line");
        for i in 0..keyframes {
            let x = i as f32;
            path.add_keyframe(x, Vec3::new(x, 0.0, 0.0), Vec3::new(x + 1.0, 0.0, 0.0), Vec3::Y);
        }
        path
    }

    #[test]
    fn test_add_line_respects_capacity() {
        let mut drawer = DebugDrawer::new(5);
        assert!(drawer.add_line(Vec3::ZERO, Vec3::X));
        assert!(drawer.add_line(Vec3::ZERO, Vec3::Y));
        assert!(!drawer.add_line(Vec3::ZERO, Vec3::Z));
        assert_eq!(drawer.len(), 4);
    }

    #[test]
    fn test_lines_carry_current_color() {
        let mut drawer = DebugDrawer::new(16);
        drawer.set_color(Vec3::new(1.0, 0.0, 0.0));
        drawer.add_line(Vec3::ZERO, Vec3::X);
        assert_eq!(drawer.vertices()[1].color, [1.0, 0.0, 0.0]);
        assert_eq!(drawer.vertices()[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(drawer.as_bytes().len(), 2 * std::mem::size_of::<LineVertex>());
    }

    #[test]
    fn test_quad_outline() {
        let mut drawer = DebugDrawer::new(64);
        let quad = build_quad(Vec3::ZERO, Vec3::Y, Vec3::X);
        drawer.add_quad(&quad);
        assert_eq!(drawer.len(), 8);
        let width = (quad[2] - quad[1]).length();
        assert!((width - QUAD_SIZE).abs() < 1e-6);
    }

    #[test]
    fn test_polyline_vertex_count() {
        let mut drawer = DebugDrawer::new(1024);
        drawer.add_polyline(&straight_path(3), DEFAULT_PATH_DETAIL);
        // Two segments, ten lines each.
        assert_eq!(drawer.len(), 2 * 10 * 2);
        let last = drawer.vertices().last().unwrap();
        assert_eq!(last.position, [2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_tube_stays_within_capacity() {
        let mut drawer = DebugDrawer::new(100);
        drawer.add_path(&straight_path(6), DEFAULT_PATH_DETAIL);
        assert!(drawer.len() <= drawer.capacity());
        assert_eq!(drawer.len() % 2, 0);

        drawer.clear();
        assert!(drawer.is_empty());
    }

    #[test]
    fn test_tube_geometry_count() {
        let mut drawer = DebugDrawer::new(65536);
        drawer.add_path(&straight_path(2), 4);
        // 5 samples: 5 quads of 4 lines plus 4 gaps of 4 connecting lines.
        assert_eq!(drawer.len(), (5 * 4 + 4 * 4) * 2);
    }

    #[test]
    fn test_single_keyframe_draws_nothing() {
        let mut drawer = DebugDrawer::new(64);
        drawer.add_path(&straight_path(1), DEFAULT_PATH_DETAIL);
        drawer.add_polyline(&straight_path(1), DEFAULT_PATH_DETAIL);
        assert!(drawer.is_empty());
    }
}
