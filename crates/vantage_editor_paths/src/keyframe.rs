// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions and pose interpolation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Interpolation mode between keyframes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationMode {
    /// Constant (step) - holds the earlier keyframe until the segment ends
    Constant,
    /// Linear interpolation
    #[default]
    Linear,
    /// Hermite spline using the neighbouring keyframes as tangents
    Smooth,
}

impl InterpolationMode {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Constant => "Constant",
            Self::Linear => "Linear",
            Self::Smooth => "Smooth",
        }
    }

    /// All modes, in display order
    pub const ALL: [InterpolationMode; 3] = [Self::Constant, Self::Linear, Self::Smooth];
}

/// A pose sampled from a path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Eye / object position
    pub position: Vec3,
    /// Look-at point
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
}

impl Frame {
    /// Pose at the origin looking down +Z with +Y up
    pub const CANONICAL: Frame = Frame {
        position: Vec3::ZERO,
        target: Vec3::Z,
        up: Vec3::Y,
    };

    /// Create a new frame
    pub fn new(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self { position, target, up }
    }

    /// Normalized direction from position to target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Component-wise comparison with a tolerance
    pub fn abs_diff_eq(&self, other: &Frame, max_abs_diff: f32) -> bool {
        self.position.abs_diff_eq(other.position, max_abs_diff)
            && self.target.abs_diff_eq(other.target, max_abs_diff)
            && self.up.abs_diff_eq(other.up, max_abs_diff)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// A timestamped pose in a path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Time in seconds
    pub time: f32,
    /// Position
    pub position: Vec3,
    /// Look-at target
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
}

impl Keyframe {
    /// Create a new keyframe
    pub fn new(time: f32, position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            time,
            position,
            target,
            up,
        }
    }

    /// Create a keyframe from a frame
    pub fn from_frame(time: f32, frame: Frame) -> Self {
        Self::new(time, frame.position, frame.target, frame.up)
    }

    /// The pose stored in this keyframe
    pub fn frame(&self) -> Frame {
        Frame::new(self.position, self.target, self.up)
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats.
    ///
    /// Written as a weighted sum so that `t == 0` and `t == 1` return the
    /// end points bit-for-bit.
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a * (1.0 - t) + b * t
    }

    /// Linear interpolation between two vectors
    pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
        a * (1.0 - t) + b * t
    }

    /// Hermite spline interpolation
    pub fn hermite(p0: f32, m0: f32, p1: f32, m1: f32, t: f32) -> f32 {
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        h00 * p0 + h10 * m0 + h01 * p1 + h11 * m1
    }

    /// Hermite spline interpolation of vectors
    pub fn hermite_vec3(p0: Vec3, m0: Vec3, p1: Vec3, m1: Vec3, t: f32) -> Vec3 {
        Vec3::new(
            Self::hermite(p0.x, m0.x, p1.x, m1.x, t),
            Self::hermite(p0.y, m0.y, p1.y, m1.y, t),
            Self::hermite(p0.z, m0.z, p1.z, m1.z, t),
        )
    }

    /// Catmull-Rom segment between `p1` and `p2`
    pub fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
        let m1 = (p2 - p0) * 0.5;
        let m2 = (p3 - p1) * 0.5;
        Self::hermite_vec3(p1, m1, p2, m2, t)
    }

    /// Interpolate a pose between `a` and `b`.
    ///
    /// `prev` and `next` are the keyframes around the segment; they are only
    /// read by [`InterpolationMode::Smooth`].
    pub fn frame(
        prev: &Frame,
        a: &Frame,
        b: &Frame,
        next: &Frame,
        t: f32,
        mode: InterpolationMode,
    ) -> Frame {
        match mode {
            InterpolationMode::Constant => {
                if t >= 1.0 {
                    *b
                } else {
                    *a
                }
            }
            InterpolationMode::Linear => Frame {
                position: Self::lerp_vec3(a.position, b.position, t),
                target: Self::lerp_vec3(a.target, b.target, t),
                up: Self::lerp_vec3(a.up, b.up, t),
            },
            InterpolationMode::Smooth => Frame {
                position: Self::catmull_rom(prev.position, a.position, b.position, next.position, t),
                target: Self::catmull_rom(prev.target, a.target, b.target, next.target, t),
                up: Self::catmull_rom(prev.up, a.up, b.up, next.up, t),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_end_points_are_exact() {
        let a = Vec3::new(0.1, 0.7, -3.3);
        let b = Vec3::new(0.7, 0.1, 9.9);
        assert_eq!(Interpolation::lerp_vec3(a, b, 0.0), a);
        assert_eq!(Interpolation::lerp_vec3(a, b, 1.0), b);
    }

    #[test]
    fn test_catmull_rom_passes_through_control_points() {
        let p0 = Vec3::new(-1.0, 0.0, 0.0);
        let p1 = Vec3::new(0.0, 1.0, 0.0);
        let p2 = Vec3::new(2.0, 1.0, 0.5);
        let p3 = Vec3::new(3.0, 0.0, 1.0);
        assert_eq!(Interpolation::catmull_rom(p0, p1, p2, p3, 0.0), p1);
        assert_eq!(Interpolation::catmull_rom(p0, p1, p2, p3, 1.0), p2);
    }

    #[test]
    fn test_constant_holds_until_segment_end() {
        let a = Frame::new(Vec3::ZERO, Vec3::Z, Vec3::Y);
        let b = Frame::new(Vec3::ONE, Vec3::X, Vec3::Y);
        let mid = Interpolation::frame(&a, &a, &b, &b, 0.99, InterpolationMode::Constant);
        assert_eq!(mid, a);
        let end = Interpolation::frame(&a, &a, &b, &b, 1.0, InterpolationMode::Constant);
        assert_eq!(end, b);
    }

    #[test]
    fn test_frame_forward() {
        let frame = Frame::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 5.0), Vec3::Y);
        assert!(frame.forward().abs_diff_eq(Vec3::Z, 1e-6));
        assert_eq!(Frame::default(), Frame::CANONICAL);
    }
}
