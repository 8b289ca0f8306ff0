// SPDX-License-Identifier: MIT OR Apache-2.0
//! Object paths: time-sorted keyframe sequences with interpolated sampling.

use crate::keyframe::{Frame, Interpolation, InterpolationMode, Keyframe};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Unique identifier for a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathId(pub u64);

impl PathId {
    /// Wrap a raw id
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PathId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "path#{}", self.0)
    }
}

/// A named path objects can be attached to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectPath {
    name: String,
    keyframes: Vec<Keyframe>,
    looping: bool,
    interpolation: InterpolationMode,
}

impl ObjectPath {
    /// Create an empty, non-looping path
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keyframes: Vec::new(),
            looping: false,
            interpolation: InterpolationMode::default(),
        }
    }

    /// Path name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the path
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether sampling wraps from the last keyframe back to the first
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Enable or disable looping
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Default interpolation mode used by [`ObjectPath::sample_at`]
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    /// Change the default interpolation mode
    pub fn set_interpolation(&mut self, mode: InterpolationMode) {
        self.interpolation = mode;
    }

    /// Insert a keyframe keeping the list sorted by time.
    ///
    /// Returns the index the keyframe landed at. A keyframe with the same
    /// time as existing ones goes after them.
    pub fn add_keyframe(&mut self, time: f32, position: Vec3, target: Vec3, up: Vec3) -> usize {
        self.insert_sorted(Keyframe::new(time, position, target, up))
    }

    fn insert_sorted(&mut self, keyframe: Keyframe) -> usize {
        let index = self.keyframes.partition_point(|k| k.time <= keyframe.time);
        self.keyframes.insert(index, keyframe);
        index
    }

    /// Remove the keyframe at `index`; later keyframes shift down by one
    pub fn remove_keyframe(&mut self, index: usize) -> Option<Keyframe> {
        if index < self.keyframes.len() {
            Some(self.keyframes.remove(index))
        } else {
            None
        }
    }

    /// Change a keyframe's time and re-sort.
    ///
    /// Returns the keyframe's index after sorting, or `None` if `index` is
    /// out of range.
    pub fn set_frame_time(&mut self, index: usize, time: f32) -> Option<usize> {
        let mut keyframe = self.remove_keyframe(index)?;
        keyframe.time = time;
        Some(self.insert_sorted(keyframe))
    }

    /// Set a keyframe's position
    pub fn set_frame_position(&mut self, index: usize, position: Vec3) {
        if let Some(keyframe) = self.keyframes.get_mut(index) {
            keyframe.position = position;
        }
    }

    /// Set a keyframe's target
    pub fn set_frame_target(&mut self, index: usize, target: Vec3) {
        if let Some(keyframe) = self.keyframes.get_mut(index) {
            keyframe.target = target;
        }
    }

    /// Set a keyframe's up vector
    pub fn set_frame_up(&mut self, index: usize, up: Vec3) {
        if let Some(keyframe) = self.keyframes.get_mut(index) {
            keyframe.up = up;
        }
    }

    /// Overwrite the pose of a keyframe, leaving its time untouched
    pub fn set_frame_pose(&mut self, index: usize, frame: Frame) {
        self.set_frame_position(index, frame.position);
        self.set_frame_target(index, frame.target);
        self.set_frame_up(index, frame.up);
    }

    /// Number of keyframes
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// True if the path has no keyframes
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Keyframe by index
    pub fn keyframe(&self, index: usize) -> Option<&Keyframe> {
        self.keyframes.get(index)
    }

    /// All keyframes in time order
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Time between the first and the last keyframe
    pub fn duration(&self) -> f32 {
        match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }

    /// Number of segments that can be sampled.
    ///
    /// A looping path has an extra closing segment from the last keyframe
    /// back to the first.
    pub fn segment_count(&self) -> usize {
        let n = self.keyframes.len();
        if self.looping && n >= 2 {
            n
        } else {
            n.saturating_sub(1)
        }
    }

    /// Sample between keyframe `segment` and its successor with the path's
    /// own interpolation mode
    pub fn sample_at(&self, segment: usize, t: f32) -> Option<Frame> {
        self.sample_at_with(segment, t, self.interpolation)
    }

    /// Sample between keyframe `segment` and its successor.
    ///
    /// `t` is clamped to `[0, 1]`. The successor of the last keyframe only
    /// exists when the path loops.
    pub fn sample_at_with(&self, segment: usize, t: f32, mode: InterpolationMode) -> Option<Frame> {
        let n = self.keyframes.len();
        if segment >= n {
            return None;
        }
        let next = self.successor(segment)?;
        let prev = if segment > 0 {
            segment - 1
        } else if self.looping {
            n - 1
        } else {
            segment
        };
        let after_next = self.successor(next).unwrap_or(next);

        let t = t.clamp(0.0, 1.0);
        Some(Interpolation::frame(
            &self.keyframes[prev].frame(),
            &self.keyframes[segment].frame(),
            &self.keyframes[next].frame(),
            &self.keyframes[after_next].frame(),
            t,
            mode,
        ))
    }

    fn successor(&self, index: usize) -> Option<usize> {
        if index + 1 < self.keyframes.len() {
            Some(index + 1)
        } else if self.looping {
            Some(0)
        } else {
            None
        }
    }

    /// Frame at an absolute time.
    ///
    /// Times outside the keyframe range clamp to the end keyframes, or wrap
    /// modulo the duration when the path loops. NaN has no frame.
    pub fn frame_at_time(&self, time: f32) -> Option<Frame> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;

        let span = last.time - first.time;
        let time = if self.looping && span > 0.0 {
            first.time + (time - first.time).rem_euclid(span)
        } else {
            time
        };
        if time.is_nan() {
            return None;
        }

        if time <= first.time {
            return Some(first.frame());
        }
        if time >= last.time {
            return Some(last.frame());
        }

        let segment = self.keyframes.partition_point(|k| k.time <= time) - 1;
        let a = &self.keyframes[segment];
        let b = &self.keyframes[segment + 1];
        let length = b.time - a.time;
        if length <= f32::EPSILON {
            return Some(b.frame());
        }
        self.sample_at(segment, (time - a.time) / length)
    }
}
