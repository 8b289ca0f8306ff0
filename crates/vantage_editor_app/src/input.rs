// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer input as the editor sees it.
//!
//! Positions are normalized to the viewport: (0, 0) is the top-left corner
//! and (1, 1) the bottom-right. Times are in seconds.

use glam::Vec2;

/// Pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Select and drag gizmos
    Left,
    /// Orbit the viewport camera
    Right,
    /// Pan the viewport camera
    Middle,
}

/// What happened
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEventKind {
    /// Button pressed
    ButtonDown(PointerButton),
    /// Button released
    ButtonUp(PointerButton),
    /// Pointer moved
    Move,
    /// Wheel scrolled by the given number of notches
    Wheel(f32),
}

/// A pointer event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Event kind
    pub kind: PointerEventKind,
    /// Normalized pointer position
    pub position: Vec2,
    /// Timestamp in seconds
    pub time: f64,
}

impl PointerEvent {
    /// Button press
    pub fn down(button: PointerButton, position: Vec2, time: f64) -> Self {
        Self {
            kind: PointerEventKind::ButtonDown(button),
            position,
            time,
        }
    }

    /// Button release
    pub fn up(button: PointerButton, position: Vec2, time: f64) -> Self {
        Self {
            kind: PointerEventKind::ButtonUp(button),
            position,
            time,
        }
    }

    /// Pointer motion
    pub fn moved(position: Vec2, time: f64) -> Self {
        Self {
            kind: PointerEventKind::Move,
            position,
            time,
        }
    }

    /// Wheel scroll
    pub fn wheel(notches: f32, position: Vec2, time: f64) -> Self {
        Self {
            kind: PointerEventKind::Wheel(notches),
            position,
            time,
        }
    }
}
