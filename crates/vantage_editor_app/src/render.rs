// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drawing seam.
//!
//! The editor does not render anything itself. Each frame it hands an
//! [`EditorRenderer`] the selection outline, the editor scene (markers and
//! the visible gizmo) and the path overlay, in that order.

use crate::gizmo::{Gizmo, GizmoType};
use crate::markers::{MarkerId, MarkerSet};
use crate::scene::{InstanceId, Scene};
use crate::selection::SelectionTarget;
use glam::Vec3;
use vantage_editor_paths::LineVertex;

/// Draws what the editor adds on top of the scene
pub trait EditorRenderer {
    /// Draw the selected objects with a flat color
    fn draw_selection_outline(
        &mut self,
        scene: &Scene,
        markers: &MarkerSet,
        selection: &[SelectionTarget],
        color: Vec3,
    );

    /// Draw all markers and the visible gizmo
    fn draw_editor_scene(&mut self, markers: &MarkerSet, gizmo: Option<&Gizmo>);

    /// Draw a line list
    fn draw_lines(&mut self, vertices: &[LineVertex]);
}

/// One recorded draw
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    /// Selection outline
    SelectionOutline {
        /// Outlined instances
        instances: Vec<InstanceId>,
        /// Outlined markers
        markers: Vec<MarkerId>,
        /// Outline color
        color: Vec3,
    },
    /// Editor scene
    EditorScene {
        /// Number of markers drawn
        markers: usize,
        /// Gizmo drawn, if any
        gizmo: Option<GizmoType>,
    },
    /// Line list
    Lines {
        /// Number of vertices
        vertices: usize,
    },
}

/// Renderer that records what it was asked to draw
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    /// Calls in submission order
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget recorded calls
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl EditorRenderer for RecordingRenderer {
    fn draw_selection_outline(
        &mut self,
        scene: &Scene,
        markers: &MarkerSet,
        selection: &[SelectionTarget],
        color: Vec3,
    ) {
        let mut instances = Vec::new();
        let mut marker_ids = Vec::new();
        for target in selection {
            match *target {
                SelectionTarget::Instance(id) if scene.instance(id).is_some() => instances.push(id),
                SelectionTarget::Marker(id) if markers.get(id).is_some() => marker_ids.push(id),
                _ => {}
            }
        }
        self.calls.push(DrawCall::SelectionOutline {
            instances,
            markers: marker_ids,
            color,
        });
    }

    fn draw_editor_scene(&mut self, markers: &MarkerSet, gizmo: Option<&Gizmo>) {
        self.calls.push(DrawCall::EditorScene {
            markers: markers.len(),
            gizmo: gizmo.map(Gizmo::kind),
        });
    }

    fn draw_lines(&mut self, vertices: &[LineVertex]) {
        self.calls.push(DrawCall::Lines {
            vertices: vertices.len(),
        });
    }
}
