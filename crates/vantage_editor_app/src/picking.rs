// SPDX-License-Identifier: MIT OR Apache-2.0
//! Picking seam and a bounding-sphere ray picker.
//!
//! Picking is split in two passes, as in the viewport: the editor scene
//! (gizmo handles and markers) is tested first, the edited scene second.

use crate::camera::Camera;
use crate::gizmo::{GizmoAxis, GizmoSet, GizmoType};
use crate::markers::{MarkerId, MarkerSet};
use crate::scene::{InstanceId, Scene};
use glam::Vec2;

/// Something hit in the editor scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorHit {
    /// A marker
    Marker(MarkerId),
    /// An axis handle of a gizmo
    GizmoHandle {
        /// Gizmo owning the handle
        gizmo: GizmoType,
        /// Handle axis
        axis: GizmoAxis,
    },
}

/// Picks editor-only objects
pub trait EditorPicker {
    /// Nearest gizmo handle or marker under `pointer`
    fn pick_editor(
        &mut self,
        pointer: Vec2,
        camera: &Camera,
        markers: &MarkerSet,
        gizmos: &GizmoSet,
    ) -> Option<EditorHit>;
}

/// Picks model instances of the edited scene
pub trait ScenePicker {
    /// Nearest visible model instance under `pointer`
    fn pick_scene(&mut self, pointer: Vec2, camera: &Camera, scene: &Scene) -> Option<InstanceId>;
}

/// Both picking passes
pub trait Picker: EditorPicker + ScenePicker {}

impl<T: EditorPicker + ScenePicker> Picker for T {}

/// Picker intersecting the pointer ray with bounding spheres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayPicker {
    /// Radius of a gizmo handle
    pub handle_radius: f32,
    /// Radius of a marker at scale 1
    pub marker_radius: f32,
}

impl Default for RayPicker {
    fn default() -> Self {
        Self {
            handle_radius: 0.15,
            marker_radius: 1.0,
        }
    }
}

impl EditorPicker for RayPicker {
    fn pick_editor(
        &mut self,
        pointer: Vec2,
        camera: &Camera,
        markers: &MarkerSet,
        gizmos: &GizmoSet,
    ) -> Option<EditorHit> {
        let ray = camera.screen_ray(pointer);

        // Handles sit in front of whatever they are attached to, so they win
        // over markers regardless of depth.
        if let Some(gizmo) = gizmos.visible() {
            let handle = gizmo
                .handles()
                .into_iter()
                .filter_map(|(axis, center)| {
                    ray.intersect_sphere(center, self.handle_radius).map(|t| (t, axis))
                })
                .min_by(|a, b| a.0.total_cmp(&b.0));
            if let Some((_, axis)) = handle {
                return Some(EditorHit::GizmoHandle {
                    gizmo: gizmo.kind(),
                    axis,
                });
            }
        }

        markers
            .iter()
            .filter_map(|marker| {
                ray.intersect_sphere(marker.position, marker.scale * self.marker_radius)
                    .map(|t| (t, marker.id))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| EditorHit::Marker(id))
    }
}

impl ScenePicker for RayPicker {
    fn pick_scene(&mut self, pointer: Vec2, camera: &Camera, scene: &Scene) -> Option<InstanceId> {
        let ray = camera.screen_ray(pointer);
        scene
            .models()
            .flat_map(|(_, model)| {
                model
                    .instances()
                    .filter(|(_, instance)| instance.visible)
                    .map(move |(id, instance)| {
                        let radius = model.bounding_radius * instance.scaling.abs().max_element();
                        (id, instance.translation, radius)
                    })
            })
            .filter_map(|(id, center, radius)| ray.intersect_sphere(center, radius).map(|t| (t, id)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }
}
