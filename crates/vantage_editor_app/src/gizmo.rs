// SPDX-License-Identifier: MIT OR Apache-2.0
//! Transform gizmos.
//!
//! Each gizmo is a small state machine: a pick on one of its axis handles
//! starts a drag, every pointer move turns into an incremental delta, and
//! the delta is applied to whatever [`Transformable`] the editor has
//! selected.

use crate::camera::{look_rotation, Camera};
use crate::picking::EditorHit;
use crate::scene::{ModelInstance, PointLight};
use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gizmo type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GizmoType {
    /// Translate (move) - W key
    #[default]
    Translate,
    /// Rotate - E key
    Rotate,
    /// Scale - R key
    Scale,
}

impl GizmoType {
    /// All types, in toolbar order
    pub const ALL: [GizmoType; 3] = [Self::Translate, Self::Rotate, Self::Scale];

    /// Get the name of this type
    pub fn name(&self) -> &'static str {
        match self {
            Self::Translate => "Translate",
            Self::Rotate => "Rotate",
            Self::Scale => "Scale",
        }
    }

    /// Get the hotkey for this type
    pub fn hotkey(&self) -> char {
        match self {
            Self::Translate => 'W',
            Self::Rotate => 'E',
            Self::Scale => 'R',
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::Translate => 0,
            Self::Rotate => 1,
            Self::Scale => 2,
        }
    }
}

/// Handle axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GizmoAxis {
    /// World X
    X,
    /// World Y
    Y,
    /// World Z
    Z,
}

impl GizmoAxis {
    /// All axes
    pub const ALL: [GizmoAxis; 3] = [Self::X, Self::Y, Self::Z];

    /// Unit direction
    pub fn direction(&self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }

    /// Handle color
    pub fn color(&self) -> Vec3 {
        match self {
            Self::X => Vec3::new(0.9, 0.2, 0.2),
            Self::Y => Vec3::new(0.2, 0.9, 0.2),
            Self::Z => Vec3::new(0.2, 0.4, 0.9),
        }
    }
}

/// Something a gizmo can move
pub trait Transformable {
    /// World position
    fn translation(&self) -> Vec3;
    /// Set the world position
    fn set_translation(&mut self, translation: Vec3);
    /// World rotation
    fn rotation(&self) -> Quat {
        Quat::IDENTITY
    }
    /// Set the world rotation
    fn set_rotation(&mut self, _rotation: Quat) {}
    /// Per-axis scale
    fn scaling(&self) -> Vec3 {
        Vec3::ONE
    }
    /// Set the per-axis scale
    fn set_scaling(&mut self, _scaling: Vec3) {}
}

/// New (target, up) after giving a look-at pose an absolute rotation.
/// The distance to the target is kept.
pub fn look_at_from_rotation(position: Vec3, target: Vec3, rotation: Quat) -> (Vec3, Vec3) {
    let distance = (target - position).length();
    let distance = if distance > 1e-6 { distance } else { 1.0 };
    (position + rotation * Vec3::Z * distance, rotation * Vec3::Y)
}

impl Transformable for ModelInstance {
    fn translation(&self) -> Vec3 {
        self.translation
    }

    fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
    }

    fn scaling(&self) -> Vec3 {
        self.scaling
    }

    fn set_scaling(&mut self, scaling: Vec3) {
        self.scaling = scaling;
    }
}

impl Transformable for Camera {
    fn translation(&self) -> Vec3 {
        self.position
    }

    fn set_translation(&mut self, translation: Vec3) {
        let offset = translation - self.position;
        self.position = translation;
        self.target += offset;
    }

    fn rotation(&self) -> Quat {
        look_rotation(self.target - self.position, self.up)
    }

    fn set_rotation(&mut self, rotation: Quat) {
        (self.target, self.up) = look_at_from_rotation(self.position, self.target, rotation);
    }
}

impl Transformable for PointLight {
    fn translation(&self) -> Vec3 {
        self.position
    }

    fn set_translation(&mut self, translation: Vec3) {
        self.position = translation;
    }
}

/// Change produced by the last gizmo update
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GizmoDelta {
    /// Nothing to apply
    #[default]
    None,
    /// World-space offset
    Translation(Vec3),
    /// World-space rotation about the pivot
    Rotation(Quat),
    /// Per-axis scale factor
    Scale(Vec3),
}

impl GizmoDelta {
    /// Apply to a target
    pub fn apply(&self, target: &mut dyn Transformable) {
        match *self {
            Self::None => {}
            Self::Translation(offset) => {
                let translation = target.translation() + offset;
                target.set_translation(translation);
            }
            Self::Rotation(rotation) => {
                let rotated = rotation * target.rotation();
                target.set_rotation(rotated);
            }
            Self::Scale(factor) => {
                let scaling = target.scaling() * factor;
                target.set_scaling(scaling);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragAnchor {
    Unset,
    /// Projection of the last hit point onto the axis
    Along(f32),
    /// Last hit point relative to the pivot, in the rotation plane
    Around(Vec3),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    axis: GizmoAxis,
    anchor: DragAnchor,
}

/// Smallest scale factor a single update can produce
const MIN_SCALE_FACTOR: f32 = 0.01;

/// A single manipulator
#[derive(Debug, Clone, PartialEq)]
pub struct Gizmo {
    kind: GizmoType,
    visible: bool,
    pivot: Vec3,
    handle_length: f32,
    drag: Option<Drag>,
    delta: GizmoDelta,
}

impl Gizmo {
    /// Create a hidden gizmo
    pub fn new(kind: GizmoType, handle_length: f32) -> Self {
        Self {
            kind,
            visible: false,
            pivot: Vec3::ZERO,
            handle_length: handle_length.max(1e-3),
            drag: None,
            delta: GizmoDelta::None,
        }
    }

    /// Gizmo type
    pub fn kind(&self) -> GizmoType {
        self.kind
    }

    /// Whether the gizmo is shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Where the gizmo sits
    pub fn pivot(&self) -> Vec3 {
        self.pivot
    }

    /// Move the gizmo
    pub fn set_pivot(&mut self, pivot: Vec3) {
        self.pivot = pivot;
    }

    /// Distance from the pivot to each handle
    pub fn handle_length(&self) -> f32 {
        self.handle_length
    }

    /// Handle positions in world space
    pub fn handles(&self) -> [(GizmoAxis, Vec3); 3] {
        GizmoAxis::ALL.map(|axis| (axis, self.pivot + axis.direction() * self.handle_length))
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Axis being dragged
    pub fn drag_axis(&self) -> Option<GizmoAxis> {
        self.drag.map(|drag| drag.axis)
    }

    /// Delta computed by the last update
    pub fn delta(&self) -> GizmoDelta {
        self.delta
    }

    /// Start a drag if `hit` is one of this gizmo's handles
    pub fn begin_action(&mut self, hit: &EditorHit) -> bool {
        if !self.visible {
            return false;
        }
        match *hit {
            EditorHit::GizmoHandle { gizmo, axis } if gizmo == self.kind => {
                debug!("Begin {} drag on {:?}", self.kind.name(), axis);
                self.drag = Some(Drag {
                    axis,
                    anchor: DragAnchor::Unset,
                });
                self.delta = GizmoDelta::None;
                true
            }
            _ => false,
        }
    }

    /// Recompute the delta from a new pointer position.
    ///
    /// The first update after [`Gizmo::begin_action`] only records where the
    /// drag started.
    pub fn update(&mut self, camera: &Camera, pointer: Vec2) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        self.delta = GizmoDelta::None;

        let ray = camera.screen_ray(pointer);
        let axis = drag.axis.direction();
        match self.kind {
            GizmoType::Translate | GizmoType::Scale => {
                // Plane containing the axis, turned towards the viewer.
                let normal = axis.cross(camera.forward()).cross(axis);
                if normal.length_squared() < 1e-8 {
                    return;
                }
                let Some(t) = ray.intersect_plane(self.pivot, normal.normalize()) else {
                    return;
                };
                let along = ray.at(t).dot(axis);
                if let DragAnchor::Along(last) = drag.anchor {
                    let step = along - last;
                    self.delta = if self.kind == GizmoType::Translate {
                        GizmoDelta::Translation(axis * step)
                    } else {
                        let factor = Vec3::ONE + axis * (step / self.handle_length);
                        GizmoDelta::Scale(factor.max(Vec3::splat(MIN_SCALE_FACTOR)))
                    };
                }
                drag.anchor = DragAnchor::Along(along);
            }
            GizmoType::Rotate => {
                let Some(t) = ray.intersect_plane(self.pivot, axis) else {
                    return;
                };
                let arm = ray.at(t) - self.pivot;
                if arm.length_squared() < 1e-8 {
                    return;
                }
                if let DragAnchor::Around(last) = drag.anchor {
                    let angle = axis.dot(last.cross(arm)).atan2(last.dot(arm));
                    self.delta = GizmoDelta::Rotation(Quat::from_axis_angle(axis, angle));
                }
                drag.anchor = DragAnchor::Around(arm);
            }
        }
    }

    /// Apply the last delta to `target`
    pub fn apply_delta(&self, target: &mut dyn Transformable) {
        self.delta.apply(target);
    }

    /// Finish the drag
    pub fn end_action(&mut self) {
        if self.drag.take().is_some() {
            debug!("End {} drag", self.kind.name());
        }
        self.delta = GizmoDelta::None;
    }
}

/// The three gizmos, one of which is active
#[derive(Debug, Clone)]
pub struct GizmoSet {
    gizmos: [Gizmo; 3],
    active: GizmoType,
}

impl GizmoSet {
    /// Create all gizmos hidden, with `active` selected
    pub fn new(active: GizmoType, handle_length: f32) -> Self {
        Self {
            gizmos: GizmoType::ALL.map(|kind| Gizmo::new(kind, handle_length)),
            active,
        }
    }

    /// Active gizmo type
    pub fn active_type(&self) -> GizmoType {
        self.active
    }

    /// Active gizmo
    pub fn active(&self) -> &Gizmo {
        &self.gizmos[self.active.slot()]
    }

    /// Active gizmo, mutably
    pub fn active_mut(&mut self) -> &mut Gizmo {
        &mut self.gizmos[self.active.slot()]
    }

    /// Gizmo by type
    pub fn get(&self, kind: GizmoType) -> &Gizmo {
        &self.gizmos[kind.slot()]
    }

    /// Switch the active gizmo. The previous one is hidden; the new one is
    /// shown only when `show` is set.
    pub fn set_active(&mut self, kind: GizmoType, show: bool) {
        if kind != self.active {
            let previous = &mut self.gizmos[self.active.slot()];
            previous.end_action();
            previous.set_visible(false);
            self.active = kind;
        }
        self.active_mut().set_visible(show);
    }

    /// The active gizmo if it is shown
    pub fn visible(&self) -> Option<&Gizmo> {
        Some(self.active()).filter(|gizmo| gizmo.is_visible())
    }

    /// Iterate over all gizmos
    pub fn iter(&self) -> impl Iterator<Item = &Gizmo> {
        self.gizmos.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front_camera() -> Camera {
        Camera::new("View").looking_at(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, Vec3::Y)
    }

    fn dragging(kind: GizmoType, axis: GizmoAxis) -> Gizmo {
        let mut gizmo = Gizmo::new(kind, 1.0);
        gizmo.set_visible(true);
        assert!(gizmo.begin_action(&EditorHit::GizmoHandle { gizmo: kind, axis }));
        gizmo
    }

    #[test]
    fn test_begin_requires_own_visible_handle() {
        let mut gizmo = Gizmo::new(GizmoType::Translate, 1.0);
        let hit = EditorHit::GizmoHandle {
            gizmo: GizmoType::Translate,
            axis: GizmoAxis::X,
        };
        assert!(!gizmo.begin_action(&hit));

        gizmo.set_visible(true);
        let other = EditorHit::GizmoHandle {
            gizmo: GizmoType::Rotate,
            axis: GizmoAxis::X,
        };
        assert!(!gizmo.begin_action(&other));
        assert!(!gizmo.is_dragging());
        assert!(gizmo.begin_action(&hit));
        assert_eq!(gizmo.drag_axis(), Some(GizmoAxis::X));

        gizmo.end_action();
        assert!(!gizmo.is_dragging());
    }

    #[test]
    fn test_update_when_idle_is_noop() {
        let mut gizmo = Gizmo::new(GizmoType::Translate, 1.0);
        gizmo.update(&front_camera(), Vec2::new(0.7, 0.5));
        assert_eq!(gizmo.delta(), GizmoDelta::None);
    }

    #[test]
    fn test_translate_along_axis() {
        let camera = front_camera();
        let mut gizmo = dragging(GizmoType::Translate, GizmoAxis::X);
        gizmo.update(&camera, Vec2::new(0.5, 0.5));
        assert_eq!(gizmo.delta(), GizmoDelta::None);

        gizmo.update(&camera, Vec2::new(0.6, 0.4));
        let GizmoDelta::Translation(offset) = gizmo.delta() else {
            panic!("expected a translation, got {:?}", gizmo.delta());
        };
        assert!(offset.x > 0.0);
        assert_eq!(offset.y, 0.0);
        assert_eq!(offset.z, 0.0);

        let mut instance = ModelInstance::new("box");
        gizmo.apply_delta(&mut instance);
        assert_eq!(instance.translation, offset);
    }

    #[test]
    fn test_rotate_about_axis() {
        let camera = front_camera();
        let mut gizmo = dragging(GizmoType::Rotate, GizmoAxis::Z);
        gizmo.update(&camera, Vec2::new(0.7, 0.5));
        gizmo.update(&camera, Vec2::new(0.5, 0.3));

        let GizmoDelta::Rotation(rotation) = gizmo.delta() else {
            panic!("expected a rotation");
        };
        // From +X to +Y is a quarter turn counter-clockwise about +Z.
        let turned = rotation * Vec3::X;
        assert!(turned.abs_diff_eq(Vec3::Y, 1e-3), "{turned:?}");
    }

    #[test]
    fn test_scale_along_axis() {
        let camera = front_camera();
        let mut gizmo = dragging(GizmoType::Scale, GizmoAxis::Y);
        gizmo.update(&camera, Vec2::new(0.5, 0.5));
        gizmo.update(&camera, Vec2::new(0.5, 0.4));

        let GizmoDelta::Scale(factor) = gizmo.delta() else {
            panic!("expected a scale");
        };
        assert!(factor.y > 1.0);
        assert_eq!(factor.x, 1.0);
        assert_eq!(factor.z, 1.0);
    }

    #[test]
    fn test_camera_rotation_keeps_target_distance() {
        let mut camera = Camera::new("c").looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0), Vec3::Y);
        GizmoDelta::Rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)).apply(&mut camera);
        assert!(camera.target.abs_diff_eq(Vec3::new(4.0, 0.0, 0.0), 1e-5));
        assert!(camera.up.abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn test_point_light_ignores_rotation() {
        let mut light = PointLight::new("l", Vec3::ONE);
        GizmoDelta::Rotation(Quat::from_rotation_x(1.0)).apply(&mut light);
        GizmoDelta::Translation(Vec3::X).apply(&mut light);
        assert_eq!(light.position, Vec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn test_set_active_visibility() {
        let mut gizmos = GizmoSet::new(GizmoType::Translate, 1.0);
        assert!(gizmos.visible().is_none());

        gizmos.set_active(GizmoType::Translate, true);
        assert!(gizmos.get(GizmoType::Translate).is_visible());

        gizmos.set_active(GizmoType::Rotate, true);
        assert!(!gizmos.get(GizmoType::Translate).is_visible());
        assert!(gizmos.get(GizmoType::Rotate).is_visible());

        gizmos.set_active(GizmoType::Scale, false);
        assert!(!gizmos.get(GizmoType::Rotate).is_visible());
        assert!(gizmos.visible().is_none());
        assert_eq!(gizmos.active_type(), GizmoType::Scale);
    }
}
