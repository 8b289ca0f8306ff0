// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor-only marker instances.
//!
//! Cameras, point lights and keyframes have no geometry of their own, so the
//! editor places a marker for each of them. Markers are what the user clicks
//! and drags; the editor copies changes back to the scene object.

use crate::camera::{look_rotation, Camera};
use crate::gizmo::{look_at_from_rotation, Transformable};
use crate::scene::{CameraId, Light, LightId, Scene};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vantage_editor_paths::{Frame, ObjectPath};

/// Identifier of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// What a marker stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// A scene camera
    Camera(CameraId),
    /// A scene point light
    Light(LightId),
    /// A keyframe of the path being edited
    Keyframe(usize),
}

impl MarkerKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Camera(_) => "Camera",
            Self::Light(_) => "Light",
            Self::Keyframe(_) => "Keyframe",
        }
    }
}

/// Uniform scale of each marker kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerScales {
    /// Camera markers
    pub camera: f32,
    /// Light markers
    pub light: f32,
    /// Keyframe markers
    pub keyframe: f32,
}

impl Default for MarkerScales {
    fn default() -> Self {
        Self {
            camera: 0.5,
            light: 0.3,
            keyframe: 0.3,
        }
    }
}

/// A marker placed in the editor scene
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerInstance {
    /// Marker id
    pub id: MarkerId,
    /// Represented object
    pub kind: MarkerKind,
    /// Position
    pub position: Vec3,
    /// Look-at target
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Uniform scale
    pub scale: f32,
}

impl MarkerInstance {
    /// Current pose
    pub fn frame(&self) -> Frame {
        Frame::new(self.position, self.target, self.up)
    }

    /// Overwrite the pose
    pub fn set_frame(&mut self, frame: Frame) {
        self.position = frame.position;
        self.target = frame.target;
        self.up = frame.up;
    }
}

impl Transformable for MarkerInstance {
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

    fn scaling(&self) -> Vec3 {
        Vec3::splat(self.scale)
    }

    fn set_scaling(&mut self, scaling: Vec3) {
        self.scale = scaling.max_element();
    }
}

/// Maps scene light indices to light marker indices.
///
/// Only point lights get markers, so the two index spaces differ as soon as
/// the scene holds a directional light.
#[derive(Debug, Clone, Default)]
pub struct LightIndexMap {
    editor_to_scene: Vec<usize>,
    scene_to_editor: HashMap<usize, usize>,
}

impl LightIndexMap {
    /// Recompute from the scene's light list
    pub fn rebuild(&mut self, scene: &Scene) {
        self.editor_to_scene.clear();
        self.scene_to_editor.clear();
        for (scene_index, (_, light)) in scene.lights().enumerate() {
            if light.is_point() {
                self.scene_to_editor.insert(scene_index, self.editor_to_scene.len());
                self.editor_to_scene.push(scene_index);
            }
        }
    }

    /// Marker index of a scene light
    pub fn scene_to_editor(&self, scene_index: usize) -> Option<usize> {
        self.scene_to_editor.get(&scene_index).copied()
    }

    /// Scene light index of a marker
    pub fn editor_to_scene(&self, marker_index: usize) -> Option<usize> {
        self.editor_to_scene.get(marker_index).copied()
    }

    /// Number of mapped lights
    pub fn len(&self) -> usize {
        self.editor_to_scene.len()
    }

    /// True if no point light is mapped
    pub fn is_empty(&self) -> bool {
        self.editor_to_scene.is_empty()
    }
}

/// All markers of the editor scene
#[derive(Debug, Clone)]
pub struct MarkerSet {
    next_id: u64,
    scales: MarkerScales,
    cameras: Vec<MarkerInstance>,
    lights: Vec<MarkerInstance>,
    keyframes: Vec<MarkerInstance>,
    light_map: LightIndexMap,
}

impl MarkerSet {
    /// Create an empty set
    pub fn new(scales: MarkerScales) -> Self {
        Self {
            next_id: 1,
            scales,
            cameras: Vec::new(),
            lights: Vec::new(),
            keyframes: Vec::new(),
            light_map: LightIndexMap::default(),
        }
    }

    /// Create markers for every camera and point light of a scene
    pub fn from_scene(scene: &Scene, scales: MarkerScales) -> Self {
        let mut markers = Self::new(scales);
        for (id, camera) in scene.cameras() {
            markers.add_camera_marker(id, camera);
        }
        for (id, light) in scene.lights() {
            if let Light::Point(point) = light {
                markers.add_light_marker(id, point.position);
            }
        }
        markers.rebuild_light_map(scene);
        markers
    }

    fn make(&mut self, kind: MarkerKind, frame: Frame, scale: f32) -> MarkerInstance {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        MarkerInstance {
            id,
            kind,
            position: frame.position,
            target: frame.target,
            up: frame.up,
            scale,
        }
    }

    // ----------------------------------------------------------------
    // Cameras

    /// Append a marker for a camera
    pub fn add_camera_marker(&mut self, camera_id: CameraId, camera: &Camera) -> MarkerId {
        let marker = self.make(MarkerKind::Camera(camera_id), camera.frame(), self.scales.camera);
        let id = marker.id;
        self.cameras.push(marker);
        id
    }

    /// Remove the marker of the camera at `index`
    pub fn remove_camera_marker(&mut self, index: usize) -> Option<MarkerInstance> {
        (index < self.cameras.len()).then(|| self.cameras.remove(index))
    }

    /// Camera marker by camera index
    pub fn camera_marker(&self, index: usize) -> Option<&MarkerInstance> {
        self.cameras.get(index)
    }

    /// Copy a camera's pose onto its marker
    pub fn update_camera_marker(&mut self, index: usize, camera: &Camera) {
        if let Some(marker) = self.cameras.get_mut(index) {
            marker.set_frame(camera.frame());
        }
    }

    /// Number of camera markers
    pub fn camera_marker_count(&self) -> usize {
        self.cameras.len()
    }

    // ----------------------------------------------------------------
    // Lights

    /// Append a marker for a point light
    pub fn add_light_marker(&mut self, light_id: LightId, position: Vec3) -> MarkerId {
        let frame = Frame::new(position, position + Vec3::Z, Vec3::Y);
        let marker = self.make(MarkerKind::Light(light_id), frame, self.scales.light);
        let id = marker.id;
        self.lights.push(marker);
        id
    }

    /// Remove the light marker at `index`
    pub fn remove_light_marker(&mut self, index: usize) -> Option<MarkerInstance> {
        (index < self.lights.len()).then(|| self.lights.remove(index))
    }

    /// Light marker by marker index
    pub fn light_marker(&self, index: usize) -> Option<&MarkerInstance> {
        self.lights.get(index)
    }

    /// Move a light marker
    pub fn set_light_marker_position(&mut self, index: usize, position: Vec3) {
        if let Some(marker) = self.lights.get_mut(index) {
            marker.set_translation(position);
        }
    }

    /// Number of light markers
    pub fn light_marker_count(&self) -> usize {
        self.lights.len()
    }

    /// Recompute the scene light to marker mapping
    pub fn rebuild_light_map(&mut self, scene: &Scene) {
        self.light_map.rebuild(scene);
    }

    /// Scene light to marker mapping
    pub fn light_map(&self) -> &LightIndexMap {
        &self.light_map
    }

    // ----------------------------------------------------------------
    // Keyframes

    /// Replace keyframe markers with one per keyframe of `path`
    pub fn spawn_keyframe_markers(&mut self, path: &ObjectPath) {
        self.keyframes.clear();
        for (index, keyframe) in path.keyframes().iter().enumerate() {
            let marker = self.make(MarkerKind::Keyframe(index), keyframe.frame(), self.scales.keyframe);
            self.keyframes.push(marker);
        }
    }

    /// Remove all keyframe markers
    pub fn clear_keyframe_markers(&mut self) {
        self.keyframes.clear();
    }

    /// Keyframe marker by keyframe index
    pub fn keyframe_marker(&self, index: usize) -> Option<&MarkerInstance> {
        self.keyframes.get(index)
    }

    /// Mutable keyframe marker by keyframe index
    pub fn keyframe_marker_mut(&mut self, index: usize) -> Option<&mut MarkerInstance> {
        self.keyframes.get_mut(index)
    }

    /// Number of keyframe markers
    pub fn keyframe_marker_count(&self) -> usize {
        self.keyframes.len()
    }

    // ----------------------------------------------------------------
    // Lookup

    /// Marker by id
    pub fn get(&self, id: MarkerId) -> Option<&MarkerInstance> {
        self.iter().find(|marker| marker.id == id)
    }

    /// Position of a marker within its own kind's list
    pub fn index_of(&self, id: MarkerId) -> Option<usize> {
        [&self.cameras, &self.lights, &self.keyframes]
            .into_iter()
            .find_map(|list| list.iter().position(|marker| marker.id == id))
    }

    /// All markers: cameras, then lights, then keyframes
    pub fn iter(&self) -> impl Iterator<Item = &MarkerInstance> {
        self.cameras
            .iter()
            .chain(self.lights.iter())
            .chain(self.keyframes.iter())
    }

    /// Total number of markers
    pub fn len(&self) -> usize {
        self.cameras.len() + self.lights.len() + self.keyframes.len()
    }

    /// True if there are no markers
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy camera poses and point light positions onto their markers
    pub fn sync_from_scene(&mut self, scene: &Scene) {
        for (marker, (_, camera)) in self.cameras.iter_mut().zip(scene.cameras()) {
            marker.set_frame(camera.frame());
        }
        for (index, marker) in self.lights.iter_mut().enumerate() {
            let position = self
                .light_map
                .editor_to_scene(index)
                .and_then(|scene_index| scene.light(scene_index))
                .and_then(|(_, light)| light.as_point())
                .map(|point| point.position);
            if let Some(position) = position {
                marker.set_translation(position);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{DirectionalLight, PointLight};

    #[test]
    fn test_light_map_skips_directional_lights() {
        let mut scene = Scene::new();
        scene.add_light(Light::Point(PointLight::new("a", Vec3::ZERO)));
        scene.add_light(Light::Directional(DirectionalLight::new("sun", Vec3::NEG_Y)));
        scene.add_light(Light::Point(PointLight::new("b", Vec3::ONE)));

        let markers = MarkerSet::from_scene(&scene, MarkerScales::default());
        let map = markers.light_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map.scene_to_editor(2), Some(1));
        assert_eq!(map.scene_to_editor(1), None);
        assert_eq!(map.editor_to_scene(1), Some(2));
        assert_eq!(markers.light_marker_count(), 2);
    }

    #[test]
    fn test_from_scene_creates_camera_markers() {
        let mut scene = Scene::new();
        scene.add_camera(Camera::new("Second").looking_at(Vec3::X, Vec3::ZERO, Vec3::Y));
        let markers = MarkerSet::from_scene(&scene, MarkerScales::default());
        assert_eq!(markers.camera_marker_count(), 2);
        let marker = markers.camera_marker(1).unwrap();
        assert_eq!(marker.position, Vec3::X);
        assert_eq!(marker.scale, 0.5);
        assert!(matches!(marker.kind, MarkerKind::Camera(_)));
    }

    #[test]
    fn test_keyframe_markers_follow_path() {
        let mut path = ObjectPath::new("P");
        path.add_keyframe(0.0, Vec3::ZERO, Vec3::Z, Vec3::Y);
        path.add_keyframe(1.0, Vec3::X, Vec3::Z, Vec3::Y);

        let mut markers = MarkerSet::new(MarkerScales::default());
        markers.spawn_keyframe_markers(&path);
        assert_eq!(markers.keyframe_marker_count(), 2);
        let second = markers.keyframe_marker(1).unwrap();
        assert_eq!(second.kind, MarkerKind::Keyframe(1));
        assert_eq!(second.position, Vec3::X);
        assert_eq!(markers.index_of(second.id), Some(1));

        markers.clear_keyframe_markers();
        assert!(markers.is_empty());
    }

    #[test]
    fn test_marker_ids_are_unique() {
        let scene = Scene::new();
        let mut markers = MarkerSet::from_scene(&scene, MarkerScales::default());
        let first = markers.camera_marker(0).unwrap().id;
        markers.remove_camera_marker(0);
        let (id, camera) = scene.camera(0).unwrap();
        let second = markers.add_camera_marker(id, camera);
        assert_ne!(first, second);
        assert!(markers.get(second).is_some());
        assert!(markers.get(first).is_none());
    }

    #[test]
    fn test_sync_copies_scene_positions() {
        let mut scene = Scene::new();
        scene.add_light(Light::Point(PointLight::new("a", Vec3::ZERO)));
        let mut markers = MarkerSet::from_scene(&scene, MarkerScales::default());

        if let Some(light) = scene.light_mut(0).and_then(Light::as_point_mut) {
            light.position = Vec3::new(3.0, 1.0, 0.0);
        }
        if let Some(camera) = scene.active_camera_mut() {
            camera.position = Vec3::new(0.0, 5.0, 0.0);
        }
        markers.sync_from_scene(&scene);
        assert_eq!(markers.light_marker(0).unwrap().position, Vec3::new(3.0, 1.0, 0.0));
        assert_eq!(markers.camera_marker(0).unwrap().position, Vec3::new(0.0, 5.0, 0.0));
    }
}
