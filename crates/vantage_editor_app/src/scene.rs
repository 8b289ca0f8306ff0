// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene data: models and their instances, cameras, lights, materials and
//! paths.
//!
//! Every collection is an `IndexMap` keyed by a stable id, so objects can be
//! addressed either by id or by their position in the list (which is what
//! the panels show). Ids are never reused within a scene.

use crate::camera::{look_rotation, Camera};
use crate::loader::ModelAsset;
use crate::material::Material;
use glam::{EulerRot, Quat, Vec3};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};
use vantage_editor_paths::{AttachmentRegistry, Frame, ObjectPath, PathId};

macro_rules! stable_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw value
            pub const fn value(&self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

stable_id!(
    /// Identifier of a model
    ModelId,
    "model"
);
stable_id!(
    /// Identifier of a model instance
    InstanceId,
    "instance"
);
stable_id!(
    /// Identifier of a camera
    CameraId,
    "camera"
);
stable_id!(
    /// Identifier of a light
    LightId,
    "light"
);
stable_id!(
    /// Identifier of a material
    MaterialId,
    "material"
);

/// Handle of an object that can follow a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectRef {
    /// A model instance
    ModelInstance(InstanceId),
    /// A camera
    Camera(CameraId),
    /// A light
    Light(LightId),
}

/// Objects that can be placed with a look-at pose
pub trait Movable {
    /// Move to `position`, facing `target` with `up` as the up vector
    fn move_to(&mut self, position: Vec3, target: Vec3, up: Vec3);
}

/// One placement of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInstance {
    /// Display name
    pub name: String,
    /// World position
    pub translation: Vec3,
    /// World rotation
    pub rotation: Quat,
    /// Per-axis scale
    pub scaling: Vec3,
    /// Whether the instance is drawn
    pub visible: bool,
}

impl ModelInstance {
    /// Instance at the canonical pose
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scaling: Vec3::ONE,
            visible: true,
        }
    }

    /// Rotation as XYZ euler angles in radians
    pub fn euler_rotation(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    /// Set the rotation from XYZ euler angles in radians
    pub fn set_euler_rotation(&mut self, angles: Vec3) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z);
    }

    /// Pose expressed as position / target / up
    pub fn frame(&self) -> Frame {
        Frame::new(
            self.translation,
            self.translation + self.rotation * Vec3::Z,
            self.rotation * Vec3::Y,
        )
    }

    /// Reset position and orientation to the canonical pose
    pub fn reset_pose(&mut self) {
        let canonical = Frame::CANONICAL;
        self.move_to(canonical.position, canonical.target, canonical.up);
    }
}

impl Movable for ModelInstance {
    fn move_to(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        self.translation = position;
        self.rotation = look_rotation(target - position, up);
    }
}

impl Movable for Camera {
    fn move_to(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        self.position = position;
        self.target = target;
        self.up = up;
    }
}

/// A loaded model and its instances
#[derive(Debug, Clone)]
pub struct Model {
    /// Display name
    pub name: String,
    /// File the model was loaded from
    pub source: Option<PathBuf>,
    /// Radius of a sphere around the origin enclosing the mesh
    pub bounding_radius: f32,
    instances: IndexMap<InstanceId, ModelInstance>,
}

impl Model {
    /// Number of instances
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Instance by index
    pub fn instance(&self, index: usize) -> Option<(InstanceId, &ModelInstance)> {
        self.instances.get_index(index).map(|(&id, inst)| (id, inst))
    }

    /// Mutable instance by index
    pub fn instance_mut(&mut self, index: usize) -> Option<(InstanceId, &mut ModelInstance)> {
        self.instances.get_index_mut(index).map(|(&id, inst)| (id, inst))
    }

    /// Iterate over instances in order
    pub fn instances(&self) -> impl Iterator<Item = (InstanceId, &ModelInstance)> {
        self.instances.iter().map(|(&id, inst)| (id, inst))
    }

    /// Position of an instance in this model
    pub fn instance_index(&self, id: InstanceId) -> Option<usize> {
        self.instances.get_index_of(&id)
    }
}

/// Point light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    /// Display name
    pub name: String,
    /// World position
    pub position: Vec3,
    /// Light color
    pub color: Vec3,
    /// Scalar intensity
    pub intensity: f32,
}

impl PointLight {
    /// White light at `position`
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }
}

impl Movable for PointLight {
    fn move_to(&mut self, position: Vec3, _target: Vec3, _up: Vec3) {
        self.position = position;
    }
}

/// Directional light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    /// Display name
    pub name: String,
    /// Direction the light travels in
    pub direction: Vec3,
    /// Light color
    pub color: Vec3,
    /// Scalar intensity
    pub intensity: f32,
}

impl DirectionalLight {
    /// White light shining along `direction`
    pub fn new(name: impl Into<String>, direction: Vec3) -> Self {
        Self {
            name: name.into(),
            direction: direction.normalize_or_zero(),
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }
}

impl Movable for DirectionalLight {
    fn move_to(&mut self, position: Vec3, target: Vec3, _up: Vec3) {
        let direction = (target - position).normalize_or_zero();
        if direction != Vec3::ZERO {
            self.direction = direction;
        }
    }
}

/// A scene light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Light {
    /// Point light
    Point(PointLight),
    /// Directional light
    Directional(DirectionalLight),
}

impl Light {
    /// Display name
    pub fn name(&self) -> &str {
        match self {
            Self::Point(light) => &light.name,
            Self::Directional(light) => &light.name,
        }
    }

    /// Rename the light
    pub fn set_name(&mut self, name: impl Into<String>) {
        match self {
            Self::Point(light) => light.name = name.into(),
            Self::Directional(light) => light.name = name.into(),
        }
    }

    /// Type label for panels
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point Light",
            Self::Directional(_) => "Directional Light",
        }
    }

    /// True for point lights
    pub fn is_point(&self) -> bool {
        matches!(self, Self::Point(_))
    }

    /// Point light data, if this is one
    pub fn as_point(&self) -> Option<&PointLight> {
        match self {
            Self::Point(light) => Some(light),
            Self::Directional(_) => None,
        }
    }

    /// Mutable point light data, if this is one
    pub fn as_point_mut(&mut self) -> Option<&mut PointLight> {
        match self {
            Self::Point(light) => Some(light),
            Self::Directional(_) => None,
        }
    }

    fn as_movable_mut(&mut self) -> &mut dyn Movable {
        match self {
            Self::Point(light) => light,
            Self::Directional(light) => light,
        }
    }
}

/// The edited scene
#[derive(Debug, Clone)]
pub struct Scene {
    next_id: u64,
    models: IndexMap<ModelId, Model>,
    cameras: IndexMap<CameraId, Camera>,
    lights: IndexMap<LightId, Light>,
    materials: IndexMap<MaterialId, Material>,
    paths: IndexMap<PathId, ObjectPath>,
    active_camera: usize,
    /// Which objects follow which path
    pub attachments: AttachmentRegistry<ObjectRef>,
    /// Ambient light color
    pub ambient_intensity: Vec3,
    /// Free-fly speed of the active camera
    pub camera_speed: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene holding a single default camera
    pub fn new() -> Self {
        let mut scene = Self::empty();
        scene.add_camera(Camera::default());
        scene
    }

    /// Create a scene without any camera. Callers must add one before
    /// handing the scene to the editor.
    pub fn empty() -> Self {
        Self {
            next_id: 1,
            models: IndexMap::new(),
            cameras: IndexMap::new(),
            lights: IndexMap::new(),
            materials: IndexMap::new(),
            paths: IndexMap::new(),
            active_camera: 0,
            attachments: AttachmentRegistry::new(),
            ambient_intensity: Vec3::splat(0.1),
            camera_speed: 1.0,
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ----------------------------------------------------------------
    // Models

    /// Add a model with one instance at the canonical pose
    pub fn add_model(&mut self, asset: ModelAsset) -> (ModelId, InstanceId) {
        let model_id = ModelId(self.allocate_id());
        let instance_id = InstanceId(self.allocate_id());
        let mut instances = IndexMap::new();
        instances.insert(instance_id, ModelInstance::new(format!("{}_0", asset.name)));
        info!("Added model '{}'", asset.name);
        self.models.insert(
            model_id,
            Model {
                name: asset.name,
                source: asset.source,
                bounding_radius: asset.bounding_radius,
                instances,
            },
        );
        (model_id, instance_id)
    }

    /// Remove a model and all of its instances
    pub fn delete_model(&mut self, index: usize) -> Option<Model> {
        let (_, model) = self.models.shift_remove_index(index)?;
        for &id in model.instances.keys() {
            self.attachments.detach(ObjectRef::ModelInstance(id));
        }
        info!("Deleted model '{}'", model.name);
        Some(model)
    }

    /// Number of models
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Model by index
    pub fn model(&self, index: usize) -> Option<(ModelId, &Model)> {
        self.models.get_index(index).map(|(&id, model)| (id, model))
    }

    /// Mutable model by index
    pub fn model_mut(&mut self, index: usize) -> Option<&mut Model> {
        self.models.get_index_mut(index).map(|(_, model)| model)
    }

    /// Iterate over models in order
    pub fn models(&self) -> impl Iterator<Item = (ModelId, &Model)> {
        self.models.iter().map(|(&id, model)| (id, model))
    }

    /// Add an instance to a model
    pub fn add_model_instance(&mut self, model_index: usize, instance: ModelInstance) -> Option<InstanceId> {
        if model_index >= self.models.len() {
            return None;
        }
        let id = InstanceId(self.allocate_id());
        let (_, model) = self.models.get_index_mut(model_index)?;
        debug!("Added instance '{}' to '{}'", instance.name, model.name);
        model.instances.insert(id, instance);
        Some(id)
    }

    /// Remove an instance from a model. The model itself is kept even when
    /// it has no instances left.
    pub fn delete_model_instance(&mut self, model_index: usize, instance_index: usize) -> Option<ModelInstance> {
        let (_, model) = self.models.get_index_mut(model_index)?;
        let (id, instance) = model.instances.shift_remove_index(instance_index)?;
        self.attachments.detach(ObjectRef::ModelInstance(id));
        Some(instance)
    }

    /// Locate an instance as (model index, instance index)
    pub fn find_instance(&self, id: InstanceId) -> Option<(usize, usize)> {
        self.models
            .values()
            .enumerate()
            .find_map(|(model_index, model)| model.instance_index(id).map(|i| (model_index, i)))
    }

    /// Instance by id
    pub fn instance(&self, id: InstanceId) -> Option<&ModelInstance> {
        self.models.values().find_map(|model| model.instances.get(&id))
    }

    /// Mutable instance by id
    pub fn instance_mut(&mut self, id: InstanceId) -> Option<&mut ModelInstance> {
        self.models.values_mut().find_map(|model| model.instances.get_mut(&id))
    }

    /// Model owning an instance
    pub fn model_of(&self, id: InstanceId) -> Option<&Model> {
        self.models.values().find(|model| model.instances.contains_key(&id))
    }

    // ----------------------------------------------------------------
    // Cameras

    /// Add a camera
    pub fn add_camera(&mut self, camera: Camera) -> CameraId {
        let id = CameraId(self.allocate_id());
        debug!("Added camera '{}'", camera.name);
        self.cameras.insert(id, camera);
        id
    }

    /// Remove a camera. The active camera index stays in range.
    pub fn delete_camera(&mut self, index: usize) -> Option<Camera> {
        let (id, camera) = self.cameras.shift_remove_index(index)?;
        self.attachments.detach(ObjectRef::Camera(id));
        if self.active_camera > index || self.active_camera >= self.cameras.len() {
            self.active_camera = self.active_camera.saturating_sub(1);
        }
        Some(camera)
    }

    /// Number of cameras
    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    /// Camera by index
    pub fn camera(&self, index: usize) -> Option<(CameraId, &Camera)> {
        self.cameras.get_index(index).map(|(&id, camera)| (id, camera))
    }

    /// Mutable camera by index
    pub fn camera_mut(&mut self, index: usize) -> Option<&mut Camera> {
        self.cameras.get_index_mut(index).map(|(_, camera)| camera)
    }

    /// Iterate over cameras in order
    pub fn cameras(&self) -> impl Iterator<Item = (CameraId, &Camera)> {
        self.cameras.iter().map(|(&id, camera)| (id, camera))
    }

    /// Position of a camera in the list
    pub fn camera_index(&self, id: CameraId) -> Option<usize> {
        self.cameras.get_index_of(&id)
    }

    /// Index of the active camera
    pub fn active_camera_index(&self) -> usize {
        self.active_camera
    }

    /// Make the camera at `index` active
    pub fn set_active_camera(&mut self, index: usize) -> bool {
        if index < self.cameras.len() {
            self.active_camera = index;
            true
        } else {
            false
        }
    }

    /// The active camera
    pub fn active_camera(&self) -> Option<(CameraId, &Camera)> {
        self.camera(self.active_camera)
    }

    /// The active camera, mutably
    pub fn active_camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera_mut(self.active_camera)
    }

    // ----------------------------------------------------------------
    // Lights

    /// Add a light
    pub fn add_light(&mut self, light: Light) -> LightId {
        let id = LightId(self.allocate_id());
        debug!("Added {} '{}'", light.type_name(), light.name());
        self.lights.insert(id, light);
        id
    }

    /// Remove a light
    pub fn delete_light(&mut self, index: usize) -> Option<Light> {
        let (id, light) = self.lights.shift_remove_index(index)?;
        self.attachments.detach(ObjectRef::Light(id));
        Some(light)
    }

    /// Number of lights
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Light by index
    pub fn light(&self, index: usize) -> Option<(LightId, &Light)> {
        self.lights.get_index(index).map(|(&id, light)| (id, light))
    }

    /// Mutable light by index
    pub fn light_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.lights.get_index_mut(index).map(|(_, light)| light)
    }

    /// Light by id
    pub fn light_by_id(&self, id: LightId) -> Option<&Light> {
        self.lights.get(&id)
    }

    /// Position of a light in the list
    pub fn light_index(&self, id: LightId) -> Option<usize> {
        self.lights.get_index_of(&id)
    }

    /// Iterate over lights in order
    pub fn lights(&self) -> impl Iterator<Item = (LightId, &Light)> {
        self.lights.iter().map(|(&id, light)| (id, light))
    }

    // ----------------------------------------------------------------
    // Materials

    /// Add a material
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.allocate_id());
        debug!("Added material '{}'", material.name);
        self.materials.insert(id, material);
        id
    }

    /// Remove a material
    pub fn delete_material(&mut self, index: usize) -> Option<Material> {
        self.materials.shift_remove_index(index).map(|(_, material)| material)
    }

    /// Number of materials
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Material by index
    pub fn material(&self, index: usize) -> Option<(MaterialId, &Material)> {
        self.materials.get_index(index).map(|(&id, material)| (id, material))
    }

    /// Mutable material by index
    pub fn material_mut(&mut self, index: usize) -> Option<&mut Material> {
        self.materials.get_index_mut(index).map(|(_, material)| material)
    }

    /// Position of a material in the list
    pub fn material_index(&self, id: MaterialId) -> Option<usize> {
        self.materials.get_index_of(&id)
    }

    /// Iterate over materials in order
    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials.iter().map(|(&id, material)| (id, material))
    }

    // ----------------------------------------------------------------
    // Paths

    /// Add an empty path
    pub fn add_path(&mut self, path: ObjectPath) -> PathId {
        let id = PathId::new(self.allocate_id());
        info!("Added path '{}'", path.name());
        self.paths.insert(id, path);
        id
    }

    /// Remove a path, detaching everything that followed it
    pub fn delete_path(&mut self, index: usize) -> Option<(PathId, ObjectPath)> {
        let (id, path) = self.paths.shift_remove_index(index)?;
        let detached = self.attachments.detach_all(id);
        info!("Deleted path '{}' ({} objects detached)", path.name(), detached.len());
        Some((id, path))
    }

    /// Number of paths
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Path by index
    pub fn path(&self, index: usize) -> Option<(PathId, &ObjectPath)> {
        self.paths.get_index(index).map(|(&id, path)| (id, path))
    }

    /// Path by id
    pub fn path_by_id(&self, id: PathId) -> Option<&ObjectPath> {
        self.paths.get(&id)
    }

    /// Mutable path by id
    pub fn path_mut(&mut self, id: PathId) -> Option<&mut ObjectPath> {
        self.paths.get_mut(&id)
    }

    /// Position of a path in the list
    pub fn path_index(&self, id: PathId) -> Option<usize> {
        self.paths.get_index_of(&id)
    }

    /// Iterate over paths in order
    pub fn paths(&self) -> impl Iterator<Item = (PathId, &ObjectPath)> {
        self.paths.iter().map(|(&id, path)| (id, path))
    }

    // ----------------------------------------------------------------
    // Movable objects

    /// Whether the referenced object exists
    pub fn contains(&self, object: ObjectRef) -> bool {
        match object {
            ObjectRef::ModelInstance(id) => self.instance(id).is_some(),
            ObjectRef::Camera(id) => self.cameras.contains_key(&id),
            ObjectRef::Light(id) => self.lights.contains_key(&id),
        }
    }

    /// Mutable access to any movable object
    pub fn movable_mut(&mut self, object: ObjectRef) -> Option<&mut dyn Movable> {
        match object {
            ObjectRef::ModelInstance(id) => self.instance_mut(id).map(|inst| inst as &mut dyn Movable),
            ObjectRef::Camera(id) => self.cameras.get_mut(&id).map(|cam| cam as &mut dyn Movable),
            ObjectRef::Light(id) => self.lights.get_mut(&id).map(Light::as_movable_mut),
        }
    }

    /// Display name of an object
    pub fn object_name(&self, object: ObjectRef) -> Option<&str> {
        match object {
            ObjectRef::ModelInstance(id) => self.instance(id).map(|inst| inst.name.as_str()),
            ObjectRef::Camera(id) => self.cameras.get(&id).map(|cam| cam.name.as_str()),
            ObjectRef::Light(id) => self.lights.get(&id).map(Light::name),
        }
    }

    /// Move every attached object to its path's pose at `time`
    pub fn animate_paths(&mut self, time: f32) -> usize {
        let moves: Vec<(ObjectRef, Frame)> = self
            .attachments
            .iter()
            .filter_map(|(object, path)| {
                let frame = self.paths.get(&path)?.frame_at_time(time)?;
                Some((object, frame))
            })
            .collect();

        let mut moved = 0;
        for (object, frame) in moves {
            if let Some(movable) = self.movable_mut(object) {
                movable.move_to(frame.position, frame.target, frame.up);
                moved += 1;
            }
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str) -> ModelAsset {
        ModelAsset::new(name, 1.0)
    }

    #[test]
    fn test_new_scene_has_camera() {
        let scene = Scene::new();
        assert_eq!(scene.camera_count(), 1);
        assert_eq!(scene.active_camera_index(), 0);
        assert!(Scene::empty().active_camera().is_none());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut scene = Scene::new();
        let (first, _) = scene.add_model(asset("a"));
        scene.delete_model(0);
        let (second, _) = scene.add_model(asset("a"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_instances() {
        let mut scene = Scene::new();
        let (_, first) = scene.add_model(asset("crate"));
        let second = scene.add_model_instance(0, ModelInstance::new("crate_1")).unwrap();

        assert_eq!(scene.find_instance(second), Some((0, 1)));
        assert_eq!(scene.model_of(first).map(|m| m.name.as_str()), Some("crate"));
        assert!(scene.add_model_instance(3, ModelInstance::new("x")).is_none());

        scene.delete_model_instance(0, 0);
        assert_eq!(scene.find_instance(second), Some((0, 0)));
        assert!(scene.instance(first).is_none());
    }

    #[test]
    fn test_delete_camera_keeps_active_in_range() {
        let mut scene = Scene::new();
        scene.add_camera(Camera::new("Second"));
        scene.add_camera(Camera::new("Third"));
        scene.set_active_camera(2);

        scene.delete_camera(2);
        assert_eq!(scene.active_camera_index(), 1);
        scene.delete_camera(0);
        assert_eq!(scene.active_camera_index(), 0);
        assert_eq!(scene.active_camera().unwrap().1.name, "Second");
    }

    #[test]
    fn test_movable_instance_canonical_pose() {
        let mut instance = ModelInstance::new("i");
        instance.move_to(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 2.0, 3.0), Vec3::Y);
        assert!((instance.rotation * Vec3::Z).abs_diff_eq(Vec3::X, 1e-6));

        instance.reset_pose();
        assert_eq!(instance.translation, Vec3::ZERO);
        assert!(instance.frame().abs_diff_eq(&Frame::CANONICAL, 1e-6));
    }

    #[test]
    fn test_euler_round_trip() {
        let mut instance = ModelInstance::new("i");
        let angles = Vec3::new(0.3, -0.2, 1.1);
        instance.set_euler_rotation(angles);
        assert!(instance.euler_rotation().abs_diff_eq(angles, 1e-5));
    }

    #[test]
    fn test_animate_paths_moves_attached_objects() {
        let mut scene = Scene::new();
        let mut path = ObjectPath::new("Dolly");
        path.add_keyframe(0.0, Vec3::ZERO, Vec3::Z, Vec3::Y);
        path.add_keyframe(2.0, Vec3::new(4.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 1.0), Vec3::Y);
        let path_id = scene.add_path(path);

        let camera = scene.camera(0).unwrap().0;
        let light = scene.add_light(Light::Point(PointLight::new("Lamp", Vec3::ONE)));
        scene.attachments.attach(ObjectRef::Camera(camera), path_id).unwrap();
        scene.attachments.attach(ObjectRef::Light(light), path_id).unwrap();

        assert_eq!(scene.animate_paths(1.0), 2);
        let camera = scene.active_camera().unwrap().1;
        assert!(camera.position.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
        let lamp = scene.light(0).unwrap().1.as_point().unwrap();
        assert!(lamp.position.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_delete_path_detaches() {
        let mut scene = Scene::new();
        let path_id = scene.add_path(ObjectPath::new("P"));
        let camera = scene.camera(0).unwrap().0;
        scene.attachments.attach(ObjectRef::Camera(camera), path_id).unwrap();

        let (removed, _) = scene.delete_path(0).unwrap();
        assert_eq!(removed, path_id);
        assert!(scene.attachments.is_empty());
    }
}
