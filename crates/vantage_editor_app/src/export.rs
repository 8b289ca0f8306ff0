// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene persistence.
//!
//! Scenes are written as `.fscene` JSON documents. Ids are session-local, so
//! the document refers to objects by their position in each list and ids are
//! issued anew on import.

use crate::camera::Camera;
use crate::loader::ModelAsset;
use crate::material::Material;
use crate::scene::{DirectionalLight, Light, ModelInstance, ObjectRef, PointLight, Scene};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use vantage_editor_paths::{InterpolationMode, Keyframe, ObjectPath};

/// Scene document version written by this editor
pub const SCENE_FORMAT_VERSION: u32 = 1;

/// Errors that can occur while exporting or importing a scene
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document refers to an object that does not exist
    #[error("Unknown reference: {0}")]
    UnknownReference(String),

    /// Written by a newer editor
    #[error("Scene version {0} is not supported")]
    UnsupportedVersion(u32),
}

/// Writes scenes to files
pub trait SceneExporter {
    /// Serialize `scene` to `path`
    fn export_scene(&self, path: &Path, scene: &Scene) -> Result<(), ExportError>;
}

/// On-disk scene document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Format version
    pub version: u32,
    /// Ambient light color
    pub ambient_intensity: Vec3,
    /// Camera speed
    pub camera_speed: f32,
    /// Index of the active camera
    pub active_camera: usize,
    /// Models
    #[serde(default)]
    pub models: Vec<ModelEntry>,
    /// Cameras
    #[serde(default)]
    pub cameras: Vec<CameraEntry>,
    /// Lights
    #[serde(default)]
    pub lights: Vec<LightEntry>,
    /// Materials
    #[serde(default)]
    pub materials: Vec<Material>,
    /// Paths
    #[serde(default)]
    pub paths: Vec<PathEntry>,
}

/// A model and its instances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Display name
    pub name: String,
    /// Source file
    pub file: Option<PathBuf>,
    /// Bounding radius
    pub bounding_radius: f32,
    /// Instances
    pub instances: Vec<InstanceEntry>,
}

/// A model instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceEntry {
    /// Display name
    pub name: String,
    /// Position
    pub translation: Vec3,
    /// XYZ euler angles in degrees
    pub rotation: Vec3,
    /// Per-axis scale
    pub scaling: Vec3,
    /// Whether the instance is drawn
    pub visible: bool,
}

/// A camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraEntry {
    /// Display name
    pub name: String,
    /// Eye position
    pub position: Vec3,
    /// Look-at point
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    /// Aspect ratio
    pub aspect_ratio: f32,
    /// Near clip distance
    pub near_z: f32,
    /// Far clip distance
    pub far_z: f32,
}

/// A light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LightEntry {
    /// Point light
    Point {
        /// Display name
        name: String,
        /// Position
        position: Vec3,
        /// Color
        color: Vec3,
        /// Intensity
        intensity: f32,
    },
    /// Directional light
    Directional {
        /// Display name
        name: String,
        /// Direction
        direction: Vec3,
        /// Color
        color: Vec3,
        /// Intensity
        intensity: f32,
    },
}

/// Reference to a movable object by list position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ObjectEntry {
    /// Instance `instance` of model `model`
    ModelInstance {
        /// Model index
        model: usize,
        /// Instance index within the model
        instance: usize,
    },
    /// Camera by index
    Camera {
        /// Camera index
        index: usize,
    },
    /// Light by index
    Light {
        /// Light index
        index: usize,
    },
}

/// A path and the objects following it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEntry {
    /// Display name
    pub name: String,
    /// Looping flag
    pub looping: bool,
    /// Interpolation mode
    #[serde(default)]
    pub interpolation: InterpolationMode,
    /// Keyframes in time order
    pub keyframes: Vec<Keyframe>,
    /// Objects attached to the path
    #[serde(default)]
    pub attached: Vec<ObjectEntry>,
}

impl SceneDocument {
    /// Capture a scene
    pub fn from_scene(scene: &Scene) -> Self {
        let models = scene
            .models()
            .map(|(_, model)| ModelEntry {
                name: model.name.clone(),
                file: model.source.clone(),
                bounding_radius: model.bounding_radius,
                instances: model
                    .instances()
                    .map(|(_, instance)| InstanceEntry {
                        name: instance.name.clone(),
                        translation: instance.translation,
                        rotation: instance.euler_rotation() * (180.0 / std::f32::consts::PI),
                        scaling: instance.scaling,
                        visible: instance.visible,
                    })
                    .collect(),
            })
            .collect();

        let cameras = scene
            .cameras()
            .map(|(_, camera)| CameraEntry {
                name: camera.name.clone(),
                position: camera.position,
                target: camera.target,
                up: camera.up,
                fov_y: camera.fov_y.to_degrees(),
                aspect_ratio: camera.aspect_ratio,
                near_z: camera.near_z,
                far_z: camera.far_z,
            })
            .collect();

        let lights = scene
            .lights()
            .map(|(_, light)| match light {
                Light::Point(point) => LightEntry::Point {
                    name: point.name.clone(),
                    position: point.position,
                    color: point.color,
                    intensity: point.intensity,
                },
                Light::Directional(dir) => LightEntry::Directional {
                    name: dir.name.clone(),
                    direction: dir.direction,
                    color: dir.color,
                    intensity: dir.intensity,
                },
            })
            .collect();

        let materials = scene.materials().map(|(_, material)| material.clone()).collect();

        let paths = scene
            .paths()
            .map(|(id, path)| PathEntry {
                name: path.name().to_string(),
                looping: path.is_looping(),
                interpolation: path.interpolation(),
                keyframes: path.keyframes().to_vec(),
                attached: scene
                    .attachments
                    .objects_on(id)
                    .into_iter()
                    .filter_map(|object| object_entry(scene, object))
                    .collect(),
            })
            .collect();

        Self {
            version: SCENE_FORMAT_VERSION,
            ambient_intensity: scene.ambient_intensity,
            camera_speed: scene.camera_speed,
            active_camera: scene.active_camera_index(),
            models,
            cameras,
            lights,
            materials,
            paths,
        }
    }

    /// Rebuild a scene, issuing fresh ids
    pub fn into_scene(self) -> Result<Scene, ExportError> {
        if self.version > SCENE_FORMAT_VERSION {
            return Err(ExportError::UnsupportedVersion(self.version));
        }

        let mut scene = Scene::empty();
        scene.ambient_intensity = self.ambient_intensity;
        scene.camera_speed = self.camera_speed;

        for (model_index, entry) in self.models.into_iter().enumerate() {
            let asset = ModelAsset {
                name: entry.name,
                source: entry.file,
                bounding_radius: entry.bounding_radius,
            };
            scene.add_model(asset);
            // `add_model` creates a first instance; the document lists all of them.
            scene.delete_model_instance(model_index, 0);
            for instance in entry.instances {
                let mut restored = ModelInstance::new(instance.name);
                restored.translation = instance.translation;
                restored.set_euler_rotation(instance.rotation * (std::f32::consts::PI / 180.0));
                restored.scaling = instance.scaling;
                restored.visible = instance.visible;
                scene.add_model_instance(model_index, restored);
            }
        }

        for entry in self.cameras {
            scene.add_camera(Camera {
                name: entry.name,
                position: entry.position,
                target: entry.target,
                up: entry.up,
                fov_y: entry.fov_y.to_radians(),
                aspect_ratio: entry.aspect_ratio,
                near_z: entry.near_z,
                far_z: entry.far_z,
            });
        }
        if scene.camera_count() == 0 {
            scene.add_camera(Camera::default());
        }
        scene.set_active_camera(self.active_camera.min(scene.camera_count() - 1));

        for entry in self.lights {
            let light = match entry {
                LightEntry::Point {
                    name,
                    position,
                    color,
                    intensity,
                } => Light::Point(PointLight {
                    name,
                    position,
                    color,
                    intensity,
                }),
                LightEntry::Directional {
                    name,
                    direction,
                    color,
                    intensity,
                } => Light::Directional(DirectionalLight {
                    name,
                    direction,
                    color,
                    intensity,
                }),
            };
            scene.add_light(light);
        }

        for material in self.materials {
            scene.add_material(material);
        }

        for entry in self.paths {
            let mut path = ObjectPath::new(entry.name);
            path.set_looping(entry.looping);
            path.set_interpolation(entry.interpolation);
            for keyframe in entry.keyframes {
                path.add_keyframe(keyframe.time, keyframe.position, keyframe.target, keyframe.up);
            }
            let path_id = scene.add_path(path);

            for attached in entry.attached {
                let object = resolve_object(&scene, attached)?;
                if let Err(err) = scene.attachments.attach(object, path_id) {
                    tracing::warn!("Skipping attachment in scene file: {err}");
                }
            }
        }

        Ok(scene)
    }
}

fn object_entry(scene: &Scene, object: ObjectRef) -> Option<ObjectEntry> {
    match object {
        ObjectRef::ModelInstance(id) => {
            let (model, instance) = scene.find_instance(id)?;
            Some(ObjectEntry::ModelInstance { model, instance })
        }
        ObjectRef::Camera(id) => scene.camera_index(id).map(|index| ObjectEntry::Camera { index }),
        ObjectRef::Light(id) => scene.light_index(id).map(|index| ObjectEntry::Light { index }),
    }
}

fn resolve_object(scene: &Scene, entry: ObjectEntry) -> Result<ObjectRef, ExportError> {
    let resolved = match entry {
        ObjectEntry::ModelInstance { model, instance } => scene
            .model(model)
            .and_then(|(_, m)| m.instance(instance))
            .map(|(id, _)| ObjectRef::ModelInstance(id)),
        ObjectEntry::Camera { index } => scene.camera(index).map(|(id, _)| ObjectRef::Camera(id)),
        ObjectEntry::Light { index } => scene.light(index).map(|(id, _)| ObjectRef::Light(id)),
    };
    resolved.ok_or_else(|| ExportError::UnknownReference(format!("{entry:?}")))
}

/// Reads and writes `.fscene` JSON files
#[derive(Debug, Clone, Copy)]
pub struct FsceneExporter {
    /// Indent the output
    pub pretty: bool,
}

impl Default for FsceneExporter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl FsceneExporter {
    /// Read a scene file
    pub fn import_scene(&self, path: &Path) -> Result<Scene, ExportError> {
        let content = std::fs::read_to_string(path)?;
        let document: SceneDocument = serde_json::from_str(&content)?;
        let scene = document.into_scene()?;
        tracing::info!("Loaded scene from {:?}", path);
        Ok(scene)
    }
}

impl SceneExporter for FsceneExporter {
    fn export_scene(&self, path: &Path, scene: &Scene) -> Result<(), ExportError> {
        let document = SceneDocument::from_scene(scene);
        let content = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        std::fs::write(path, content)?;
        tracing::info!("Saved scene to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{LayerType, MaterialLayer};
    use vantage_editor_paths::Frame;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        scene.ambient_intensity = Vec3::splat(0.3);
        let (_, first) = scene.add_model(ModelAsset::new("tree", 2.0));
        let mut second = ModelInstance::new("tree_1");
        second.translation = Vec3::new(4.0, 0.0, 1.0);
        second.set_euler_rotation(Vec3::new(0.0, 0.5, 0.0));
        scene.add_model_instance(0, second);

        scene.add_camera(Camera::new("Flyby").looking_at(Vec3::ONE, Vec3::ZERO, Vec3::Y));
        scene.set_active_camera(1);
        scene.add_light(Light::Directional(DirectionalLight::new("Sun", Vec3::NEG_Y)));
        let lamp = scene.add_light(Light::Point(PointLight::new("Lamp", Vec3::Y)));

        let mut path = ObjectPath::new("Orbit");
        path.set_looping(true);
        path.add_keyframe(0.0, Vec3::ZERO, Vec3::Z, Vec3::Y);
        path.add_keyframe(3.0, Vec3::X, Vec3::Z, Vec3::Y);
        let path_id = scene.add_path(path);
        scene.attachments.attach(ObjectRef::ModelInstance(first), path_id).unwrap();
        scene.attachments.attach(ObjectRef::Light(lamp), path_id).unwrap();
        scene
    }

    #[test]
    fn test_export_import_preserves_scene() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("demo.fscene");
        let scene = sample_scene();

        let exporter = FsceneExporter::default();
        exporter.export_scene(&file, &scene).unwrap();
        let restored = exporter.import_scene(&file).unwrap();

        assert_eq!(restored.model_count(), 1);
        let (_, model) = restored.model(0).unwrap();
        assert_eq!(model.instance_count(), 2);
        assert_eq!(model.bounding_radius, 2.0);
        let (_, second) = model.instance(1).unwrap();
        assert!(second.euler_rotation().abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), 1e-5));

        assert_eq!(restored.camera_count(), 2);
        assert_eq!(restored.active_camera_index(), 1);
        assert!((restored.camera(1).unwrap().1.fov_y - 60f32.to_radians()).abs() < 1e-5);
        assert_eq!(restored.light_count(), 2);
        assert!(restored.light(1).unwrap().1.is_point());

        let (path_id, path) = restored.path(0).unwrap();
        assert!(path.is_looping());
        assert_eq!(path.keyframe_count(), 2);
        let attached = restored.attachments.objects_on(path_id);
        assert_eq!(attached.len(), 2);
        let first_instance = model.instance(0).unwrap().0;
        assert_eq!(attached[0], ObjectRef::ModelInstance(first_instance));
        assert_eq!(attached[1], ObjectRef::Light(restored.light(1).unwrap().0));
    }

    #[test]
    fn test_materials_are_saved() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("materials.fscene");
        let mut scene = Scene::empty();
        let mut material = Material::new("Gold");
        material.id = 7;
        material.set_alpha_threshold(0.25);
        let mut layer = MaterialLayer::new(LayerType::Conductor);
        layer.set_conductor_ior(0.47, 2.83);
        material.add_layer(layer).unwrap();
        scene.add_material(material.clone());

        let exporter = FsceneExporter::default();
        exporter.export_scene(&file, &scene).unwrap();
        let restored = exporter.import_scene(&file).unwrap();

        assert_eq!(restored.material_count(), 1);
        assert_eq!(restored.material(0).unwrap().1, &material);
        assert_eq!(restored.camera_count(), 1);
    }

    #[test]
    fn test_document_without_materials_loads() {
        let mut value = serde_json::to_value(SceneDocument::from_scene(&Scene::new())).unwrap();
        value.as_object_mut().unwrap().remove("materials");
        let document: SceneDocument = serde_json::from_value(value).unwrap();
        assert!(document.materials.is_empty());
    }

    #[test]
    fn test_document_uses_indices() {
        let document = SceneDocument::from_scene(&sample_scene());
        assert_eq!(
            document.paths[0].attached,
            vec![
                ObjectEntry::ModelInstance { model: 0, instance: 0 },
                ObjectEntry::Light { index: 1 }
            ]
        );
        let json = serde_json::to_string(&document.lights[0]).unwrap();
        assert!(json.contains("\"type\":\"Directional\""));
    }

    #[test]
    fn test_unknown_reference_fails() {
        let mut document = SceneDocument::from_scene(&sample_scene());
        document.paths[0].attached.push(ObjectEntry::Camera { index: 9 });
        assert!(matches!(document.into_scene(), Err(ExportError::UnknownReference(_))));
    }

    #[test]
    fn test_newer_version_fails() {
        let mut document = SceneDocument::from_scene(&Scene::new());
        document.version = SCENE_FORMAT_VERSION + 1;
        assert!(matches!(document.into_scene(), Err(ExportError::UnsupportedVersion(_))));
    }

    #[test]
    fn test_empty_document_gets_a_camera() {
        let mut document = SceneDocument::from_scene(&Scene::new());
        document.cameras.clear();
        let scene = document.into_scene().unwrap();
        assert_eq!(scene.camera_count(), 1);
        assert_eq!(scene.active_camera().unwrap().1.frame(), Camera::default().frame());
        assert_ne!(scene.active_camera().unwrap().1.frame(), Frame::CANONICAL);
    }
}
