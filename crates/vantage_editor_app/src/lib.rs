// SPDX-License-Identifier: MIT OR Apache-2.0
//! Vantage scene editor.
//!
//! The editor layers interactive editing on top of a [`Scene`]:
//! - Selection of model instances and editor markers
//! - Translate / rotate / scale gizmos
//! - Markers standing in for cameras, point lights and path keyframes
//! - Path editing sessions and object-to-path attachment
//! - Layered materials
//! - `.fscene` export and import
//! - egui panels driving all of the above
//!
//! ## Architecture
//!
//! [`SceneEditor`] is the single owner of editor state and is driven by
//! pointer events and explicit per-frame calls. Everything that talks to
//! the outside world sits behind a trait: [`Picker`] for hit testing,
//! [`EditorRenderer`] for drawing, [`Dialogs`] for blocking prompts,
//! [`ModelLoader`] for model files and [`SceneExporter`] for persistence.

pub mod camera;
pub mod config;
pub mod dialogs;
pub mod editor;
pub mod export;
pub mod gizmo;
pub mod input;
pub mod loader;
pub mod markers;
pub mod material;
pub mod picking;
pub mod render;
pub mod scene;
pub mod selection;
pub mod ui;

pub use camera::{Camera, OrbitController, Ray};
pub use config::{ConfigError, EditorConfig, ViewportSpeeds, CONFIG_FILE_NAME};
#[cfg(feature = "native-dialogs")]
pub use dialogs::NativeDialogs;
pub use dialogs::{Dialogs, FileFilter, ScriptedDialogs};
pub use editor::{SceneEditor, SAVE_CHANGES_PROMPT};
pub use export::{ExportError, FsceneExporter, SceneDocument, SceneExporter};
pub use gizmo::{Gizmo, GizmoAxis, GizmoDelta, GizmoSet, GizmoType, Transformable};
pub use input::{PointerButton, PointerEvent, PointerEventKind};
pub use loader::{LoadError, ModelAsset, ModelLoader, PlaceholderLoader};
pub use markers::{LightIndexMap, MarkerId, MarkerInstance, MarkerKind, MarkerScales, MarkerSet};
pub use material::{
    LayerBlend, LayerNdf, LayerType, Material, MaterialError, MaterialLayer, TextureSlot, MAX_MATERIAL_LAYERS,
};
pub use picking::{EditorHit, EditorPicker, Picker, RayPicker, ScenePicker};
pub use render::{DrawCall, EditorRenderer, RecordingRenderer};
pub use scene::{
    CameraId, DirectionalLight, InstanceId, Light, LightId, MaterialId, Model, ModelId, ModelInstance, Movable,
    ObjectRef, PointLight, Scene,
};
pub use selection::{Selection, SelectionCategory, SelectionTarget};
pub use ui::{MaterialPanel, PanelServices, PathEditorPanel, ScenePanel};
