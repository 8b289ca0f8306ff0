// SPDX-License-Identifier: MIT OR Apache-2.0
//! The scene editor controller.
//!
//! [`SceneEditor`] owns the edited [`Scene`] together with everything the
//! editor layers on top of it: markers, gizmos, the selection, the path
//! editing session and the viewport camera. Collaborators that block or
//! touch the outside world (dialogs, model loading, scene export, drawing)
//! are passed in per call.

use crate::camera::{Camera, OrbitController};
use crate::config::EditorConfig;
use crate::dialogs::{Dialogs, MODEL_FILTER, SCENE_FILTER, TEXTURE_FILTER};
use crate::export::{FsceneExporter, SceneExporter};
use crate::gizmo::{GizmoDelta, GizmoSet, GizmoType};
use crate::input::{PointerButton, PointerEvent, PointerEventKind};
use crate::loader::ModelLoader;
use crate::markers::{MarkerId, MarkerKind, MarkerSet};
use crate::material::{Material, MaterialLayer, TextureSlot};
use crate::picking::{EditorHit, Picker, RayPicker};
use crate::render::EditorRenderer;
use crate::scene::{
    CameraId, DirectionalLight, InstanceId, Light, LightId, MaterialId, ModelId, ModelInstance, ObjectRef, PointLight,
    Scene,
};
use crate::selection::{Selection, SelectionCategory, SelectionTarget};
use glam::{Vec2, Vec3};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use vantage_editor_paths::{DebugDrawer, ObjectPath, PathEditor, PathEditorEvent, PathId, PathPlayback};

/// Question asked before closing a modified scene
pub const SAVE_CHANGES_PROMPT: &str = "Scene changed. Do you want to save the changes?";

/// Scene editor state and operations
pub struct SceneEditor {
    scene: Scene,
    config: EditorConfig,
    viewport_camera: Camera,
    orbit: OrbitController,
    markers: MarkerSet,
    gizmos: GizmoSet,
    selection: Selection,
    picker: Box<dyn Picker>,
    path_editor: Option<PathEditor>,
    playback: PathPlayback,
    /// Euler angles in degrees as last entered, keyed by instance
    euler_rotations: HashMap<InstanceId, Vec3>,
    selected_model: usize,
    selected_instance: usize,
    selected_light: usize,
    selected_material: usize,
    selected_path: usize,
    dragging: bool,
    pointer_down_at: Option<f64>,
    held_button: Option<PointerButton>,
    last_pointer: Vec2,
    dirty: bool,
    render_all_paths: bool,
    debug_drawer: DebugDrawer,
    processing_path_events: bool,
    scene_file: Option<PathBuf>,
}

impl std::fmt::Debug for SceneEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneEditor")
            .field("selection", &self.selection)
            .field("path_editor", &self.path_editor)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl SceneEditor {
    /// Create an editor using the bounding-sphere ray picker
    pub fn new(scene: Scene, config: EditorConfig) -> Self {
        let picker = RayPicker {
            handle_radius: config.gizmo_handle_radius,
            ..RayPicker::default()
        };
        Self::with_picker(scene, config, Box::new(picker))
    }

    /// Create an editor with a custom picker
    pub fn with_picker(mut scene: Scene, config: EditorConfig, picker: Box<dyn Picker>) -> Self {
        if scene.camera_count() == 0 {
            warn!("Scene has no camera, adding a default one");
            scene.add_camera(Camera::default());
        }

        let viewport_camera = Camera::new("Viewport").looking_at(Vec3::new(0.0, 2.0, 10.0), Vec3::ZERO, Vec3::Y);
        let orbit = OrbitController::from_camera(
            &viewport_camera,
            config.viewport.orbit,
            config.viewport.pan,
            config.viewport.zoom,
        );
        let markers = MarkerSet::from_scene(&scene, config.marker_scales);
        let gizmos = GizmoSet::new(config.default_gizmo, config.gizmo_handle_length);

        info!(
            "Scene editor ready: {} models, {} cameras, {} lights, {} paths",
            scene.model_count(),
            scene.camera_count(),
            scene.light_count(),
            scene.path_count()
        );

        Self {
            scene,
            viewport_camera,
            orbit,
            markers,
            gizmos,
            selection: Selection::new(),
            picker,
            path_editor: None,
            playback: PathPlayback::new(),
            euler_rotations: HashMap::new(),
            selected_model: 0,
            selected_instance: 0,
            selected_light: 0,
            selected_material: 0,
            selected_path: 0,
            dragging: false,
            pointer_down_at: None,
            held_button: None,
            last_pointer: Vec2::ZERO,
            dirty: false,
            render_all_paths: config.render_all_paths,
            debug_drawer: DebugDrawer::new(config.max_debug_vertices),
            processing_path_events: false,
            scene_file: None,
            config,
        }
    }

    // ----------------------------------------------------------------
    // Accessors

    /// The edited scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access for property edits.
    ///
    /// Adding or removing objects must go through the editor so markers stay
    /// in step. Call [`SceneEditor::mark_dirty`] after editing.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Editor settings
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Editor markers
    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// Gizmos
    pub fn gizmos(&self) -> &GizmoSet {
        &self.gizmos
    }

    /// Current selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Camera the viewport is seen through
    pub fn viewport_camera(&self) -> &Camera {
        &self.viewport_camera
    }

    /// Replace the viewport camera and re-derive the orbit controls
    pub fn set_viewport_camera(&mut self, camera: Camera) {
        self.orbit = OrbitController::from_camera(
            &camera,
            self.config.viewport.orbit,
            self.config.viewport.pan,
            self.config.viewport.zoom,
        );
        self.viewport_camera = camera;
    }

    /// Open path editing session, if any
    pub fn path_editor(&self) -> Option<&PathEditor> {
        self.path_editor.as_ref()
    }

    /// Path playback clock
    pub fn playback(&self) -> &PathPlayback {
        &self.playback
    }

    /// Mutable playback clock
    pub fn playback_mut(&mut self) -> &mut PathPlayback {
        &mut self.playback
    }

    /// Whether the scene changed since it was last saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flag the scene as modified
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether a gizmo drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// File the scene was last saved to or loaded from
    pub fn scene_file(&self) -> Option<&Path> {
        self.scene_file.as_deref()
    }

    /// Whether every path is drawn, not only the one being edited
    pub fn render_all_paths(&self) -> bool {
        self.render_all_paths
    }

    /// Draw every path
    pub fn set_render_all_paths(&mut self, enabled: bool) {
        self.render_all_paths = enabled;
    }

    /// Line buffer filled by the last [`SceneEditor::render`]
    pub fn debug_drawer(&self) -> &DebugDrawer {
        &self.debug_drawer
    }

    /// Index of the model shown in the model panel
    pub fn selected_model(&self) -> usize {
        self.selected_model
    }

    /// Index of the instance shown in the model panel
    pub fn selected_instance(&self) -> usize {
        self.selected_instance
    }

    /// Index of the light shown in the light panel
    pub fn selected_light(&self) -> usize {
        self.selected_light
    }

    /// Index of the material shown in the material panel
    pub fn selected_material(&self) -> usize {
        self.selected_material
    }

    /// Index of the path shown in the path panel
    pub fn selected_path(&self) -> usize {
        self.selected_path
    }

    // ----------------------------------------------------------------
    // Selection

    /// Select an instance or marker, replacing the current selection.
    ///
    /// Selecting something already selected does nothing.
    pub fn select(&mut self, target: SelectionTarget) {
        if self.selection.contains(&target) {
            return;
        }

        let mut keyframe = None;
        let category = match target {
            SelectionTarget::Instance(id) => {
                let Some((model_index, instance_index)) = self.scene.find_instance(id) else {
                    warn!("Cannot select unknown {id}");
                    return;
                };
                self.selected_model = model_index;
                self.selected_instance = instance_index;
                self.cache_euler_rotation(id);
                SelectionCategory::Model
            }
            SelectionTarget::Marker(id) => {
                let Some(marker) = self.markers.get(id) else {
                    warn!("Cannot select unknown {id}");
                    return;
                };
                match marker.kind {
                    MarkerKind::Camera(camera_id) => {
                        if let Some(index) = self.scene.camera_index(camera_id) {
                            self.scene.set_active_camera(index);
                        }
                        SelectionCategory::Camera
                    }
                    MarkerKind::Light(_) => {
                        let scene_index = self
                            .markers
                            .index_of(id)
                            .and_then(|marker_index| self.markers.light_map().editor_to_scene(marker_index));
                        if let Some(index) = scene_index {
                            self.selected_light = index;
                        }
                        SelectionCategory::Light
                    }
                    MarkerKind::Keyframe(index) => {
                        if self.path_editor.is_none() {
                            warn!("Ignoring keyframe selection without an open path editor");
                            return;
                        }
                        keyframe = Some(index);
                        SelectionCategory::Keyframe
                    }
                }
            }
        };

        self.selection.set(target, category);
        self.gizmos.set_active(self.gizmos.active_type(), true);
        self.update_editor_object_transforms();
        debug!("Selected {:?} ({})", target, category.name());

        if let Some(index) = keyframe {
            if let Some(session) = self.path_editor.as_mut() {
                if session.active_frame() != index {
                    if let Some(path) = self.scene.path_by_id(session.path_id()) {
                        session.set_active_frame(path, index);
                    }
                }
            }
            self.process_path_events();
        }
    }

    /// Clear the selection and hide the gizmo
    pub fn deselect(&mut self) {
        if self.dragging {
            self.gizmos.active_mut().end_action();
            self.dragging = false;
        }
        self.gizmos.set_active(self.gizmos.active_type(), false);
        if !self.selection.is_empty() {
            debug!("Deselected {} objects", self.selection.len());
        }
        self.selection.clear();
    }

    /// Switch the active gizmo, showing it only when something is selected
    pub fn set_active_gizmo(&mut self, kind: GizmoType) {
        if self.dragging {
            self.gizmos.active_mut().end_action();
            self.dragging = false;
        }
        self.gizmos.set_active(kind, !self.selection.is_empty());
        self.update_editor_object_transforms();
    }

    /// Handle a gizmo hotkey (W, E, R). Returns true if it was one.
    pub fn handle_hotkey(&mut self, key: char) -> bool {
        let key = key.to_ascii_uppercase();
        match GizmoType::ALL.into_iter().find(|kind| kind.hotkey() == key) {
            Some(kind) => {
                self.set_active_gizmo(kind);
                true
            }
            None => false,
        }
    }

    /// Select the marker of a keyframe of the path being edited
    fn select_keyframe_marker(&mut self, index: usize) {
        match self.markers.keyframe_marker(index) {
            Some(marker) => {
                let id = marker.id;
                self.select(SelectionTarget::Marker(id));
            }
            None => warn!("No marker for keyframe {}", index),
        }
    }

    /// Select the marker of the camera at `index`
    fn select_camera_marker(&mut self, index: usize) {
        if let Some(marker) = self.markers.camera_marker(index) {
            let id = marker.id;
            self.select(SelectionTarget::Marker(id));
        }
    }

    /// What the primary selected marker stands for
    fn selected_marker_kind(&self) -> Option<MarkerKind> {
        let id = self.selection.primary_marker()?;
        self.markers.get(id).map(|marker| marker.kind)
    }

    fn selection_has_marker(&self, marker: Option<MarkerId>) -> bool {
        marker.is_some_and(|id| self.selection.contains(&SelectionTarget::Marker(id)))
    }

    // ----------------------------------------------------------------
    // Input

    /// Feed a pointer event. Returns true if the editor consumed it.
    pub fn on_pointer_event(&mut self, event: PointerEvent) -> bool {
        let delta = event.position - self.last_pointer;
        self.last_pointer = event.position;

        match event.kind {
            PointerEventKind::ButtonDown(PointerButton::Left) => {
                self.pointer_down_at = Some(event.time);
                if self.dragging {
                    return true;
                }
                let hit = self.picker.pick_editor(
                    event.position,
                    &self.viewport_camera,
                    &self.markers,
                    &self.gizmos,
                );
                if let Some(hit) = hit {
                    let gizmo = self.gizmos.active_mut();
                    if gizmo.begin_action(&hit) {
                        gizmo.update(&self.viewport_camera, event.position);
                        self.dragging = true;
                        return true;
                    }
                }
                false
            }
            PointerEventKind::Move => {
                if self.dragging {
                    self.gizmos.active_mut().update(&self.viewport_camera, event.position);
                    self.apply_gizmo_transform();
                    return true;
                }
                match self.held_button {
                    Some(PointerButton::Right) => {
                        self.orbit.orbit(&mut self.viewport_camera, delta);
                        true
                    }
                    Some(PointerButton::Middle) => {
                        self.orbit.pan(&mut self.viewport_camera, delta);
                        true
                    }
                    _ => false,
                }
            }
            PointerEventKind::ButtonUp(PointerButton::Left) => {
                let pressed_at = self.pointer_down_at.take();
                if self.dragging {
                    self.gizmos.active_mut().end_action();
                    self.dragging = false;
                    return true;
                }
                let held = pressed_at.map_or(f64::INFINITY, |down| event.time - down);
                if held < self.config.click_threshold {
                    self.pick_at(event.position);
                    return true;
                }
                false
            }
            PointerEventKind::ButtonDown(button) => {
                self.held_button = Some(button);
                true
            }
            PointerEventKind::ButtonUp(button) => {
                if self.held_button == Some(button) {
                    self.held_button = None;
                }
                true
            }
            PointerEventKind::Wheel(notches) => {
                self.orbit.zoom(&mut self.viewport_camera, notches);
                true
            }
        }
    }

    /// Click selection: markers first, then scene instances
    fn pick_at(&mut self, pointer: Vec2) {
        let hit = self
            .picker
            .pick_editor(pointer, &self.viewport_camera, &self.markers, &self.gizmos);
        if let Some(EditorHit::Marker(id)) = hit {
            self.select(SelectionTarget::Marker(id));
            return;
        }
        match self.picker.pick_scene(pointer, &self.viewport_camera, &self.scene) {
            Some(instance) => self.select(SelectionTarget::Instance(instance)),
            None => self.deselect(),
        }
    }

    /// Apply the active gizmo's last delta to the selected object
    pub fn apply_gizmo_transform(&mut self) {
        let delta = self.gizmos.active().delta();
        if delta == GizmoDelta::None {
            return;
        }

        match self.selection.category() {
            Some(SelectionCategory::Model) => {
                let Some(id) = self.selection.primary_instance() else {
                    return;
                };
                let Some(instance) = self.scene.instance_mut(id) else {
                    return;
                };
                delta.apply(instance);
                if matches!(delta, GizmoDelta::Rotation(_)) {
                    let degrees = degrees(instance.euler_rotation());
                    self.euler_rotations.insert(id, degrees);
                }
            }
            Some(SelectionCategory::Camera) => {
                let Some(MarkerKind::Camera(id)) = self.selected_marker_kind() else {
                    return;
                };
                let Some(camera) = self.scene.camera_index(id).and_then(|index| self.scene.camera_mut(index)) else {
                    return;
                };
                delta.apply(camera);
            }
            Some(SelectionCategory::Light) => {
                let Some(MarkerKind::Light(id)) = self.selected_marker_kind() else {
                    return;
                };
                let Some(light) = self
                    .scene
                    .light_index(id)
                    .and_then(|index| self.scene.light_mut(index))
                    .and_then(Light::as_point_mut)
                else {
                    return;
                };
                delta.apply(light);
            }
            Some(SelectionCategory::Keyframe) => {
                if matches!(delta, GizmoDelta::Scale(_)) {
                    return;
                }
                let Some(session) = self.path_editor.as_ref() else {
                    return;
                };
                let index = session.active_frame();
                let Some(marker) = self.markers.keyframe_marker_mut(index) else {
                    return;
                };
                delta.apply(marker);
                let frame = marker.frame();
                if let Some(path) = self.scene.path_mut(session.path_id()) {
                    path.set_frame_pose(index, frame);
                }
            }
            None => return,
        }

        self.dirty = true;
        self.update_editor_object_transforms();
    }

    /// Copy scene poses onto markers and move the gizmo to the selection
    pub fn update_editor_object_transforms(&mut self) {
        self.markers.sync_from_scene(&self.scene);

        if let Some(session) = &self.path_editor {
            if let Some(path) = self.scene.path_by_id(session.path_id()) {
                for (index, keyframe) in path.keyframes().iter().enumerate() {
                    if let Some(marker) = self.markers.keyframe_marker_mut(index) {
                        marker.set_frame(keyframe.frame());
                    }
                }
            }
        }

        if let Some(pivot) = self.selection_pivot() {
            self.gizmos.active_mut().set_pivot(pivot);
        }
    }

    fn selection_pivot(&self) -> Option<Vec3> {
        match self.selection.primary()? {
            SelectionTarget::Instance(id) => self.scene.instance(id).map(|instance| instance.translation),
            SelectionTarget::Marker(id) => self.markers.get(id).map(|marker| marker.position),
        }
    }

    // ----------------------------------------------------------------
    // Frame

    /// Advance playback and keep editor state in step with the scene
    pub fn update(&mut self, delta_time: f32) {
        if self.playback.update(delta_time) {
            self.scene.animate_paths(self.playback.time());
        }
        self.process_path_events();
        self.update_editor_object_transforms();
    }

    /// Jump playback to `time` and move attached objects there
    pub fn seek_playback(&mut self, time: f32) {
        self.playback.seek(time);
        self.scene.animate_paths(self.playback.time());
        self.update_editor_object_transforms();
    }

    /// Draw the selection outline, the editor scene and the path overlay
    pub fn render(&mut self, renderer: &mut dyn EditorRenderer) {
        self.update_editor_object_transforms();

        if !self.selection.is_empty() {
            renderer.draw_selection_outline(
                &self.scene,
                &self.markers,
                self.selection.targets(),
                self.config.selection_color,
            );
        }

        renderer.draw_editor_scene(&self.markers, self.gizmos.visible());

        self.debug_drawer.clear();
        self.debug_drawer.set_color(self.config.path_color);
        if self.render_all_paths {
            for (_, path) in self.scene.paths() {
                self.debug_drawer.add_path(path, self.config.path_detail);
            }
        } else if let Some(session) = &self.path_editor {
            if let Some(path) = self.scene.path_by_id(session.path_id()) {
                self.debug_drawer.add_path(path, self.config.path_detail);
            }
        }
        if !self.debug_drawer.is_empty() {
            renderer.draw_lines(self.debug_drawer.vertices());
        }
    }

    // ----------------------------------------------------------------
    // Models

    /// Ask for a model file and add it to the scene
    pub fn add_model(&mut self, loader: &mut dyn ModelLoader, dialogs: &mut dyn Dialogs) -> Option<ModelId> {
        let file = dialogs.open_file(&MODEL_FILTER)?;
        self.add_model_from_file(loader, dialogs, &file)
    }

    /// Load `file` and add it to the scene, selecting its first instance
    pub fn add_model_from_file(
        &mut self,
        loader: &mut dyn ModelLoader,
        dialogs: &mut dyn Dialogs,
        file: &Path,
    ) -> Option<ModelId> {
        let asset = match loader.load_model(file) {
            Ok(asset) => asset,
            Err(err) => {
                error!("Failed to load model {:?}: {err}", file);
                dialogs.message(&format!("Error when trying to load model {}: {err}", file.display()));
                return None;
            }
        };
        let (model_id, instance_id) = self.scene.add_model(asset);
        self.dirty = true;
        self.select(SelectionTarget::Instance(instance_id));
        Some(model_id)
    }

    /// Remove the model at `index` with all its instances, after confirmation
    pub fn delete_model(&mut self, index: usize, dialogs: &mut dyn Dialogs) -> bool {
        if index >= self.scene.model_count() {
            return false;
        }
        if !dialogs.confirm("Delete model?") {
            return false;
        }
        self.remove_model(index);
        true
    }

    fn remove_model(&mut self, index: usize) {
        self.deselect();
        if let Some(model) = self.scene.delete_model(index) {
            for (id, _) in model.instances() {
                self.euler_rotations.remove(&id);
            }
        }
        self.selected_model = 0;
        self.selected_instance = 0;
        self.dirty = true;
    }

    /// Add a copy of the selected instance to its model
    pub fn add_model_instance(&mut self) -> Option<InstanceId> {
        let (_, model) = self.scene.model(self.selected_model)?;
        let mut instance = model
            .instance(self.selected_instance)
            .map_or_else(|| ModelInstance::new(""), |(_, instance)| instance.clone());
        instance.name = format!("{}_{}", model.name, model.instance_count());

        let id = self.scene.add_model_instance(self.selected_model, instance)?;
        self.dirty = true;
        self.select(SelectionTarget::Instance(id));
        Some(id)
    }

    /// Remove the selected instance. Removing the last instance of a model
    /// removes the model.
    pub fn delete_model_instance(&mut self, dialogs: &mut dyn Dialogs) -> bool {
        let Some((_, model)) = self.scene.model(self.selected_model) else {
            return false;
        };
        let instance = model.instance(self.selected_instance).map(|(id, _)| id);
        if model.instance_count() <= 1 {
            if dialogs.confirm(
                "The active model has a single instance. Removing it will remove the model from the scene.\nContinue?",
            ) {
                self.remove_model(self.selected_model);
                return true;
            }
            return false;
        }
        if !dialogs.confirm("Delete model instance?") {
            return false;
        }

        self.deselect();
        if let Some(id) = instance {
            self.euler_rotations.remove(&id);
        }
        self.scene.delete_model_instance(self.selected_model, self.selected_instance);
        self.selected_instance = 0;
        self.dirty = true;
        true
    }

    /// Show the model at `index` in the panel and select its first instance
    pub fn set_selected_model(&mut self, index: usize) {
        if index < self.scene.model_count() {
            self.selected_model = index;
            self.set_selected_instance(0);
        }
    }

    /// Select the instance at `index` of the selected model
    pub fn set_selected_instance(&mut self, index: usize) {
        let id = self
            .scene
            .model(self.selected_model)
            .and_then(|(_, model)| model.instance(index))
            .map(|(id, _)| id);
        if let Some(id) = id {
            self.selected_instance = index;
            self.select(SelectionTarget::Instance(id));
        }
    }

    fn cache_euler_rotation(&mut self, id: InstanceId) {
        if self.euler_rotations.contains_key(&id) {
            return;
        }
        if let Some(instance) = self.scene.instance(id) {
            self.euler_rotations.insert(id, degrees(instance.euler_rotation()));
        }
    }

    /// Instance rotation as entered in the panel, in degrees
    pub fn instance_rotation_degrees(&self, id: InstanceId) -> Option<Vec3> {
        self.euler_rotations
            .get(&id)
            .copied()
            .or_else(|| self.scene.instance(id).map(|instance| degrees(instance.euler_rotation())))
    }

    /// Set an instance rotation from XYZ euler angles in degrees
    pub fn set_instance_rotation_degrees(&mut self, id: InstanceId, angles: Vec3) {
        let Some(instance) = self.scene.instance_mut(id) else {
            return;
        };
        instance.set_euler_rotation(radians(angles));
        self.euler_rotations.insert(id, angles);
        self.dirty = true;
    }

    // ----------------------------------------------------------------
    // Cameras

    /// Add a copy of the active camera and make it active
    pub fn add_camera(&mut self) -> CameraId {
        let mut camera = self
            .scene
            .active_camera()
            .map_or_else(Camera::default, |(_, camera)| camera.clone());
        camera.name.push('_');

        let id = self.scene.add_camera(camera.clone());
        let index = self.scene.camera_count() - 1;
        self.scene.set_active_camera(index);
        self.markers.add_camera_marker(id, &camera);
        self.dirty = true;
        self.select_camera_marker(index);
        id
    }

    /// Remove the active camera. A scene always keeps one camera.
    pub fn delete_camera(&mut self, dialogs: &mut dyn Dialogs) -> bool {
        if self.scene.camera_count() <= 1 {
            warn!("Refusing to delete the only camera");
            dialogs.message("The Scene has only one camera. Scenes must have at least one camera. Ignoring call.");
            return false;
        }
        if !dialogs.confirm("Delete camera?") {
            return false;
        }

        let index = self.scene.active_camera_index();
        let marker = self.markers.camera_marker(index).map(|marker| marker.id);
        if self.selection_has_marker(marker) {
            self.deselect();
        }
        self.scene.delete_camera(index);
        self.markers.remove_camera_marker(index);
        self.dirty = true;
        self.select_camera_marker(self.scene.active_camera_index());
        true
    }

    /// Make the camera at `index` active
    pub fn set_active_camera(&mut self, index: usize) {
        if self.scene.set_active_camera(index) {
            self.dirty = true;
        }
    }

    // ----------------------------------------------------------------
    // Lights

    /// Add a point light in front of the viewport camera
    pub fn add_point_light(&mut self) -> LightId {
        let position = self.viewport_camera.position + self.viewport_camera.forward();
        let name = format!("Point Light {}", self.scene.light_count());
        let id = self.scene.add_light(Light::Point(PointLight::new(name, position)));
        self.markers.add_light_marker(id, position);
        self.markers.rebuild_light_map(&self.scene);
        let index = self.scene.light_count() - 1;
        self.selected_light = index;
        self.dirty = true;

        let marker = self
            .markers
            .light_map()
            .scene_to_editor(index)
            .and_then(|marker_index| self.markers.light_marker(marker_index))
            .map(|marker| marker.id);
        if let Some(marker) = marker {
            self.select(SelectionTarget::Marker(marker));
        }
        id
    }

    /// Add a directional light shining along the viewport direction
    pub fn add_directional_light(&mut self) -> LightId {
        let name = format!("Directional Light {}", self.scene.light_count());
        let light = DirectionalLight::new(name, self.viewport_camera.forward());
        let id = self.scene.add_light(Light::Directional(light));
        self.markers.rebuild_light_map(&self.scene);
        self.selected_light = self.scene.light_count() - 1;
        self.dirty = true;
        id
    }

    /// Remove the light at `index`, after confirmation
    pub fn delete_light(&mut self, index: usize, dialogs: &mut dyn Dialogs) -> bool {
        if index >= self.scene.light_count() {
            return false;
        }
        if !dialogs.confirm("Delete light?") {
            return false;
        }

        if let Some(marker_index) = self.markers.light_map().scene_to_editor(index) {
            let marker = self.markers.light_marker(marker_index).map(|marker| marker.id);
            if self.selection_has_marker(marker) {
                self.deselect();
            }
            self.markers.remove_light_marker(marker_index);
        }
        let shown = self.scene.light(self.selected_light).map(|(id, _)| id);
        self.scene.delete_light(index);
        self.markers.rebuild_light_map(&self.scene);
        self.selected_light = shown
            .and_then(|id| self.scene.light_index(id))
            .unwrap_or_else(|| index.min(self.scene.light_count().saturating_sub(1)));
        self.dirty = true;
        true
    }

    /// Show the light at `index` in the panel
    pub fn set_selected_light(&mut self, index: usize) {
        if index < self.scene.light_count() {
            self.selected_light = index;
        }
    }

    // ----------------------------------------------------------------
    // Materials

    /// Add a layerless material and show it in the panel
    pub fn add_material(&mut self) -> MaterialId {
        let count = self.scene.material_count();
        let mut material = Material::new(format!("Material {count}"));
        material.id = u32::try_from(count).unwrap_or(u32::MAX);
        let id = self.scene.add_material(material);
        self.selected_material = count;
        self.dirty = true;
        id
    }

    /// Remove the material at `index`, after confirmation
    pub fn delete_material(&mut self, index: usize, dialogs: &mut dyn Dialogs) -> bool {
        if index >= self.scene.material_count() {
            return false;
        }
        if !dialogs.confirm("Delete material?") {
            return false;
        }
        if let Some(material) = self.scene.delete_material(index) {
            info!("Deleted material '{}'", material.name);
        }
        if self.selected_material >= self.scene.material_count() {
            self.selected_material = self.scene.material_count().saturating_sub(1);
        }
        self.dirty = true;
        true
    }

    /// Show the material at `index` in the panel
    pub fn set_selected_material(&mut self, index: usize) {
        if index < self.scene.material_count() {
            self.selected_material = index;
        }
    }

    /// Edit the material shown in the panel, flagging the scene as modified
    pub fn edit_material<R>(&mut self, edit: impl FnOnce(&mut Material) -> R) -> Option<R> {
        let material = self.scene.material_mut(self.selected_material)?;
        let result = edit(material);
        self.dirty = true;
        Some(result)
    }

    /// Push a default layer on the shown material.
    ///
    /// A full layer stack is reported through `dialogs`.
    pub fn add_material_layer(&mut self, dialogs: &mut dyn Dialogs) -> Option<usize> {
        match self.edit_material(|material| material.add_layer(MaterialLayer::default()))? {
            Ok(index) => Some(index),
            Err(err) => {
                warn!("Cannot add material layer: {err}");
                dialogs.message(&err.to_string());
                None
            }
        }
    }

    /// Remove a layer of the shown material
    pub fn remove_material_layer(&mut self, layer: usize) -> bool {
        let count = self.scene.material(self.selected_material).map_or(0, |(_, m)| m.layer_count());
        if layer >= count {
            return false;
        }
        matches!(self.edit_material(|material| material.remove_layer(layer)), Some(Ok(_)))
    }

    /// Ask for an image and put it in a texture slot of the shown material
    pub fn load_material_texture(&mut self, slot: TextureSlot, dialogs: &mut dyn Dialogs) -> bool {
        if self.scene.material(self.selected_material).is_none() {
            return false;
        }
        let Some(file) = dialogs.open_file(&TEXTURE_FILTER) else {
            return false;
        };
        match self.edit_material(|material| material.set_texture(slot, Some(file))) {
            Some(Ok(())) => true,
            Some(Err(err)) => {
                warn!("Cannot set {}: {err}", slot.name());
                false
            }
            None => false,
        }
    }

    /// Ask for a file name and save the shown material on its own
    pub fn save_material(&self, exporter: &dyn SceneExporter, dialogs: &mut dyn Dialogs) -> bool {
        let Some((_, material)) = self.scene.material(self.selected_material) else {
            return false;
        };
        let mut single = Scene::empty();
        single.add_material(material.clone());

        let Some(file) = dialogs.save_file(&SCENE_FILTER) else {
            return false;
        };
        match exporter.export_scene(&file, &single) {
            Ok(()) => true,
            Err(err) => {
                error!("Failed to save material to {:?}: {err}", file);
                dialogs.message(&format!("Could not save material: {err}"));
                false
            }
        }
    }

    // ----------------------------------------------------------------
    // Paths

    /// Add an empty path and start editing it
    pub fn add_path(&mut self) -> Option<PathId> {
        if self.path_editor.is_some() {
            warn!("Cannot add a path while the path editor is open");
            return None;
        }
        let name = format!("Path {}", self.scene.path_count());
        let id = self.scene.add_path(ObjectPath::new(name));
        self.selected_path = self.scene.path_count() - 1;
        self.dirty = true;
        self.start_path_editor();
        Some(id)
    }

    /// Remove the selected path, detaching its objects, after confirmation
    pub fn delete_path(&mut self, dialogs: &mut dyn Dialogs) -> bool {
        if self.path_editor.is_some() {
            warn!("Cannot delete a path while the path editor is open");
            return false;
        }
        if self.selected_path >= self.scene.path_count() {
            return false;
        }
        if !dialogs.confirm("Delete path?") {
            return false;
        }
        self.scene.delete_path(self.selected_path);
        if self.selected_path == self.scene.path_count() {
            self.selected_path = self.selected_path.saturating_sub(1);
        }
        self.dirty = true;
        true
    }

    /// Show the path at `index` in the panel
    pub fn set_selected_path(&mut self, index: usize) {
        if self.path_editor.is_none() && index < self.scene.path_count() {
            self.selected_path = index;
        }
    }

    /// Open the path editor on the selected path
    pub fn start_path_editor(&mut self) -> bool {
        if self.path_editor.is_some() {
            return false;
        }
        let Some((id, path)) = self.scene.path(self.selected_path) else {
            return false;
        };
        self.path_editor = Some(PathEditor::open(id, path));
        self.markers.spawn_keyframe_markers(path);
        info!("Editing path '{}'", path.name());
        true
    }

    fn with_path_session<R>(&mut self, edit: impl FnOnce(&mut PathEditor, &mut ObjectPath) -> R) -> Option<R> {
        let session = self.path_editor.as_mut()?;
        let path = self.scene.path_mut(session.path_id())?;
        let result = edit(session, path);
        self.process_path_events();
        Some(result)
    }

    /// Add a keyframe at the pending frame time
    pub fn path_add_frame(&mut self) -> Option<usize> {
        self.with_path_session(|session, path| session.add_frame(path))
    }

    /// Remove the active keyframe
    pub fn path_remove_frame(&mut self) -> bool {
        self.with_path_session(|session, path| session.remove_frame(path))
            .unwrap_or(false)
    }

    /// Make a keyframe active
    pub fn path_set_active_frame(&mut self, index: usize) {
        self.with_path_session(|session, path| session.set_active_frame(path, index));
    }

    /// Edit the pending frame time
    pub fn path_set_frame_time(&mut self, time: f32) {
        if let Some(session) = self.path_editor.as_mut() {
            session.set_frame_time(time);
        }
    }

    /// Move the active keyframe to the pending frame time
    pub fn path_update_frame_time(&mut self) {
        self.with_path_session(|session, path| session.update_frame_time(path));
    }

    /// Rename the path being edited
    pub fn path_set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.with_path_session(|session, path| session.set_name(path, name));
    }

    /// Set looping on the path being edited
    pub fn path_set_looping(&mut self, looping: bool) {
        self.with_path_session(|session, path| session.set_looping(path, looping));
    }

    /// Close the path editor
    pub fn close_path_editor(&mut self) {
        if let Some(session) = self.path_editor.as_mut() {
            session.close();
        }
        self.process_path_events();
    }

    /// Drain path editor notifications until none are left
    pub fn process_path_events(&mut self) {
        if self.processing_path_events {
            return;
        }
        self.processing_path_events = true;
        loop {
            let events = match self.path_editor.as_mut() {
                Some(session) => session.take_events(),
                None => break,
            };
            if events.is_empty() {
                break;
            }
            for event in events {
                self.handle_path_event(event);
            }
        }
        self.processing_path_events = false;
    }

    fn handle_path_event(&mut self, event: PathEditorEvent) {
        debug!("Path editor event {:?}", event);
        match event {
            PathEditorEvent::ActiveFrameChanged(index) => self.select_keyframe_marker(index),
            PathEditorEvent::KeyframesChanged => {
                if self.selection.category() == Some(SelectionCategory::Keyframe) {
                    self.deselect();
                }
                let path = self
                    .path_editor
                    .as_ref()
                    .and_then(|session| self.scene.path_by_id(session.path_id()));
                if let Some(path) = path {
                    self.markers.spawn_keyframe_markers(path);
                }
                self.dirty = true;
            }
            PathEditorEvent::PropertiesChanged => self.dirty = true,
            PathEditorEvent::Finished => {
                self.deselect();
                self.markers.clear_keyframe_markers();
                self.path_editor = None;
                info!("Path editor closed");
            }
        }
    }

    /// Attach `object` to `path`, or detach it with `None`.
    ///
    /// The object is detached from its current path first. Detached model
    /// instances return to the canonical pose.
    pub fn set_object_path(&mut self, object: ObjectRef, path: Option<PathId>) -> bool {
        if !self.scene.contains(object) {
            warn!("Cannot set the path of missing object {:?}", object);
            return false;
        }
        if self.scene.attachments.path_of(object) == path {
            return false;
        }
        if let Some(new_path) = path {
            if self.scene.path_by_id(new_path).is_none() {
                warn!("Cannot attach to missing {new_path}");
                return false;
            }
        }

        if self.scene.attachments.detach(object).is_some() {
            if let ObjectRef::ModelInstance(id) = object {
                if let Some(instance) = self.scene.instance_mut(id) {
                    instance.reset_pose();
                }
                self.euler_rotations.insert(id, Vec3::ZERO);
            }
        }
        if let Some(new_path) = path {
            if let Err(err) = self.scene.attachments.attach(object, new_path) {
                warn!("Attach failed: {err}");
                return false;
            }
            debug!("Attached {:?} to {new_path}", object);
        }
        self.dirty = true;
        true
    }

    // ----------------------------------------------------------------
    // Persistence

    /// Ask for a file name and save the scene
    pub fn save_scene(&mut self, exporter: &dyn SceneExporter, dialogs: &mut dyn Dialogs) -> bool {
        let Some(file) = dialogs.save_file(&SCENE_FILTER) else {
            return false;
        };
        self.save_scene_to(exporter, dialogs, &file)
    }

    /// Save the scene to `file`
    pub fn save_scene_to(&mut self, exporter: &dyn SceneExporter, dialogs: &mut dyn Dialogs, file: &Path) -> bool {
        match exporter.export_scene(file, &self.scene) {
            Ok(()) => {
                self.dirty = false;
                self.scene_file = Some(file.to_path_buf());
                true
            }
            Err(err) => {
                error!("Failed to save scene to {:?}: {err}", file);
                dialogs.message(&format!("Could not save scene: {err}"));
                false
            }
        }
    }

    /// Replace the edited scene with the one stored in `file`
    pub fn load_scene(&mut self, file: &Path, dialogs: &mut dyn Dialogs) -> bool {
        match FsceneExporter::default().import_scene(file) {
            Ok(scene) => {
                self.replace_scene(scene);
                self.scene_file = Some(file.to_path_buf());
                true
            }
            Err(err) => {
                error!("Failed to load scene from {:?}: {err}", file);
                dialogs.message(&format!("Could not load scene: {err}"));
                false
            }
        }
    }

    /// Replace the edited scene, resetting all editor state
    pub fn replace_scene(&mut self, mut scene: Scene) {
        self.deselect();
        self.path_editor = None;
        if scene.camera_count() == 0 {
            scene.add_camera(Camera::default());
        }
        self.markers = MarkerSet::from_scene(&scene, self.config.marker_scales);
        self.scene = scene;
        self.euler_rotations.clear();
        self.selected_model = 0;
        self.selected_instance = 0;
        self.selected_light = 0;
        self.selected_material = 0;
        self.selected_path = 0;
        self.playback.stop();
        self.dirty = false;
        self.scene_file = None;
    }

    /// Prepare to close, offering to save unsaved changes.
    ///
    /// Returns false only when the user chose to save and saving failed.
    pub fn close(&mut self, exporter: &dyn SceneExporter, dialogs: &mut dyn Dialogs) -> bool {
        if self.dirty && dialogs.confirm(SAVE_CHANGES_PROMPT) {
            return self.save_scene(exporter, dialogs);
        }
        true
    }
}

fn degrees(radians: Vec3) -> Vec3 {
    Vec3::new(radians.x.to_degrees(), radians.y.to_degrees(), radians.z.to_degrees())
}

fn radians(degrees: Vec3) -> Vec3 {
    Vec3::new(degrees.x.to_radians(), degrees.y.to_radians(), degrees.z.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::ScriptedDialogs;
    use crate::loader::{LoadError, ModelAsset};
    use crate::picking::{EditorPicker, ScenePicker};
    use crate::gizmo::GizmoAxis;
    use crate::render::{DrawCall, RecordingRenderer};
    use std::collections::VecDeque;

    /// Picker returning queued answers
    #[derive(Default)]
    struct ScriptedPicker {
        editor_hits: VecDeque<Option<EditorHit>>,
        scene_hits: VecDeque<Option<InstanceId>>,
    }

    impl EditorPicker for ScriptedPicker {
        fn pick_editor(&mut self, _: Vec2, _: &Camera, _: &MarkerSet, _: &GizmoSet) -> Option<EditorHit> {
            self.editor_hits.pop_front().flatten()
        }
    }

    impl ScenePicker for ScriptedPicker {
        fn pick_scene(&mut self, _: Vec2, _: &Camera, _: &Scene) -> Option<InstanceId> {
            self.scene_hits.pop_front().flatten()
        }
    }

    fn front_view() -> Camera {
        Camera::new("View").looking_at(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, Vec3::Y)
    }

    fn editor() -> SceneEditor {
        let mut editor = SceneEditor::new(Scene::new(), EditorConfig::default());
        editor.set_viewport_camera(front_view());
        editor
    }

    fn scripted(picker: ScriptedPicker) -> SceneEditor {
        let mut editor = SceneEditor::with_picker(Scene::new(), EditorConfig::default(), Box::new(picker));
        editor.set_viewport_camera(front_view());
        editor
    }

    fn three_frame_path() -> ObjectPath {
        let mut path = ObjectPath::new("Flythrough");
        path.add_keyframe(0.0, Vec3::ZERO, Vec3::Z, Vec3::Y);
        path.add_keyframe(1.0, Vec3::X, Vec3::new(1.0, 0.0, 1.0), Vec3::Y);
        path.add_keyframe(2.0, Vec3::Y, Vec3::new(0.0, 1.0, 1.0), Vec3::Y);
        path
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut editor = editor();
        let (_, instance) = editor.scene_mut().add_model(ModelAsset::new("rock", 1.0));
        let target = SelectionTarget::Instance(instance);

        editor.select(target);
        editor.select(target);
        assert_eq!(editor.selection().len(), 1);
        assert_eq!(editor.selection().category(), Some(SelectionCategory::Model));
        assert!(editor.gizmos().active().is_visible());

        editor.deselect();
        assert!(editor.selection().is_empty());
        assert!(editor.gizmos().visible().is_none());
    }

    #[test]
    fn test_selecting_other_category_replaces_selection() {
        let mut editor = editor();
        let (_, instance) = editor.scene_mut().add_model(ModelAsset::new("rock", 1.0));
        editor.select(SelectionTarget::Instance(instance));

        let marker = editor.markers().camera_marker(0).unwrap().id;
        editor.select(SelectionTarget::Marker(marker));
        assert_eq!(editor.selection().targets(), &[SelectionTarget::Marker(marker)]);
        assert_eq!(editor.selection().category(), Some(SelectionCategory::Camera));
    }

    #[test]
    fn test_click_selects_marker_then_deselects() {
        let mut editor = editor();
        let marker = editor.markers().camera_marker(0).unwrap().id;

        // The default camera sits at the origin, in the middle of the view.
        editor.on_pointer_event(PointerEvent::down(PointerButton::Left, Vec2::splat(0.5), 0.0));
        editor.on_pointer_event(PointerEvent::up(PointerButton::Left, Vec2::splat(0.5), 0.1));
        assert_eq!(editor.selection().primary_marker(), Some(marker));

        editor.on_pointer_event(PointerEvent::down(PointerButton::Left, Vec2::new(0.05, 0.05), 1.0));
        editor.on_pointer_event(PointerEvent::up(PointerButton::Left, Vec2::new(0.05, 0.05), 1.1));
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_long_press_does_not_select() {
        let mut editor = editor();
        editor.on_pointer_event(PointerEvent::down(PointerButton::Left, Vec2::splat(0.5), 0.0));
        editor.on_pointer_event(PointerEvent::up(PointerButton::Left, Vec2::splat(0.5), 0.5));
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_camera_gizmo_drag_moves_camera_and_marker() {
        let mut picker = ScriptedPicker::default();
        picker.editor_hits.push_back(Some(EditorHit::GizmoHandle {
            gizmo: GizmoType::Translate,
            axis: GizmoAxis::X,
        }));
        let mut editor = scripted(picker);

        let marker = editor.markers().camera_marker(0).unwrap().id;
        editor.select(SelectionTarget::Marker(marker));
        assert_eq!(editor.gizmos().active().pivot(), Vec3::ZERO);

        assert!(editor.on_pointer_event(PointerEvent::down(PointerButton::Left, Vec2::splat(0.5), 0.0)));
        assert!(editor.is_dragging());
        editor.on_pointer_event(PointerEvent::moved(Vec2::new(0.6, 0.5), 0.05));
        editor.on_pointer_event(PointerEvent::up(PointerButton::Left, Vec2::new(0.6, 0.5), 0.1));
        assert!(!editor.is_dragging());

        let camera = editor.scene().active_camera().unwrap().1.clone();
        let expected = 20.0 * 0.2 * 30f32.to_radians().tan() * (16.0 / 9.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(expected, 0.0, 0.0), 1e-3));
        assert!(camera.target.abs_diff_eq(Vec3::new(expected, 0.0, -1.0), 1e-3));
        assert!(editor.is_dirty());

        editor.update_editor_object_transforms();
        let marker = editor.markers().camera_marker(0).unwrap();
        assert!(marker.position.abs_diff_eq(camera.position, 1e-6));
        assert!(editor.gizmos().active().pivot().abs_diff_eq(camera.position, 1e-6));
    }

    #[test]
    fn test_light_map_after_deleting_middle_light() {
        let mut editor = editor();
        editor.add_point_light();
        editor.add_point_light();
        let last = editor.add_point_light();

        let mut dialogs = ScriptedDialogs::always(true);
        assert!(editor.delete_light(1, &mut dialogs));
        assert_eq!(dialogs.questions, vec!["Delete light?".to_string()]);

        let map = editor.markers().light_map();
        assert_eq!(map.len(), 2);
        let scene_index = editor.scene().light_index(last).unwrap();
        assert_eq!(scene_index, 1);
        assert_eq!(map.scene_to_editor(scene_index), Some(1));
        assert_eq!(editor.markers().light_marker_count(), 2);
        assert_eq!(
            editor.markers().light_marker(1).unwrap().kind,
            MarkerKind::Light(last)
        );
    }

    #[test]
    fn test_declined_delete_keeps_light() {
        let mut editor = editor();
        editor.add_point_light();
        let mut dialogs = ScriptedDialogs::always(false);
        assert!(!editor.delete_light(0, &mut dialogs));
        assert_eq!(editor.scene().light_count(), 1);
        assert_eq!(editor.markers().light_marker_count(), 1);
    }

    #[test]
    fn test_selecting_light_marker_resolves_scene_light() {
        let mut editor = editor();
        editor.add_directional_light();
        let point = editor.add_point_light();
        editor.deselect();
        editor.set_selected_light(0);

        let marker = editor.markers().light_marker(0).unwrap().id;
        editor.select(SelectionTarget::Marker(marker));
        assert_eq!(editor.selected_light(), editor.scene().light_index(point).unwrap());
        assert_eq!(editor.selection().category(), Some(SelectionCategory::Light));
    }

    /// Editor whose first click lands on the X handle of the translate gizmo
    fn x_handle_editor() -> SceneEditor {
        let mut picker = ScriptedPicker::default();
        picker.editor_hits.push_back(Some(EditorHit::GizmoHandle {
            gizmo: GizmoType::Translate,
            axis: GizmoAxis::X,
        }));
        scripted(picker)
    }

    fn drag_right(editor: &mut SceneEditor) {
        assert!(editor.on_pointer_event(PointerEvent::down(PointerButton::Left, Vec2::splat(0.5), 0.0)));
        editor.on_pointer_event(PointerEvent::moved(Vec2::new(0.6, 0.5), 0.05));
        editor.on_pointer_event(PointerEvent::up(PointerButton::Left, Vec2::new(0.6, 0.5), 0.1));
    }

    fn point_position(editor: &SceneEditor, id: LightId) -> Vec3 {
        editor.scene().light_by_id(id).and_then(Light::as_point).unwrap().position
    }

    #[test]
    fn test_added_point_light_is_selected() {
        let mut editor = editor();
        let first = editor.add_point_light();
        let second = editor.add_point_light();

        let marker = editor.markers().light_marker(1).unwrap();
        assert_eq!(marker.kind, MarkerKind::Light(second));
        assert_eq!(editor.selection().targets(), &[SelectionTarget::Marker(marker.id)]);
        assert_eq!(editor.selection().category(), Some(SelectionCategory::Light));
        assert_eq!(editor.selected_light(), editor.scene().light_index(second).unwrap());
        assert_ne!(first, second);
    }

    #[test]
    fn test_light_drag_follows_selected_marker() {
        let mut editor = x_handle_editor();
        let first = editor.add_point_light();
        let second = editor.add_point_light();
        let start = point_position(&editor, first);

        let marker = editor.markers().light_marker(0).unwrap().id;
        editor.select(SelectionTarget::Marker(marker));
        // Adding a directional light moves the panel index but not the selection.
        editor.add_directional_light();
        assert_eq!(editor.selected_light(), 2);
        assert_eq!(editor.selection().primary_marker(), Some(marker));

        drag_right(&mut editor);
        assert!(point_position(&editor, first).x > start.x);
        assert_eq!(point_position(&editor, second), start);
    }

    #[test]
    fn test_light_drag_after_deleting_earlier_light() {
        let mut editor = x_handle_editor();
        let lights: Vec<LightId> = (0..4).map(|_| editor.add_point_light()).collect();
        let start = point_position(&editor, lights[0]);

        let marker = editor.markers().light_marker(2).unwrap().id;
        editor.select(SelectionTarget::Marker(marker));
        assert_eq!(editor.selected_light(), 2);

        let mut dialogs = ScriptedDialogs::always(true);
        assert!(editor.delete_light(0, &mut dialogs));
        assert_eq!(editor.selection().primary_marker(), Some(marker));
        assert_eq!(editor.selected_light(), 1);
        assert_eq!(editor.scene().light(1).unwrap().0, lights[2]);

        drag_right(&mut editor);
        assert!(point_position(&editor, lights[2]).x > start.x);
        assert_eq!(point_position(&editor, lights[1]), start);
        assert_eq!(point_position(&editor, lights[3]), start);

        let marker_index = editor.markers().light_map().scene_to_editor(1).unwrap();
        let moved = editor.markers().light_marker(marker_index).unwrap();
        assert_eq!(moved.id, marker);
        assert!(moved.position.abs_diff_eq(point_position(&editor, lights[2]), 1e-6));
    }

    #[test]
    fn test_camera_drag_follows_selected_marker() {
        let mut editor = x_handle_editor();
        let copy = editor.add_camera();
        let original = editor.scene().camera(0).unwrap().0;

        let marker = editor.markers().camera_marker(0).unwrap().id;
        editor.select(SelectionTarget::Marker(marker));
        assert_eq!(editor.scene().active_camera_index(), 0);
        editor.set_active_camera(1);

        drag_right(&mut editor);
        let moved = editor.scene().camera(0).unwrap().1.position;
        let still = editor.scene().camera(1).unwrap().1.position;
        assert_eq!(editor.scene().camera(1).unwrap().0, copy);
        assert_eq!(editor.scene().camera(0).unwrap().0, original);
        assert!(moved.x > 0.0);
        assert_eq!(still, Vec3::ZERO);
    }

    #[test]
    fn test_nan_frame_step_keeps_attached_objects() {
        let mut editor = editor();
        let path = editor.scene_mut().add_path(three_frame_path());
        let camera = ObjectRef::Camera(editor.scene().camera(0).unwrap().0);
        editor.set_object_path(camera, Some(path));
        editor.playback_mut().play();
        editor.update(0.5);

        editor.update(f32::NAN);
        assert_eq!(editor.playback().time(), 0.5);
        let position = editor.scene().active_camera().unwrap().1.position;
        assert!(position.abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_material_layers() {
        let mut editor = editor();
        let mut dialogs = ScriptedDialogs::always(true);
        assert!(editor.add_material_layer(&mut dialogs).is_none());

        editor.add_material();
        editor.add_material();
        assert_eq!(editor.selected_material(), 1);
        assert_eq!(editor.scene().material(1).unwrap().1.name, "Material 1");
        assert_eq!(editor.scene().material(1).unwrap().1.id, 1);

        for expected in 0..crate::material::MAX_MATERIAL_LAYERS {
            assert_eq!(editor.add_material_layer(&mut dialogs), Some(expected));
        }
        assert!(editor.add_material_layer(&mut dialogs).is_none());
        assert_eq!(dialogs.messages.len(), 1);

        assert!(editor.remove_material_layer(0));
        assert!(!editor.remove_material_layer(5));
        assert_eq!(editor.scene().material(1).unwrap().1.layer_count(), 2);
        assert_eq!(editor.scene().material(0).unwrap().1.layer_count(), 0);
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_material_texture_and_delete() {
        let mut editor = editor();
        let mut dialogs = ScriptedDialogs::always(true);
        editor.add_material();
        dialogs.push_file("textures/brick_n.png");
        assert!(editor.load_material_texture(TextureSlot::Normal, &mut dialogs));
        assert!(!editor.load_material_texture(TextureSlot::Layer(0), &mut dialogs));
        let material = editor.scene().material(0).unwrap().1;
        assert_eq!(material.normal_map, Some(PathBuf::from("textures/brick_n.png")));

        editor.add_material();
        editor.set_selected_material(1);
        assert!(editor.delete_material(1, &mut dialogs));
        assert_eq!(editor.selected_material(), 0);
        assert_eq!(dialogs.questions, vec!["Delete material?".to_string()]);
    }

    #[test]
    fn test_save_material_alone() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gold.fscene");
        let mut editor = editor();
        editor.add_point_light();
        editor.add_material();
        editor.edit_material(|material| material.name = "Gold".to_string());

        let mut dialogs = ScriptedDialogs::default();
        dialogs.push_file(file.clone());
        let exporter = FsceneExporter::default();
        assert!(editor.save_material(&exporter, &mut dialogs));

        let saved = exporter.import_scene(&file).unwrap();
        assert_eq!(saved.material_count(), 1);
        assert_eq!(saved.material(0).unwrap().1.name, "Gold");
        assert_eq!(saved.light_count(), 0);
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_path_session_regenerates_keyframe_markers() {
        let mut editor = editor();
        editor.scene_mut().add_path(three_frame_path());
        assert!(editor.start_path_editor());
        assert_eq!(editor.markers().keyframe_marker_count(), 3);

        editor.path_set_active_frame(1);
        let selected = editor.selection().primary_marker().unwrap();
        assert_eq!(selected, editor.markers().keyframe_marker(1).unwrap().id);
        assert_eq!(editor.selection().category(), Some(SelectionCategory::Keyframe));

        editor.path_set_frame_time(1.5);
        assert_eq!(editor.path_add_frame(), Some(2));
        assert_eq!(editor.markers().keyframe_marker_count(), 4);
        // The new keyframe is active and its fresh marker is selected.
        assert_eq!(
            editor.selection().primary_marker(),
            Some(editor.markers().keyframe_marker(2).unwrap().id)
        );

        assert!(editor.path_remove_frame());
        assert_eq!(editor.markers().keyframe_marker_count(), 3);

        editor.close_path_editor();
        assert!(editor.path_editor().is_none());
        assert_eq!(editor.markers().keyframe_marker_count(), 0);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_keyframe_selection_requires_session() {
        let mut editor = editor();
        editor.scene_mut().add_path(three_frame_path());
        editor.start_path_editor();
        let marker = editor.markers().keyframe_marker(0).unwrap().id;

        editor.path_editor = None;
        editor.select(SelectionTarget::Marker(marker));
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_keyframe_drag_edits_path() {
        let mut picker = ScriptedPicker::default();
        picker.editor_hits.push_back(Some(EditorHit::GizmoHandle {
            gizmo: GizmoType::Translate,
            axis: GizmoAxis::Y,
        }));
        let mut editor = scripted(picker);
        let path_id = editor.scene_mut().add_path(three_frame_path());
        editor.start_path_editor();
        editor.path_set_active_frame(0);

        editor.on_pointer_event(PointerEvent::down(PointerButton::Left, Vec2::splat(0.5), 0.0));
        editor.on_pointer_event(PointerEvent::moved(Vec2::new(0.5, 0.4), 0.05));
        editor.on_pointer_event(PointerEvent::up(PointerButton::Left, Vec2::new(0.5, 0.4), 0.1));

        let keyframe = *editor.scene().path_by_id(path_id).unwrap().keyframe(0).unwrap();
        assert!(keyframe.position.y > 0.0);
        assert!((keyframe.target - keyframe.position).abs_diff_eq(Vec3::Z, 1e-5));
        let marker = editor.markers().keyframe_marker(0).unwrap();
        assert!(marker.position.abs_diff_eq(keyframe.position, 1e-6));
    }

    #[test]
    fn test_paths_locked_while_editing() {
        let mut editor = editor();
        let mut dialogs = ScriptedDialogs::always(true);
        let id = editor.add_path().unwrap();
        assert_eq!(editor.scene().path_by_id(id).unwrap().name(), "Path 0");
        assert!(editor.path_editor().is_some());

        assert!(editor.add_path().is_none());
        assert!(!editor.delete_path(&mut dialogs));

        editor.close_path_editor();
        assert!(editor.delete_path(&mut dialogs));
        assert_eq!(editor.scene().path_count(), 0);
    }

    #[test]
    fn test_attach_twice_fails() {
        let mut editor = editor();
        let first = editor.scene_mut().add_path(three_frame_path());
        let second = editor.scene_mut().add_path(three_frame_path());
        let camera = ObjectRef::Camera(editor.scene().camera(0).unwrap().0);

        let attachments = &mut editor.scene_mut().attachments;
        attachments.attach(camera, first).unwrap();
        assert!(attachments.attach(camera, second).is_err());
        assert_eq!(attachments.path_of(camera), Some(first));

        // The editor switches paths by detaching first.
        assert!(editor.set_object_path(camera, Some(second)));
        assert_eq!(editor.scene().attachments.path_of(camera), Some(second));
    }

    #[test]
    fn test_detach_resets_instance_pose() {
        let mut editor = editor();
        let path = editor.scene_mut().add_path(three_frame_path());
        let (_, instance) = editor.scene_mut().add_model(ModelAsset::new("crate", 1.0));
        let object = ObjectRef::ModelInstance(instance);

        assert!(editor.set_object_path(object, Some(path)));
        editor.seek_playback(2.0);
        assert!(editor.scene().instance(instance).unwrap().translation.abs_diff_eq(Vec3::Y, 1e-5));

        assert!(editor.set_object_path(object, None));
        let pose = editor.scene().instance(instance).unwrap().frame();
        assert!(pose.abs_diff_eq(&vantage_editor_paths::Frame::CANONICAL, 1e-6));
        assert_eq!(editor.instance_rotation_degrees(instance), Some(Vec3::ZERO));
    }

    #[test]
    fn test_playback_moves_attached_camera() {
        let mut editor = editor();
        let path = editor.scene_mut().add_path(three_frame_path());
        let camera = ObjectRef::Camera(editor.scene().camera(0).unwrap().0);
        editor.set_object_path(camera, Some(path));

        editor.playback_mut().play();
        editor.update(0.5);
        let position = editor.scene().active_camera().unwrap().1.position;
        assert!(position.abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), 1e-5));
        assert!(editor.markers().camera_marker(0).unwrap().position.abs_diff_eq(position, 1e-6));
    }

    #[test]
    fn test_camera_add_and_delete() {
        let mut editor = editor();
        let mut dialogs = ScriptedDialogs::always(true);
        assert!(!editor.delete_camera(&mut dialogs));
        assert_eq!(dialogs.messages.len(), 1);

        editor.add_camera();
        assert_eq!(editor.scene().camera_count(), 2);
        assert_eq!(editor.scene().active_camera_index(), 1);
        assert_eq!(editor.scene().active_camera().unwrap().1.name, "Default_");
        assert_eq!(editor.markers().camera_marker_count(), 2);
        assert_eq!(editor.selection().category(), Some(SelectionCategory::Camera));

        assert!(editor.delete_camera(&mut dialogs));
        assert_eq!(editor.scene().camera_count(), 1);
        assert_eq!(editor.markers().camera_marker_count(), 1);
        assert_eq!(
            editor.selection().primary_marker(),
            Some(editor.markers().camera_marker(0).unwrap().id)
        );
    }

    #[test]
    fn test_model_load_failure_reports_and_keeps_scene() {
        let mut editor = editor();
        let mut dialogs = ScriptedDialogs::default();
        let mut loader = |path: &Path| Err::<ModelAsset, _>(LoadError::NotFound(path.to_path_buf()));
        assert!(editor.add_model_from_file(&mut loader, &mut dialogs, Path::new("missing.obj")).is_none());
        assert_eq!(editor.scene().model_count(), 0);
        assert_eq!(dialogs.messages.len(), 1);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_model_instances() {
        let mut editor = editor();
        let mut dialogs = ScriptedDialogs::always(true);
        dialogs.push_file("meshes/tree.obj");
        let mut loader = |path: &Path| Ok::<_, LoadError>(ModelAsset::from_file(path, 2.0));

        editor.add_model(&mut loader, &mut dialogs).unwrap();
        assert_eq!(editor.scene().model(0).unwrap().1.name, "tree");

        let first = editor.selection().primary_instance().unwrap();
        editor.set_instance_rotation_degrees(first, Vec3::new(0.0, 45.0, 0.0));
        let copy = editor.add_model_instance().unwrap();
        assert_eq!(editor.selected_instance(), 1);
        let copied = editor.scene().instance(copy).unwrap();
        assert_eq!(copied.name, "tree_1");
        assert!(editor.instance_rotation_degrees(copy).unwrap().abs_diff_eq(Vec3::new(0.0, 45.0, 0.0), 1e-3));

        assert!(editor.delete_model_instance(&mut dialogs));
        assert_eq!(editor.scene().model(0).unwrap().1.instance_count(), 1);

        // Removing the last instance removes the model.
        assert!(editor.delete_model_instance(&mut dialogs));
        assert_eq!(editor.scene().model_count(), 0);
    }

    #[test]
    fn test_hotkeys_switch_gizmo() {
        let mut editor = editor();
        assert!(editor.handle_hotkey('e'));
        assert_eq!(editor.gizmos().active_type(), GizmoType::Rotate);
        assert!(editor.gizmos().visible().is_none());
        assert!(!editor.handle_hotkey('q'));
    }

    #[test]
    fn test_render_order() {
        let mut editor = editor();
        editor.scene_mut().add_path(three_frame_path());
        editor.start_path_editor();
        editor.path_set_active_frame(0);

        let mut renderer = RecordingRenderer::new();
        editor.render(&mut renderer);
        assert_eq!(renderer.calls.len(), 3);
        assert!(matches!(renderer.calls[0], DrawCall::SelectionOutline { .. }));
        assert!(matches!(
            renderer.calls[1],
            DrawCall::EditorScene {
                gizmo: Some(GizmoType::Translate),
                ..
            }
        ));
        assert!(matches!(renderer.calls[2], DrawCall::Lines { vertices } if vertices > 0));
        assert!(editor.debug_drawer().len() <= editor.config().max_debug_vertices);
    }

    #[test]
    fn test_save_and_close() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scene.fscene");
        let exporter = FsceneExporter::default();

        let mut editor = editor();
        editor.add_point_light();
        assert!(editor.is_dirty());

        let mut dialogs = ScriptedDialogs::always(true);
        dialogs.push_file(file.clone());
        assert!(editor.close(&exporter, &mut dialogs));
        assert_eq!(dialogs.questions, vec![SAVE_CHANGES_PROMPT.to_string()]);
        assert!(!editor.is_dirty());
        assert_eq!(editor.scene_file(), Some(file.as_path()));

        let mut reloaded = SceneEditor::new(Scene::new(), EditorConfig::default());
        assert!(reloaded.load_scene(&file, &mut dialogs));
        assert_eq!(reloaded.scene().light_count(), 1);
        assert_eq!(reloaded.markers().light_marker_count(), 1);
    }

    #[test]
    fn test_viewport_controls() {
        let mut editor = editor();
        editor.on_pointer_event(PointerEvent::moved(Vec2::splat(0.5), 0.0));
        editor.on_pointer_event(PointerEvent::down(PointerButton::Right, Vec2::splat(0.5), 0.0));
        assert!(editor.on_pointer_event(PointerEvent::moved(Vec2::new(0.6, 0.5), 0.1)));
        editor.on_pointer_event(PointerEvent::up(PointerButton::Right, Vec2::new(0.6, 0.5), 0.2));

        let camera = editor.viewport_camera();
        assert!(((camera.position - camera.target).length() - 20.0).abs() < 1e-3);
        assert!(camera.position.x.abs() > 1.0);
        assert!(!editor.on_pointer_event(PointerEvent::moved(Vec2::new(0.7, 0.5), 0.3)));

        editor.on_pointer_event(PointerEvent::wheel(1.0, Vec2::splat(0.5), 0.4));
        let camera = editor.viewport_camera();
        assert!(((camera.position - camera.target).length() - 18.0).abs() < 1e-3);
    }
}
