// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor panels.
//!
//! Three egui windows drive the [`SceneEditor`]: the scene panel (models,
//! cameras, lights, paths, gizmo choice), the material panel and the path
//! editor panel, shown while a path editing session is open. Widgets only
//! report whether they fired; every change goes through the editor.

use crate::dialogs::Dialogs;
use crate::editor::SceneEditor;
use crate::export::SceneExporter;
use crate::gizmo::GizmoType;
use crate::loader::ModelLoader;
use crate::material::{LayerBlend, LayerNdf, LayerType, Material, MaterialLayer, TextureSlot};
use crate::scene::{Light, ObjectRef};
use glam::Vec3;
use vantage_editor_paths::PathId;

/// Services the panels hand to editor operations
pub struct PanelServices<'a> {
    /// Confirmations, messages and file choosers
    pub dialogs: &'a mut dyn Dialogs,
    /// Model loading
    pub loader: &'a mut dyn ModelLoader,
    /// Scene saving
    pub exporter: &'a dyn SceneExporter,
}

/// Drag editors for the three components of a vector
fn vec3_drag(ui: &mut egui::Ui, label: &str, value: &mut Vec3, speed: f64) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut changed = false;
        changed |= ui.add(egui::DragValue::new(&mut value.x).speed(speed).prefix("X: ")).changed();
        changed |= ui.add(egui::DragValue::new(&mut value.y).speed(speed).prefix("Y: ")).changed();
        changed |= ui.add(egui::DragValue::new(&mut value.z).speed(speed).prefix("Z: ")).changed();
        changed
    })
    .inner
}

fn color_edit(ui: &mut egui::Ui, label: &str, color: &mut Vec3) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut rgb = color.to_array();
        let changed = ui.color_edit_button_rgb(&mut rgb).changed();
        if changed {
            *color = Vec3::from_array(rgb);
        }
        changed
    })
    .inner
}

/// Text field that reports the new text when it was edited
fn name_edit(ui: &mut egui::Ui, current: &str) -> Option<String> {
    let mut name = current.to_string();
    let changed = ui
        .horizontal(|ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut name).changed()
        })
        .inner;
    changed.then_some(name)
}

/// Combo box assigning `object` to a path, or to none
fn object_path_combo(ui: &mut egui::Ui, editor: &mut SceneEditor, object: ObjectRef, id_salt: &str) {
    let current = editor.scene().attachments.path_of(object);
    let label = current
        .and_then(|id| editor.scene().path_by_id(id))
        .map_or_else(|| "None".to_string(), |path| path.name().to_string());

    let mut chosen: Option<Option<PathId>> = None;
    egui::ComboBox::new(id_salt, "Path")
        .selected_text(label)
        .show_ui(ui, |ui| {
            if ui.selectable_label(current.is_none(), "None").clicked() {
                chosen = Some(None);
            }
            for (id, path) in editor.scene().paths() {
                if ui.selectable_label(current == Some(id), path.name()).clicked() {
                    chosen = Some(Some(id));
                }
            }
        });

    if let Some(path) = chosen {
        editor.set_object_path(object, path);
    }
}

/// Scene editor window
#[derive(Debug, Clone)]
pub struct ScenePanel {
    /// Whether the window is shown
    pub open: bool,
}

impl Default for ScenePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenePanel {
    /// Create an open panel
    pub fn new() -> Self {
        Self { open: true }
    }

    /// Show the window
    pub fn show(&mut self, ctx: &egui::Context, editor: &mut SceneEditor, services: &mut PanelServices<'_>) {
        let mut open = self.open;
        egui::Window::new("Scene Editor")
            .open(&mut open)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.ui(ui, editor, services);
                });
            });
        self.open = open;
    }

    /// Draw the panel contents
    pub fn ui(&mut self, ui: &mut egui::Ui, editor: &mut SceneEditor, services: &mut PanelServices<'_>) {
        self.toolbar(ui, editor, services);
        ui.separator();

        egui::CollapsingHeader::new("Scene")
            .default_open(true)
            .show(ui, |ui| self.scene_section(ui, editor));
        egui::CollapsingHeader::new("Models")
            .default_open(true)
            .show(ui, |ui| self.models_section(ui, editor, services));
        egui::CollapsingHeader::new("Cameras")
            .default_open(false)
            .show(ui, |ui| self.cameras_section(ui, editor, services));
        egui::CollapsingHeader::new("Lights")
            .default_open(false)
            .show(ui, |ui| self.lights_section(ui, editor, services));
        egui::CollapsingHeader::new("Paths")
            .default_open(true)
            .show(ui, |ui| self.paths_section(ui, editor, services));
    }

    fn toolbar(&mut self, ui: &mut egui::Ui, editor: &mut SceneEditor, services: &mut PanelServices<'_>) {
        ui.horizontal(|ui| {
            let title = if editor.is_dirty() { "Save Scene*" } else { "Save Scene" };
            if ui.button(title).clicked() {
                editor.save_scene(services.exporter, &mut *services.dialogs);
            }
            ui.separator();

            let active = editor.gizmos().active_type();
            for kind in GizmoType::ALL {
                let text = format!("{} ({})", kind.name(), kind.hotkey());
                if ui.selectable_label(active == kind, text).clicked() {
                    editor.set_active_gizmo(kind);
                }
            }
        });
    }

    fn scene_section(&mut self, ui: &mut egui::Ui, editor: &mut SceneEditor) {
        let mut ambient = editor.scene().ambient_intensity;
        if color_edit(ui, "Ambient", &mut ambient) {
            editor.scene_mut().ambient_intensity = ambient;
            editor.mark_dirty();
        }

        let mut speed = editor.scene().camera_speed;
        let changed = ui
            .horizontal(|ui| {
                ui.label("Camera speed");
                ui.add(egui::DragValue::new(&mut speed).speed(0.05).range(0.0..=100.0))
                    .changed()
            })
            .inner;
        if changed {
            editor.scene_mut().camera_speed = speed;
            editor.mark_dirty();
        }
    }

    fn models_section(&mut self, ui: &mut egui::Ui, editor: &mut SceneEditor, services: &mut PanelServices<'_>) {
        ui.horizontal(|ui| {
            if ui.button("Add Model").clicked() {
                editor.add_model(&mut *services.loader, &mut *services.dialogs);
            }
            let has_models = editor.scene().model_count() > 0;
            if ui.add_enabled(has_models, egui::Button::new("Delete Model")).clicked() {
                let index = editor.selected_model();
                editor.delete_model(index, &mut *services.dialogs);
            }
        });

        let model_index = editor.selected_model();
        let Some((_, model)) = editor.scene().model(model_index) else {
            ui.label("No models");
            return;
        };
        let model_name = model.name.clone();

        let mut chosen = None;
        egui::ComboBox::new("model_combo", "Model")
            .selected_text(&model_name)
            .show_ui(ui, |ui| {
                for (index, (_, model)) in editor.scene().models().enumerate() {
                    if ui.selectable_label(index == model_index, &model.name).clicked() {
                        chosen = Some(index);
                    }
                }
            });
        if let Some(index) = chosen {
            editor.set_selected_model(index);
            return;
        }

        if let Some(name) = name_edit(ui, &model_name) {
            if let Some(model) = editor.scene_mut().model_mut(model_index) {
                model.name = name;
            }
            editor.mark_dirty();
        }

        ui.separator();
        self.instance_ui(ui, editor, services);
    }

    fn instance_ui(&mut self, ui: &mut egui::Ui, editor: &mut SceneEditor, services: &mut PanelServices<'_>) {
        let instance_index = editor.selected_instance();
        let Some((_, model)) = editor.scene().model(editor.selected_model()) else {
            return;
        };
        let Some((id, instance)) = model.instance(instance_index) else {
            return;
        };
        let mut instance = instance.clone();

        let mut chosen = None;
        egui::ComboBox::new("instance_combo", "Instance")
            .selected_text(&instance.name)
            .show_ui(ui, |ui| {
                for (index, (_, other)) in model.instances().enumerate() {
                    if ui.selectable_label(index == instance_index, &other.name).clicked() {
                        chosen = Some(index);
                    }
                }
            });
        if let Some(index) = chosen {
            editor.set_selected_instance(index);
            return;
        }

        ui.horizontal(|ui| {
            if ui.button("Add Instance").clicked() {
                editor.add_model_instance();
            }
            if ui.button("Delete Instance").clicked() {
                editor.delete_model_instance(&mut *services.dialogs);
            }
        });

        let mut changed = ui.checkbox(&mut instance.visible, "Visible").changed();
        changed |= vec3_drag(ui, "Translation", &mut instance.translation, 0.1);
        changed |= vec3_drag(ui, "Scaling", &mut instance.scaling, 0.01);
        if changed {
            if let Some(target) = editor.scene_mut().instance_mut(id) {
                target.visible = instance.visible;
                target.translation = instance.translation;
                target.scaling = instance.scaling;
            }
            editor.mark_dirty();
        }

        let mut rotation = editor.instance_rotation_degrees(id).unwrap_or(Vec3::ZERO);
        if vec3_drag(ui, "Rotation", &mut rotation, 1.0) {
            editor.set_instance_rotation_degrees(id, rotation);
        }

        object_path_combo(ui, editor, ObjectRef::ModelInstance(id), "instance_path");
    }

    fn cameras_section(&mut self, ui: &mut egui::Ui, editor: &mut SceneEditor, services: &mut PanelServices<'_>) {
        let active = editor.scene().active_camera_index();
        let Some((camera_id, camera)) = editor.scene().active_camera() else {
            return;
        };
        let mut camera = camera.clone();

        let mut chosen = None;
        egui::ComboBox::new("camera_combo", "Active camera")
            .selected_text(&camera.name)
            .show_ui(ui, |ui| {
                for (index, (_, other)) in editor.scene().cameras().enumerate() {
                    if ui.selectable_label(index == active, &other.name).clicked() {
                        chosen = Some(index);
                    }
                }
            });
        if let Some(index) = chosen {
            editor.set_active_camera(index);
            return;
        }

        ui.horizontal(|ui| {
            if ui.button("Add Camera").clicked() {
                editor.add_camera();
            }
            if ui.button("Delete Camera").clicked() {
                editor.delete_camera(&mut *services.dialogs);
            }
        });

        let mut changed = false;
        if let Some(name) = name_edit(ui, &camera.name) {
            camera.name = name;
            changed = true;
        }

        let mut fov = camera.fov_y.to_degrees();
        if ui.add(egui::Slider::new(&mut fov, 1.0..=170.0).text("Field of view")).changed() {
            camera.fov_y = fov.to_radians();
            changed = true;
        }
        changed |= ui
            .add(egui::Slider::new(&mut camera.aspect_ratio, 0.1..=4.0).text("Aspect ratio"))
            .changed();

        let (mut near, mut far) = (camera.near_z, camera.far_z);
        let depth_changed = ui
            .horizontal(|ui| {
                ui.label("Depth");
                let near_changed = ui.add(egui::DragValue::new(&mut near).speed(0.01).prefix("Near: ")).changed();
                let far_changed = ui.add(egui::DragValue::new(&mut far).speed(1.0).prefix("Far: ")).changed();
                near_changed || far_changed
            })
            .inner;
        if depth_changed {
            camera.set_depth_range(near, far);
            changed = true;
        }

        changed |= vec3_drag(ui, "Position", &mut camera.position, 0.1);
        changed |= vec3_drag(ui, "Target", &mut camera.target, 0.1);

        if changed {
            if let Some(target) = editor.scene_mut().camera_mut(active) {
                *target = camera;
            }
            editor.mark_dirty();
        }

        object_path_combo(ui, editor, ObjectRef::Camera(camera_id), "camera_path");
    }

    fn lights_section(&mut self, ui: &mut egui::Ui, editor: &mut SceneEditor, services: &mut PanelServices<'_>) {
        ui.horizontal(|ui| {
            if ui.button("Add Point Light").clicked() {
                editor.add_point_light();
            }
            if ui.button("Add Directional Light").clicked() {
                editor.add_directional_light();
            }
        });

        let selected = editor.selected_light();
        let Some((light_id, light)) = editor.scene().light(selected) else {
            ui.label("No lights");
            return;
        };
        let mut light = light.clone();

        let mut chosen = None;
        egui::ComboBox::new("light_combo", "Light")
            .selected_text(format!("{} ({})", light.name(), light.type_name()))
            .show_ui(ui, |ui| {
                for (index, (_, other)) in editor.scene().lights().enumerate() {
                    if ui.selectable_label(index == selected, other.name()).clicked() {
                        chosen = Some(index);
                    }
                }
            });
        if let Some(index) = chosen {
            editor.set_selected_light(index);
            return;
        }

        if ui.button("Delete Light").clicked() {
            editor.delete_light(selected, &mut *services.dialogs);
            return;
        }

        let mut changed = false;
        if let Some(name) = name_edit(ui, light.name()) {
            light.set_name(name);
            changed = true;
        }
        match &mut light {
            Light::Point(point) => {
                changed |= color_edit(ui, "Color", &mut point.color);
                changed |= ui
                    .add(egui::Slider::new(&mut point.intensity, 0.0..=100.0).text("Intensity"))
                    .changed();
                changed |= vec3_drag(ui, "Position", &mut point.position, 0.1);
            }
            Light::Directional(directional) => {
                changed |= color_edit(ui, "Color", &mut directional.color);
                changed |= ui
                    .add(egui::Slider::new(&mut directional.intensity, 0.0..=100.0).text("Intensity"))
                    .changed();
                if vec3_drag(ui, "Direction", &mut directional.direction, 0.01) {
                    directional.direction = directional.direction.normalize_or_zero();
                    changed |= directional.direction != Vec3::ZERO;
                }
            }
        }

        if changed {
            if let Some(target) = editor.scene_mut().light_mut(selected) {
                *target = light;
            }
            editor.mark_dirty();
        }

        object_path_combo(ui, editor, ObjectRef::Light(light_id), "light_path");
    }

    fn paths_section(&mut self, ui: &mut egui::Ui, editor: &mut SceneEditor, services: &mut PanelServices<'_>) {
        let editing = editor.path_editor().is_some();

        ui.horizontal(|ui| {
            if ui.add_enabled(!editing, egui::Button::new("Add Path")).clicked() {
                editor.add_path();
            }
            let has_paths = editor.scene().path_count() > 0;
            if ui.add_enabled(!editing && has_paths, egui::Button::new("Delete Path")).clicked() {
                editor.delete_path(&mut *services.dialogs);
            }
            if ui.add_enabled(!editing && has_paths, egui::Button::new("Edit Path")).clicked() {
                editor.start_path_editor();
            }
        });

        let selected = editor.selected_path();
        if let Some((_, path)) = editor.scene().path(selected) {
            let mut chosen = None;
            ui.add_enabled_ui(!editing, |ui| {
                egui::ComboBox::new("path_combo", "Path")
                    .selected_text(path.name())
                    .show_ui(ui, |ui| {
                        for (index, (_, other)) in editor.scene().paths().enumerate() {
                            if ui.selectable_label(index == selected, other.name()).clicked() {
                                chosen = Some(index);
                            }
                        }
                    });
            });
            if let Some(index) = chosen {
                editor.set_selected_path(index);
            }
        }

        let mut render_all = editor.render_all_paths();
        if ui.checkbox(&mut render_all, "Render all paths").changed() {
            editor.set_render_all_paths(render_all);
        }

        ui.separator();
        ui.horizontal(|ui| {
            let label = if editor.playback().is_playing() { "Pause" } else { "Play" };
            if ui.button(label).clicked() {
                editor.playback_mut().toggle();
            }
            if ui.button("Stop").clicked() {
                editor.playback_mut().stop();
                editor.seek_playback(0.0);
            }
            let mut time = editor.playback().time();
            if ui
                .add(egui::DragValue::new(&mut time).speed(0.05).range(0.0..=f32::MAX).suffix(" s"))
                .changed()
            {
                editor.seek_playback(time);
            }
        });
    }
}

/// Path editor window, shown while a session is open
#[derive(Debug, Clone, Default)]
pub struct PathEditorPanel;

impl PathEditorPanel {
    /// Create the panel
    pub fn new() -> Self {
        Self
    }

    /// Show the window if a session is open
    pub fn show(&mut self, ctx: &egui::Context, editor: &mut SceneEditor) {
        if editor.path_editor().is_none() {
            return;
        }
        let mut open = true;
        egui::Window::new("Path Editor")
            .open(&mut open)
            .default_width(260.0)
            .show(ctx, |ui| self.ui(ui, editor));
        if !open {
            editor.close_path_editor();
        }
    }

    /// Draw the panel contents
    pub fn ui(&mut self, ui: &mut egui::Ui, editor: &mut SceneEditor) {
        let Some(session) = editor.path_editor() else {
            ui.label("No path is being edited");
            return;
        };
        let active = session.active_frame();
        let mut frame_time = session.frame_time();
        let Some(path) = editor.scene().path_by_id(session.path_id()) else {
            return;
        };
        let name = path.name().to_string();
        let mut looping = path.is_looping();
        let times: Vec<f32> = path.keyframes().iter().map(|keyframe| keyframe.time).collect();

        if let Some(name) = name_edit(ui, &name) {
            editor.path_set_name(name);
        }
        if ui.checkbox(&mut looping, "Looping").changed() {
            editor.path_set_looping(looping);
        }

        ui.separator();
        ui.label(format!("Keyframes ({})", times.len()));
        let mut chosen = None;
        egui::ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
            for (index, time) in times.iter().enumerate() {
                let text = format!("#{index}  t = {time:.2} s");
                if ui.selectable_label(index == active, text).clicked() {
                    chosen = Some(index);
                }
            }
        });
        if let Some(index) = chosen {
            editor.path_set_active_frame(index);
        }

        ui.separator();
        let time_changed = ui
            .horizontal(|ui| {
                ui.label("Frame time");
                ui.add(egui::DragValue::new(&mut frame_time).speed(0.05).range(0.0..=f32::MAX).suffix(" s"))
                    .changed()
            })
            .inner;
        if time_changed {
            editor.path_set_frame_time(frame_time);
        }

        ui.horizontal(|ui| {
            if ui.button("Add Frame").clicked() {
                editor.path_add_frame();
            }
            let removable = times.len() > 1;
            if ui.add_enabled(removable, egui::Button::new("Remove Frame")).clicked() {
                editor.path_remove_frame();
            }
            if ui.button("Update Time").clicked() {
                editor.path_update_frame_time();
            }
        });

        ui.separator();
        if ui.button("Close").clicked() {
            editor.close_path_editor();
        }
    }
}

/// Material editor window
#[derive(Debug, Clone)]
pub struct MaterialPanel {
    /// Whether the window is shown
    pub open: bool,
}

impl Default for MaterialPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Combo box over the values of a small enum
fn enum_combo<T: Copy + PartialEq>(
    ui: &mut egui::Ui,
    id_salt: impl std::hash::Hash,
    label: &str,
    value: &mut T,
    all: &[T],
    name: impl Fn(&T) -> &'static str,
) -> bool {
    let mut changed = false;
    egui::ComboBox::new(id_salt, label)
        .selected_text(name(value))
        .show_ui(ui, |ui| {
            for option in all {
                if ui.selectable_label(option == value, name(option)).clicked() && option != value {
                    *value = *option;
                    changed = true;
                }
            }
        });
    changed
}

impl MaterialPanel {
    /// Create an open panel
    pub fn new() -> Self {
        Self { open: true }
    }

    /// Show the window
    pub fn show(&mut self, ctx: &egui::Context, editor: &mut SceneEditor, services: &mut PanelServices<'_>) {
        let mut open = self.open;
        egui::Window::new("Material Editor")
            .open(&mut open)
            .default_width(400.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.ui(ui, editor, services);
                });
            });
        self.open = open;
    }

    /// Draw the panel contents
    pub fn ui(&mut self, ui: &mut egui::Ui, editor: &mut SceneEditor, services: &mut PanelServices<'_>) {
        ui.horizontal(|ui| {
            if ui.button("Add Material").clicked() {
                editor.add_material();
            }
            let has_materials = editor.scene().material_count() > 0;
            if ui.add_enabled(has_materials, egui::Button::new("Delete Material")).clicked() {
                let index = editor.selected_material();
                editor.delete_material(index, &mut *services.dialogs);
            }
        });

        let selected = editor.selected_material();
        let Some((_, material)) = editor.scene().material(selected) else {
            ui.label("No materials");
            return;
        };
        let mut material = material.clone();

        let mut chosen = None;
        egui::ComboBox::new("material_combo", "Material")
            .selected_text(&material.name)
            .show_ui(ui, |ui| {
                for (index, (_, other)) in editor.scene().materials().enumerate() {
                    if ui.selectable_label(index == selected, &other.name).clicked() {
                        chosen = Some(index);
                    }
                }
            });
        if let Some(index) = chosen {
            editor.set_selected_material(index);
            return;
        }

        if ui.button("Save Material").clicked() {
            editor.save_material(services.exporter, &mut *services.dialogs);
        }
        ui.separator();

        let mut changed = material_properties(ui, &mut material);
        ui.separator();

        let mut texture_request = None;
        for slot in [TextureSlot::Normal, TextureSlot::Alpha, TextureSlot::Height] {
            if texture_row(ui, &material, slot) {
                texture_request = Some(slot);
            }
        }

        let mut removed = None;
        for index in 0..material.layer_count() {
            let Some(layer) = material.layer_mut(index) else {
                break;
            };
            egui::CollapsingHeader::new(format!("Layer {index}"))
                .id_salt(("material_layer", index))
                .default_open(true)
                .show(ui, |ui| {
                    let slot = TextureSlot::Layer(index);
                    let file = layer.texture.as_ref().map(|file| file.display().to_string());
                    ui.horizontal(|ui| {
                        ui.label(slot.name());
                        ui.label(file.unwrap_or_default());
                        if ui.small_button("Change").clicked() {
                            texture_request = Some(slot);
                        }
                    });
                    changed |= layer_ui(ui, index, layer);
                    if ui.button("Remove").clicked() {
                        removed = Some(index);
                    }
                });
        }

        if changed {
            editor.edit_material(|target| *target = material);
        }
        if let Some(slot) = texture_request {
            editor.load_material_texture(slot, &mut *services.dialogs);
        }
        if let Some(index) = removed {
            editor.remove_material_layer(index);
            return;
        }

        let can_add = editor
            .scene()
            .material(selected)
            .is_some_and(|(_, material)| material.can_add_layer());
        if can_add {
            ui.separator();
            if ui.button("Add Layer").clicked() {
                editor.add_material_layer(&mut *services.dialogs);
            }
        }
    }
}

/// Name, id, double-sidedness, height and alpha settings
fn material_properties(ui: &mut egui::Ui, material: &mut Material) -> bool {
    let mut changed = false;
    if let Some(name) = name_edit(ui, &material.name) {
        material.name = name;
        changed = true;
    }
    changed |= ui
        .horizontal(|ui| {
            ui.label("ID");
            ui.add(egui::DragValue::new(&mut material.id)).changed()
        })
        .inner;
    changed |= ui.checkbox(&mut material.double_sided, "Double Sided").changed();

    let (mut bias, mut scale) = material.height_modifiers();
    let heights = ui
        .horizontal(|ui| {
            let bias_changed = ui.add(egui::DragValue::new(&mut bias).speed(0.01).prefix("Bias: ")).changed();
            let scale_changed = ui
                .add(egui::DragValue::new(&mut scale).speed(0.01).range(0.0..=f32::MAX).prefix("Scale: "))
                .changed();
            bias_changed || scale_changed
        })
        .inner;
    if heights {
        material.set_height_modifiers(bias, scale);
        changed = true;
    }

    let mut threshold = material.alpha_threshold();
    if ui
        .add(egui::Slider::new(&mut threshold, 0.0..=1.0).text("Alpha Threshold"))
        .changed()
    {
        material.set_alpha_threshold(threshold);
        changed = true;
    }
    changed
}

/// File name of a texture slot with a button asking for a new one
fn texture_row(ui: &mut egui::Ui, material: &Material, slot: TextureSlot) -> bool {
    ui.horizontal(|ui| {
        ui.label(slot.name());
        let file = material.texture(slot).map(|file| file.display().to_string());
        ui.label(file.unwrap_or_default());
        ui.small_button("Change").clicked()
    })
    .inner
}

/// Type, distribution, blend and the parameters the layer type uses
fn layer_ui(ui: &mut egui::Ui, index: usize, layer: &mut MaterialLayer) -> bool {
    let mut changed = false;

    let mut kind = layer.kind;
    if enum_combo(ui, ("layer_type", index), "Type", &mut kind, &LayerType::ALL, LayerType::name) {
        layer.kind = kind;
        layer.extra = glam::Vec4::ZERO;
        changed = true;
    }
    changed |= enum_combo(ui, ("layer_ndf", index), "NDF", &mut layer.ndf, &LayerNdf::ALL, LayerNdf::name);
    changed |= enum_combo(ui, ("layer_blend", index), "Blend", &mut layer.blend, &LayerBlend::ALL, LayerBlend::name);

    if layer.kind.has_albedo() {
        let mut rgba = layer.albedo.to_array();
        let picked = ui
            .horizontal(|ui| {
                ui.label("Albedo");
                ui.color_edit_button_rgba_unmultiplied(&mut rgba).changed()
            })
            .inner;
        if picked {
            layer.albedo = glam::Vec4::from_array(rgba);
            changed = true;
        }
    }

    if layer.kind.has_roughness() {
        let mut roughness = layer.roughness;
        if ui.add(egui::Slider::new(&mut roughness, 0.0..=1.0).text("Roughness")).changed() {
            layer.set_roughness(roughness);
            changed = true;
        }
    }

    match layer.kind {
        LayerType::Conductor => {
            let (mut real, mut imaginary) = layer.conductor_ior();
            let edited = ui
                .horizontal(|ui| {
                    ui.label("IoR");
                    let real_changed = ui
                        .add(egui::DragValue::new(&mut real).speed(0.01).range(0.0..=f32::MAX).prefix("Real: "))
                        .changed();
                    let imaginary_changed = ui
                        .add(
                            egui::DragValue::new(&mut imaginary)
                                .speed(0.01)
                                .range(0.0..=f32::MAX)
                                .prefix("Imaginary: "),
                        )
                        .changed();
                    real_changed || imaginary_changed
                })
                .inner;
            if edited {
                layer.set_conductor_ior(real, imaginary);
                changed = true;
            }
        }
        LayerType::Dielectric => {
            let mut ior = layer.dielectric_ior();
            let edited = ui
                .horizontal(|ui| {
                    ui.label("IoR");
                    ui.add(egui::DragValue::new(&mut ior).speed(0.01).range(0.0..=f32::MAX))
                        .changed()
                })
                .inner;
            if edited {
                layer.set_dielectric_ior(ior);
                changed = true;
            }
        }
        _ => {}
    }
    changed
}
