// SPDX-License-Identifier: MIT OR Apache-2.0
//! Vantage Editor - headless demo
//!
//! Builds a small scene with a layered material, drives the editor through a
//! path editing session, a gizmo drag and a few frames of path playback,
//! then writes the result as an `.fscene` file (first argument,
//! `demo.fscene` by default).

use glam::{Vec2, Vec3};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use vantage_editor_app::{
    Camera, EditorConfig, FsceneExporter, LayerType, ModelAsset, ObjectRef, PointerButton, PointerEvent,
    RecordingRenderer, Scene, SceneEditor, ScriptedDialogs, SelectionTarget, CONFIG_FILE_NAME,
};

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("vantage_editor_app=debug".parse().unwrap())
        .add_directive("vantage_editor_paths=debug".parse().unwrap());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Vantage Editor v{}", env!("CARGO_PKG_VERSION"));

    let config = match EditorConfig::load(&PathBuf::from(CONFIG_FILE_NAME)) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring editor config: {e}");
            EditorConfig::default()
        }
    };
    let output = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("demo.fscene"), PathBuf::from);

    let mut scene = Scene::new();
    let (_, crate_instance) = scene.add_model(ModelAsset::new("crate", 1.0));
    let mut editor = SceneEditor::new(scene, config);
    editor.set_viewport_camera(Camera::new("Viewport").looking_at(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, Vec3::Y));
    let mut dialogs = ScriptedDialogs::always(true);

    // A lamp, a second camera and a two-layer material.
    editor.add_point_light();
    editor.add_camera();
    editor.add_material();
    editor.add_material_layer(&mut dialogs);
    if let Some(coat) = editor.add_material_layer(&mut dialogs) {
        editor.edit_material(|material| {
            if let Some(layer) = material.layer_mut(coat) {
                layer.kind = LayerType::Dielectric;
                layer.set_dielectric_ior(1.5);
            }
        });
    }

    // Three keyframes, one second apart.
    let Some(path) = editor.add_path() else {
        tracing::error!("Could not create a path");
        std::process::exit(1);
    };
    for (time, offset) in [(0.0, Vec3::ZERO), (1.0, Vec3::X * 4.0), (2.0, Vec3::new(4.0, 0.0, -4.0))] {
        editor.path_set_frame_time(time);
        if let Some(index) = editor.path_add_frame() {
            if let Some(edited) = editor.scene_mut().path_mut(path) {
                edited.set_frame_position(index, offset);
            }
        }
    }
    editor.path_set_looping(true);
    editor.close_path_editor();

    // Drag the crate along X with the translate gizmo.
    editor.select(SelectionTarget::Instance(crate_instance));
    let handle = editor.gizmos().active().pivot() + Vec3::X * editor.gizmos().active().handle_length();
    let start = project(editor.viewport_camera(), handle);
    editor.on_pointer_event(PointerEvent::down(PointerButton::Left, start, 0.0));
    editor.on_pointer_event(PointerEvent::moved(start + Vec2::new(0.05, 0.0), 0.05));
    editor.on_pointer_event(PointerEvent::up(PointerButton::Left, start + Vec2::new(0.05, 0.0), 0.1));
    editor.deselect();

    let camera = editor.scene().active_camera().map(|(id, _)| ObjectRef::Camera(id));
    if let Some(camera) = camera {
        editor.set_object_path(camera, Some(path));
    }

    editor.playback_mut().play();
    let mut renderer = RecordingRenderer::new();
    for _ in 0..60 {
        editor.update(1.0 / 30.0);
        renderer.clear();
        editor.render(&mut renderer);
    }
    tracing::info!(
        "Played {:.2} s, last frame issued {} draw calls",
        editor.playback().time(),
        renderer.calls.len()
    );

    let exporter = FsceneExporter::default();
    if !editor.save_scene_to(&exporter, &mut dialogs, &output) {
        std::process::exit(1);
    }
    tracing::info!("Wrote {:?}", output);
}

/// Normalized viewport position of a world point
fn project(camera: &Camera, point: Vec3) -> Vec2 {
    let clip = camera.projection_matrix() * camera.view_matrix() * point.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    Vec2::new(ndc.x * 0.5 + 0.5, 0.5 - ndc.y * 0.5)
}
