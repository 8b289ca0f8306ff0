// SPDX-License-Identifier: MIT OR Apache-2.0
//! Path editing session.
//!
//! A [`PathEditor`] edits one path at a time. It does not hold the path
//! itself: every operation borrows it, and the owner of the path drains the
//! queued [`PathEditorEvent`]s afterwards to keep its own state (keyframe
//! markers, selection) in step.

use crate::keyframe::Frame;
use crate::path::{ObjectPath, PathId};
use tracing::{debug, warn};

/// Notifications emitted by the path editor, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathEditorEvent {
    /// The active keyframe changed (or was re-selected)
    ActiveFrameChanged(usize),
    /// Keyframes were added, removed or re-timed
    KeyframesChanged,
    /// Name or looping flag changed
    PropertiesChanged,
    /// The session was closed
    Finished,
}

/// Editing session for a single path
#[derive(Debug, Clone)]
pub struct PathEditor {
    path: PathId,
    active_frame: usize,
    frame_time: f32,
    open: bool,
    events: Vec<PathEditorEvent>,
}

impl PathEditor {
    /// Open a session on `path`
    pub fn open(id: PathId, path: &ObjectPath) -> Self {
        debug!("Opening path editor for '{}'", path.name());
        Self {
            path: id,
            active_frame: 0,
            frame_time: path.keyframe(0).map_or(0.0, |k| k.time),
            open: true,
            events: Vec::new(),
        }
    }

    /// Path being edited
    pub fn path_id(&self) -> PathId {
        self.path
    }

    /// Index of the active keyframe
    pub fn active_frame(&self) -> usize {
        self.active_frame
    }

    /// Time used by [`PathEditor::add_frame`] and [`PathEditor::update_frame_time`]
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    /// Edit the pending frame time
    pub fn set_frame_time(&mut self, time: f32) {
        self.frame_time = time.max(0.0);
    }

    /// Whether the session is still open
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Make `index` the active keyframe and move the frame time to it
    pub fn set_active_frame(&mut self, path: &ObjectPath, index: usize) {
        let Some(keyframe) = path.keyframe(index) else {
            warn!("Keyframe {} out of range for '{}'", index, path.name());
            return;
        };
        self.active_frame = index;
        self.frame_time = keyframe.time;
        self.events.push(PathEditorEvent::ActiveFrameChanged(index));
    }

    /// Add a keyframe at the pending frame time, copying the active pose.
    ///
    /// Returns the index of the new keyframe, which becomes active.
    pub fn add_frame(&mut self, path: &mut ObjectPath) -> usize {
        let pose = path
            .keyframe(self.active_frame)
            .map_or(Frame::CANONICAL, |k| k.frame());
        let index = path.add_keyframe(self.frame_time, pose.position, pose.target, pose.up);
        debug!("Added keyframe {} at t={}", index, self.frame_time);
        self.events.push(PathEditorEvent::KeyframesChanged);
        self.set_active_frame(path, index);
        index
    }

    /// Remove the active keyframe. The last keyframe of a path cannot be removed.
    pub fn remove_frame(&mut self, path: &mut ObjectPath) -> bool {
        self.remove_frame_at(path, self.active_frame)
    }

    /// Remove the keyframe at `index`, keeping the active frame on the same
    /// keyframe when it sits after the removed one
    pub fn remove_frame_at(&mut self, path: &mut ObjectPath, index: usize) -> bool {
        if path.keyframe_count() <= 1 {
            warn!("Refusing to remove the only keyframe of '{}'", path.name());
            return false;
        }
        if path.remove_keyframe(index).is_none() {
            return false;
        }
        self.events.push(PathEditorEvent::KeyframesChanged);

        let active = if self.active_frame > index {
            self.active_frame - 1
        } else {
            self.active_frame.min(path.keyframe_count() - 1)
        };
        self.set_active_frame(path, active);
        true
    }

    /// Move the active keyframe to the pending frame time
    pub fn update_frame_time(&mut self, path: &mut ObjectPath) {
        let Some(index) = path.set_frame_time(self.active_frame, self.frame_time) else {
            return;
        };
        self.events.push(PathEditorEvent::KeyframesChanged);
        self.set_active_frame(path, index);
    }

    /// Rename the path
    pub fn set_name(&mut self, path: &mut ObjectPath, name: impl Into<String>) {
        path.set_name(name);
        self.events.push(PathEditorEvent::PropertiesChanged);
    }

    /// Toggle looping on the path
    pub fn set_looping(&mut self, path: &mut ObjectPath, looping: bool) {
        if path.is_looping() != looping {
            path.set_looping(looping);
            self.events.push(PathEditorEvent::PropertiesChanged);
        }
    }

    /// End the session
    pub fn close(&mut self) {
        if self.open {
            self.open = false;
            self.events.push(PathEditorEvent::Finished);
        }
    }

    /// Take queued events
    pub fn take_events(&mut self) -> Vec<PathEditorEvent> {
        std::mem::take(&mut self.events)
    }
}
