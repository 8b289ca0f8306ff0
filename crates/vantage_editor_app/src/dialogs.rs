// SPDX-License-Identifier: MIT OR Apache-2.0
//! Blocking dialogs.
//!
//! The editor asks before destructive actions and for file names. Dialogs
//! are synchronous: they return before the next frame is processed.

use std::collections::VecDeque;
use std::path::PathBuf;

/// File type filter for open/save dialogs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    /// Label shown in the dialog
    pub name: &'static str,
    /// Accepted extensions, without the dot
    pub extensions: &'static [&'static str],
}

/// Scene files
pub const SCENE_FILTER: FileFilter = FileFilter {
    name: "Scene Files",
    extensions: &["fscene"],
};

/// Model files
pub const MODEL_FILTER: FileFilter = FileFilter {
    name: "Model Files",
    extensions: &["obj", "fbx", "gltf", "glb", "bin"],
};

/// Texture images
pub const TEXTURE_FILTER: FileFilter = FileFilter {
    name: "Image Files",
    extensions: &["png", "jpg", "jpeg", "tga", "bmp", "dds", "hdr", "exr"],
};

/// Blocking dialog service
pub trait Dialogs {
    /// Ask a yes/no question
    fn confirm(&mut self, message: &str) -> bool;
    /// Show a message
    fn message(&mut self, message: &str);
    /// Ask for a file to open
    fn open_file(&mut self, filter: &FileFilter) -> Option<PathBuf>;
    /// Ask for a file to write
    fn save_file(&mut self, filter: &FileFilter) -> Option<PathBuf>;
}

/// Dialogs answered from queues, for tests and headless runs.
///
/// Confirmations fall back to `default_confirm` once the queue is empty;
/// file requests return `None` once theirs is.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDialogs {
    confirms: VecDeque<bool>,
    files: VecDeque<PathBuf>,
    /// Answer used when no confirmation is queued
    pub default_confirm: bool,
    /// Questions asked so far
    pub questions: Vec<String>,
    /// Messages shown so far
    pub messages: Vec<String>,
}

impl ScriptedDialogs {
    /// Dialogs that answer every confirmation with `answer`
    pub fn always(answer: bool) -> Self {
        Self {
            default_confirm: answer,
            ..Self::default()
        }
    }

    /// Queue a confirmation answer
    pub fn push_confirm(&mut self, answer: bool) -> &mut Self {
        self.confirms.push_back(answer);
        self
    }

    /// Queue a file chosen in the next open/save dialog
    pub fn push_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.files.push_back(path.into());
        self
    }
}

impl Dialogs for ScriptedDialogs {
    fn confirm(&mut self, message: &str) -> bool {
        self.questions.push(message.to_string());
        self.confirms.pop_front().unwrap_or(self.default_confirm)
    }

    fn message(&mut self, message: &str) {
        tracing::info!("{message}");
        self.messages.push(message.to_string());
    }

    fn open_file(&mut self, _filter: &FileFilter) -> Option<PathBuf> {
        self.files.pop_front()
    }

    fn save_file(&mut self, _filter: &FileFilter) -> Option<PathBuf> {
        self.files.pop_front()
    }
}

/// Native dialogs through `rfd`
#[cfg(feature = "native-dialogs")]
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeDialogs;

#[cfg(feature = "native-dialogs")]
impl Dialogs for NativeDialogs {
    fn confirm(&mut self, message: &str) -> bool {
        let result = rfd::MessageDialog::new()
            .set_title("Vantage Editor")
            .set_description(message)
            .set_buttons(rfd::MessageButtons::YesNo)
            .show();
        matches!(result, rfd::MessageDialogResult::Yes)
    }

    fn message(&mut self, message: &str) {
        rfd::MessageDialog::new()
            .set_title("Vantage Editor")
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }

    fn open_file(&mut self, filter: &FileFilter) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter(filter.name, filter.extensions)
            .pick_file()
    }

    fn save_file(&mut self, filter: &FileFilter) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter(filter.name, filter.extensions)
            .save_file()
    }
}
