// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe paths for Vantage Editor.
//!
//! This crate provides everything path related that does not depend on the
//! scene:
//! - Time-sorted keyframe paths with interpolated sampling and looping
//! - The object-to-path attachment registry
//! - A playback clock
//! - The path editing session and its change notifications
//! - Line-list generation for drawing paths
//!
//! ## Architecture
//!
//! Paths are plain data owned by the scene. Objects never point at a path;
//! the [`AttachmentRegistry`] keeps the relation by stable handle instead.
//! The [`PathEditor`] borrows the path for each operation and reports what
//! it changed through [`PathEditorEvent`]s.

pub mod attachment;
pub mod debug_draw;
pub mod editor;
pub mod keyframe;
pub mod path;
pub mod playback;

pub use attachment::{AttachError, AttachmentRegistry};
pub use debug_draw::{DebugDrawer, LineVertex, Quad, DEFAULT_PATH_DETAIL, QUAD_SIZE};
pub use editor::{PathEditor, PathEditorEvent};
pub use keyframe::{Frame, Interpolation, InterpolationMode, Keyframe};
pub use path::{ObjectPath, PathId};
pub use playback::{PathPlayback, PlaybackState};
