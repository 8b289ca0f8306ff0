// SPDX-License-Identifier: MIT OR Apache-2.0
//! Selection state.
//!
//! The selection holds one category of object at a time. Selecting
//! something of another category replaces the whole selection.

use crate::markers::MarkerId;
use crate::scene::InstanceId;

/// What kind of object is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionCategory {
    /// Scene model instances
    Model,
    /// Camera markers
    Camera,
    /// Point light markers
    Light,
    /// Path keyframe markers
    Keyframe,
}

impl SelectionCategory {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Model => "Model",
            Self::Camera => "Camera",
            Self::Light => "Light",
            Self::Keyframe => "Keyframe",
        }
    }
}

/// Something that can be clicked in the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionTarget {
    /// A model instance of the scene
    Instance(InstanceId),
    /// An editor marker
    Marker(MarkerId),
}

/// Selected objects of a single category
#[derive(Debug, Clone, Default)]
pub struct Selection {
    targets: Vec<SelectionTarget>,
    category: Option<SelectionCategory>,
}

impl Selection {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a target is selected
    pub fn contains(&self, target: &SelectionTarget) -> bool {
        self.targets.contains(target)
    }

    /// Replace the selection with a single target
    pub fn set(&mut self, target: SelectionTarget, category: SelectionCategory) {
        self.targets.clear();
        self.targets.push(target);
        self.category = Some(category);
    }

    /// Add a target (idempotent). Targets of another category are rejected.
    pub fn add(&mut self, target: SelectionTarget, category: SelectionCategory) -> bool {
        match self.category {
            Some(current) if current != category => false,
            _ => {
                if !self.contains(&target) {
                    self.targets.push(target);
                }
                self.category = Some(category);
                true
            }
        }
    }

    /// Remove a target
    pub fn remove(&mut self, target: &SelectionTarget) {
        self.targets.retain(|t| t != target);
        if self.targets.is_empty() {
            self.category = None;
        }
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.targets.clear();
        self.category = None;
    }

    /// Check if the selection is empty
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Get the number of selected targets
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Category of the selected targets
    pub fn category(&self) -> Option<SelectionCategory> {
        self.category
    }

    /// Selected targets in selection order
    pub fn targets(&self) -> &[SelectionTarget] {
        &self.targets
    }

    /// Get the primary (last) selected target
    pub fn primary(&self) -> Option<SelectionTarget> {
        self.targets.last().copied()
    }

    /// Primary target if it is a model instance
    pub fn primary_instance(&self) -> Option<InstanceId> {
        match self.primary()? {
            SelectionTarget::Instance(id) => Some(id),
            SelectionTarget::Marker(_) => None,
        }
    }

    /// Primary target if it is a marker
    pub fn primary_marker(&self) -> Option<MarkerId> {
        match self.primary()? {
            SelectionTarget::Marker(id) => Some(id),
            SelectionTarget::Instance(_) => None,
        }
    }
}
