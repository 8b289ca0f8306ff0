// SPDX-License-Identifier: MIT OR Apache-2.0
//! Object-to-path attachments.
//!
//! An object follows at most one path. The registry is generic over the
//! object handle so the scene can key it by whatever stable reference it
//! uses for movable objects.

use crate::path::PathId;
use indexmap::IndexMap;
use std::hash::Hash;
use thiserror::Error;

/// Errors from attachment operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AttachError {
    /// The object already follows a path and must be detached first
    #[error("object is already attached to {current}")]
    AlreadyAttached {
        /// Path the object is attached to
        current: PathId,
    },
}

/// Registry mapping objects to the path they follow
#[derive(Debug, Clone)]
pub struct AttachmentRegistry<K> {
    links: IndexMap<K, PathId>,
}

impl<K: Copy + Eq + Hash> AttachmentRegistry<K> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            links: IndexMap::new(),
        }
    }

    /// Attach `object` to `path`.
    ///
    /// Fails without changing anything if the object is already attached,
    /// even to the same path.
    pub fn attach(&mut self, object: K, path: PathId) -> Result<(), AttachError> {
        if let Some(&current) = self.links.get(&object) {
            return Err(AttachError::AlreadyAttached { current });
        }
        self.links.insert(object, path);
        Ok(())
    }

    /// Detach `object`, returning the path it was on
    pub fn detach(&mut self, object: K) -> Option<PathId> {
        self.links.shift_remove(&object)
    }

    /// Path the object follows
    pub fn path_of(&self, object: K) -> Option<PathId> {
        self.links.get(&object).copied()
    }

    /// Whether the object follows any path
    pub fn is_attached(&self, object: K) -> bool {
        self.links.contains_key(&object)
    }

    /// Objects attached to `path`, in attachment order
    pub fn objects_on(&self, path: PathId) -> Vec<K> {
        self.links
            .iter()
            .filter(|(_, p)| **p == path)
            .map(|(&object, _)| object)
            .collect()
    }

    /// Detach every object following `path`
    pub fn detach_all(&mut self, path: PathId) -> Vec<K> {
        let objects = self.objects_on(path);
        self.links.retain(|_, p| *p != path);
        objects
    }

    /// Iterate over all (object, path) links in attachment order
    pub fn iter(&self) -> impl Iterator<Item = (K, PathId)> + '_ {
        self.links.iter().map(|(&object, &path)| (object, path))
    }

    /// Number of attached objects
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True if nothing is attached
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Remove every link
    pub fn clear(&mut self) {
        self.links.clear();
    }
}

impl<K: Copy + Eq + Hash> Default for AttachmentRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: PathId = PathId::new(1);
    const B: PathId = PathId::new(2);

    #[test]
    fn test_attach_twice_fails_and_keeps_first() {
        let mut registry = AttachmentRegistry::new();
        registry.attach(7u32, A).unwrap();

        let err = registry.attach(7, B).unwrap_err();
        assert_eq!(err, AttachError::AlreadyAttached { current: A });
        assert_eq!(registry.path_of(7), Some(A));

        // Re-attaching to the same path is rejected as well.
        assert!(registry.attach(7, A).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_detach_is_idempotent() {
        let mut registry = AttachmentRegistry::new();
        registry.attach(1u32, A).unwrap();
        assert_eq!(registry.detach(1), Some(A));
        assert_eq!(registry.detach(1), None);
        assert!(!registry.is_attached(1));
        registry.attach(1, B).unwrap();
        assert_eq!(registry.path_of(1), Some(B));
    }

    #[test]
    fn test_objects_on_and_detach_all() {
        let mut registry = AttachmentRegistry::new();
        registry.attach(3u32, A).unwrap();
        registry.attach(1, B).unwrap();
        registry.attach(2, A).unwrap();

        assert_eq!(registry.objects_on(A), vec![3, 2]);
        assert_eq!(registry.detach_all(A), vec![3, 2]);
        assert!(registry.objects_on(A).is_empty());
        assert_eq!(registry.iter().collect::<Vec<_>>(), vec![(1, B)]);
    }

    #[test]
    fn test_error_message() {
        let err = AttachError::AlreadyAttached { current: A };
        assert_eq!(err.to_string(), "object is already attached to path#1");
    }
}
