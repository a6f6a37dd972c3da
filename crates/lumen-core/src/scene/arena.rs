// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Generational storage for scene-graph nodes.

use serde::{Deserialize, Serialize};

use crate::math::Mat4;

use super::{SceneError, Transform};

/// A handle to a [`Transform`] stored in a [`TransformArena`].
///
/// Combines a slot index with a generation counter. Removing a node bumps the
/// generation of its slot, so stale handles stop resolving instead of
/// pointing at whatever node reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransformId {
    /// Slot index inside the arena.
    pub index: u32,
    /// Generation of the slot when the handle was issued.
    pub generation: u32,
}

/// Owns every scene-graph node and resolves parent links.
#[derive(Debug, Default, Clone)]
pub struct TransformArena {
    slots: Vec<(TransformId, Option<Transform>)>,
    freed: Vec<u32>,
    alive: usize,
}

impl TransformArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a transform and returns its handle.
    pub fn insert(&mut self, transform: Transform) -> TransformId {
        self.alive += 1;
        if let Some(index) = self.freed.pop() {
            let (id, slot) = &mut self.slots[index as usize];
            id.generation += 1;
            *slot = Some(transform);
            *id
        } else {
            let id = TransformId {
                index: self.slots.len() as u32,
                generation: 0,
            };
            self.slots.push((id, Some(transform)));
            id
        }
    }

    /// Removes a node. Its children keep their (now stale) parent handle and
    /// behave as roots from then on.
    pub fn remove(&mut self, id: TransformId) -> Option<Transform> {
        let (slot_id, slot) = self.slots.get_mut(id.index as usize)?;
        if slot_id.generation != id.generation {
            return None;
        }
        let removed = slot.take()?;
        self.freed.push(id.index);
        self.alive -= 1;
        Some(removed)
    }

    /// Returns the node for `id` if it is still alive.
    pub fn get(&self, id: TransformId) -> Option<&Transform> {
        self.slots
            .get(id.index as usize)
            .and_then(|(slot_id, slot)| {
                if slot_id.generation == id.generation {
                    slot.as_ref()
                } else {
                    None
                }
            })
    }

    /// Returns the node for `id` mutably if it is still alive.
    pub fn get_mut(&mut self, id: TransformId) -> Option<&mut Transform> {
        self.slots
            .get_mut(id.index as usize)
            .and_then(|(slot_id, slot)| {
                if slot_id.generation == id.generation {
                    slot.as_mut()
                } else {
                    None
                }
            })
    }

    /// Returns `true` if `id` still resolves.
    pub fn contains(&self, id: TransformId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.alive
    }

    /// Returns `true` if no node is alive.
    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    /// Attaches `child` to `parent`, or detaches it when `parent` is `None`.
    ///
    /// ## Returns
    ///
    /// * [`SceneError::InvalidTransform`] if either handle is stale.
    /// * [`SceneError::CycleDetected`] if `child` is `parent` or one of its ancestors.
    pub fn set_parent(
        &mut self,
        child: TransformId,
        parent: Option<TransformId>,
    ) -> Result<(), SceneError> {
        if !self.contains(child) {
            return Err(SceneError::InvalidTransform { id: child });
        }

        if let Some(parent_id) = parent {
            if !self.contains(parent_id) {
                return Err(SceneError::InvalidTransform { id: parent_id });
            }
            // `Transform::set_parent` through `get_mut` may already have closed a loop.
            let mut cursor = Some(parent_id);
            let mut depth = 0usize;
            while let Some(id) = cursor {
                depth += 1;
                if id == child || depth > self.len() {
                    return Err(SceneError::CycleDetected { node: child });
                }
                cursor = self.get(id).and_then(Transform::parent);
            }
        }

        if let Some(node) = self.get_mut(child) {
            node.set_parent(parent);
        }
        Ok(())
    }

    /// Computes the world matrix of a stored node.
    pub fn world_matrix(&self, id: TransformId) -> Result<Mat4, SceneError> {
        self.get(id)
            .ok_or(SceneError::InvalidTransform { id })?
            .world_matrix(self)
    }
}
