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

//! Hierarchical transforms.
//!
//! Nodes live in a [`TransformArena`] and refer to their parent by a
//! generational [`TransformId`]. Drawables own a detached [`Transform`] that
//! may point into the arena as well.

mod arena;
mod transform;

pub use self::arena::{TransformArena, TransformId};
pub use self::transform::Transform;

use std::fmt;

/// An error raised while editing or resolving the transform hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The handle does not resolve to a live node.
    InvalidTransform {
        /// The stale or unknown handle.
        id: TransformId,
    },
    /// The parent chain of a node loops back on itself.
    CycleDetected {
        /// The node at which the loop was found.
        node: TransformId,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::InvalidTransform { id } => {
                write!(f, "Transform handle {id:?} does not resolve to a live node")
            }
            SceneError::CycleDetected { node } => {
                write!(f, "Parent chain of transform {node:?} forms a cycle")
            }
        }
    }
}

impl std::error::Error for SceneError {}
