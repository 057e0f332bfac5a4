//! Scenes and the scene registry
//!
//! This module provides:
//! - [`Scene`]: an entity tree rooted at one immutable root entity
//! - [`EntityMut`]: the per-entity attach/detach/query contract
//! - [`SceneRegistry`]: loaded/unloaded bookkeeping and cross-scene queries

mod entity_mut;
mod hierarchy;
mod registry;
#[allow(clippy::module_inception)]
mod scene;

pub use entity_mut::EntityMut;
pub use registry::{LoadMode, SceneRegistry, SceneState};
pub use scene::Scene;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique scene identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(u64);

impl SceneId {
    /// Allocate a fresh identifier
    pub(crate) fn next() -> Self {
        SceneId(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scene({})", self.0)
    }
}
