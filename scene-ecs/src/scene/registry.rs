// Copyright 2025 John Brosnihan
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
//! Scene registry
//!
//! The registry owns every scene of the application and partitions them
//! into loaded and unloaded sets. Cross-scene queries only look at loaded
//! scenes, in the order they were loaded, so per-frame systems never touch
//! data belonging to inactive scenes.
//!
//! ```text
//! unloaded --load--> loaded --unload--> unloaded
//! unloaded --remove--> destroyed
//! loaded   --remove--> (unload) --> destroyed
//! ```

use crate::config::SceneConfig;
use crate::ecs::{Component, ComponentMut, ComponentRef, ComponentType, TypeTable};
use crate::error::{EcsError, EcsResult};
use crate::scene::{Scene, SceneId};
use std::collections::HashMap;
use std::sync::Arc;

/// How [`SceneRegistry::load_scene`] treats scenes that are already loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Unload every loaded scene first
    #[default]
    Single,
    /// Load alongside the scenes already loaded
    Additive,
}

/// Lifecycle state of a registered scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// Visible to cross-scene queries
    Loaded,
    /// Registered but inactive
    Unloaded,
    /// Removed; every further operation fails
    Destroyed,
}

/// Tracker of all scenes and their load state
pub struct SceneRegistry {
    types: Arc<TypeTable>,
    scenes: HashMap<SceneId, Scene>,
    /// Registration order
    order: Vec<SceneId>,
    /// Load order
    loaded: Vec<SceneId>,
    unloaded: Vec<SceneId>,
}

impl SceneRegistry {
    /// Create a registry whose scenes share `types`
    pub fn new(types: TypeTable) -> Self {
        Self::with_types(Arc::new(types))
    }

    /// Create a registry around an already shared type table
    pub fn with_types(types: Arc<TypeTable>) -> Self {
        SceneRegistry {
            types,
            scenes: HashMap::new(),
            order: Vec::new(),
            loaded: Vec::new(),
            unloaded: Vec::new(),
        }
    }

    /// The type table handed to scenes created by this registry
    pub fn types(&self) -> &Arc<TypeTable> {
        &self.types
    }

    /// Create a scene and register it as unloaded
    pub fn create_scene(&mut self, config: SceneConfig) -> SceneId {
        let scene = Scene::new(config, Arc::clone(&self.types));
        self.add_scene(scene)
    }

    /// Register an existing scene as unloaded
    pub fn add_scene(&mut self, scene: Scene) -> SceneId {
        let id = scene.id();
        if !scene.is_destroyed() {
            self.unloaded.push(id);
        }
        if scene.config().log_lifecycle_events {
            log::debug!("Registered {} '{}'", id, scene.name());
        }
        self.order.push(id);
        self.scenes.insert(id, scene);
        id
    }

    /// Look up a scene, including destroyed ones
    pub fn scene(&self, id: SceneId) -> EcsResult<&Scene> {
        self.scenes
            .get(&id)
            .ok_or_else(|| EcsError::NotFound(id.to_string()))
    }

    /// Mutably look up a scene, including destroyed ones
    pub fn scene_mut(&mut self, id: SceneId) -> EcsResult<&mut Scene> {
        self.scenes
            .get_mut(&id)
            .ok_or_else(|| EcsError::NotFound(id.to_string()))
    }

    /// Every registered scene in registration order
    pub fn scene_ids(&self) -> &[SceneId] {
        &self.order
    }

    /// Loaded scenes in load order
    pub fn loaded(&self) -> Vec<SceneId> {
        self.live(&self.loaded)
    }

    /// Unloaded scenes
    pub fn unloaded(&self) -> Vec<SceneId> {
        self.live(&self.unloaded)
    }

    fn live(&self, ids: &[SceneId]) -> Vec<SceneId> {
        ids.iter()
            .copied()
            .filter(|id| self.scenes.get(id).map_or(false, |scene| !scene.is_destroyed()))
            .collect()
    }

    /// Current state of `id`, `None` if it was never registered
    pub fn state(&self, id: SceneId) -> Option<SceneState> {
        let scene = self.scenes.get(&id)?;
        Some(if scene.is_destroyed() {
            SceneState::Destroyed
        } else if self.loaded.contains(&id) {
            SceneState::Loaded
        } else {
            SceneState::Unloaded
        })
    }

    /// Whether `id` is loaded
    pub fn is_loaded(&self, id: SceneId) -> bool {
        self.state(id) == Some(SceneState::Loaded)
    }

    /// Whether `id` is registered and unloaded
    pub fn is_unloaded(&self, id: SceneId) -> bool {
        self.state(id) == Some(SceneState::Unloaded)
    }

    fn checked_state(&self, id: SceneId) -> EcsResult<SceneState> {
        match self.state(id) {
            None => Err(EcsError::NotFound(id.to_string())),
            Some(SceneState::Destroyed) => Err(EcsError::DestroyedScene(id)),
            Some(state) => Ok(state),
        }
    }

    fn log_transition(&self, id: SceneId, what: &str) {
        if let Some(scene) = self.scenes.get(&id) {
            if scene.config().log_lifecycle_events {
                log::debug!("{} {} '{}'", what, id, scene.name());
            }
        }
    }

    /// Load an unloaded scene.
    ///
    /// Returns `Ok(false)` without changes if the scene is not unloaded.
    pub fn load_scene(&mut self, id: SceneId, mode: LoadMode) -> EcsResult<bool> {
        if self.checked_state(id)? != SceneState::Unloaded {
            return Ok(false);
        }

        if mode == LoadMode::Single {
            for other in std::mem::take(&mut self.loaded) {
                self.log_transition(other, "Unloaded");
                self.unloaded.push(other);
            }
        }
        self.unloaded.retain(|&other| other != id);
        self.loaded.push(id);
        self.log_transition(id, "Loaded");
        Ok(true)
    }

    /// Unload a loaded scene.
    ///
    /// Returns `Ok(false)` without changes if the scene is not loaded.
    pub fn unload_scene(&mut self, id: SceneId) -> EcsResult<bool> {
        if self.checked_state(id)? != SceneState::Loaded {
            return Ok(false);
        }
        self.loaded.retain(|&other| other != id);
        self.unloaded.push(id);
        self.log_transition(id, "Unloaded");
        Ok(true)
    }

    /// Unload `id` if needed, then destroy it for good
    pub fn remove_scene(&mut self, id: SceneId) -> EcsResult<SceneId> {
        self.unload_scene(id)?;
        self.unloaded.retain(|&other| other != id);
        self.scene_mut(id)?.destroy()?;
        self.log_transition(id, "Removed");
        Ok(id)
    }

    /// Every live instance of `ty` or a subtype across loaded scenes
    pub fn query_instances_of_type(&self, ty: ComponentType) -> Vec<ComponentRef<'_>> {
        self.loaded_scenes()
            .flat_map(|scene| scene.query_instances_of_type(ty).unwrap_or_default())
            .collect()
    }

    /// Every live instance of the concrete type `T` across loaded scenes
    pub fn instances_of<T: Component>(&self) -> Vec<&T> {
        self.loaded_scenes()
            .flat_map(|scene| scene.instances_of::<T>().unwrap_or_default())
            .collect()
    }

    /// Run `f` on every instance of `ty` or a subtype across loaded scenes.
    ///
    /// Returns the number of instances visited.
    pub fn for_each_instance_mut<F>(&mut self, ty: ComponentType, mut f: F) -> usize
    where
        F: FnMut(ComponentMut<'_>),
    {
        let mut visited = 0;
        for id in self.loaded() {
            if let Some(scene) = self.scenes.get_mut(&id) {
                visited += scene.for_each_instance_mut(ty, &mut f).unwrap_or(0);
            }
        }
        visited
    }

    fn loaded_scenes(&self) -> impl Iterator<Item = &Scene> + '_ {
        self.loaded
            .iter()
            .filter_map(|id| self.scenes.get(id))
            .filter(|scene| !scene.is_destroyed())
    }

    /// Number of registered scenes, destroyed ones included
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether no scene was ever registered
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::new(TypeTable::empty())
    }
}

impl std::fmt::Debug for SceneRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneRegistry")
            .field("scenes", &self.order.len())
            .field("loaded", &self.loaded)
            .field("unloaded", &self.unloaded)
            .finish()
    }
}
