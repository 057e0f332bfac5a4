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
//! Entity handles and slot allocation
//!
//! Entities are identity values owned by exactly one scene. They hold no
//! data; components and hierarchy links are stored by the scene in slots
//! addressed by the entity index. The generation makes stale handles to
//! reused slots detectable.

use crate::scene::SceneId;
use std::fmt;

/// Entity handle with generational index support for safe references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    scene: SceneId,
    index: u32,
    generation: u32,
}

impl Entity {
    pub(crate) fn new(scene: SceneId, index: u32, generation: u32) -> Self {
        Entity {
            scene,
            index,
            generation,
        }
    }

    /// Scene that owns this entity
    pub fn scene(&self) -> SceneId {
        self.scene
    }

    /// Slot index inside the owning scene
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Get the generation number
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}, gen: {})", self.index, self.generation)
    }
}

/// Liveness of a handle as seen by its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntityStatus {
    Alive,
    Destroyed,
    Unknown,
}

/// Generational slot allocator for one scene.
///
/// Destroying an entity bumps the slot generation so old handles stop
/// resolving; freed slots are reused.
#[derive(Debug)]
pub(crate) struct EntityStore {
    scene: SceneId,
    generations: Vec<u32>,
    alive: Vec<bool>,
    free: Vec<u32>,
    alive_count: usize,
}

impl EntityStore {
    pub(crate) fn with_capacity(scene: SceneId, capacity: usize) -> Self {
        EntityStore {
            scene,
            generations: Vec::with_capacity(capacity),
            alive: Vec::with_capacity(capacity),
            free: Vec::new(),
            alive_count: 0,
        }
    }

    pub(crate) fn allocate(&mut self) -> Entity {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.generations.push(0);
                self.alive.push(false);
                (self.generations.len() - 1) as u32
            }
        };
        self.alive[index as usize] = true;
        self.alive_count += 1;
        Entity::new(self.scene, index, self.generations[index as usize])
    }

    /// Release the slot. Returns false if the handle was not alive.
    pub(crate) fn release(&mut self, entity: Entity) -> bool {
        if self.status(entity) != EntityStatus::Alive {
            return false;
        }
        let slot = entity.index as usize;
        self.alive[slot] = false;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free.push(entity.index);
        self.alive_count -= 1;
        true
    }

    pub(crate) fn status(&self, entity: Entity) -> EntityStatus {
        if entity.scene != self.scene {
            return EntityStatus::Unknown;
        }
        let slot = entity.index as usize;
        match self.generations.get(slot) {
            None => EntityStatus::Unknown,
            Some(&generation) if generation == entity.generation && self.alive[slot] => {
                EntityStatus::Alive
            }
            Some(_) => EntityStatus::Destroyed,
        }
    }

    pub(crate) fn alive_count(&self) -> usize {
        self.alive_count
    }

    pub(crate) fn clear(&mut self) {
        self.generations.clear();
        self.alive.clear();
        self.free.clear();
        self.alive_count = 0;
    }
}
