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
//! Polymorphic component index
//!
//! The index owns every component instance of a scene in a generational
//! arena and keeps two views over it:
//!
//! - per type: every instance whose declared type is that type *or a
//!   subtype of it*, so a query for a base type also yields derived ones
//! - per entity: the instances attached to that entity, in attach order
//!
//! Both views are updated together on every register/unregister so no
//! ancestor list ever holds a dangling handle.

use crate::ecs::{
    Component, ComponentId, ComponentMut, ComponentRef, ComponentType, Entity, TypeTable,
};
use crate::error::{EcsError, EcsResult};
use crate::scene::SceneId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

struct ComponentEntry {
    ty: ComponentType,
    owner: Entity,
    value: Box<dyn Component>,
}

struct ComponentSlot {
    generation: u32,
    entry: Option<ComponentEntry>,
}

/// Index of component instances by type closure and by owning entity.
pub struct ComponentIndex {
    scene: SceneId,
    types: Arc<TypeTable>,
    slots: Vec<ComponentSlot>,
    free: Vec<u32>,
    by_type: HashMap<ComponentType, Vec<ComponentId>>,
    /// Indexed by entity slot; the stored handle guards against stale generations.
    by_entity: Vec<Option<(Entity, Vec<ComponentId>)>>,
    live: usize,
}

impl ComponentIndex {
    /// Create an empty index for `scene` resolving closures through `types`
    pub fn new(scene: SceneId, types: Arc<TypeTable>) -> Self {
        ComponentIndex {
            scene,
            types,
            slots: Vec::new(),
            free: Vec::new(),
            by_type: HashMap::new(),
            by_entity: Vec::new(),
            live: 0,
        }
    }

    /// The type table used for closures
    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    /// Start tracking `entity` with an empty component list.
    pub(crate) fn register_entity(&mut self, entity: Entity) {
        let slot = entity.index() as usize;
        if slot >= self.by_entity.len() {
            self.by_entity.resize_with(slot + 1, || None);
        }
        self.by_entity[slot] = Some((entity, Vec::new()));
    }

    /// Stop tracking `entity`, dropping every component still attached.
    pub(crate) fn unregister_entity(&mut self, entity: Entity) -> EcsResult<usize> {
        let attached = self.entity_list(entity)?.to_vec();
        for &id in &attached {
            self.remove(id)?;
        }
        self.by_entity[entity.index() as usize] = None;
        Ok(attached.len())
    }

    /// Whether `entity` is tracked by the index
    pub fn contains_entity(&self, entity: Entity) -> bool {
        self.entity_list(entity).is_ok()
    }

    /// Store `value` as an instance of `ty` owned by `entity`.
    ///
    /// The instance is appended under every type of its closure and to the
    /// entity's own list.
    pub(crate) fn insert(
        &mut self,
        entity: Entity,
        ty: ComponentType,
        value: Box<dyn Component>,
    ) -> EcsResult<ComponentId> {
        self.entity_list(entity)?;

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(ComponentSlot {
                    generation: 0,
                    entry: None,
                });
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.entry = Some(ComponentEntry {
            ty,
            owner: entity,
            value,
        });
        let id = ComponentId::new(self.scene, index, slot.generation);
        self.live += 1;

        self.link(id, entity, ty);
        Ok(id)
    }

    /// Remove the instance from every list and take its value back.
    pub(crate) fn remove(&mut self, id: ComponentId) -> EcsResult<Box<dyn Component>> {
        let (owner, ty) = {
            let entry = self.entry(id)?;
            (entry.owner, entry.ty)
        };
        self.unlink(id, owner, ty);

        let slot = &mut self.slots[id.index() as usize];
        let entry = slot
            .entry
            .take()
            .ok_or_else(|| EcsError::NotFound(id.to_string()))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        self.live -= 1;
        Ok(entry.value)
    }

    /// Move an instance to another entity, keeping its handle.
    pub(crate) fn transfer(&mut self, id: ComponentId, new_owner: Entity) -> EcsResult<Entity> {
        self.entity_list(new_owner)?;
        let (old_owner, ty) = {
            let entry = self.entry(id)?;
            (entry.owner, entry.ty)
        };
        self.unlink(id, old_owner, ty);
        if let Some(entry) = self.slots[id.index() as usize].entry.as_mut() {
            entry.owner = new_owner;
        }
        self.link(id, new_owner, ty);
        Ok(old_owner)
    }

    /// Remove every component on `entity` whose type is `ty` or a subtype of it.
    pub(crate) fn remove_all_of_type(
        &mut self,
        entity: Entity,
        ty: ComponentType,
    ) -> EcsResult<Vec<Box<dyn Component>>> {
        // Collect first: removal mutates the entity list being scanned.
        let doomed: Vec<ComponentId> = self
            .entity_list(entity)?
            .iter()
            .copied()
            .filter(|&id| {
                self.entry(id)
                    .map_or(false, |entry| self.types.is_subtype_of(entry.ty, ty))
            })
            .collect();

        doomed.into_iter().map(|id| self.remove(id)).collect()
    }

    /// Handles of every instance of `ty` or one of its subtypes.
    pub fn instances_of_type(&self, ty: ComponentType) -> &[ComponentId] {
        self.by_type.get(&ty).map(|ids| ids.as_slice()).unwrap_or(&[])
    }

    /// Handles of the components attached to `entity`.
    pub fn components_of_entity(&self, entity: Entity) -> EcsResult<&[ComponentId]> {
        self.entity_list(entity)
    }

    /// The full type closures of everything attached to `entity`.
    pub fn present_types(&self, entity: Entity) -> EcsResult<HashSet<ComponentType>> {
        let mut present = HashSet::new();
        for &id in self.entity_list(entity)? {
            let entry = self.entry(id)?;
            present.extend(self.types.closure(entry.ty));
        }
        Ok(present)
    }

    /// Whether `entity` carries an instance of exactly `ty`.
    pub fn has_exact_type(&self, entity: Entity, ty: ComponentType) -> EcsResult<bool> {
        Ok(self
            .entity_list(entity)?
            .iter()
            .any(|&id| self.entry(id).map_or(false, |entry| entry.ty == ty)))
    }

    /// Look up a live instance.
    pub fn get(&self, id: ComponentId) -> Option<ComponentRef<'_>> {
        self.entry(id).ok().map(|entry| ComponentRef {
            id,
            owner: entry.owner,
            ty: entry.ty,
            value: &*entry.value,
        })
    }

    /// Mutably look up a live instance.
    pub fn get_mut(&mut self, id: ComponentId) -> Option<ComponentMut<'_>> {
        if id.scene() != self.scene {
            return None;
        }
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entry.as_mut().map(|entry| ComponentMut {
            id,
            owner: entry.owner,
            ty: entry.ty,
            value: &mut *entry.value,
        })
    }

    /// Owner of a live instance.
    pub fn owner_of(&self, id: ComponentId) -> Option<Entity> {
        self.entry(id).ok().map(|entry| entry.owner)
    }

    /// Number of live component instances
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether no component instances are live
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of types that currently have at least one instance
    pub fn indexed_type_count(&self) -> usize {
        self.by_type.len()
    }

    /// Drop everything.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.by_type.clear();
        self.by_entity.clear();
        self.live = 0;
    }

    fn entry(&self, id: ComponentId) -> EcsResult<&ComponentEntry> {
        if id.scene() != self.scene {
            return Err(EcsError::NotFound(format!("{} in {}", id, self.scene)));
        }
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.entry.as_ref())
            .ok_or_else(|| EcsError::NotFound(id.to_string()))
    }

    fn entity_list(&self, entity: Entity) -> EcsResult<&[ComponentId]> {
        if entity.scene() != self.scene {
            return Err(EcsError::NotFound(format!("{} in {}", entity, self.scene)));
        }
        match self.by_entity.get(entity.index() as usize) {
            Some(Some((tracked, list))) if *tracked == entity => Ok(list),
            _ => Err(EcsError::NotFound(entity.to_string())),
        }
    }

    fn link(&mut self, id: ComponentId, owner: Entity, ty: ComponentType) {
        for key in self.types.closure(ty) {
            self.by_type.entry(key).or_default().push(id);
        }
        if let Some(Some((_, list))) = self.by_entity.get_mut(owner.index() as usize) {
            list.push(id);
        }
        log::trace!("Indexed {} ({}) on {}", id, ty, owner);
    }

    fn unlink(&mut self, id: ComponentId, owner: Entity, ty: ComponentType) {
        for key in self.types.closure(ty) {
            if let Some(ids) = self.by_type.get_mut(&key) {
                ids.retain(|&other| other != id);
                if ids.is_empty() {
                    self.by_type.remove(&key);
                }
            }
        }
        if let Some(Some((tracked, list))) = self.by_entity.get_mut(owner.index() as usize) {
            if *tracked == owner {
                list.retain(|&other| other != id);
            }
        }
        log::trace!("Unindexed {} ({}) from {}", id, ty, owner);
    }
}

impl std::fmt::Debug for ComponentIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentIndex")
            .field("live", &self.live)
            .field("indexed_types", &self.by_type.len())
            .finish_non_exhaustive()
    }
}
