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
//! Scene management
//!
//! A Scene owns its entities, their parent/children tree and the component
//! index holding every component attached to them. Each scene has a root
//! entity created with it; the root anchors the tree and is never handed
//! out as a parent, deleted or re-parented.

use crate::config::SceneConfig;
use crate::ecs::{
    AsAny, Attachment, Component, ComponentId, ComponentIndex, ComponentMut, ComponentRef,
    ComponentType, Entity, EntityStatus, EntityStore, Resolver, TypeTable,
};
use crate::error::{EcsError, EcsResult};
use crate::scene::hierarchy::Hierarchy;
use crate::scene::{EntityMut, SceneId};
use std::collections::HashSet;
use std::sync::Arc;

/// An entity tree with its component storage
///
/// Every operation checks that the scene is still alive first and fails
/// with [`EcsError::DestroyedScene`] afterwards.
pub struct Scene {
    id: SceneId,
    config: SceneConfig,
    root: Entity,
    entities: EntityStore,
    /// Live non-root entities in creation order
    live: Vec<Entity>,
    hierarchy: Hierarchy,
    index: ComponentIndex,
    destroyed: bool,
}

impl Scene {
    /// Create a new scene resolving component types through `types`
    pub fn new(config: SceneConfig, types: Arc<TypeTable>) -> Self {
        let id = SceneId::next();
        let mut entities = EntityStore::with_capacity(id, config.initial_capacity + 1);
        let root = entities.allocate();

        let mut hierarchy = Hierarchy::with_capacity(config.initial_capacity + 1);
        hierarchy.insert(root);
        let mut index = ComponentIndex::new(id, types);
        index.register_entity(root);

        if config.log_lifecycle_events {
            log::debug!("Created {} '{}'", id, config.name);
        }

        Scene {
            id,
            live: Vec::with_capacity(config.initial_capacity),
            config,
            root,
            entities,
            hierarchy,
            index,
            destroyed: false,
        }
    }

    /// Scene identifier
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The root entity
    pub fn root(&self) -> Entity {
        self.root
    }

    /// Configuration the scene was created with
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Whether [`destroy`](Self::destroy) has been called
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Number of live entities, not counting the root
    pub fn entity_count(&self) -> usize {
        self.live.len()
    }

    /// Whether `entity` is a live entity of this scene
    pub fn contains(&self, entity: Entity) -> bool {
        !self.destroyed && self.entities.status(entity) == EntityStatus::Alive
    }

    /// Read access to the component index
    pub fn index(&self) -> &ComponentIndex {
        &self.index
    }

    /// The type table shared with the index
    pub fn types(&self) -> &TypeTable {
        self.index.types()
    }

    fn check_alive(&self) -> EcsResult<()> {
        if self.destroyed {
            Err(EcsError::DestroyedScene(self.id))
        } else {
            Ok(())
        }
    }

    fn check_entity(&self, entity: Entity) -> EcsResult<()> {
        self.check_alive()?;
        match self.entities.status(entity) {
            EntityStatus::Alive => Ok(()),
            EntityStatus::Destroyed => Err(EcsError::DestroyedEntity(entity)),
            EntityStatus::Unknown => Err(EcsError::NotFound(format!("{} in {}", entity, self.id))),
        }
    }

    fn check_attachable(&self, entity: Entity) -> EcsResult<()> {
        self.check_entity(entity)?;
        if entity == self.root {
            return Err(EcsError::RootEntity(entity));
        }
        Ok(())
    }

    // ---- hierarchy ----

    /// Create an entity under `parent`, or under the root when `None`
    pub fn create_entity(&mut self, parent: Option<Entity>) -> EcsResult<Entity> {
        self.check_alive()?;
        let parent = match parent {
            Some(parent) => {
                self.check_entity(parent)?;
                parent
            }
            None => self.root,
        };

        let entity = self.entities.allocate();
        self.hierarchy.insert(entity);
        self.hierarchy.bind(entity, parent);
        self.index.register_entity(entity);
        self.live.push(entity);

        if self.config.log_lifecycle_events {
            log::debug!("Created {} in '{}'", entity, self.config.name);
        }
        Ok(entity)
    }

    /// Delete `entity` and its whole subtree.
    ///
    /// Returns the number of entities removed. Deleting an entity a second
    /// time fails with [`EcsError::AlreadyDestroyed`].
    pub fn delete_entity(&mut self, entity: Entity) -> EcsResult<usize> {
        self.check_alive()?;
        match self.entities.status(entity) {
            EntityStatus::Alive => {}
            EntityStatus::Destroyed => return Err(EcsError::AlreadyDestroyed(entity)),
            EntityStatus::Unknown => {
                return Err(EcsError::NotFound(format!("{} in {}", entity, self.id)))
            }
        }
        if entity == self.root {
            return Err(EcsError::RootEntity(entity));
        }

        let mut doomed = self.hierarchy.descendants(entity);
        doomed.insert(0, entity);

        // Leaves first so every child is unlinked before its parent goes.
        for &victim in doomed.iter().rev() {
            self.index.unregister_entity(victim)?;
            self.hierarchy.remove(victim);
            self.entities.release(victim);
        }

        let gone: HashSet<Entity> = doomed.iter().copied().collect();
        self.live.retain(|e| !gone.contains(e));

        if self.config.log_lifecycle_events {
            log::debug!(
                "Deleted {} and {} descendants from '{}'",
                entity,
                doomed.len() - 1,
                self.config.name
            );
        }
        Ok(doomed.len())
    }

    /// Move `entity` under `parent`, or under the root when `None`
    pub fn set_parent(&mut self, entity: Entity, parent: Option<Entity>) -> EcsResult<()> {
        self.check_attachable(entity)?;
        let parent = match parent {
            Some(parent) => {
                self.check_entity(parent)?;
                parent
            }
            None => self.root,
        };
        if parent == entity || self.hierarchy.is_ancestor(entity, parent) {
            return Err(EcsError::HierarchyCycle { entity, parent });
        }

        self.hierarchy.reparent(entity, parent);
        Ok(())
    }

    /// Move `entity` directly under the root
    pub fn set_parent_to_root(&mut self, entity: Entity) -> EcsResult<()> {
        self.set_parent(entity, None)
    }

    /// Parent of `entity`; `None` when the parent is the root (or for the
    /// root itself)
    pub fn get_parent(&self, entity: Entity) -> EcsResult<Option<Entity>> {
        self.check_entity(entity)?;
        Ok(self.hierarchy.parent(entity).filter(|&parent| parent != self.root))
    }

    /// Direct children of `entity`
    pub fn get_children(&self, entity: Entity) -> EcsResult<&[Entity]> {
        self.check_entity(entity)?;
        Ok(self.hierarchy.children(entity))
    }

    /// Every entity below `entity`, depth-first
    pub fn descendants(&self, entity: Entity) -> EcsResult<Vec<Entity>> {
        self.check_entity(entity)?;
        Ok(self.hierarchy.descendants(entity))
    }

    /// Live entities, not counting the root, in creation order
    pub fn get_entities(&self) -> EcsResult<&[Entity]> {
        self.check_alive()?;
        Ok(&self.live)
    }

    /// Destroy the scene and release all of its storage
    pub fn destroy(&mut self) -> EcsResult<()> {
        self.check_alive()?;
        self.destroyed = true;
        self.index.clear();
        self.hierarchy.clear();
        self.entities.clear();
        self.live.clear();

        if self.config.log_lifecycle_events {
            log::debug!("Destroyed {} '{}'", self.id, self.config.name);
        }
        Ok(())
    }

    /// Borrow the per-entity contract for `entity`
    pub fn entity_mut(&mut self, entity: Entity) -> EcsResult<EntityMut<'_>> {
        self.check_entity(entity)?;
        Ok(EntityMut::new(self, entity))
    }

    // ---- components ----

    /// Attach `component` to `entity`, resolving its requirements
    pub fn attach<C: Component>(&mut self, entity: Entity, component: C) -> EcsResult<Attachment> {
        self.attach_boxed(entity, Box::new(component))
    }

    /// Attach an already boxed component to `entity`.
    ///
    /// Requirements are planned before anything is registered; if planning
    /// fails the entity is left untouched.
    pub fn attach_boxed(
        &mut self,
        entity: Entity,
        component: Box<dyn Component>,
    ) -> EcsResult<Attachment> {
        self.check_attachable(entity)?;
        let ty = AsAny::component_type(&*component);
        if self.index.has_exact_type(entity, ty)? {
            return Err(EcsError::DuplicateComponent { entity, ty });
        }

        let requirements = component.required_components();
        let plan = Resolver::new(&self.index, entity, ty).plan(requirements)?;

        let id = self.index.insert(entity, ty, component)?;
        let added = self.apply_plan(entity, plan)?;

        if self.config.log_lifecycle_events {
            log::debug!("Attached {} to {} (auto-added {})", ty, entity, added.len());
        }
        Ok(Attachment { component: id, added })
    }

    /// Move an existing component instance onto `entity`.
    ///
    /// Ownership is revoked from the current owner first, then the
    /// component's requirements are resolved on the new owner.
    pub fn reattach(&mut self, entity: Entity, component: ComponentId) -> EcsResult<Attachment> {
        self.check_attachable(entity)?;
        let (owner, ty, requirements) = {
            let current = self
                .index
                .get(component)
                .ok_or_else(|| EcsError::NotFound(component.to_string()))?;
            (
                current.owner(),
                current.component_type(),
                current.value().required_components(),
            )
        };
        if owner == entity {
            return Ok(Attachment {
                component,
                added: Vec::new(),
            });
        }
        if self.index.has_exact_type(entity, ty)? {
            return Err(EcsError::DuplicateComponent { entity, ty });
        }

        let plan = Resolver::new(&self.index, entity, ty).plan(requirements)?;
        self.index.transfer(component, entity)?;
        let added = self.apply_plan(entity, plan)?;

        if self.config.log_lifecycle_events {
            log::debug!("Moved {} ({}) from {} to {}", component, ty, owner, entity);
        }
        Ok(Attachment { component, added })
    }

    fn apply_plan(
        &mut self,
        entity: Entity,
        plan: Vec<crate::ecs::PlannedComponent>,
    ) -> EcsResult<Vec<ComponentType>> {
        let mut added = Vec::with_capacity(plan.len());
        for planned in plan {
            self.index.insert(entity, planned.ty, planned.value)?;
            added.push(planned.ty);
        }
        Ok(added)
    }

    /// Remove exactly `component` from `entity`, handing the value back
    pub fn detach(
        &mut self,
        entity: Entity,
        component: ComponentId,
    ) -> EcsResult<Box<dyn Component>> {
        self.check_entity(entity)?;
        if self.index.owner_of(component) != Some(entity) {
            return Err(EcsError::NotFound(format!("{} on {}", component, entity)));
        }
        self.index.remove(component)
    }

    /// Remove every component on `entity` whose type is `ty` or a subtype
    pub fn detach_all(
        &mut self,
        entity: Entity,
        ty: ComponentType,
    ) -> EcsResult<Vec<Box<dyn Component>>> {
        self.check_entity(entity)?;
        self.index.remove_all_of_type(entity, ty)
    }

    /// Handles of every component on `entity`, in attach order
    pub fn components(&self, entity: Entity) -> EcsResult<&[ComponentId]> {
        self.check_entity(entity)?;
        self.index.components_of_entity(entity)
    }

    /// Components on `entity` whose type is `ty` or a subtype
    pub fn components_of_type(
        &self,
        entity: Entity,
        ty: ComponentType,
    ) -> EcsResult<Vec<ComponentRef<'_>>> {
        self.check_entity(entity)?;
        let types = self.index.types();
        Ok(self
            .index
            .components_of_entity(entity)?
            .iter()
            .filter_map(|&id| self.index.get(id))
            .filter(|component| types.is_subtype_of(component.component_type(), ty))
            .collect())
    }

    /// First component on `entity` whose type is `ty` or a subtype
    pub fn first_component_of_type(
        &self,
        entity: Entity,
        ty: ComponentType,
    ) -> EcsResult<Option<ComponentRef<'_>>> {
        self.check_entity(entity)?;
        let types = self.index.types();
        Ok(self
            .index
            .components_of_entity(entity)?
            .iter()
            .filter_map(|&id| self.index.get(id))
            .find(|component| types.is_subtype_of(component.component_type(), ty)))
    }

    /// Handle of the component of exactly type `ty` on `entity`
    pub(crate) fn find_exact(
        &self,
        entity: Entity,
        ty: ComponentType,
    ) -> EcsResult<Option<ComponentId>> {
        self.check_entity(entity)?;
        Ok(self
            .index
            .components_of_entity(entity)?
            .iter()
            .copied()
            .find(|&id| self.index.get(id).map_or(false, |c| c.component_type() == ty)))
    }

    /// Every live instance of `ty` or one of its subtypes in this scene
    pub fn query_instances_of_type(&self, ty: ComponentType) -> EcsResult<Vec<ComponentRef<'_>>> {
        self.check_alive()?;
        Ok(self
            .index
            .instances_of_type(ty)
            .iter()
            .filter_map(|&id| self.index.get(id))
            .collect())
    }

    /// Every live instance of the concrete type `T`
    ///
    /// Instances of subtypes are not included since they cannot be viewed as
    /// `T`; use [`query_instances_of_type`](Self::query_instances_of_type)
    /// for polymorphic queries.
    pub fn instances_of<T: Component>(&self) -> EcsResult<Vec<&T>> {
        self.check_alive()?;
        Ok(self
            .index
            .instances_of_type(ComponentType::of::<T>())
            .iter()
            .filter_map(|&id| self.index.get(id))
            .filter_map(|component| component.downcast::<T>())
            .collect())
    }

    /// Look up a component by handle as `T`
    pub fn component<T: Component>(&self, id: ComponentId) -> EcsResult<Option<&T>> {
        self.check_alive()?;
        Ok(self.index.get(id).and_then(|component| component.downcast::<T>()))
    }

    /// Mutably look up a component by handle as `T`
    pub fn component_mut<T: Component>(&mut self, id: ComponentId) -> EcsResult<Option<&mut T>> {
        self.check_alive()?;
        Ok(self.index.get_mut(id).and_then(|component| component.into_mut::<T>()))
    }

    /// Run `f` on every live instance of `ty` or one of its subtypes.
    ///
    /// Returns the number of instances visited.
    pub fn for_each_instance_mut<F>(&mut self, ty: ComponentType, mut f: F) -> EcsResult<usize>
    where
        F: FnMut(ComponentMut<'_>),
    {
        self.check_alive()?;
        let ids = self.index.instances_of_type(ty).to_vec();
        let mut visited = 0;
        for id in ids {
            if let Some(component) = self.index.get_mut(id) {
                f(component);
                visited += 1;
            }
        }
        Ok(visited)
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id)
            .field("name", &self.config.name)
            .field("entities", &self.entities.alive_count())
            .field("components", &self.index.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
