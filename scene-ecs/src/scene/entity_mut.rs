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
//! Per-entity view over a scene

use crate::ecs::{Attachment, Component, ComponentId, ComponentRef, ComponentType, Entity};
use crate::error::EcsResult;
use crate::scene::Scene;

/// Mutable access to one entity of a scene.
///
/// Obtained from [`Scene::entity_mut`]. All calls forward to the scene, so
/// every one of them still fails once the entity is destroyed.
#[derive(Debug)]
pub struct EntityMut<'a> {
    scene: &'a mut Scene,
    entity: Entity,
}

impl<'a> EntityMut<'a> {
    pub(crate) fn new(scene: &'a mut Scene, entity: Entity) -> Self {
        EntityMut { scene, entity }
    }

    /// The entity handle
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Attach `component`, adding whatever it requires
    pub fn attach<C: Component>(&mut self, component: C) -> EcsResult<Attachment> {
        self.scene.attach(self.entity, component)
    }

    /// Attach an already boxed component
    pub fn attach_boxed(&mut self, component: Box<dyn Component>) -> EcsResult<Attachment> {
        self.scene.attach_boxed(self.entity, component)
    }

    /// Take over a component currently owned by another entity
    pub fn reattach(&mut self, component: ComponentId) -> EcsResult<Attachment> {
        self.scene.reattach(self.entity, component)
    }

    /// Remove exactly `component`
    pub fn detach(&mut self, component: ComponentId) -> EcsResult<Box<dyn Component>> {
        self.scene.detach(self.entity, component)
    }

    /// Remove every component of type `ty` or a subtype
    pub fn detach_all(&mut self, ty: ComponentType) -> EcsResult<Vec<Box<dyn Component>>> {
        self.scene.detach_all(self.entity, ty)
    }

    /// Components of type `ty` or a subtype
    pub fn components_of_type(&self, ty: ComponentType) -> EcsResult<Vec<ComponentRef<'_>>> {
        self.scene.components_of_type(self.entity, ty)
    }

    /// First component of type `ty` or a subtype
    pub fn first_component_of_type(
        &self,
        ty: ComponentType,
    ) -> EcsResult<Option<ComponentRef<'_>>> {
        self.scene.first_component_of_type(self.entity, ty)
    }

    /// The component of exactly type `T`, if attached
    pub fn get<T: Component>(&self) -> EcsResult<Option<&T>> {
        let id = self.scene.find_exact(self.entity, ComponentType::of::<T>())?;
        Ok(id.and_then(|id| self.scene.index().get(id)).and_then(|c| c.downcast::<T>()))
    }

    /// Mutable access to the component of exactly type `T`
    pub fn get_mut<T: Component>(&mut self) -> EcsResult<Option<&mut T>> {
        match self.scene.find_exact(self.entity, ComponentType::of::<T>())? {
            Some(id) => self.scene.component_mut::<T>(id),
            None => Ok(None),
        }
    }

    /// Parent of this entity, `None` under the root
    pub fn parent(&self) -> EcsResult<Option<Entity>> {
        self.scene.get_parent(self.entity)
    }

    /// Direct children
    pub fn children(&self) -> EcsResult<&[Entity]> {
        self.scene.get_children(self.entity)
    }

    /// Re-parent, or move under the root when `None`
    pub fn set_parent(&mut self, parent: Option<Entity>) -> EcsResult<()> {
        self.scene.set_parent(self.entity, parent)
    }

    /// Destroy the entity along with its subtree
    ///
    /// This consumes the view, so a second `destroy` cannot go through it:
    /// [`Scene::entity_mut`] already fails with [`EcsError::DestroyedEntity`]
    /// for the stale handle. Deleting twice through
    /// [`Scene::delete_entity`] reports [`EcsError::AlreadyDestroyed`].
    ///
    /// [`EcsError::DestroyedEntity`]: crate::EcsError::DestroyedEntity
    /// [`EcsError::AlreadyDestroyed`]: crate::EcsError::AlreadyDestroyed
    pub fn destroy(self) -> EcsResult<usize> {
        self.scene.delete_entity(self.entity)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SceneConfig;
    use crate::ecs::{Component, ComponentType, TypeTable};
    use crate::error::EcsError;
    use crate::scene::Scene;
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct Health(u32);
    impl Component for Health {}

    #[test]
    fn test_entity_contract() {
        let mut scene = Scene::new(SceneConfig::default(), Arc::new(TypeTable::empty()));
        let parent = scene.create_entity(None).unwrap();
        let e = scene.create_entity(Some(parent)).unwrap();

        let mut entity = scene.entity_mut(e).unwrap();
        assert_eq!(entity.id(), e);
        entity.attach(Health(10)).unwrap();
        entity.get_mut::<Health>().unwrap().unwrap().0 -= 3;
        assert_eq!(entity.get::<Health>().unwrap().unwrap().0, 7);
        assert_eq!(entity.parent().unwrap(), Some(parent));

        entity.set_parent(None).unwrap();
        assert_eq!(entity.parent().unwrap(), None);
        assert_eq!(entity.detach_all(ComponentType::of::<Health>()).unwrap().len(), 1);
        assert!(entity.first_component_of_type(ComponentType::of::<Health>()).unwrap().is_none());

        assert_eq!(entity.destroy().unwrap(), 1);
        assert_eq!(scene.entity_mut(e).unwrap_err(), EcsError::DestroyedEntity(e));
        assert_eq!(scene.delete_entity(e).unwrap_err(), EcsError::AlreadyDestroyed(e));
    }
}
