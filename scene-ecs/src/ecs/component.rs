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
//! Components and required-component declarations
//!
//! Components are data containers that can be attached to entities.
//! A component may declare other component types that must live on the
//! same entity; those are described by [`Requirement`]s and instantiated
//! from their `Default` value when missing.
//!
//! ```
//! use scene_ecs::ecs::{Component, Requirement};
//!
//! #[derive(Debug, Default)]
//! struct Transform;
//!
//! #[derive(Debug, Default)]
//! struct MeshRenderer;
//!
//! impl Component for Transform {}
//!
//! impl Component for MeshRenderer {
//!     fn required_components(&self) -> Vec<Requirement> {
//!         vec![Requirement::of::<Transform>()]
//!     }
//! }
//! ```

use crate::ecs::{ComponentType, Entity};
use crate::scene::SceneId;
use std::any::Any;
use std::fmt;

/// Object-safe access to the concrete value behind a component.
///
/// Implemented for every `'static` type; component authors never
/// implement it by hand.
pub trait AsAny {
    /// Borrow as `Any` for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow as `Any` for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Type tag of the concrete value
    fn component_type(&self) -> ComponentType;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn component_type(&self) -> ComponentType {
        ComponentType::of::<T>()
    }
}

/// Trait that all components must implement
///
/// Components should be plain data structures without behavior.
pub trait Component: AsAny + fmt::Debug + 'static {
    /// Component types that must co-exist with this one on the same entity.
    ///
    /// Requirements are resolved in the order returned.
    fn required_components(&self) -> Vec<Requirement> {
        Vec::new()
    }
}

impl dyn Component {
    /// Downcast to the concrete component type.
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably downcast to the concrete component type.
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// A component type that must be present, with a factory for its default.
#[derive(Clone, Copy)]
pub struct Requirement {
    ty: ComponentType,
    make: fn() -> Box<dyn Component>,
}

fn make_default<T: Component + Default>() -> Box<dyn Component> {
    Box::new(T::default())
}

impl Requirement {
    /// Require `T`, instantiated with `T::default()` when missing.
    pub fn of<T: Component + Default>() -> Self {
        Requirement {
            ty: ComponentType::of::<T>(),
            make: make_default::<T>,
        }
    }

    /// The required type
    pub fn component_type(&self) -> ComponentType {
        self.ty
    }

    /// Produce a fresh instance of the required type
    pub fn instantiate(&self) -> Box<dyn Component> {
        (self.make)()
    }
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Requirement").field(&self.ty).finish()
    }
}

/// Handle to a component instance stored in a scene
///
/// Like [`Entity`], a handle is only meaningful to the scene that issued
/// it; other scenes reject it with [`EcsError::NotFound`](crate::EcsError::NotFound).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId {
    scene: SceneId,
    index: u32,
    generation: u32,
}

impl ComponentId {
    pub(crate) fn new(scene: SceneId, index: u32, generation: u32) -> Self {
        ComponentId {
            scene,
            index,
            generation,
        }
    }

    /// Scene whose index issued this handle
    pub fn scene(&self) -> SceneId {
        self.scene
    }

    /// Slot index in the owning scene's component arena
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Get the generation number
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({}, gen: {})", self.index, self.generation)
    }
}

/// Read-only view of a live component instance.
#[derive(Clone, Copy)]
pub struct ComponentRef<'a> {
    pub(crate) id: ComponentId,
    pub(crate) owner: Entity,
    pub(crate) ty: ComponentType,
    pub(crate) value: &'a (dyn Component + 'static),
}

impl<'a> ComponentRef<'a> {
    /// Handle of the instance
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Entity the instance is attached to
    pub fn owner(&self) -> Entity {
        self.owner
    }

    /// Declared type of the instance
    pub fn component_type(&self) -> ComponentType {
        self.ty
    }

    /// The type-erased value
    pub fn value(&self) -> &'a (dyn Component + 'static) {
        self.value
    }

    /// Downcast to the concrete type, if it matches
    pub fn downcast<T: Component>(&self) -> Option<&'a T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for ComponentRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("ty", &self.ty)
            .field("value", &self.value)
            .finish()
    }
}

/// Mutable view of a live component instance.
pub struct ComponentMut<'a> {
    pub(crate) id: ComponentId,
    pub(crate) owner: Entity,
    pub(crate) ty: ComponentType,
    pub(crate) value: &'a mut (dyn Component + 'static),
}

impl<'a> ComponentMut<'a> {
    /// Handle of the instance
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Entity the instance is attached to
    pub fn owner(&self) -> Entity {
        self.owner
    }

    /// Declared type of the instance
    pub fn component_type(&self) -> ComponentType {
        self.ty
    }

    /// The type-erased value
    pub fn value(&mut self) -> &mut (dyn Component + 'static) {
        &mut *self.value
    }

    /// Downcast to the concrete type, if it matches
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.value.downcast_mut::<T>()
    }

    /// Consume the view, downcasting with the full borrow lifetime
    pub fn into_mut<T: Component>(self) -> Option<&'a mut T> {
        let value = self.value;
        value.downcast_mut::<T>()
    }
}

impl fmt::Debug for ComponentMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentMut")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}

/// Outcome of attaching a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Handle of the attached instance
    pub component: ComponentId,
    /// Types added automatically to satisfy requirements, in attachment order
    pub added: Vec<ComponentType>,
}
