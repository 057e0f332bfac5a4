//! Entity Component System (ECS) core implementation
//!
//! This module provides the foundational building blocks:
//! - Entity handles and generational slot allocation
//! - Component values, required-component declarations and handles
//! - The static component type hierarchy
//! - The polymorphic component index and requirement resolution
//! - System execution framework

mod component;
mod entity;
mod index;
mod resolver;
mod system;
mod types;

pub use component::{
    AsAny, Attachment, Component, ComponentId, ComponentMut, ComponentRef, Requirement,
};
pub use entity::Entity;
pub use index::ComponentIndex;
pub use system::{System, SystemExecutor};
pub use types::{ComponentType, TypeTable, TypeTableBuilder};

pub(crate) use entity::{EntityStatus, EntityStore};
pub(crate) use resolver::{PlannedComponent, Resolver};
