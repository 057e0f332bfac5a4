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
//! Error types shared by the registry, scenes and entities.
//!
//! Every variant describes a contract violation (use after destroy, a
//! handle from the wrong scene, a malformed type table). None of them are
//! transient, so callers are not expected to retry.

use crate::ecs::{ComponentType, Entity};
use crate::scene::SceneId;

/// Errors produced by entity, component and scene operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// The entity handle refers to an entity that has been destroyed.
    #[error("{0} has been destroyed")]
    DestroyedEntity(Entity),

    /// The scene has been destroyed and accepts no further operations.
    #[error("{0} has been destroyed")]
    DestroyedScene(SceneId),

    /// `destroy` was called on an entity that was already destroyed.
    #[error("{0} was already destroyed")]
    AlreadyDestroyed(Entity),

    /// The entity, component or scene is not known to the receiver.
    #[error("{0} not found")]
    NotFound(String),

    /// A chain of required components loops back on itself.
    #[error("required component cycle: {}", format_chain(.chain))]
    RequirementCycle {
        /// Types on the resolution stack, ending with the repeated type.
        chain: Vec<ComponentType>,
    },

    /// The entity already carries a component of exactly this type.
    #[error("{entity} already has a {ty} component")]
    DuplicateComponent {
        /// Entity that rejected the component.
        entity: Entity,
        /// The duplicated type.
        ty: ComponentType,
    },

    /// The operation is not allowed on a scene's root entity.
    #[error("operation not permitted on root {0}")]
    RootEntity(Entity),

    /// Re-parenting would make an entity its own ancestor.
    #[error("cannot parent {entity} under its descendant {parent}")]
    HierarchyCycle {
        /// Entity being re-parented.
        entity: Entity,
        /// Requested parent.
        parent: Entity,
    },

    /// A type was referenced as a parent without being declared.
    #[error("component type {0} was never declared")]
    UnknownType(ComponentType),

    /// Parent links in the type table form a loop.
    #[error("component type hierarchy contains a cycle through {0}")]
    TypeHierarchyCycle(ComponentType),

    /// A type was declared twice with different parents.
    #[error("component type {ty} declared with parents {first} and {second}")]
    ConflictingParent {
        /// The type declared twice.
        ty: ComponentType,
        /// Parent given by the first declaration.
        first: ComponentType,
        /// Parent given by the later declaration.
        second: ComponentType,
    },

    /// A system failed while running.
    #[error("system '{system}' failed: {source}")]
    System {
        /// Name of the failing system.
        system: String,
        /// The underlying error.
        #[source]
        source: Box<EcsError>,
    },
}

/// Result alias used throughout the crate.
pub type EcsResult<T> = Result<T, EcsError>;

fn format_chain(chain: &[ComponentType]) -> String {
    chain
        .iter()
        .map(|ty| ty.name())
        .collect::<Vec<_>>()
        .join(" -> ")
}
