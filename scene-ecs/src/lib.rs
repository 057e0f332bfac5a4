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
//! # Scene ECS
//!
//! An entity/component registry organised into scenes.
//!
//! ## Features
//!
//! - **Polymorphic queries**: components are indexed under their whole type
//!   closure, so asking for a base type also yields every subtype instance
//! - **Required components**: attaching a component attaches what it depends
//!   on, with cycle detection
//! - **Scene hierarchy**: every scene is a parented entity tree with cascade
//!   delete
//! - **Scene registry**: single and additive loading, with cross-scene
//!   queries restricted to loaded scenes
//!
//! ## Example
//!
//! ```rust
//! use scene_ecs::ecs::{Component, ComponentType, Requirement, TypeTable};
//! use scene_ecs::{LoadMode, SceneConfig, SceneRegistry};
//!
//! #[derive(Debug, Default)]
//! struct Transform { x: f32 }
//! impl Component for Transform {}
//!
//! enum Renderer {}
//! #[derive(Debug, Default)]
//! struct MeshRenderer;
//! impl Component for MeshRenderer {
//!     fn required_components(&self) -> Vec<Requirement> {
//!         vec![Requirement::of::<Transform>()]
//!     }
//! }
//!
//! let types = TypeTable::builder()
//!     .declare::<Renderer>()
//!     .declare_subtype::<MeshRenderer, Renderer>()
//!     .build()?;
//! let mut scenes = SceneRegistry::new(types);
//!
//! let level = scenes.create_scene(SceneConfig::new("Level 1"));
//! let scene = scenes.scene_mut(level)?;
//! let player = scene.create_entity(None)?;
//! let attached = scene.attach(player, MeshRenderer)?;
//! assert_eq!(attached.added, vec![ComponentType::of::<Transform>()]);
//!
//! scenes.load_scene(level, LoadMode::Single)?;
//! assert_eq!(scenes.query_instances_of_type(ComponentType::of::<Renderer>()).len(), 1);
//! # Ok::<(), scene_ecs::EcsError>(())
//! ```

#![warn(missing_docs)]

/// Entity Component System implementation
pub mod ecs;

/// Scenes, hierarchy and the scene registry
pub mod scene;

/// Scene configuration
pub mod config;

/// Error types
pub mod error;

pub use config::SceneConfig;
pub use ecs::{Component, ComponentType, Entity, TypeTable};
pub use error::{EcsError, EcsResult};
pub use scene::{EntityMut, LoadMode, Scene, SceneId, SceneRegistry, SceneState};
