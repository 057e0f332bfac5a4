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
//! Required-component resolution tests
//!
//! Transitive requirements, idempotence, declaration order, subtype
//! satisfaction and cycle detection.

use scene_ecs::ecs::{Component, ComponentType, Requirement, TypeTable};
use scene_ecs::{EcsError, Entity, Scene, SceneConfig};
use std::sync::Arc;

#[derive(Debug, Default)]
struct A;
#[derive(Debug, Default)]
struct B;
#[derive(Debug, Default)]
struct C;

impl Component for A {
    fn required_components(&self) -> Vec<Requirement> {
        vec![Requirement::of::<B>()]
    }
}
impl Component for B {
    fn required_components(&self) -> Vec<Requirement> {
        vec![Requirement::of::<C>()]
    }
}
impl Component for C {}

#[derive(Debug, Default)]
struct Wide;
impl Component for Wide {
    fn required_components(&self) -> Vec<Requirement> {
        vec![Requirement::of::<C>(), Requirement::of::<B>(), Requirement::of::<A>()]
    }
}

#[derive(Debug, Default)]
struct Light {
    intensity: f32,
}
impl Component for Light {}

#[derive(Debug, Default)]
struct SpotLight;
impl Component for SpotLight {}

#[derive(Debug, Default)]
struct Lamp;
impl Component for Lamp {
    fn required_components(&self) -> Vec<Requirement> {
        vec![Requirement::of::<Light>()]
    }
}

#[derive(Debug, Default)]
struct Mesh;
#[derive(Debug, Default)]
struct Skin;
#[derive(Debug, Default)]
struct Bone;

impl Component for Mesh {
    fn required_components(&self) -> Vec<Requirement> {
        vec![Requirement::of::<Skin>()]
    }
}
impl Component for Skin {
    fn required_components(&self) -> Vec<Requirement> {
        vec![Requirement::of::<Bone>()]
    }
}
impl Component for Bone {
    fn required_components(&self) -> Vec<Requirement> {
        vec![Requirement::of::<Mesh>()]
    }
}

#[derive(Debug, Default)]
struct Narcissist;
impl Component for Narcissist {
    fn required_components(&self) -> Vec<Requirement> {
        vec![Requirement::of::<Narcissist>()]
    }
}

fn scene() -> (Scene, Entity) {
    let types = TypeTable::builder()
        .declare::<Light>()
        .declare_subtype::<SpotLight, Light>()
        .build()
        .unwrap();
    let mut scene = Scene::new(SceneConfig::new("resolution"), Arc::new(types));
    let entity = scene.create_entity(None).unwrap();
    (scene, entity)
}

fn types_on(scene: &Scene, entity: Entity) -> Vec<ComponentType> {
    scene
        .components(entity)
        .unwrap()
        .iter()
        .map(|&id| scene.index().get(id).unwrap().component_type())
        .collect()
}

#[test]
fn test_transitive_requirements_in_dependency_order() {
    let (mut scene, e) = scene();
    let attachment = scene.attach(e, A).unwrap();

    assert_eq!(
        attachment.added,
        vec![ComponentType::of::<B>(), ComponentType::of::<C>()]
    );
    assert_eq!(
        types_on(&scene, e),
        vec![
            ComponentType::of::<A>(),
            ComponentType::of::<B>(),
            ComponentType::of::<C>(),
        ]
    );
}

#[test]
fn test_satisfied_requirements_add_nothing() {
    let (mut scene, e) = scene();
    scene.attach(e, B).unwrap();
    let attachment = scene.attach(e, A).unwrap();

    assert!(attachment.added.is_empty());
    assert_eq!(scene.components(e).unwrap().len(), 3);
}

#[test]
fn test_reattaching_after_detach_adds_nothing_new() {
    let (mut scene, e) = scene();
    let a = scene.attach(e, A).unwrap().component;
    let value = scene.detach(e, a).unwrap();

    let again = scene.attach_boxed(e, value).unwrap();
    assert!(again.added.is_empty());
    assert_eq!(scene.components(e).unwrap().len(), 3);
}

#[test]
fn test_declaration_order_and_no_duplicates() {
    let (mut scene, e) = scene();
    let attachment = scene.attach(e, Wide).unwrap();

    // C first, then B (whose C is present), then A (whose B is present).
    assert_eq!(
        attachment.added,
        vec![
            ComponentType::of::<C>(),
            ComponentType::of::<B>(),
            ComponentType::of::<A>(),
        ]
    );
    assert_eq!(scene.components(e).unwrap().len(), 4);
}

#[test]
fn test_subtype_satisfies_requirement() {
    let (mut scene, e) = scene();
    scene.attach(e, SpotLight).unwrap();
    let attachment = scene.attach(e, Lamp).unwrap();

    assert!(attachment.added.is_empty());
    assert!(scene.entity_mut(e).unwrap().get::<Light>().unwrap().is_none());
}

#[test]
fn test_requirement_gets_default_value() {
    let (mut scene, e) = scene();
    scene.attach(e, Lamp).unwrap();
    let entity = scene.entity_mut(e).unwrap();
    assert_eq!(entity.get::<Light>().unwrap().unwrap().intensity, 0.0);
}

#[test]
fn test_requirement_cycle_is_detected() {
    let (mut scene, e) = scene();
    let err = scene.attach(e, Mesh).unwrap_err();

    assert_eq!(
        err,
        EcsError::RequirementCycle {
            chain: vec![
                ComponentType::of::<Mesh>(),
                ComponentType::of::<Skin>(),
                ComponentType::of::<Bone>(),
                ComponentType::of::<Mesh>(),
            ]
        }
    );
    // Nothing was attached.
    assert!(scene.components(e).unwrap().is_empty());
}

#[test]
fn test_self_requirement_is_a_cycle() {
    let (mut scene, e) = scene();
    assert!(matches!(
        scene.attach(e, Narcissist),
        Err(EcsError::RequirementCycle { .. })
    ));
}

#[test]
fn test_duplicate_exact_type_rejected_but_siblings_allowed() {
    let (mut scene, e) = scene();
    scene.attach(e, Light::default()).unwrap();
    scene.attach(e, SpotLight).unwrap();

    assert!(matches!(
        scene.attach(e, SpotLight),
        Err(EcsError::DuplicateComponent { .. })
    ));
    let lights = scene
        .components_of_type(e, ComponentType::of::<Light>())
        .unwrap();
    assert_eq!(lights.len(), 2);
}

#[test]
fn test_reattach_resolves_on_new_owner() {
    let (mut scene, from) = scene();
    let to = scene.create_entity(None).unwrap();
    let a = scene.attach(from, A).unwrap().component;

    let moved = scene.entity_mut(to).unwrap().reattach(a).unwrap();
    assert_eq!(
        moved.added,
        vec![ComponentType::of::<B>(), ComponentType::of::<C>()]
    );
    assert_eq!(
        types_on(&scene, from),
        vec![ComponentType::of::<B>(), ComponentType::of::<C>()]
    );
    assert_eq!(scene.index().owner_of(a), Some(to));
}

#[test]
fn test_attach_to_destroyed_entity() {
    let (mut scene, e) = scene();
    scene.delete_entity(e).unwrap();
    assert_eq!(
        scene.attach(e, C).unwrap_err(),
        EcsError::DestroyedEntity(e)
    );
}
