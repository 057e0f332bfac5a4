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
//! Scene registry tests
//!
//! Load modes, lifecycle transitions, cross-scene queries and systems.

use scene_ecs::ecs::{Component, ComponentType, System, SystemExecutor, TypeTable};
use scene_ecs::{
    EcsError, EcsResult, LoadMode, Scene, SceneConfig, SceneId, SceneRegistry, SceneState,
};

enum Renderer {}

#[derive(Debug, Default)]
struct MeshRenderer {
    draws: u32,
}
impl Component for MeshRenderer {}

#[derive(Debug, Default)]
struct SpriteRenderer {
    draws: u32,
}
impl Component for SpriteRenderer {}

fn registry() -> SceneRegistry {
    let types = TypeTable::builder()
        .declare::<Renderer>()
        .declare_subtype::<MeshRenderer, Renderer>()
        .declare_subtype::<SpriteRenderer, Renderer>()
        .build()
        .unwrap();
    SceneRegistry::new(types)
}

fn scene_with_renderers(registry: &mut SceneRegistry, name: &str, meshes: usize) -> SceneId {
    let id = registry.create_scene(SceneConfig::new(name).with_logging());
    let scene = registry.scene_mut(id).unwrap();
    for _ in 0..meshes {
        let e = scene.create_entity(None).unwrap();
        scene.attach(e, MeshRenderer::default()).unwrap();
    }
    let e = scene.create_entity(None).unwrap();
    scene.attach(e, SpriteRenderer::default()).unwrap();
    id
}

fn renderer_count(registry: &SceneRegistry) -> usize {
    registry
        .query_instances_of_type(ComponentType::of::<Renderer>())
        .len()
}

#[test]
fn test_single_mode_scenario() {
    let mut registry = registry();
    let s1 = scene_with_renderers(&mut registry, "S1", 1);
    let s2 = scene_with_renderers(&mut registry, "S2", 3);

    registry.load_scene(s1, LoadMode::Single).unwrap();
    assert_eq!(renderer_count(&registry), 2);

    registry.load_scene(s2, LoadMode::Single).unwrap();
    assert_eq!(registry.state(s1), Some(SceneState::Unloaded));
    assert_eq!(registry.loaded(), vec![s2]);
    assert_eq!(renderer_count(&registry), 4);
    assert!(registry
        .query_instances_of_type(ComponentType::of::<Renderer>())
        .iter()
        .all(|r| registry.scene(s2).unwrap().contains(r.owner())));
}

#[test]
fn test_additive_mode_sees_both() {
    let mut registry = registry();
    let s1 = scene_with_renderers(&mut registry, "S1", 1);
    let s2 = scene_with_renderers(&mut registry, "S2", 2);

    registry.load_scene(s1, LoadMode::Additive).unwrap();
    registry.load_scene(s2, LoadMode::Additive).unwrap();
    assert_eq!(registry.loaded(), vec![s1, s2]);
    assert_eq!(renderer_count(&registry), 5);
    assert_eq!(registry.instances_of::<MeshRenderer>().len(), 3);

    registry.unload_scene(s1).unwrap();
    assert_eq!(renderer_count(&registry), 3);
}

#[test]
fn test_loaded_and_unloaded_partition_registered() {
    let mut registry = registry();
    let ids: Vec<SceneId> = (0..4)
        .map(|i| registry.create_scene(SceneConfig::new(format!("scene {i}"))))
        .collect();
    registry.load_scene(ids[1], LoadMode::Additive).unwrap();
    registry.load_scene(ids[3], LoadMode::Additive).unwrap();
    registry.remove_scene(ids[0]).unwrap();

    let loaded = registry.loaded();
    let unloaded = registry.unloaded();
    assert!(loaded.iter().all(|id| !unloaded.contains(id)));
    assert_eq!(loaded.len() + unloaded.len(), 3);
    assert_eq!(registry.scene_ids(), ids.as_slice());
}

#[test]
fn test_remove_loaded_scene_unloads_then_destroys() {
    let mut registry = registry();
    let id = scene_with_renderers(&mut registry, "doomed", 2);
    registry.load_scene(id, LoadMode::Single).unwrap();

    registry.remove_scene(id).unwrap();
    assert_eq!(registry.state(id), Some(SceneState::Destroyed));
    assert_eq!(renderer_count(&registry), 0);

    let scene = registry.scene_mut(id).unwrap();
    assert_eq!(scene.create_entity(None), Err(EcsError::DestroyedScene(id)));
    assert_eq!(registry.unload_scene(id), Err(EcsError::DestroyedScene(id)));
}

#[test]
fn test_load_is_noop_unless_unloaded() {
    let mut registry = registry();
    let a = registry.create_scene(SceneConfig::default());
    let b = registry.create_scene(SceneConfig::default());
    registry.load_scene(a, LoadMode::Single).unwrap();
    registry.load_scene(b, LoadMode::Additive).unwrap();

    // Reloading `a` in single mode must not unload `b`.
    assert!(!registry.load_scene(a, LoadMode::Single).unwrap());
    assert!(registry.is_loaded(b));
}

#[test]
fn test_added_scene_starts_unloaded() {
    let mut registry = registry();
    let scene = Scene::new(SceneConfig::new("external"), registry.types().clone());
    let id = registry.add_scene(scene);
    assert!(registry.is_unloaded(id));
    assert_eq!(registry.scene(id).unwrap().name(), "external");
}

struct DrawSystem;

impl System for DrawSystem {
    fn run(&mut self, scenes: &mut SceneRegistry) -> EcsResult<()> {
        scenes.for_each_instance_mut(ComponentType::of::<Renderer>(), |mut renderer| {
            if let Some(mesh) = renderer.downcast_mut::<MeshRenderer>() {
                mesh.draws += 1;
                return;
            }
            if let Some(sprite) = renderer.downcast_mut::<SpriteRenderer>() {
                sprite.draws += 1;
            }
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "DrawSystem"
    }
}

#[test]
fn test_systems_only_touch_loaded_scenes() {
    let mut registry = registry();
    let active = scene_with_renderers(&mut registry, "active", 1);
    let idle = scene_with_renderers(&mut registry, "idle", 1);
    registry.load_scene(active, LoadMode::Single).unwrap();

    let mut executor = SystemExecutor::new();
    executor.add_system(DrawSystem);
    for _ in 0..3 {
        executor.run_sequential(&mut registry).unwrap();
    }

    let active_draws: Vec<u32> = registry
        .scene(active)
        .unwrap()
        .instances_of::<MeshRenderer>()
        .unwrap()
        .iter()
        .map(|m| m.draws)
        .collect();
    assert_eq!(active_draws, vec![3]);

    let idle_draws: Vec<u32> = registry
        .scene(idle)
        .unwrap()
        .instances_of::<SpriteRenderer>()
        .unwrap()
        .iter()
        .map(|s| s.draws)
        .collect();
    assert_eq!(idle_draws, vec![0]);
}
