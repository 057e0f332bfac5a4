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
//! Scene switching example
//!
//! Demonstrates single and additive loading and shows that per-frame
//! systems only see components of loaded scenes.
//!
//! Run with `RUST_LOG=debug` to see the lifecycle log.

use scene_ecs::ecs::{Component, ComponentType, System, SystemExecutor};
use scene_ecs::{EcsResult, LoadMode, SceneConfig, SceneId, SceneRegistry, TypeTable};

#[derive(Debug, Default)]
struct Spin {
    angle: f32,
    speed: f32,
}

impl Component for Spin {}

struct SpinSystem {
    dt: f32,
}

impl System for SpinSystem {
    fn run(&mut self, scenes: &mut SceneRegistry) -> EcsResult<()> {
        let dt = self.dt;
        scenes.for_each_instance_mut(ComponentType::of::<Spin>(), |mut component| {
            if let Some(spin) = component.downcast_mut::<Spin>() {
                spin.angle += spin.speed * dt;
            }
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "SpinSystem"
    }
}

fn build_scene(
    scenes: &mut SceneRegistry,
    name: &str,
    spinners: usize,
    speed: f32,
) -> EcsResult<SceneId> {
    let id = scenes.create_scene(SceneConfig::new(name).with_logging());
    let scene = scenes.scene_mut(id)?;
    for _ in 0..spinners {
        let e = scene.create_entity(None)?;
        scene.attach(e, Spin { angle: 0.0, speed })?;
    }
    Ok(id)
}

fn report(scenes: &SceneRegistry) {
    let names: Vec<&str> = scenes
        .loaded()
        .into_iter()
        .filter_map(|id| scenes.scene(id).ok().map(|scene| scene.name()))
        .collect();
    let angles: Vec<String> = scenes
        .instances_of::<Spin>()
        .iter()
        .map(|spin| format!("{:.1}", spin.angle))
        .collect();
    println!("  loaded: {:?}", names);
    println!("  visible spinners: [{}]", angles.join(", "));
}

fn main() -> EcsResult<()> {
    env_logger::init();

    println!("Scene ECS - Scene Switching");
    println!("===========================\n");

    let mut scenes = SceneRegistry::new(TypeTable::empty());
    let menu = build_scene(&mut scenes, "Menu", 1, 1.0)?;
    let level = build_scene(&mut scenes, "Level", 3, 2.0)?;
    let hud = build_scene(&mut scenes, "HUD", 1, 10.0)?;

    let mut executor = SystemExecutor::new();
    executor.add_system(SpinSystem { dt: 0.5 });

    println!("Loading Menu (single)");
    scenes.load_scene(menu, LoadMode::Single)?;
    executor.run_sequential(&mut scenes)?;
    report(&scenes);

    println!("\nLoading Level (single), Menu is unloaded");
    scenes.load_scene(level, LoadMode::Single)?;
    executor.run_sequential(&mut scenes)?;
    report(&scenes);

    println!("\nLoading HUD (additive)");
    scenes.load_scene(hud, LoadMode::Additive)?;
    executor.run_sequential(&mut scenes)?;
    report(&scenes);

    println!("\nRemoving Level");
    scenes.remove_scene(level)?;
    report(&scenes);
    println!("  Level state: {:?}", scenes.state(level));

    println!("\nExample completed successfully!");
    Ok(())
}
