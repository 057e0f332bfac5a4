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
//! Basic example demonstrating a single scene
//!
//! This example shows how to declare a component hierarchy, build an
//! entity tree, attach components with requirements and query them.

use scene_ecs::ecs::{Component, ComponentType, Requirement, TypeTable};
use scene_ecs::{EcsResult, Scene, SceneConfig};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Transform {
    x: f32,
    y: f32,
    z: f32,
}

impl Component for Transform {}

/// Abstract base for everything that draws
#[derive(Debug)]
enum Renderer {}

#[derive(Debug, Default)]
struct MeshRenderer {
    mesh: &'static str,
}

impl Component for MeshRenderer {
    fn required_components(&self) -> Vec<Requirement> {
        vec![Requirement::of::<Transform>()]
    }
}

#[derive(Debug, Default)]
struct LightRenderer;

impl Component for LightRenderer {
    fn required_components(&self) -> Vec<Requirement> {
        vec![Requirement::of::<Transform>()]
    }
}

fn main() -> EcsResult<()> {
    env_logger::init();

    println!("Scene ECS - Basic Example");
    println!("=========================\n");

    let types = TypeTable::builder()
        .declare::<Renderer>()
        .declare_subtype::<MeshRenderer, Renderer>()
        .declare_subtype::<LightRenderer, Renderer>()
        .build()?;

    let mut scene = Scene::new(SceneConfig::new("Basic").with_logging(), Arc::new(types));
    println!("Created scene '{}' with root {}", scene.name(), scene.root());

    // Build a small tree: car -> {wheel, headlight}
    let car = scene.create_entity(None)?;
    let wheel = scene.create_entity(Some(car))?;
    let headlight = scene.create_entity(Some(car))?;
    println!("Created {} entities", scene.entity_count());

    // Requirements are resolved automatically
    let attached = scene.attach(car, MeshRenderer { mesh: "car.obj" })?;
    println!("\nAttached MeshRenderer to {}", car);
    for ty in &attached.added {
        println!("  auto-added {}", ty);
    }
    scene.attach(wheel, MeshRenderer { mesh: "wheel.obj" })?;
    scene.attach(headlight, LightRenderer)?;

    // Polymorphic query by base type
    println!("\nAll renderers:");
    for renderer in scene.query_instances_of_type(ComponentType::of::<Renderer>())? {
        println!("  {} on {}", renderer.component_type(), renderer.owner());
    }

    // Per-entity typed access
    {
        let mut entity = scene.entity_mut(wheel)?;
        if let Some(transform) = entity.get_mut::<Transform>()? {
            transform.x = 1.5;
            transform.y = -0.5;
        }
        if let Some(mesh) = entity.get::<MeshRenderer>()? {
            println!("\n{} renders '{}'", wheel, mesh.mesh);
        }
    }

    for transform in scene.instances_of::<Transform>()? {
        println!("  Transform({:.1}, {:.1}, {:.1})", transform.x, transform.y, transform.z);
    }

    // Cascade delete
    let removed = scene.delete_entity(car)?;
    println!("\nDeleted {} and its subtree ({} entities)", car, removed);
    println!("Remaining entities: {}", scene.entity_count());
    println!(
        "Remaining renderers: {}",
        scene.query_instances_of_type(ComponentType::of::<Renderer>())?.len()
    );

    println!("\nExample completed successfully!");
    Ok(())
}
