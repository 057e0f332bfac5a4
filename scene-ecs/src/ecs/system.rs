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
//! System execution framework
//!
//! Systems are the per-frame consumers of the registry: update and render
//! passes that query component instances across the loaded scenes.

use crate::error::{EcsError, EcsResult};
use crate::scene::SceneRegistry;

/// Trait for systems that operate on the loaded scenes
pub trait System {
    /// Execute the system once
    fn run(&mut self, scenes: &mut SceneRegistry) -> EcsResult<()>;

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Executor for running systems
///
/// Systems run in the order they were added.
pub struct SystemExecutor {
    systems: Vec<Box<dyn System>>,
}

impl SystemExecutor {
    /// Create a new system executor
    pub fn new() -> Self {
        SystemExecutor {
            systems: Vec::new(),
        }
    }

    /// Add a system to the executor
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Run all systems sequentially, stopping at the first failure
    pub fn run_sequential(&mut self, scenes: &mut SceneRegistry) -> EcsResult<()> {
        for system in &mut self.systems {
            if let Err(source) = system.run(scenes) {
                log::error!("System '{}' failed: {}", system.name(), source);
                return Err(EcsError::System {
                    system: system.name().to_string(),
                    source: Box::new(source),
                });
            }
        }
        Ok(())
    }

    /// Get the number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }
}

impl Default for SystemExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SystemExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.systems.iter().map(|system| system.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneId;

    struct TestSystem {
        run_count: usize,
    }

    impl System for TestSystem {
        fn run(&mut self, _scenes: &mut SceneRegistry) -> EcsResult<()> {
            self.run_count += 1;
            Ok(())
        }

        fn name(&self) -> &str {
            "TestSystem"
        }
    }

    struct FailingSystem;

    impl System for FailingSystem {
        fn run(&mut self, scenes: &mut SceneRegistry) -> EcsResult<()> {
            scenes.scene(SceneId::next())?;
            Ok(())
        }
    }

    #[test]
    fn test_system_executor() {
        let mut executor = SystemExecutor::new();
        assert_eq!(executor.system_count(), 0);

        let system = TestSystem { run_count: 0 };
        executor.add_system(system);
        assert_eq!(executor.system_count(), 1);

        let mut scenes = SceneRegistry::default();
        executor.run_sequential(&mut scenes).unwrap();
    }

    #[test]
    fn test_failure_names_system() {
        let mut executor = SystemExecutor::new();
        executor.add_system(FailingSystem);

        let mut scenes = SceneRegistry::default();
        match executor.run_sequential(&mut scenes) {
            Err(EcsError::System { system, source }) => {
                assert!(system.ends_with("FailingSystem"));
                assert!(matches!(*source, EcsError::NotFound(_)));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
