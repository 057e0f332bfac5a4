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
//! Scene configuration

/// Name given to scenes created without one
pub const DEFAULT_SCENE_NAME: &str = "unnamed Scene";

/// Configuration for scene construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneConfig {
    /// Display name used in diagnostics
    pub name: String,
    /// Number of entity slots to reserve up front
    pub initial_capacity: usize,
    /// Whether to log entity and scene lifecycle events at debug level
    pub log_lifecycle_events: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            name: DEFAULT_SCENE_NAME.to_string(),
            initial_capacity: 64,
            log_lifecycle_events: false,
        }
    }
}

impl SceneConfig {
    /// Create a configuration for a scene called `name`
    pub fn new(name: impl Into<String>) -> Self {
        SceneConfig {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Reserve room for `capacity` entities
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Enable logging for lifecycle events
    pub fn with_logging(mut self) -> Self {
        self.log_lifecycle_events = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SceneConfig::default();
        assert_eq!(config.name, "unnamed Scene");
        assert_eq!(config.initial_capacity, 64);
        assert!(!config.log_lifecycle_events);
    }

    #[test]
    fn test_builder() {
        let config = SceneConfig::new("Level 1").with_capacity(8).with_logging();
        assert_eq!(config.name, "Level 1");
        assert_eq!(config.initial_capacity, 8);
        assert!(config.log_lifecycle_events);
    }
}
