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
//! Required-component resolution
//!
//! Attaching a component must also attach everything it requires, and
//! everything those require, without attaching a type twice. Resolution
//! runs in two phases:
//!
//! 1. **Plan**: walk the requirement lists depth-first in declaration
//!    order, instantiating each missing type from its factory. A component
//!    is planned before its own requirements.
//! 2. **Apply**: the caller registers the planned instances in order.
//!
//! Planning never touches the index, so a requirement cycle is reported
//! before the entity changes.
//!
//! Types already on the entity are read from the index at most once per
//! attach, and only if some requirement actually has to be checked.

use crate::ecs::{Component, ComponentIndex, ComponentType, Entity, Requirement};
use crate::error::{EcsError, EcsResult};
use std::collections::HashSet;

/// A required component ready to be attached.
pub(crate) struct PlannedComponent {
    pub(crate) ty: ComponentType,
    pub(crate) value: Box<dyn Component>,
}

/// Resolver state for a single attach call.
pub(crate) struct Resolver<'a> {
    index: &'a ComponentIndex,
    entity: Entity,
    /// Types confirmed on the entity, as full closures. Primed lazily.
    present: Option<HashSet<ComponentType>>,
    /// Types whose requirements are being expanded on the current path.
    resolving: Vec<ComponentType>,
    plan: Vec<PlannedComponent>,
}

impl<'a> Resolver<'a> {
    /// Resolve requirements for a component of type `root` about to be
    /// attached to `entity`.
    pub(crate) fn new(index: &'a ComponentIndex, entity: Entity, root: ComponentType) -> Self {
        Resolver {
            index,
            entity,
            present: None,
            resolving: vec![root],
            plan: Vec::new(),
        }
    }

    /// Expand `requirements` of the root component into an attach plan.
    pub(crate) fn plan(
        mut self,
        requirements: Vec<Requirement>,
    ) -> EcsResult<Vec<PlannedComponent>> {
        self.expand(requirements)?;
        Ok(self.plan)
    }

    fn expand(&mut self, requirements: Vec<Requirement>) -> EcsResult<()> {
        for requirement in requirements {
            let ty = requirement.component_type();

            if self.resolving.contains(&ty) {
                let mut chain = self.resolving.clone();
                chain.push(ty);
                log::warn!(
                    "Required component cycle on {}: {}",
                    self.entity,
                    chain.iter().map(|t| t.name()).collect::<Vec<_>>().join(" -> ")
                );
                return Err(EcsError::RequirementCycle { chain });
            }

            if self.present()?.contains(&ty) {
                continue;
            }

            let value = requirement.instantiate();
            let nested = value.required_components();
            let closure: Vec<ComponentType> = self.index.types().closure(ty).collect();
            self.present()?.extend(closure);
            self.plan.push(PlannedComponent { ty, value });

            self.resolving.push(ty);
            self.expand(nested)?;
            self.resolving.pop();
        }
        Ok(())
    }

    fn present(&mut self) -> EcsResult<&mut HashSet<ComponentType>> {
        if self.present.is_none() {
            let mut present = self.index.present_types(self.entity)?;
            for &ty in &self.resolving {
                present.extend(self.index.types().closure(ty));
            }
            self.present = Some(present);
        }
        Ok(self.present.get_or_insert_with(HashSet::new))
    }
}
