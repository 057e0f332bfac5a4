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
//! Component type identity and the static type hierarchy
//!
//! Every component value is tagged with a [`ComponentType`]. Types may
//! declare a single direct ancestor in a [`TypeTable`], which is built once
//! at startup and never mutated afterwards. The table precomputes each
//! type's ancestor chain so that indexing a component under its whole
//! *type closure* (the type itself plus every ancestor) is a slice walk.
//!
//! Abstract base types that never carry instances of their own are best
//! declared with uninhabited marker types:
//!
//! ```
//! use scene_ecs::ecs::TypeTable;
//!
//! enum Renderer {}
//! #[derive(Debug, Default)]
//! struct MeshRenderer;
//!
//! let table = TypeTable::builder()
//!     .declare::<Renderer>()
//!     .declare_subtype::<MeshRenderer, Renderer>()
//!     .build()
//!     .unwrap();
//! assert_eq!(table.len(), 2);
//! ```

use crate::error::{EcsError, EcsResult};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Value-comparable identifier of a component type.
///
/// Equality and hashing only look at the underlying [`TypeId`]; the name is
/// carried for diagnostics.
#[derive(Clone, Copy)]
pub struct ComponentType {
    id: TypeId,
    name: &'static str,
}

impl ComponentType {
    /// The component type of `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        ComponentType {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified Rust type name.
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Short name without the module path (e.g. `Transform`).
    pub fn name(&self) -> &'static str {
        let prefix = match self.name.find('<') {
            Some(angle) => &self.name[..angle],
            None => self.name,
        };
        prefix.rsplit("::").next().unwrap_or(prefix)
    }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentType {}

impl Hash for ComponentType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentType({})", self.name())
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Precomputed component type hierarchy.
///
/// Types missing from the table behave as roots: their closure is just
/// themselves.
#[derive(Debug, Default)]
pub struct TypeTable {
    parents: HashMap<ComponentType, Option<ComponentType>>,
    /// Strict ancestors of every declared type, nearest first.
    ancestors: HashMap<ComponentType, Vec<ComponentType>>,
}

impl TypeTable {
    /// Start declaring a hierarchy.
    pub fn builder() -> TypeTableBuilder {
        TypeTableBuilder::default()
    }

    /// An empty table in which every type is its own root.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The type closure of `ty`: `ty` first, then its ancestors nearest first.
    pub fn closure(&self, ty: ComponentType) -> impl Iterator<Item = ComponentType> + '_ {
        let ancestors = self
            .ancestors
            .get(&ty)
            .map(|chain| chain.as_slice())
            .unwrap_or(&[]);
        std::iter::once(ty).chain(ancestors.iter().copied())
    }

    /// Whether `ty` equals `ancestor` or declares it somewhere up its chain.
    pub fn is_subtype_of(&self, ty: ComponentType, ancestor: ComponentType) -> bool {
        ty == ancestor
            || self
                .ancestors
                .get(&ty)
                .map_or(false, |chain| chain.contains(&ancestor))
    }

    /// Direct ancestor of `ty`, if one was declared.
    pub fn parent_of(&self, ty: ComponentType) -> Option<ComponentType> {
        self.parents.get(&ty).copied().flatten()
    }

    /// Whether `ty` was declared.
    pub fn contains(&self, ty: ComponentType) -> bool {
        self.parents.contains_key(&ty)
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Whether no types were declared.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Builder for [`TypeTable`].
///
/// Declarations chain by value; problems are reported by [`build`](Self::build).
#[derive(Debug, Default)]
pub struct TypeTableBuilder {
    parents: HashMap<ComponentType, Option<ComponentType>>,
    conflict: Option<EcsError>,
}

impl TypeTableBuilder {
    /// Declare `T` as a root type.
    pub fn declare<T: ?Sized + 'static>(self) -> Self {
        self.declare_type(ComponentType::of::<T>(), None)
    }

    /// Declare `S` as a direct subtype of `B`.
    pub fn declare_subtype<S: ?Sized + 'static, B: ?Sized + 'static>(self) -> Self {
        self.declare_type(ComponentType::of::<S>(), Some(ComponentType::of::<B>()))
    }

    /// Declare `ty` as a direct subtype of `parent`.
    pub fn declare_subtype_of(self, ty: ComponentType, parent: ComponentType) -> Self {
        self.declare_type(ty, Some(parent))
    }

    /// Declare `ty` with an optional direct ancestor.
    ///
    /// Declaring a type again without a parent keeps the earlier parent.
    pub fn declare_type(mut self, ty: ComponentType, parent: Option<ComponentType>) -> Self {
        match (self.parents.get(&ty).copied().flatten(), parent) {
            (Some(first), Some(second)) if first != second => {
                if self.conflict.is_none() {
                    self.conflict = Some(EcsError::ConflictingParent { ty, first, second });
                }
            }
            (Some(_), _) => {}
            (None, parent) => {
                self.parents.insert(ty, parent);
            }
        }
        self
    }

    /// Validate the declarations and precompute every ancestor chain.
    pub fn build(self) -> EcsResult<TypeTable> {
        if let Some(conflict) = self.conflict {
            return Err(conflict);
        }

        let mut ancestors = HashMap::with_capacity(self.parents.len());
        for &ty in self.parents.keys() {
            let mut chain = Vec::new();
            let mut seen = HashSet::new();
            seen.insert(ty);
            let mut current = ty;
            while let Some(parent) = self.parents.get(&current).copied().flatten() {
                if !self.parents.contains_key(&parent) {
                    return Err(EcsError::UnknownType(parent));
                }
                if !seen.insert(parent) {
                    return Err(EcsError::TypeHierarchyCycle(ty));
                }
                chain.push(parent);
                current = parent;
            }
            ancestors.insert(ty, chain);
        }

        log::debug!("Built component type table with {} types", self.parents.len());
        Ok(TypeTable {
            parents: self.parents,
            ancestors,
        })
    }
}
