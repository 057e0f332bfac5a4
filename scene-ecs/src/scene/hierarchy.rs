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
//! Parent/children bookkeeping for one scene
//!
//! Both maps are slot-addressed by entity index. Every mutation updates the
//! parent slot and the affected children lists together, so
//! `children[parent(e)]` contains `e` whenever `parent(e)` is set. Callers
//! are expected to have validated handles already.

use crate::ecs::Entity;

#[derive(Debug, Default)]
pub(crate) struct Hierarchy {
    parents: Vec<Option<Entity>>,
    children: Vec<Vec<Entity>>,
}

impl Hierarchy {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Hierarchy {
            parents: Vec::with_capacity(capacity),
            children: Vec::with_capacity(capacity),
        }
    }

    fn ensure_slot(&mut self, entity: Entity) -> usize {
        let slot = entity.index() as usize;
        if slot >= self.parents.len() {
            self.parents.resize(slot + 1, None);
            self.children.resize_with(slot + 1, Vec::new);
        }
        slot
    }

    /// Track `entity` with no parent and no children.
    pub(crate) fn insert(&mut self, entity: Entity) {
        let slot = self.ensure_slot(entity);
        self.parents[slot] = None;
        self.children[slot].clear();
    }

    /// Link `entity` under `parent`. `entity` must currently be unbound.
    pub(crate) fn bind(&mut self, entity: Entity, parent: Entity) {
        let slot = self.ensure_slot(entity);
        let parent_slot = self.ensure_slot(parent);
        self.parents[slot] = Some(parent);
        self.children[parent_slot].push(entity);
    }

    /// Unlink `entity` from its parent, returning the old parent.
    pub(crate) fn unbind(&mut self, entity: Entity) -> Option<Entity> {
        let old = self.parents.get_mut(entity.index() as usize)?.take()?;
        if let Some(siblings) = self.children.get_mut(old.index() as usize) {
            siblings.retain(|&child| child != entity);
        }
        Some(old)
    }

    /// Move `entity` under `parent` in one step.
    pub(crate) fn reparent(&mut self, entity: Entity, parent: Entity) -> Option<Entity> {
        let old = self.unbind(entity);
        self.bind(entity, parent);
        old
    }

    /// Forget `entity` entirely. Its children are left dangling and must be
    /// removed by the caller first.
    pub(crate) fn remove(&mut self, entity: Entity) {
        self.unbind(entity);
        if let Some(children) = self.children.get_mut(entity.index() as usize) {
            children.clear();
        }
    }

    pub(crate) fn parent(&self, entity: Entity) -> Option<Entity> {
        self.parents.get(entity.index() as usize).copied().flatten()
    }

    pub(crate) fn children(&self, entity: Entity) -> &[Entity] {
        self.children
            .get(entity.index() as usize)
            .map(|children| children.as_slice())
            .unwrap_or(&[])
    }

    /// Every entity below `entity`, depth-first, parents before children.
    pub(crate) fn descendants(&self, entity: Entity) -> Vec<Entity> {
        let mut out = Vec::new();
        let mut stack: Vec<Entity> = self.children(entity).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Whether `ancestor` lies on the parent chain of `entity`.
    pub(crate) fn is_ancestor(&self, ancestor: Entity, entity: Entity) -> bool {
        let mut current = self.parent(entity);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    pub(crate) fn clear(&mut self) {
        self.parents.clear();
        self.children.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityStore;
    use crate::scene::SceneId;

    fn tree() -> (Hierarchy, Vec<Entity>) {
        let mut store = EntityStore::with_capacity(SceneId::next(), 5);
        let mut hierarchy = Hierarchy::default();
        let ids: Vec<Entity> = (0..5).map(|_| store.allocate()).collect();
        for &e in &ids {
            hierarchy.insert(e);
        }
        // 0 -> {1, 2}, 1 -> {3}, 3 -> {4}
        hierarchy.bind(ids[1], ids[0]);
        hierarchy.bind(ids[2], ids[0]);
        hierarchy.bind(ids[3], ids[1]);
        hierarchy.bind(ids[4], ids[3]);
        (hierarchy, ids)
    }

    #[test]
    fn test_bind_is_bidirectional() {
        let (hierarchy, ids) = tree();
        assert_eq!(hierarchy.parent(ids[1]), Some(ids[0]));
        assert_eq!(hierarchy.children(ids[0]), &[ids[1], ids[2]]);
        assert_eq!(hierarchy.parent(ids[0]), None);
    }

    #[test]
    fn test_reparent_moves_between_lists() {
        let (mut hierarchy, ids) = tree();
        assert_eq!(hierarchy.reparent(ids[3], ids[2]), Some(ids[1]));
        assert!(hierarchy.children(ids[1]).is_empty());
        assert_eq!(hierarchy.children(ids[2]), &[ids[3]]);
        assert_eq!(hierarchy.parent(ids[3]), Some(ids[2]));
    }

    #[test]
    fn test_descendants_depth_first() {
        let (hierarchy, ids) = tree();
        assert_eq!(hierarchy.descendants(ids[0]), vec![ids[1], ids[3], ids[4], ids[2]]);
        assert!(hierarchy.descendants(ids[4]).is_empty());
    }

    #[test]
    fn test_is_ancestor() {
        let (hierarchy, ids) = tree();
        assert!(hierarchy.is_ancestor(ids[0], ids[4]));
        assert!(hierarchy.is_ancestor(ids[3], ids[4]));
        assert!(!hierarchy.is_ancestor(ids[2], ids[4]));
        assert!(!hierarchy.is_ancestor(ids[4], ids[4]));
    }

    #[test]
    fn test_remove_unlinks_from_parent() {
        let (mut hierarchy, ids) = tree();
        hierarchy.remove(ids[4]);
        hierarchy.remove(ids[3]);
        assert_eq!(hierarchy.parent(ids[3]), None);
        assert!(hierarchy.children(ids[1]).is_empty());
    }
}
