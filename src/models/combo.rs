//! Per-round scene → provider proposals.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Task;

/// A proposed mapping for one round: entry `s` is the provider index for
/// scene `s`, or `None` to defer the scene.
///
/// Scenes already placed on the task appear pinned to their provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Combo(Vec<Option<usize>>);

impl Combo {
    /// A combo that defers every one of `len` scenes.
    pub fn deferred(len: usize) -> Self {
        Self(vec![None; len])
    }

    /// Existing placements pinned, everything else deferred.
    pub fn pinned(task: &Task) -> Self {
        Self(
            (0..task.scene_number)
                .map(|s| task.allocation(s).map(|a| a.provider))
                .collect(),
        )
    }

    /// Slots in scene order.
    pub fn slots(&self) -> &[Option<usize>] {
        &self.0
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the combo has no slots.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Provider for a scene (`None` if deferred or out of range).
    pub fn get(&self, scene_id: usize) -> Option<usize> {
        self.0.get(scene_id).copied().flatten()
    }

    /// Sets a scene's slot. Out-of-range indices are ignored.
    pub fn set(&mut self, scene_id: usize, provider: Option<usize>) {
        if let Some(slot) = self.0.get_mut(scene_id) {
            *slot = provider;
        }
    }

    /// Number of sentinel entries.
    pub fn deferred_count(&self) -> usize {
        self.0.iter().filter(|s| s.is_none()).count()
    }

    /// `(scene, provider)` for scenes this combo places and the task has not
    /// placed yet.
    pub fn new_placements(&self, task: &Task) -> Vec<(usize, usize)> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(s, p)| p.map(|p| (s, p)))
            .filter(|&(s, _)| !task.is_allocated(s))
            .collect()
    }

    /// New placements grouped by provider, scenes ascending.
    pub fn groups(&self, task: &Task) -> BTreeMap<usize, Vec<usize>> {
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (s, p) in self.new_placements(task) {
            groups.entry(p).or_default().push(s);
        }
        groups
    }
}

impl From<Vec<Option<usize>>> for Combo {
    fn from(slots: Vec<Option<usize>>) -> Self {
        Self(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SceneAllocation;

    #[test]
    fn test_pinned_combo() {
        let mut task = Task::new("T1", 3);
        task.allocate(1, SceneAllocation { start_ms: 0, provider: 4 });

        let combo = Combo::pinned(&task);
        assert_eq!(combo.slots(), &[None, Some(4), None]);
        assert_eq!(combo.deferred_count(), 2);
    }

    #[test]
    fn test_new_placements_skip_pinned() {
        let mut task = Task::new("T1", 4);
        task.allocate(0, SceneAllocation { start_ms: 0, provider: 1 });

        let combo = Combo::from(vec![Some(1), Some(0), None, Some(0)]);
        assert_eq!(combo.new_placements(&task), vec![(1, 0), (3, 0)]);

        let groups = combo.groups(&task);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[&0], vec![1, 3]);
    }

    #[test]
    fn test_set_and_get() {
        let mut combo = Combo::deferred(2);
        combo.set(1, Some(3));
        combo.set(7, Some(3)); // ignored
        assert_eq!(combo.get(1), Some(3));
        assert_eq!(combo.get(0), None);
        assert_eq!(combo.len(), 2);
    }
}
