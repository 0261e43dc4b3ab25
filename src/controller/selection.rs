//! The selection set.

use std::collections::BTreeSet;

/// Identifiers the actor has ticked.
///
/// Always a subset of the identifiers in the collection: every collection
/// change is followed by [`Selection::retain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selection<Id: Ord> {
    ids: BTreeSet<Id>,
}

impl<Id: Ord> Default for Selection<Id> {
    fn default() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }
}

impl<Id: Ord + Clone> Selection<Id> {
    /// Flips membership. Returns `true` if `id` is now selected.
    pub(crate) fn toggle(&mut self, id: Id) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Replaces the selection.
    pub(crate) fn replace(&mut self, ids: impl IntoIterator<Item = Id>) {
        self.ids = ids.into_iter().collect();
    }

    pub(crate) fn clear(&mut self) {
        self.ids.clear();
    }

    pub(crate) fn remove(&mut self, id: &Id) {
        self.ids.remove(id);
    }

    /// Drops identifiers for which `present` is false.
    pub(crate) fn retain(&mut self, present: impl Fn(&Id) -> bool) {
        self.ids.retain(|id| present(id));
    }

    pub(crate) fn contains(&self, id: &Id) -> bool {
        self.ids.contains(id)
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub(crate) fn to_set(&self) -> BTreeSet<Id> {
        self.ids.clone()
    }

    pub(crate) fn to_vec(&self) -> Vec<Id> {
        self.ids.iter().cloned().collect()
    }
}
