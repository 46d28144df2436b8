//! Tracks which transactions are selected across filter and page changes.

use std::collections::HashSet;

use crate::database_id::TransactionId;

/// The set of selected transaction IDs.
///
/// The selection survives re-filtering and re-paginating. It never resolves
/// stale IDs on its own: after deleting records the caller must call
/// [SelectionTracker::prune] with the IDs that still exist.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionTracker {
    selected: HashSet<TransactionId>,
}

impl SelectionTracker {
    /// Create a tracker with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker with `ids` selected.
    pub fn from_ids(ids: impl IntoIterator<Item = TransactionId>) -> Self {
        Self {
            selected: ids.into_iter().collect(),
        }
    }

    /// Select `id` if it is not selected, deselect it otherwise.
    pub fn toggle_one(&mut self, id: TransactionId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Toggle the selection for a whole page of IDs.
    ///
    /// If every ID on the page is already selected, all of them are
    /// deselected. Otherwise all of them become selected. This is
    /// "select all" scoped to the current page, not the whole filtered set.
    pub fn toggle_all_on_page(&mut self, page_ids: &[TransactionId]) {
        if self.is_all_on_page_selected(page_ids) {
            for id in page_ids {
                self.selected.remove(id);
            }
        } else {
            self.selected.extend(page_ids.iter().copied());
        }
    }

    /// Whether every ID on the page is selected.
    ///
    /// Always false for an empty page.
    pub fn is_all_on_page_selected(&self, page_ids: &[TransactionId]) -> bool {
        !page_ids.is_empty() && page_ids.iter().all(|id| self.selected.contains(id))
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: TransactionId) -> bool {
        self.selected.contains(&id)
    }

    /// Drop selected IDs that are not in `existing`.
    ///
    /// Callers must invoke this after deleting records, stale IDs are never
    /// cleaned up implicitly.
    pub fn prune(&mut self, existing: &[TransactionId]) {
        self.selected.retain(|id| existing.contains(id));
    }

    /// The selected IDs, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = TransactionId> + '_ {
        self.selected.iter().copied()
    }

    /// The number of selected IDs.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
