use std::collections::HashSet;
use slint::{Model, VecModel};

/// Set of selected IDs (nodes or edges).
///
/// Every mutator reports whether the set actually changed, so the scene can
/// emit exactly one selection-changed notification per effective change.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    selected: HashSet<i32>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a click on `id`.
    ///
    /// With `additive` (shift held) the ID is toggled. Otherwise the selection
    /// collapses to just `id`.
    pub fn handle_interaction(&mut self, id: i32, additive: bool) -> bool {
        if additive {
            if !self.selected.remove(&id) {
                self.selected.insert(id);
            }
            return true;
        }

        if self.selected.len() == 1 && self.selected.contains(&id) {
            return false;
        }
        self.selected.clear();
        self.selected.insert(id);
        true
    }

    pub fn set(&mut self, id: i32, selected: bool) -> bool {
        if selected {
            self.selected.insert(id)
        } else {
            self.selected.remove(&id)
        }
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Replace the current selection, e.g. after a rubber-band drag.
    pub fn replace<I>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = i32>,
    {
        let new: HashSet<i32> = ids.into_iter().collect();
        if new == self.selected {
            return false;
        }
        self.selected = new;
        true
    }

    pub fn extend<I>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = i32>,
    {
        let len_before = self.selected.len();
        self.selected.extend(ids);
        self.selected.len() != len_before
    }

    /// Drop IDs for which `keep` returns false.
    pub fn retain<F>(&mut self, keep: F) -> bool
    where
        F: FnMut(&i32) -> bool,
    {
        let len_before = self.selected.len();
        self.selected.retain(keep);
        self.selected.len() != len_before
    }

    pub fn contains(&self, id: i32) -> bool {
        self.selected.contains(&id)
    }

    pub fn iter(&self) -> std::collections::hash_set::Iter<'_, i32> {
        self.selected.iter()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Mirror the selection into a Slint `VecModel`, sorted for stable output.
    pub fn sync_to_model(&self, model: &VecModel<i32>) {
        let mut ids: Vec<i32> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        model.set_vec(ids);
    }

    /// Take over a selection produced on the Slint side.
    pub fn sync_from_model(&mut self, model: &dyn Model<Data = i32>) -> bool {
        self.replace((0..model.row_count()).filter_map(|i| model.row_data(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    // ========================================================================
    // handle_interaction()
    // ========================================================================

    #[test]
    fn test_click_selects_single() {
        let mut selection = SelectionSet::new();
        assert!(selection.handle_interaction(1, false));
        assert!(selection.contains(1));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_click_replaces_selection() {
        let mut selection = SelectionSet::new();
        selection.handle_interaction(1, false);
        selection.handle_interaction(2, false);
        assert!(!selection.contains(1));
        assert!(selection.contains(2));
    }

    #[test]
    fn test_click_on_sole_selected_is_noop() {
        let mut selection = SelectionSet::new();
        selection.handle_interaction(1, false);
        assert!(!selection.handle_interaction(1, false));
        assert!(selection.contains(1));
    }

    #[test]
    fn test_additive_click_toggles() {
        let mut selection = SelectionSet::new();
        selection.handle_interaction(1, false);
        selection.handle_interaction(2, true);
        assert_eq!(selection.len(), 2);
        selection.handle_interaction(1, true);
        assert!(!selection.contains(1));
        assert!(selection.contains(2));
    }

    // ========================================================================
    // Bulk mutators
    // ========================================================================

    #[test]
    fn test_set_reports_change() {
        let mut selection = SelectionSet::new();
        assert!(selection.set(5, true));
        assert!(!selection.set(5, true));
        assert!(selection.set(5, false));
        assert!(!selection.set(5, false));
    }

    #[test]
    fn test_clear_reports_change() {
        let mut selection = SelectionSet::new();
        assert!(!selection.clear());
        selection.set(1, true);
        assert!(selection.clear());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_replace_same_set_is_noop() {
        let mut selection = SelectionSet::new();
        assert!(selection.replace(vec![1, 2, 2]));
        assert_eq!(selection.len(), 2);
        assert!(!selection.replace(vec![2, 1]));
        assert!(selection.replace(Vec::new()));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_extend_and_retain() {
        let mut selection = SelectionSet::new();
        assert!(selection.extend([1, 2, 3]));
        assert!(!selection.extend([1, 2]));
        assert!(selection.retain(|&id| id != 2));
        assert!(!selection.retain(|_| true));
        let mut ids: Vec<i32> = selection.iter().copied().collect();
        ids.sort();
        assert_eq!(ids, vec![1, 3]);
    }

    // ========================================================================
    // Slint model sync
    // ========================================================================

    #[test]
    fn test_sync_to_model_overwrites_rows_sorted() {
        let mut selection = SelectionSet::new();
        selection.extend([30, -1, 7]);
        let model: Rc<VecModel<i32>> = Rc::new(VecModel::from(vec![10, 20, 30, 40]));
        selection.sync_to_model(&model);
        assert_eq!(model.iter().collect::<Vec<_>>(), vec![-1, 7, 30]);
    }

    #[test]
    fn test_sync_from_model_replaces() {
        let mut selection = SelectionSet::new();
        selection.set(99, true);
        let model: Rc<VecModel<i32>> = Rc::new(VecModel::from(vec![1, 2]));
        assert!(selection.sync_from_model(model.as_ref()));
        assert!(!selection.contains(99));
        assert!(selection.contains(1) && selection.contains(2));
    }
}
