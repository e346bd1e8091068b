use crate::catalog::Category;

/// A category in the strip together with its toggle state.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectableCategory {
    pub category: Category,
    pub selected: bool,
}

/// Category strip state: every loaded category, its toggle flag and the
/// cursor used for keyboard navigation.
#[derive(Debug, Default)]
pub struct Selection {
    items: Vec<SelectableCategory>,
    cursor: usize,
}

impl Selection {
    /// Freshly loaded categories start unselected.
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            items: categories
                .into_iter()
                .map(|category| SelectableCategory {
                    category,
                    selected: false,
                })
                .collect(),
            cursor: 0,
        }
    }

    pub fn items(&self) -> &[SelectableCategory] {
        &self.items
    }

    /// Flip the flag of the category with `id`. Returns false when no such
    /// category is loaded.
    pub fn toggle(&mut self, id: u32) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.category.id == id) else {
            return false;
        };
        item.selected = !item.selected;
        true
    }

    pub fn selected_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.items
            .iter()
            .filter(|item| item.selected)
            .map(|item| item.category.id)
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&SelectableCategory> {
        self.items.get(self.cursor)
    }

    pub const fn previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub const fn next(&mut self) {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
        }
    }

    pub const fn first(&mut self) {
        self.cursor = 0;
    }

    pub const fn last(&mut self) {
        self.cursor = self.items.len().saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;

    fn category(id: u32, title: &str) -> Category {
        Category {
            id,
            title: title.to_string(),
            image_ref: format!("{id}.svg"),
        }
    }

    fn selection() -> Selection {
        Selection::new(
            (1..=6)
                .map(|id| category(id, &format!("Category {id}")))
                .collect(),
        )
    }

    #[test]
    fn test_loaded_categories_start_unselected() {
        let selection = selection();
        assert_eq!(selection.items().len(), 6);
        assert!(selection.items().iter().all(|item| !item.selected));
        assert_eq!(selection.selected_ids().count(), 0);
    }

    #[test]
    fn test_toggle_twice_deselects() {
        let mut selection = selection();
        assert!(selection.toggle(3));
        assert_eq!(selection.selected_ids().collect::<Vec<_>>(), vec![3]);
        assert!(selection.toggle(3));
        assert_eq!(selection.selected_ids().count(), 0);
    }

    #[test]
    fn test_toggle_unknown_id() {
        let mut selection = selection();
        assert!(!selection.toggle(42));
        assert_eq!(selection.selected_ids().count(), 0);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut selection = selection();
        selection.previous();
        assert_eq!(selection.cursor(), 0);

        selection.last();
        selection.next();
        assert_eq!(selection.cursor(), 5);
        assert_eq!(selection.current().map(|c| c.category.id), Some(6));

        let mut empty = Selection::default();
        empty.next();
        empty.last();
        assert!(empty.current().is_none());
    }

    proptest! {
        #[test]
        fn selected_set_is_ids_toggled_odd_times(toggles in prop::collection::vec(1u32..=6, 0..64)) {
            let mut selection = selection();
            let mut expected = BTreeSet::new();
            for id in &toggles {
                selection.toggle(*id);
                if !expected.insert(*id) {
                    expected.remove(id);
                }
            }

            let actual: BTreeSet<u32> = selection.selected_ids().collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
