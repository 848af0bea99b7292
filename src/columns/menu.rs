//! Column visibility menu model.

use super::MENU_ITEM_SUFFIX;

/// A checkable "show column" entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMenuItem {
    /// Item name, `<id>_col`
    pub name: String,
    pub column_id: String,
    pub label: String,
    /// Checked when the column is shown
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnMenu {
    items: Vec<ColumnMenuItem>,
}

impl ColumnMenu {
    pub fn new(items: Vec<ColumnMenuItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ColumnMenuItem] {
        &self.items
    }

    /// Find an item by its name.
    pub fn item(&self, name: &str) -> Option<&ColumnMenuItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Check exactly the items whose column passes `is_visible`.
    pub fn mark_active(&mut self, is_visible: impl Fn(&str) -> bool) {
        for item in &mut self.items {
            item.active = is_visible(&item.column_id);
        }
    }
}

/// Column identifier embedded in a menu item name.
pub fn column_id_from_item_name(name: &str) -> Option<&str> {
    name.strip_suffix(MENU_ITEM_SUFFIX)
        .filter(|id| !id.is_empty())
}
