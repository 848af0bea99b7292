//! The immutable column table.
//!
//! Built once at startup through [`ColumnRegistryBuilder`] and then shared
//! (read-only) with every playlist view and menu builder.

use std::collections::HashMap;
use tracing::debug;

use super::definition::{ColumnDefinition, RenderStrategy};
use super::menu::{ColumnMenu, ColumnMenuItem};
use super::renderer::{CellProperty, CellRenderer};
use crate::error::{Error, Result};
use crate::formatter::TrackFormatter;

/// Menu order for the columns most people toggle. Every other column
/// follows in registration order.
pub const CANONICAL_MENU_ORDER: &[&str] = &[
    "tracknumber",
    "title",
    "artist",
    "album",
    "__length",
    "genre",
    "__rating",
    "date",
];

#[derive(Debug, Default)]
pub struct ColumnRegistryBuilder {
    columns: Vec<ColumnDefinition>,
}

impl ColumnRegistryBuilder {
    /// Add a definition.
    ///
    /// Fails when the identifier is empty or already registered, or when a
    /// cell property doesn't fit the renderer the column will use.
    pub fn register(&mut self, definition: ColumnDefinition) -> Result<&mut Self> {
        if definition.is_abstract() {
            return Err(Error::invalid_column(format!(
                "column '{}' has no identifier",
                definition.display
            )));
        }
        if self.columns.iter().any(|column| column.id == definition.id) {
            return Err(Error::DuplicateColumn(definition.id));
        }

        let probe = CellRenderer::new(definition.strategy.renderer());
        if let Some(property) = definition
            .cell_properties
            .iter()
            .find(|property| !probe.supports(property))
        {
            return Err(Error::UnsupportedCellProperty {
                column: definition.id,
                property: property.name(),
            });
        }

        debug!(column = %definition.id, "Registered column");
        self.columns.push(definition);
        Ok(self)
    }

    pub fn build(self) -> ColumnRegistry {
        let formatters = self
            .columns
            .iter()
            .map(|column| TrackFormatter::for_field(&column.id))
            .collect();
        ColumnRegistry {
            columns: self.columns,
            formatters,
        }
    }
}

/// Registered columns in registration order, each with its formatter.
#[derive(Debug, Clone)]
pub struct ColumnRegistry {
    columns: Vec<ColumnDefinition>,
    formatters: Vec<TrackFormatter>,
}

impl ColumnRegistry {
    pub fn builder() -> ColumnRegistryBuilder {
        ColumnRegistryBuilder::default()
    }

    /// The stock playlist columns.
    pub fn standard() -> Self {
        let mut builder = Self::builder();
        for definition in standard_columns() {
            if let Err(e) = builder.register(definition) {
                // the stock table is static; a failure here is a typo in it
                panic!("invalid stock column table: {e}");
            }
        }
        builder.build()
    }

    pub fn get(&self, id: &str) -> Option<&ColumnDefinition> {
        self.position(id).map(|index| &self.columns[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Look a column up by its header label.
    pub fn by_display(&self, display: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|column| column.display == display)
    }

    pub fn formatter(&self, id: &str) -> Option<&TrackFormatter> {
        self.position(id).map(|index| &self.formatters[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Visibility menu: canonical columns first, then the rest in
    /// registration order. No item is checked; the view does that.
    pub fn build_menu(&self) -> ColumnMenu {
        let mut order: Vec<&ColumnDefinition> = CANONICAL_MENU_ORDER
            .iter()
            .filter_map(|id| self.get(id))
            .collect();
        for column in &self.columns {
            if !CANONICAL_MENU_ORDER.contains(&column.id.as_str()) {
                order.push(column);
            }
        }

        let items = order
            .into_iter()
            .map(|column| ColumnMenuItem {
                name: column.menu_item_name(),
                column_id: column.id.clone(),
                label: column.menu_text().to_string(),
                active: false,
            })
            .collect();
        ColumnMenu::new(items)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.id == id)
    }

    /// Identifier → registration index, for callers doing many lookups.
    pub fn index(&self) -> HashMap<&str, usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| (column.id.as_str(), index))
            .collect()
    }
}

fn standard_columns() -> Vec<ColumnDefinition> {
    vec![
        ColumnDefinition::new("tracknumber", "#")
            .menu_label("Track Number")
            .size(30)
            .right_aligned()
            .cell(CellProperty::WidthChars(4)),
        ColumnDefinition::new("title", "Title").size(200).autoexpand(),
        ColumnDefinition::new("artist", "Artist").size(150).autoexpand(),
        ColumnDefinition::new("composer", "Composer").size(150).autoexpand(),
        ColumnDefinition::new("album", "Album").size(150).autoexpand(),
        ColumnDefinition::new("__length", "Length").size(50).right_aligned(),
        ColumnDefinition::new("discnumber", "Disc")
            .menu_label("Disc Number")
            .size(40)
            .right_aligned()
            .cell(CellProperty::WidthChars(2)),
        ColumnDefinition::new("__rating", "Rating")
            .strategy(RenderStrategy::Rating)
            .cell(CellProperty::FollowState(false)),
        ColumnDefinition::new("date", "Date").size(50),
        ColumnDefinition::new("genre", "Genre").size(100).autoexpand(),
        ColumnDefinition::new("__bitrate", "Bitrate").size(45).right_aligned(),
        ColumnDefinition::new("__loc", "Location").size(200).autoexpand(),
        ColumnDefinition::new("filename", "Filename").size(200).autoexpand(),
        ColumnDefinition::new("__playcount", "Playcount")
            .size(50)
            .right_aligned(),
        ColumnDefinition::new("bpm", "BPM").size(50).right_aligned(),
        ColumnDefinition::new("__last_played", "Last played").size(10),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_standard_ids_are_distinct() {
        let registry = ColumnRegistry::standard();
        let ids: HashSet<&str> = registry.ids().collect();
        assert_eq!(ids.len(), registry.len());
        assert_eq!(registry.len(), 16);
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut builder = ColumnRegistry::builder();
        builder
            .register(ColumnDefinition::new("title", "Title"))
            .unwrap();
        let err = builder
            .register(ColumnDefinition::new("title", "Name"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn(id) if id == "title"));
    }

    #[test]
    fn test_register_rejects_abstract_definition() {
        let mut builder = ColumnRegistry::builder();
        let err = builder
            .register(ColumnDefinition::new("", "Base"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidColumn(_)));
    }

    #[test]
    fn test_register_rejects_property_renderer_cannot_take() {
        let mut builder = ColumnRegistry::builder();
        let err = builder
            .register(
                ColumnDefinition::new("stars", "Stars")
                    .strategy(RenderStrategy::Rating)
                    .cell(CellProperty::WidthChars(3)),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedCellProperty { property: "width-chars", .. }
        ));
    }

    #[test]
    fn test_lookup_and_formatters() {
        let registry = ColumnRegistry::standard();
        assert_eq!(registry.get("bpm").map(|c| c.size), Some(50));
        assert_eq!(registry.by_display("Location").map(|c| c.id.as_str()), Some("__loc"));
        assert_eq!(
            registry.formatter("__playcount").map(TrackFormatter::template),
            Some("$__playcount")
        );
        assert!(registry.get("mood").is_none());
        assert_eq!(registry.index()["title"], 1);
    }

    #[test]
    fn test_menu_puts_canonical_columns_first() {
        let registry = ColumnRegistry::standard();
        let menu = registry.build_menu();
        let ids: Vec<&str> = menu.items().iter().map(|i| i.column_id.as_str()).collect();

        assert_eq!(&ids[..CANONICAL_MENU_ORDER.len()], CANONICAL_MENU_ORDER);
        assert_eq!(
            &ids[CANONICAL_MENU_ORDER.len()..],
            &[
                "composer",
                "discnumber",
                "__bitrate",
                "__loc",
                "filename",
                "__playcount",
                "bpm",
                "__last_played"
            ]
        );
        assert_eq!(ids.len(), registry.len());
    }

    #[test]
    fn test_menu_labels_and_names() {
        let menu = ColumnRegistry::standard().build_menu();
        let track = menu.item("tracknumber_col").unwrap();
        assert_eq!(track.label, "Track Number");
        assert_eq!(menu.item("discnumber_col").unwrap().label, "Disc Number");
        assert_eq!(menu.item("title_col").unwrap().label, "Title");
        assert!(menu.items().iter().all(|item| !item.active));
    }

    #[test]
    fn test_menu_skips_unregistered_canonical_ids() {
        let mut builder = ColumnRegistry::builder();
        builder
            .register(ColumnDefinition::new("mood", "Mood"))
            .unwrap()
            .register(ColumnDefinition::new("title", "Title"))
            .unwrap();
        let menu = builder.build().build_menu();
        let ids: Vec<&str> = menu.items().iter().map(|i| i.column_id.as_str()).collect();
        assert_eq!(ids, vec!["title", "mood"]);
    }
}
