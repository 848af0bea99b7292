//! Static description of a playlist column.

use super::renderer::{CellProperty, RendererKind};

/// How a column turns a row into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    /// Text from the data source at the column's data index
    Text,
    /// The row track's rating; rating clicks are written back
    Rating,
}

impl RenderStrategy {
    pub fn renderer(self) -> RendererKind {
        match self {
            Self::Text => RendererKind::Text,
            Self::Rating => RendererKind::Rating,
        }
    }
}

/// Default width for definitions that don't set one.
pub const DEFAULT_COLUMN_SIZE: u32 = 10;

/// One playlist field's display properties.
///
/// The identifier doubles as the track field the column renders, the key
/// its width is persisted under, and the stem of its menu item name.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub id: String,
    /// Header label
    pub display: String,
    /// Label in the visibility menu, when it differs from the header
    pub menu_label: Option<String>,
    /// Default width in pixels
    pub size: u32,
    /// Fill available space when columns aren't user-resizable
    pub autoexpand: bool,
    pub strategy: RenderStrategy,
    pub cell_properties: Vec<CellProperty>,
}

impl ColumnDefinition {
    /// A text column with default size and no overrides.
    pub fn new(id: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display: display.into(),
            menu_label: None,
            size: DEFAULT_COLUMN_SIZE,
            autoexpand: false,
            strategy: RenderStrategy::Text,
            cell_properties: Vec::new(),
        }
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn autoexpand(mut self) -> Self {
        self.autoexpand = true;
        self
    }

    pub fn menu_label(mut self, label: impl Into<String>) -> Self {
        self.menu_label = Some(label.into());
        self
    }

    pub fn strategy(mut self, strategy: RenderStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn cell(mut self, property: CellProperty) -> Self {
        self.cell_properties.push(property);
        self
    }

    /// Right-aligned cell.
    pub fn right_aligned(self) -> Self {
        self.cell(CellProperty::XAlign(1.0))
    }

    /// The bare base description, which can't be shown.
    pub fn is_abstract(&self) -> bool {
        self.id.is_empty()
    }

    /// Label for the visibility menu.
    pub fn menu_text(&self) -> &str {
        self.menu_label.as_deref().unwrap_or(&self.display)
    }

    /// Name of this column's visibility menu item.
    pub fn menu_item_name(&self) -> String {
        format!("{}{}", self.id, super::MENU_ITEM_SUFFIX)
    }
}
