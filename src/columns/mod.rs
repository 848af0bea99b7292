//! Playlist columns.
//!
//! Columns are data, not types: a [`ColumnDefinition`] describes a field's
//! label, width and cell styling, and a [`PlaylistColumn`] is one
//! instantiated for a view. The rating column differs only in its
//! [`RenderStrategy`].
//!
//! Sizing follows two settings: the global "resizable columns" flag and a
//! per-column persisted width. Columns listen for changes to either and
//! resize in place.

mod column;
mod definition;
mod menu;
mod registry;
mod renderer;

pub use column::{
    CellContent, ColumnContainer, ColumnOptions, FontWeight, PlaylistColumn, RenderedCell, Sizing,
    StatusIcon, normalized_rating,
};
pub use definition::{ColumnDefinition, DEFAULT_COLUMN_SIZE, RenderStrategy};
pub use menu::{ColumnMenu, ColumnMenuItem, column_id_from_item_name};
pub use registry::{CANONICAL_MENU_ORDER, ColumnRegistry, ColumnRegistryBuilder};
pub use renderer::{
    CellProperty, CellRenderer, Ellipsize, RendererCaps, RendererKind, UnsupportedProperty,
};

/// Suffix of column menu item names.
pub const MENU_ITEM_SUFFIX: &str = "_col";
