//! Columns instantiated for a playlist view.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use super::definition::{ColumnDefinition, RenderStrategy};
use super::renderer::{CellProperty, CellRenderer, Ellipsize};
use crate::error::{Error, Result};
use crate::event::{Event, EventKind, OptionKey, Subscription};
use crate::model::Track;
use crate::settings::Settings;

/// Row status shown in the leading icon cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    Playing,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// The data source a column renders from.
///
/// Data index 0 is reserved for the status icon; text columns read their
/// value at their own data index.
pub trait ColumnContainer {
    fn track(&self, row: usize) -> Option<&Track>;

    fn track_mut(&mut self, row: usize) -> Option<&mut Track>;

    /// Display text at `data_index` of `row`.
    fn value(&self, row: usize, data_index: usize) -> Option<String>;

    fn status_icon(&self, row: usize) -> Option<StatusIcon>;

    /// Weight for text cells of `row`.
    fn cell_weight(&self, row: usize) -> FontWeight;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Text { text: String, weight: FontWeight },
    Rating(u32),
}

/// What a column draws for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCell {
    /// Only set on columns built with a status icon cell
    pub icon: Option<StatusIcon>,
    pub content: CellContent,
}

/// Construction options for [`PlaylistColumn::instantiate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnOptions {
    /// Add a leading status icon cell of this pixel size. Its size is added
    /// to the column's default width.
    pub status_icon: Option<u32>,
}

/// How a column is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sizing {
    /// User-resizable, fixed at `width`
    Resizable { width: u32 },
    /// Not resizable; takes a share of the free space
    Expand,
    /// Not resizable; starts at `width` and only grows to fit content
    GrowOnly { width: u32 },
}

impl Sizing {
    /// Width handed to the toolkit. Expanding columns start at 1px.
    pub fn fixed_width(&self) -> u32 {
        match *self {
            Self::Resizable { width } | Self::GrowOnly { width } => width,
            Self::Expand => 1,
        }
    }

    pub fn is_resizable(&self) -> bool {
        matches!(self, Self::Resizable { .. })
    }

    pub fn expands(&self) -> bool {
        matches!(self, Self::Expand)
    }
}

/// A rating as a 0-100 percentage of `maximum`.
pub fn normalized_rating(rating: u32, maximum: u32) -> f64 {
    if maximum == 0 {
        return 0.0;
    }
    f64::from(rating) / f64::from(maximum) * 100.0
}

/// A column bound to one data index of a playlist view.
pub struct PlaylistColumn {
    definition: ColumnDefinition,
    data_index: usize,
    icon: Option<CellRenderer>,
    cell: CellRenderer,
    extra_size: u32,
    sizing: Sizing,
    settings: Rc<Settings>,
    subscription: Option<Subscription>,
}

impl std::fmt::Debug for PlaylistColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistColumn")
            .field("id", &self.definition.id)
            .field("display", &self.definition.display)
            .field("size", &self.definition.size)
            .field("data_index", &self.data_index)
            .field("sizing", &self.sizing)
            .finish()
    }
}

impl PlaylistColumn {
    /// Build a column for `definition` bound to `data_index`.
    ///
    /// The column follows the resizable-columns setting and its own
    /// persisted width for as long as it lives.
    ///
    /// # Panics
    ///
    /// If `definition` is abstract (has no identifier).
    pub fn instantiate(
        definition: &ColumnDefinition,
        data_index: usize,
        options: ColumnOptions,
        settings: &Rc<Settings>,
    ) -> Rc<RefCell<Self>> {
        assert!(
            !definition.is_abstract(),
            "cannot instantiate abstract column {:?}",
            definition.display
        );

        let mut cell = CellRenderer::new(definition.strategy.renderer());
        for property in &definition.cell_properties {
            if let Err(e) = cell.set_property(*property) {
                warn!(column = %definition.id, error = %e, "Ignoring cell property");
            }
        }
        if let Err(e) = cell.set_property(CellProperty::Ellipsize(Ellipsize::End)) {
            debug!(column = %definition.id, error = %e, "Cell left unellipsized");
        }

        let extra_size = options.status_icon.unwrap_or(0);
        let mut column = Self {
            definition: definition.clone(),
            data_index,
            icon: options.status_icon.map(CellRenderer::status_icon),
            cell,
            extra_size,
            sizing: Sizing::GrowOnly {
                width: definition.size + extra_size,
            },
            settings: Rc::clone(settings),
            subscription: None,
        };
        column.setup_sizing();

        let column = Rc::new(RefCell::new(column));
        let weak = Rc::downgrade(&column);
        let subscription = settings
            .bus()
            .subscribe(EventKind::OptionSet, move |event| {
                let Event::OptionSet(key) = event else {
                    return;
                };
                let Some(column) = weak.upgrade() else {
                    return;
                };
                let Ok(mut column) = column.try_borrow_mut() else {
                    warn!(option = %key, "Column busy, sizing not refreshed");
                    return;
                };
                if column.follows_option(key) {
                    column.setup_sizing();
                }
            });
        column.borrow_mut().subscription = Some(subscription);
        column
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn definition(&self) -> &ColumnDefinition {
        &self.definition
    }

    pub fn header(&self) -> &str {
        &self.definition.display
    }

    pub fn data_index(&self) -> usize {
        self.data_index
    }

    pub fn sizing(&self) -> Sizing {
        self.sizing
    }

    /// Declared size plus the status icon cell, if any.
    pub fn default_width(&self) -> u32 {
        self.definition.size + self.extra_size
    }

    pub fn has_status_icon(&self) -> bool {
        self.icon.is_some()
    }

    /// Cells in packing order: status icon first when present.
    pub fn cells(&self) -> Vec<&CellRenderer> {
        self.icon.iter().chain(std::iter::once(&self.cell)).collect()
    }

    /// Whether a change of `key` affects this column's sizing.
    pub fn follows_option(&self, key: &OptionKey) -> bool {
        match key {
            OptionKey::ResizableColumns => true,
            OptionKey::ColumnWidth(id) => *id == self.definition.id,
            OptionKey::VisibleColumns | OptionKey::RatingMaximum => false,
        }
    }

    /// Recompute sizing from the current settings.
    pub fn setup_sizing(&mut self) {
        let default_width = self.default_width();
        self.sizing = if self.settings.resizable_columns() {
            Sizing::Resizable {
                width: self
                    .settings
                    .column_width(&self.definition.id)
                    .unwrap_or(default_width),
            }
        } else if self.definition.autoexpand {
            Sizing::Expand
        } else {
            Sizing::GrowOnly {
                width: default_width,
            }
        };
        debug!(column = %self.definition.id, sizing = ?self.sizing, "Column sized");
    }

    /// What to draw for `row`, or `None` if the row doesn't exist.
    pub fn render(&self, container: &dyn ColumnContainer, row: usize) -> Option<RenderedCell> {
        let content = match self.definition.strategy {
            RenderStrategy::Text => CellContent::Text {
                text: container.value(row, self.data_index)?,
                weight: container.cell_weight(row),
            },
            RenderStrategy::Rating => CellContent::Rating(container.track(row)?.rating()),
        };
        let icon = self
            .icon
            .as_ref()
            .and_then(|_| container.status_icon(row));
        Some(RenderedCell { icon, content })
    }

    /// Apply a user's rating click to `row`.
    ///
    /// Clicking the rating a track already has clears it. The stored value
    /// is returned and announced as [`Event::RatingChanged`], normalized to
    /// a percentage of the configured maximum.
    pub fn on_rating_changed(
        &self,
        container: &mut dyn ColumnContainer,
        row: usize,
        rating: u32,
    ) -> Result<u32> {
        if self.definition.strategy != RenderStrategy::Rating {
            return Err(Error::NotRatingColumn(self.definition.id.clone()));
        }

        let maximum = self.settings.rating_maximum();
        let track = container.track_mut(row).ok_or(Error::RowOutOfRange(row))?;
        let clicked = rating.min(maximum);
        let rating = if clicked == track.rating() { 0 } else { clicked };
        track.set_rating(rating);

        let percent = normalized_rating(rating, maximum);
        debug!(row, rating, percent, "Rating changed");
        self.settings
            .bus()
            .emit(&Event::RatingChanged { row, percent });
        Ok(rating)
    }
}
