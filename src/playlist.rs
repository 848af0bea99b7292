//! Playlist data source and view.
//!
//! [`PlaylistModel`] is the container columns render from: rows of tracks
//! plus one formatter per data index. [`PlaylistView`] owns the visible
//! columns, builds them from the shared registry and handles the user
//! interactions that touch settings (resizing, rating, toggling columns).

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use crate::columns::{
    ColumnContainer, ColumnMenu, ColumnOptions, ColumnRegistry, FontWeight, PlaylistColumn,
    RenderStrategy, RenderedCell, StatusIcon,
};
use crate::error::{Error, Result};
use crate::formatter::TrackFormatter;
use crate::model::Track;
use crate::settings::Settings;

/// Rows of a playlist plus the formatters its text columns read through.
#[derive(Debug, Default)]
pub struct PlaylistModel {
    tracks: Vec<Track>,
    /// Indexed by data index; slot 0 is the status icon
    formatters: Vec<Option<TrackFormatter>>,
    current: Option<usize>,
    paused: bool,
}

impl PlaylistModel {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            formatters: vec![None],
            current: None,
            paused: false,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Mark `row` as the playing track. Out-of-range rows clear it.
    pub fn set_current(&mut self, row: Option<usize>) {
        self.current = row.filter(|row| *row < self.tracks.len());
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Replace the per-index formatters. Slot 0 stays reserved for the icon.
    fn bind_formatters(&mut self, formatters: impl IntoIterator<Item = TrackFormatter>) {
        self.formatters = std::iter::once(None)
            .chain(formatters.into_iter().map(Some))
            .collect();
    }
}

impl ColumnContainer for PlaylistModel {
    fn track(&self, row: usize) -> Option<&Track> {
        self.tracks.get(row)
    }

    fn track_mut(&mut self, row: usize) -> Option<&mut Track> {
        self.tracks.get_mut(row)
    }

    fn value(&self, row: usize, data_index: usize) -> Option<String> {
        let track = self.tracks.get(row)?;
        let formatter = self.formatters.get(data_index)?.as_ref()?;
        Some(formatter.format(track))
    }

    fn status_icon(&self, row: usize) -> Option<StatusIcon> {
        if self.current != Some(row) {
            return None;
        }
        Some(if self.paused {
            StatusIcon::Paused
        } else {
            StatusIcon::Playing
        })
    }

    fn cell_weight(&self, row: usize) -> FontWeight {
        if self.current == Some(row) {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        }
    }
}

/// A playlist with its visible columns.
pub struct PlaylistView {
    registry: Rc<ColumnRegistry>,
    settings: Rc<Settings>,
    model: PlaylistModel,
    columns: Vec<Rc<RefCell<PlaylistColumn>>>,
}

impl PlaylistView {
    /// Build a view showing the columns listed in the settings.
    pub fn new(
        registry: Rc<ColumnRegistry>,
        settings: Rc<Settings>,
        tracks: Vec<Track>,
    ) -> Result<Self> {
        let mut view = Self {
            registry,
            settings,
            model: PlaylistModel::new(tracks),
            columns: Vec::new(),
        };
        view.rebuild_columns()?;
        Ok(view)
    }

    pub fn model(&self) -> &PlaylistModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut PlaylistModel {
        &mut self.model
    }

    pub fn columns(&self) -> &[Rc<RefCell<PlaylistColumn>>] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Option<&Rc<RefCell<PlaylistColumn>>> {
        self.columns.iter().find(|column| column.borrow().id() == id)
    }

    /// Identifiers of the visible columns, in order.
    pub fn visible_ids(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.borrow().id().to_string())
            .collect()
    }

    /// Cells for `row`, one per visible column. `None` past the last row.
    pub fn render_row(&self, row: usize) -> Option<Vec<RenderedCell>> {
        if row >= self.model.len() {
            return None;
        }
        self.columns
            .iter()
            .map(|column| column.borrow().render(&self.model, row))
            .collect()
    }

    /// Record a width the user dragged a column to.
    ///
    /// Only persisted in resizable mode; the column picks the new width up
    /// through its settings subscription.
    pub fn resize_column(&self, id: &str, width: u32) -> Result<()> {
        if self.column(id).is_none() {
            return Err(Error::unknown_column(id));
        }
        if !self.settings.resizable_columns() {
            debug!(column = id, "Ignoring resize, columns are not resizable");
            return Ok(());
        }
        self.settings.set_column_width(id, width);
        Ok(())
    }

    /// Route a rating click on `row` to the rating column.
    pub fn rate(&mut self, row: usize, rating: u32) -> Result<u32> {
        let column = self
            .columns
            .iter()
            .find(|column| column.borrow().definition().strategy == RenderStrategy::Rating)
            .cloned()
            .ok_or_else(|| Error::unknown_column("rating"))?;
        column.borrow().on_rating_changed(&mut self.model, row, rating)
    }

    /// The visibility menu with visible columns checked.
    pub fn menu(&self) -> ColumnMenu {
        let visible = self.visible_ids();
        let mut menu = self.registry.build_menu();
        menu.mark_active(|id| visible.iter().any(|shown| shown == id));
        menu
    }

    /// Show or hide a column. Returns whether it is now visible.
    ///
    /// Newly shown columns are appended. The visible list is persisted and
    /// the columns are rebuilt.
    pub fn toggle_column(&mut self, id: &str) -> Result<bool> {
        if !self.registry.contains(id) {
            return Err(Error::unknown_column(id));
        }

        let mut visible = self.visible_ids();
        let shown = if let Some(index) = visible.iter().position(|shown| shown == id) {
            visible.remove(index);
            false
        } else {
            visible.push(id.to_string());
            true
        };

        info!(column = id, shown, "Toggled column");
        self.settings.set_visible_columns(visible);
        self.rebuild_columns()?;
        Ok(shown)
    }

    fn rebuild_columns(&mut self) -> Result<()> {
        let visible = self.settings.visible_columns();
        let icon_size = self.settings.status_icon_size();

        let mut columns = Vec::with_capacity(visible.len());
        let mut formatters = Vec::with_capacity(visible.len());
        for (position, id) in visible.iter().enumerate() {
            let definition = self
                .registry
                .get(id)
                .ok_or_else(|| Error::unknown_column(id.as_str()))?;
            let formatter = self
                .registry
                .formatter(id)
                .cloned()
                .unwrap_or_else(|| TrackFormatter::for_field(id));

            let options = ColumnOptions {
                status_icon: (position == 0).then_some(icon_size),
            };
            columns.push(PlaylistColumn::instantiate(
                definition,
                position + 1,
                options,
                &self.settings,
            ));
            formatters.push(formatter);
        }

        self.columns = columns;
        self.model.bind_formatters(formatters);
        debug!(columns = self.columns.len(), "Built playlist columns");
        Ok(())
    }
}
