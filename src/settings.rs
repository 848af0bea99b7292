//! Live option store.
//!
//! [`Settings`] owns the loaded [`Config`] for the lifetime of the process
//! and announces every change on the [`EventBus`] as
//! [`Event::OptionSet`]. The config borrow is released before the event
//! goes out, so handlers can read settings freely.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::debug;

use crate::config::{self, Config, ConfigError};
use crate::event::{Event, EventBus, OptionKey};

pub struct Settings {
    config: RefCell<Config>,
    bus: Rc<EventBus>,
    path: Option<PathBuf>,
}

impl Settings {
    /// Wrap an in-memory config. Nothing is persisted.
    pub fn new(config: Config, bus: Rc<EventBus>) -> Rc<Self> {
        Rc::new(Self {
            config: RefCell::new(config),
            bus,
            path: None,
        })
    }

    /// Wrap a config that [`Settings::save`] writes back to `path`.
    pub fn with_path(config: Config, bus: Rc<EventBus>, path: PathBuf) -> Rc<Self> {
        Rc::new(Self {
            config: RefCell::new(config),
            bus,
            path: Some(path),
        })
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    /// Copy of the current configuration.
    pub fn snapshot(&self) -> Config {
        self.config.borrow().clone()
    }

    pub fn resizable_columns(&self) -> bool {
        self.config.borrow().columns.resizable
    }

    /// Persisted width for a column, if the user ever resized it.
    pub fn column_width(&self, id: &str) -> Option<u32> {
        self.config.borrow().columns.widths.get(id).copied()
    }

    pub fn visible_columns(&self) -> Vec<String> {
        self.config.borrow().columns.visible.clone()
    }

    pub fn status_icon_size(&self) -> u32 {
        self.config.borrow().columns.status_icon_size
    }

    pub fn rating_maximum(&self) -> u32 {
        self.config.borrow().rating.maximum
    }

    pub fn set_resizable_columns(&self, resizable: bool) {
        self.config.borrow_mut().columns.resizable = resizable;
        self.notify(OptionKey::ResizableColumns);
    }

    pub fn set_column_width(&self, id: &str, width: u32) {
        self.config
            .borrow_mut()
            .columns
            .widths
            .insert(id.to_string(), width.max(1));
        self.notify(OptionKey::ColumnWidth(id.to_string()));
    }

    /// Forget a persisted width so the column falls back to its default.
    pub fn clear_column_width(&self, id: &str) {
        let removed = self.config.borrow_mut().columns.widths.remove(id);
        if removed.is_some() {
            self.notify(OptionKey::ColumnWidth(id.to_string()));
        }
    }

    pub fn set_visible_columns(&self, ids: Vec<String>) {
        self.config.borrow_mut().columns.visible = ids;
        self.notify(OptionKey::VisibleColumns);
    }

    /// Set the number of rating steps. Zero is ignored.
    pub fn set_rating_maximum(&self, maximum: u32) {
        if maximum == 0 {
            debug!("Ignoring zero rating maximum");
            return;
        }
        self.config.borrow_mut().rating.maximum = maximum;
        self.notify(OptionKey::RatingMaximum);
    }

    /// Write the config back to the path it was loaded from.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config = self.snapshot();
        match &self.path {
            Some(path) => config::save_to(&config, path),
            None => config::save(&config),
        }
    }

    fn notify(&self, key: OptionKey) {
        debug!(option = %key, "Option set");
        self.bus.emit(&Event::OptionSet(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    fn recorded_keys(bus: &Rc<EventBus>) -> (Rc<RefCell<Vec<String>>>, crate::event::Subscription) {
        let keys = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&keys);
        let sub = bus.subscribe(EventKind::OptionSet, move |event| {
            if let Event::OptionSet(key) = event {
                sink.borrow_mut().push(key.to_string());
            }
        });
        (keys, sub)
    }

    #[test]
    fn test_setters_emit_option_keys() {
        let bus = EventBus::new();
        let settings = Settings::new(Config::default(), Rc::clone(&bus));
        let (keys, _sub) = recorded_keys(&bus);

        settings.set_resizable_columns(true);
        settings.set_column_width("title", 240);
        settings.set_rating_maximum(10);

        assert!(settings.resizable_columns());
        assert_eq!(settings.column_width("title"), Some(240));
        assert_eq!(settings.rating_maximum(), 10);
        assert_eq!(
            *keys.borrow(),
            vec![
                "gui/resizable_cols",
                "gui/col_width_title",
                "rating/maximum"
            ]
        );
    }

    #[test]
    fn test_handlers_can_read_settings_during_notification() {
        let bus = EventBus::new();
        let settings = Settings::new(Config::default(), Rc::clone(&bus));
        let observed = Rc::new(RefCell::new(None));

        let reader = Rc::clone(&settings);
        let sink = Rc::clone(&observed);
        let _sub = bus.subscribe(EventKind::OptionSet, move |_| {
            *sink.borrow_mut() = Some(reader.resizable_columns());
        });

        settings.set_resizable_columns(true);
        assert_eq!(*observed.borrow(), Some(true));
    }

    #[test]
    fn test_zero_rating_maximum_is_ignored() {
        let bus = EventBus::new();
        let settings = Settings::new(Config::default(), Rc::clone(&bus));
        let (keys, _sub) = recorded_keys(&bus);

        settings.set_rating_maximum(0);

        assert_eq!(settings.rating_maximum(), config::DEFAULT_RATING_MAXIMUM);
        assert!(keys.borrow().is_empty());
    }

    #[test]
    fn test_clear_width_only_notifies_when_present() {
        let bus = EventBus::new();
        let settings = Settings::new(Config::default(), Rc::clone(&bus));
        let (keys, _sub) = recorded_keys(&bus);

        settings.clear_column_width("album");
        settings.set_column_width("album", 120);
        settings.clear_column_width("album");

        assert_eq!(settings.column_width("album"), None);
        assert_eq!(keys.borrow().len(), 2);
    }

    #[test]
    fn test_save_writes_to_bound_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let settings = Settings::with_path(Config::default(), EventBus::new(), path.clone());

        settings.set_column_width("genre", 130);
        settings.save().unwrap();

        let loaded = config::load_from(&path).unwrap();
        assert_eq!(loaded.columns.widths.get("genre"), Some(&130));
    }
}
