//! Synchronous in-process notification bus.
//!
//! Everything runs on the UI thread, so handlers are plain `FnMut`
//! closures behind `Rc<RefCell<..>>` and are called in subscription order
//! from [`EventBus::emit`]. Dropping the returned [`Subscription`]
//! unsubscribes.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{trace, warn};

/// Name of a persisted option, as carried by [`Event::OptionSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// `gui/resizable_cols`
    ResizableColumns,
    /// `gui/col_width_<id>`
    ColumnWidth(String),
    /// `gui/visible_cols`
    VisibleColumns,
    /// `rating/maximum`
    RatingMaximum,
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResizableColumns => f.write_str("gui/resizable_cols"),
            Self::ColumnWidth(id) => write!(f, "gui/col_width_{id}"),
            Self::VisibleColumns => f.write_str("gui/visible_cols"),
            Self::RatingMaximum => f.write_str("rating/maximum"),
        }
    }
}

/// Events delivered over the bus.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A persisted option changed
    OptionSet(OptionKey),
    /// The user changed a track's rating; `percent` is normalized to 0-100
    RatingChanged { row: usize, percent: f64 },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::OptionSet(_) => EventKind::OptionSet,
            Self::RatingChanged { .. } => EventKind::RatingChanged,
        }
    }
}

/// Discriminant used to filter subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    OptionSet,
    RatingChanged,
}

type Handler = Rc<RefCell<dyn FnMut(&Event)>>;

struct Entry {
    id: u64,
    kind: EventKind,
    handler: Handler,
}

/// Process-wide notification bus.
#[derive(Default)]
pub struct EventBus {
    next_id: RefCell<u64>,
    entries: RefCell<Vec<Entry>>,
}

impl EventBus {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Register `handler` for events of `kind`.
    pub fn subscribe(
        self: &Rc<Self>,
        kind: EventKind,
        handler: impl FnMut(&Event) + 'static,
    ) -> Subscription {
        let id = {
            let mut next = self.next_id.borrow_mut();
            *next += 1;
            *next
        };
        self.entries.borrow_mut().push(Entry {
            id,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
        trace!(id, ?kind, "Subscribed");
        Subscription {
            bus: Rc::downgrade(self),
            id,
        }
    }

    /// Deliver `event` to every matching handler.
    ///
    /// Handlers may subscribe, unsubscribe or emit while being called. A
    /// handler that is already running is not re-entered, and one
    /// unsubscribed by an earlier handler is not called.
    pub fn emit(&self, event: &Event) {
        let kind = event.kind();
        let handlers: Vec<(u64, Handler)> = self
            .entries
            .borrow()
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| (entry.id, Rc::clone(&entry.handler)))
            .collect();

        for (id, handler) in handlers {
            if !self.is_subscribed(id) {
                continue;
            }
            match handler.try_borrow_mut() {
                Ok(mut f) => (&mut *f)(event),
                Err(_) => warn!(?event, "Skipping re-entrant event delivery"),
            }
        }
    }

    fn is_subscribed(&self, id: u64) -> bool {
        self.entries.borrow().iter().any(|entry| entry.id == id)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.entries.borrow().len()
    }

    fn unsubscribe(&self, id: u64) {
        self.entries.borrow_mut().retain(|entry| entry.id != id);
        trace!(id, "Unsubscribed");
    }
}

/// Guard that removes its handler from the bus when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    bus: Weak<EventBus>,
    id: u64,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.id);
        }
    }
}
