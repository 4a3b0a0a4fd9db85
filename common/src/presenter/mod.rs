//! Presenters and the message pump that drives them.
//!
//! Views and model observers never call a presenter directly. They post a
//! [`Msg`] into the [`Mailbox`]; the [`Runtime`] drains it in order.

mod new_point;
mod point;
mod runtime;
mod trip;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub use new_point::NewPointPresenter;
pub use point::{Mode, PointPresenter};
pub use runtime::Runtime;
pub use trip::{Models, Mounts, TripPresenter};

use crate::catalog::OfferGroup;
use crate::error::SyncError;
use crate::filter::FilterType;
use crate::point::{Destination, Point, PointId};
use crate::sort::SortType;
use crate::update::ModelEvent;
use crate::view::{FormChange, MenuItem};

/// Something that happened on a point card or its edit form.
#[derive(Debug, Clone, PartialEq)]
pub enum PointEvent {
    OpenEditor,
    CloseEditor,
    Escape,
    Submit,
    Delete,
    ToggleFavorite,
    Changed(FormChange),
}

/// Something that happened on the new-point form.
#[derive(Debug, Clone, PartialEq)]
pub enum NewPointEvent {
    Submit,
    Cancel,
    Escape,
    Changed(FormChange),
}

/// Completion of a backend call, with what is needed to roll it back.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Updated {
        prior: Point,
        result: Result<Point, SyncError>,
    },
    Added {
        local: Point,
        result: Result<Point, SyncError>,
    },
    Deleted {
        prior: Point,
        result: Result<(), SyncError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Point(PointId, PointEvent),
    NewPoint(NewPointEvent),
    SortChanged(SortType),
    FilterChanged(FilterType),
    MenuSelected(MenuItem),
    NewPointRequested,
    /// Mount the new-point form once any pending rebuild has run.
    OpenNewPoint,
    Model(ModelEvent),
    Loaded {
        points: Vec<Point>,
        destinations: Vec<Destination>,
        offers: Vec<OfferGroup>,
    },
    Synced(SyncOutcome),
}

impl Msg {
    pub fn name(&self) -> &'static str {
        match self {
            Msg::Point(..) => "point",
            Msg::NewPoint(_) => "new-point",
            Msg::SortChanged(_) => "sort-changed",
            Msg::FilterChanged(_) => "filter-changed",
            Msg::MenuSelected(_) => "menu-selected",
            Msg::NewPointRequested => "new-point-requested",
            Msg::OpenNewPoint => "open-new-point",
            Msg::Model(_) => "model",
            Msg::Loaded { .. } => "loaded",
            Msg::Synced(_) => "synced",
        }
    }
}

/// FIFO of pending messages plus a hook that starts draining it.
#[derive(Default)]
pub struct Mailbox {
    queue: RefCell<VecDeque<Msg>>,
    waker: RefCell<Option<Rc<dyn Fn()>>>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after every post; the runtime uses it to pump.
    pub fn set_waker(&self, waker: impl Fn() + 'static) {
        *self.waker.borrow_mut() = Some(Rc::new(waker));
    }

    pub fn post(&self, msg: Msg) {
        tracing::trace!("post {}", msg.name());
        self.queue.borrow_mut().push_back(msg);
        let waker = self.waker.borrow().clone();
        if let Some(waker) = waker {
            waker();
        }
    }

    pub fn take(&self) -> Option<Msg> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_mailbox_is_fifo_and_wakes() {
        let mailbox = Mailbox::new();
        mailbox.post(Msg::NewPointRequested);
        assert_eq!(mailbox.len(), 1);

        let wakes = Rc::new(Cell::new(0));
        let w = wakes.clone();
        mailbox.set_waker(move || w.set(w.get() + 1));
        mailbox.post(Msg::SortChanged(SortType::Price));

        assert_eq!(wakes.get(), 1);
        assert_eq!(mailbox.take(), Some(Msg::NewPointRequested));
        assert_eq!(mailbox.take(), Some(Msg::SortChanged(SortType::Price)));
        assert!(mailbox.take().is_none());
    }

    #[test]
    fn test_waker_may_drain_while_posting() {
        let mailbox = Rc::new(Mailbox::new());
        let drained = Rc::new(RefCell::new(Vec::new()));
        let (inner, sink) = (Rc::downgrade(&mailbox), drained.clone());
        mailbox.set_waker(move || {
            if let Some(mailbox) = inner.upgrade() {
                while let Some(msg) = mailbox.take() {
                    sink.borrow_mut().push(msg);
                }
            }
        });
        mailbox.post(Msg::OpenNewPoint);
        assert_eq!(*drained.borrow(), vec![Msg::OpenNewPoint]);
        assert!(mailbox.is_empty());
    }
}
