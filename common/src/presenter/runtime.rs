use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{error, warn};

use super::{Mailbox, Models, Mounts, Msg, TripPresenter};
use crate::backend::{Backend, Spawner};
use crate::config::TripConfig;
use crate::dom::Dom;
use crate::error::TripError;

/// Owns the trip presenter and drains its mailbox.
///
/// Every post wakes the runtime. If a message is already being handled the
/// new one is queued and picked up by the running loop, so the presenter is
/// never borrowed twice.
pub struct Runtime<B: Backend + 'static> {
    trip: RefCell<TripPresenter<B>>,
    mailbox: Rc<Mailbox>,
    pumping: Cell<bool>,
}

impl<B: Backend + 'static> Runtime<B> {
    pub fn new(
        dom: Rc<dyn Dom>,
        mounts: Mounts,
        models: Models,
        backend: Rc<B>,
        spawner: Spawner,
        config: TripConfig,
    ) -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<Self>| {
            let mailbox = Rc::new(Mailbox::new());
            let weak = this.clone();
            mailbox.set_waker(move || {
                if let Some(runtime) = weak.upgrade() {
                    runtime.pump();
                }
            });
            let trip = TripPresenter::new(dom, mounts, models, backend, spawner, mailbox.clone(), config);
            Runtime {
                trip: RefCell::new(trip),
                mailbox,
                pumping: Cell::new(false),
            }
        })
    }

    /// Render the initial chrome and start loading.
    pub fn start(&self) -> Result<(), TripError> {
        self.pumping.set(true);
        let result = {
            let mut trip = self.trip.borrow_mut();
            trip.init().map(|()| trip.load())
        };
        self.pumping.set(false);
        self.pump();
        result
    }

    pub fn post(&self, msg: Msg) {
        self.mailbox.post(msg);
    }

    /// Handle queued messages until the mailbox is empty.
    pub fn pump(&self) {
        if self.pumping.replace(true) {
            return;
        }
        while let Some(msg) = self.mailbox.take() {
            let name = msg.name();
            let result = self.trip.borrow_mut().handle(msg);
            match result {
                Ok(()) => {}
                Err(TripError::Model(e)) => warn!("{name} message rejected: {e}"),
                Err(e) => error!("{name} message failed: {e}"),
            }
        }
        self.pumping.set(false);
    }

    /// Read-only access to the presenter, for inspection and tests.
    pub fn with_trip<R>(&self, f: impl FnOnce(&TripPresenter<B>) -> R) -> R {
        f(&self.trip.borrow())
    }

    /// Unsubscribe from the models and clear the screen.
    pub fn dispose(&self) {
        self.pumping.set(true);
        self.trip.borrow_mut().dispose();
        while self.mailbox.take().is_some() {}
        self.pumping.set(false);
    }
}
