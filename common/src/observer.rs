use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Token returned by [`Observable::subscribe`]; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Callback<E> = Rc<dyn Fn(&E)>;

/// Single-threaded publish/subscribe list.
///
/// Observers are called in subscription order. The observer list is
/// snapshotted before delivery, so an observer may subscribe or unsubscribe
/// while being notified without affecting the current round.
pub struct Observable<E> {
    next_id: Cell<u64>,
    observers: RefCell<BTreeMap<SubscriptionId, Callback<E>>>,
}

impl<E> Default for Observable<E> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(0),
            observers: RefCell::new(BTreeMap::new()),
        }
    }
}

impl<E> Observable<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.observers.borrow_mut().insert(id, Rc::new(callback));
        id
    }

    /// Returns `false` if the token was unknown or already used.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.borrow_mut().remove(&id).is_some()
    }

    pub fn notify(&self, event: &E) {
        let observers: Vec<Callback<E>> = self.observers.borrow().values().cloned().collect();
        for observer in observers {
            observer(event);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }
}
