//! Minimal DOM surface the views render into.
//!
//! Presenters never reach for a global document: every node handle and mount
//! point is passed in. [`MemoryDom`] backs the tests; the browser build
//! implements [`Dom`] on top of `web-sys`.

mod memory;

use std::rc::Rc;

pub use memory::MemoryDom;

use crate::error::DomError;

/// Opaque handle to a node owned by a [`Dom`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPosition {
    AfterBegin,
    BeforeEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
    Input,
    Submit,
    KeyDown,
}

impl EventKind {
    pub fn dom_name(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Change => "change",
            EventKind::Input => "input",
            EventKind::Submit => "submit",
            EventKind::KeyDown => "keydown",
        }
    }
}

/// The parts of a DOM event the views look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomEvent {
    /// `name` attribute of the event target.
    pub target_name: Option<String>,
    /// `value` of the event target.
    pub value: Option<String>,
    /// `checked` state for checkboxes and radios.
    pub checked: bool,
    /// Key for keyboard events.
    pub key: Option<String>,
}

impl DomEvent {
    pub fn key(key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            ..Default::default()
        }
    }

    pub fn input(name: &str, value: &str) -> Self {
        Self {
            target_name: Some(name.to_string()),
            value: Some(value.to_string()),
            ..Default::default()
        }
    }

    pub fn checkbox(name: &str, checked: bool) -> Self {
        Self {
            target_name: Some(name.to_string()),
            checked,
            ..Default::default()
        }
    }

    pub fn is_escape(&self) -> bool {
        matches!(self.key.as_deref(), Some("Escape") | Some("Esc"))
    }
}

pub type Listener = Rc<dyn Fn(&DomEvent)>;

pub trait Dom {
    /// Build a detached element from markup. The markup must have one root.
    fn create_element(&self, markup: &str) -> Result<NodeId, DomError>;

    fn insert(&self, container: NodeId, node: NodeId, place: RenderPosition)
        -> Result<(), DomError>;

    /// Put `new` where `old` is. Does nothing if `old` is detached.
    fn replace(&self, new: NodeId, old: NodeId) -> Result<(), DomError>;

    /// Detach `node` and drop it together with its listeners.
    fn remove(&self, node: NodeId);

    /// Listen on `node`, or on the first descendant matching `selector`.
    fn listen(
        &self,
        node: NodeId,
        selector: Option<&str>,
        kind: EventKind,
        listener: Listener,
    ) -> Result<ListenerId, DomError>;

    fn listen_document(&self, kind: EventKind, listener: Listener) -> ListenerId;

    fn unlisten(&self, id: ListenerId);
}
