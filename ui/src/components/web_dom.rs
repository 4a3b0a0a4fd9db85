//! [`Dom`] over the browser document.
//!
//! Handles map to live `web_sys::Element`s. Listener closures stay owned by
//! the registration table and are unhooked and dropped on `unlisten` or when
//! the element they sit on is removed.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlInputElement, KeyboardEvent};

use trip_common::dom::{Dom, DomEvent, EventKind, Listener, ListenerId, NodeId, RenderPosition};
use trip_common::error::DomError;

struct Registration {
    target: EventTarget,
    /// Node whose removal drops this listener. `None` for the document.
    owner: Option<NodeId>,
    kind: EventKind,
    callback: Closure<dyn FnMut(Event)>,
}

pub struct WebDom {
    document: Document,
    next_id: Cell<u64>,
    nodes: RefCell<HashMap<NodeId, Element>>,
    listeners: RefCell<HashMap<ListenerId, Registration>>,
}

fn host(err: JsValue) -> DomError {
    DomError::Host(format!("{err:?}"))
}

impl WebDom {
    pub fn new() -> Result<Self, DomError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| DomError::Host("no document".into()))?;
        Ok(Self {
            document,
            next_id: Cell::new(0),
            nodes: RefCell::new(HashMap::new()),
            listeners: RefCell::new(HashMap::new()),
        })
    }

    /// Register an element already in the page as a mount point.
    pub fn mount_by_id(&self, id: &str) -> Result<NodeId, DomError> {
        let element = self
            .document
            .get_element_by_id(id)
            .ok_or_else(|| DomError::NoMatch(format!("#{id}")))?;
        Ok(self.register(element))
    }

    fn register(&self, element: Element) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let node = NodeId(id);
        self.nodes.borrow_mut().insert(node, element);
        node
    }

    fn element(&self, node: NodeId) -> Result<Element, DomError> {
        self.nodes
            .borrow()
            .get(&node)
            .cloned()
            .ok_or(DomError::UnknownNode(node.0))
    }

    fn attach(
        &self,
        target: EventTarget,
        owner: Option<NodeId>,
        kind: EventKind,
        listener: Listener,
    ) -> Result<ListenerId, DomError> {
        let callback = Closure::wrap(Box::new(move |event: Event| {
            if should_prevent_default(kind, &event) {
                event.prevent_default();
            }
            listener(&read_event(&event));
        }) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(kind.dom_name(), callback.as_ref().unchecked_ref())
            .map_err(host)?;

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let listener_id = ListenerId(id);
        self.listeners.borrow_mut().insert(
            listener_id,
            Registration {
                target,
                owner,
                kind,
                callback,
            },
        );
        Ok(listener_id)
    }

    fn detach(registration: Registration) {
        let _ = registration.target.remove_event_listener_with_callback(
            registration.kind.dom_name(),
            registration.callback.as_ref().unchecked_ref(),
        );
    }
}

/// Form submits must not navigate, and menu links are `href="#"` anchors.
fn should_prevent_default(kind: EventKind, event: &Event) -> bool {
    match kind {
        EventKind::Submit => true,
        EventKind::Click => event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .map(|el| el.tag_name().eq_ignore_ascii_case("a"))
            .unwrap_or(false),
        _ => false,
    }
}

fn read_event(event: &Event) -> DomEvent {
    let mut out = DomEvent::default();
    if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
        out.key = Some(key.key());
    }
    let Some(target) = event.target() else {
        return out;
    };
    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        let name = input.name();
        if !name.is_empty() {
            out.target_name = Some(name);
        }
        out.value = Some(input.value());
        out.checked = input.checked();
    } else if let Some(element) = target.dyn_ref::<Element>() {
        out.target_name = element.get_attribute("name");
        out.value = element
            .get_attribute("data-value")
            .or_else(|| element.get_attribute("value"));
    }
    out
}

impl Dom for WebDom {
    fn create_element(&self, markup: &str) -> Result<NodeId, DomError> {
        let holder = self.document.create_element("div").map_err(host)?;
        holder.set_inner_html(markup.trim());
        let element = holder.first_element_child().ok_or(DomError::EmptyMarkup)?;
        element.remove();
        Ok(self.register(element))
    }

    fn insert(&self, container: NodeId, node: NodeId, place: RenderPosition) -> Result<(), DomError> {
        let container = self.element(container)?;
        let element = self.element(node)?;
        let position = match place {
            RenderPosition::AfterBegin => "afterbegin",
            RenderPosition::BeforeEnd => "beforeend",
        };
        container
            .insert_adjacent_element(position, &element)
            .map(|_| ())
            .map_err(host)
    }

    fn replace(&self, new: NodeId, old: NodeId) -> Result<(), DomError> {
        let new = self.element(new)?;
        let old = self.element(old)?;
        if old.parent_node().is_none() {
            return Ok(());
        }
        old.replace_with_with_node_1(&new).map_err(host)
    }

    fn remove(&self, node: NodeId) {
        let Some(element) = self.nodes.borrow().get(&node).cloned() else {
            return;
        };
        element.remove();

        let dropped: Vec<NodeId> = self
            .nodes
            .borrow()
            .iter()
            .filter(|(_, el)| element.contains(Some(el.as_ref())))
            .map(|(id, _)| *id)
            .collect();
        {
            let mut nodes = self.nodes.borrow_mut();
            for id in &dropped {
                nodes.remove(id);
            }
        }

        let stale: Vec<Registration> = {
            let mut listeners = self.listeners.borrow_mut();
            let ids: Vec<ListenerId> = listeners
                .iter()
                .filter(|(_, r)| r.owner.is_some_and(|owner| dropped.contains(&owner)))
                .map(|(id, _)| *id)
                .collect();
            ids.iter().filter_map(|id| listeners.remove(id)).collect()
        };
        debug!(nodes = dropped.len(), listeners = stale.len(), "removed node #{}", node.0);
        stale.into_iter().for_each(Self::detach);
    }

    fn listen(
        &self,
        node: NodeId,
        selector: Option<&str>,
        kind: EventKind,
        listener: Listener,
    ) -> Result<ListenerId, DomError> {
        let element = self.element(node)?;
        let target = match selector {
            Some(selector) => element
                .query_selector(selector)
                .map_err(host)?
                .ok_or_else(|| DomError::NoMatch(selector.to_string()))?,
            None => element,
        };
        self.attach(target.into(), Some(node), kind, listener)
    }

    fn listen_document(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let target: EventTarget = self.document.clone().into();
        match self.attach(target, None, kind, listener) {
            Ok(id) => id,
            Err(e) => {
                // Nothing is hooked; hand out an id that unlisten ignores.
                tracing::error!("document listener failed: {e}");
                let id = self.next_id.get();
                self.next_id.set(id + 1);
                ListenerId(id)
            }
        }
    }

    fn unlisten(&self, id: ListenerId) {
        let registration = self.listeners.borrow_mut().remove(&id);
        if let Some(registration) = registration {
            Self::detach(registration);
        }
    }
}
