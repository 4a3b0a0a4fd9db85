use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::{Dom, DomEvent, EventKind, Listener, ListenerId, NodeId, RenderPosition};
use crate::error::DomError;

struct Node {
    markup: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Clone, PartialEq, Eq)]
enum Target {
    Document,
    Element(NodeId, Option<String>),
}

struct Registration {
    target: Target,
    kind: EventKind,
    listener: Listener,
}

/// Arena-backed DOM for tests and headless runs.
///
/// Nodes keep their rendered markup verbatim; child nodes inserted later are
/// tracked structurally. Counters record how much rendering happened so tests
/// can assert on re-render scope.
#[derive(Default)]
pub struct MemoryDom {
    next_id: Cell<u64>,
    nodes: RefCell<HashMap<NodeId, Node>>,
    roots: RefCell<HashSet<NodeId>>,
    listeners: RefCell<BTreeMap<ListenerId, Registration>>,
    renders: Cell<usize>,
    removals: Cell<usize>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// Create an attached root container, standing in for host page markup.
    pub fn mount(&self, class: &str) -> NodeId {
        let id = NodeId(self.next());
        self.nodes.borrow_mut().insert(
            id,
            Node {
                markup: format!("<div class=\"{class}\"></div>"),
                parent: None,
                children: Vec::new(),
            },
        );
        self.roots.borrow_mut().insert(id);
        id
    }

    pub fn exists(&self, node: NodeId) -> bool {
        self.nodes.borrow().contains_key(&node)
    }

    pub fn markup(&self, node: NodeId) -> Option<String> {
        self.nodes.borrow().get(&node).map(|n| n.markup.clone())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow().get(&node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .borrow()
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Whether `node` hangs off a mounted root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let roots = self.roots.borrow();
        let mut current = Some(node);
        while let Some(id) = current {
            if roots.contains(&id) {
                return true;
            }
            current = nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    /// Markup of `node` followed by its descendants, depth first.
    pub fn subtree_markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_markup(node, &mut out);
        out
    }

    fn collect_markup(&self, node: NodeId, out: &mut String) {
        let (markup, children) = match self.nodes.borrow().get(&node) {
            Some(n) => (n.markup.clone(), n.children.clone()),
            None => return,
        };
        out.push_str(&markup);
        for child in children {
            self.collect_markup(child, out);
        }
    }

    /// First descendant of `container` (depth first) whose own markup
    /// contains `needle`.
    pub fn find(&self, container: NodeId, needle: &str) -> Option<NodeId> {
        for child in self.children(container) {
            if self.markup(child).is_some_and(|m| m.contains(needle)) {
                return Some(child);
            }
            if let Some(found) = self.find(child, needle) {
                return Some(found);
            }
        }
        None
    }

    /// Inserts plus replaces since creation.
    pub fn render_count(&self) -> usize {
        self.renders.get()
    }

    pub fn removal_count(&self) -> usize {
        self.removals.get()
    }

    pub fn element_listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .values()
            .filter(|r| r.target != Target::Document)
            .count()
    }

    pub fn document_listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .values()
            .filter(|r| r.target == Target::Document)
            .count()
    }

    /// Dispatch an event to listeners bound on `node` with exactly this
    /// selector. Returns how many listeners ran.
    pub fn fire(
        &self,
        node: NodeId,
        selector: Option<&str>,
        kind: EventKind,
        event: &DomEvent,
    ) -> usize {
        let target = Target::Element(node, selector.map(str::to_string));
        self.dispatch(&target, kind, event)
    }

    pub fn fire_document(&self, kind: EventKind, event: &DomEvent) -> usize {
        self.dispatch(&Target::Document, kind, event)
    }

    fn dispatch(&self, target: &Target, kind: EventKind, event: &DomEvent) -> usize {
        // Listeners may mutate the DOM; never hold a borrow while they run.
        let matching: Vec<Listener> = self
            .listeners
            .borrow()
            .values()
            .filter(|r| &r.target == target && r.kind == kind)
            .map(|r| r.listener.clone())
            .collect();
        for listener in &matching {
            listener(event);
        }
        matching.len()
    }

    fn detach(nodes: &mut HashMap<NodeId, Node>, node: NodeId) {
        let parent = nodes.get_mut(&node).and_then(|n| n.parent.take());
        if let Some(parent) = parent.and_then(|p| nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != node);
        }
    }

    fn drop_subtree(&self, node: NodeId) {
        let removed = self.nodes.borrow_mut().remove(&node);
        let Some(removed) = removed else {
            return;
        };
        self.listeners.borrow_mut().retain(|_, r| match &r.target {
            Target::Element(id, _) => *id != node,
            Target::Document => true,
        });
        for child in removed.children {
            self.drop_subtree(child);
        }
    }
}

impl Dom for MemoryDom {
    fn create_element(&self, markup: &str) -> Result<NodeId, DomError> {
        let markup = markup.trim();
        if markup.is_empty() {
            return Err(DomError::EmptyMarkup);
        }
        let id = NodeId(self.next());
        self.nodes.borrow_mut().insert(
            id,
            Node {
                markup: markup.to_string(),
                parent: None,
                children: Vec::new(),
            },
        );
        Ok(id)
    }

    fn insert(
        &self,
        container: NodeId,
        node: NodeId,
        place: RenderPosition,
    ) -> Result<(), DomError> {
        let mut nodes = self.nodes.borrow_mut();
        if !nodes.contains_key(&node) {
            return Err(DomError::UnknownNode(node.0));
        }
        if !nodes.contains_key(&container) {
            return Err(DomError::UnknownNode(container.0));
        }
        Self::detach(&mut nodes, node);
        if let Some(parent) = nodes.get_mut(&container) {
            match place {
                RenderPosition::AfterBegin => parent.children.insert(0, node),
                RenderPosition::BeforeEnd => parent.children.push(node),
            }
        }
        if let Some(child) = nodes.get_mut(&node) {
            child.parent = Some(container);
        }
        self.renders.set(self.renders.get() + 1);
        Ok(())
    }

    fn replace(&self, new: NodeId, old: NodeId) -> Result<(), DomError> {
        let mut nodes = self.nodes.borrow_mut();
        if !nodes.contains_key(&new) {
            return Err(DomError::UnknownNode(new.0));
        }
        let Some(parent) = nodes.get(&old).ok_or(DomError::UnknownNode(old.0))?.parent else {
            return Ok(());
        };
        Self::detach(&mut nodes, new);
        if let Some(container) = nodes.get_mut(&parent) {
            if let Some(slot) = container.children.iter_mut().find(|c| **c == old) {
                *slot = new;
            }
        }
        if let Some(old) = nodes.get_mut(&old) {
            old.parent = None;
        }
        if let Some(new) = nodes.get_mut(&new) {
            new.parent = Some(parent);
        }
        self.renders.set(self.renders.get() + 1);
        Ok(())
    }

    fn remove(&self, node: NodeId) {
        if !self.exists(node) {
            return;
        }
        Self::detach(&mut self.nodes.borrow_mut(), node);
        self.drop_subtree(node);
        self.removals.set(self.removals.get() + 1);
    }

    fn listen(
        &self,
        node: NodeId,
        selector: Option<&str>,
        kind: EventKind,
        listener: Listener,
    ) -> Result<ListenerId, DomError> {
        let markup = self.markup(node).ok_or(DomError::UnknownNode(node.0))?;
        if let Some(class) = selector.and_then(|s| s.strip_prefix('.')) {
            if !markup.contains(class) {
                return Err(DomError::NoMatch(format!(".{class}")));
            }
        }
        let id = ListenerId(self.next());
        self.listeners.borrow_mut().insert(
            id,
            Registration {
                target: Target::Element(node, selector.map(str::to_string)),
                kind,
                listener,
            },
        );
        Ok(id)
    }

    fn listen_document(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next());
        self.listeners.borrow_mut().insert(
            id,
            Registration {
                target: Target::Document,
                kind,
                listener,
            },
        );
        id
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.borrow_mut().remove(&id);
    }
}
