//! View components: pure templates plus a cached root node.
//!
//! Views render to markup strings, not `rsx!`. Presenters insert, replace
//! and remove nodes through [`Dom`], which `MemoryDom` implements for tests
//! and `trip-ui` implements over `web-sys`. Dioxus only renders the page
//! shell holding the mount points. Interpolated text goes through
//! [`escape_html`](crate::format::escape_html).

mod edit_point;
mod filters;
mod info;
mod list;
mod menu;
mod new_button;
mod placeholder;
mod point;
mod sort;
mod stats;

use std::cell::RefCell;
use std::rc::Rc;

pub use edit_point::{EditPointView, FormChange, FormMode};
pub use filters::FiltersView;
pub use info::TripInfoView;
pub use list::ListView;
pub use menu::{MenuItem, MenuView};
pub use new_button::NewButtonView;
pub use placeholder::{ListEmptyView, LoadingErrorView, LoadingView};
pub use point::PointView;
pub use sort::SortView;
pub use stats::StatsView;

use crate::dom::{Dom, DomEvent, EventKind, Listener, ListenerId, NodeId};
use crate::error::DomError;

/// Pure render function: data in, markup out.
pub trait Template {
    fn template(&self) -> String;
}

struct Binding {
    selector: Option<&'static str>,
    kind: EventKind,
    callback: Rc<RefCell<Listener>>,
    listener: Option<ListenerId>,
}

/// A view plus the single DOM node rendered from it.
///
/// The node is created on first access and cached until [`Component::remove`].
/// Each `(selector, event)` pair gets one DOM listener; binding it again only
/// swaps the callback.
pub struct Component<T> {
    view: T,
    element: Option<NodeId>,
    bindings: Vec<Binding>,
}

impl<T: Template> Component<T> {
    pub fn new(view: T) -> Self {
        Self {
            view,
            element: None,
            bindings: Vec::new(),
        }
    }

    pub fn view(&self) -> &T {
        &self.view
    }

    /// Mutating the view does not touch the DOM; call [`Component::rerender`].
    pub fn view_mut(&mut self) -> &mut T {
        &mut self.view
    }

    /// Cached node, if one was created.
    pub fn node(&self) -> Option<NodeId> {
        self.element
    }

    pub fn element(&mut self, dom: &dyn Dom) -> Result<NodeId, DomError> {
        if let Some(node) = self.element {
            return Ok(node);
        }
        let node = dom.create_element(&self.view.template())?;
        self.element = Some(node);
        for binding in &mut self.bindings {
            binding.listener = Some(attach(dom, node, binding)?);
        }
        Ok(node)
    }

    pub fn bind(
        &mut self,
        dom: &dyn Dom,
        selector: Option<&'static str>,
        kind: EventKind,
        callback: impl Fn(&DomEvent) + 'static,
    ) -> Result<(), DomError> {
        let callback: Listener = Rc::new(callback);
        if let Some(existing) = self
            .bindings
            .iter()
            .find(|b| b.selector == selector && b.kind == kind)
        {
            *existing.callback.borrow_mut() = callback;
            return Ok(());
        }

        let node = self.element(dom)?;
        let mut binding = Binding {
            selector,
            kind,
            callback: Rc::new(RefCell::new(callback)),
            listener: None,
        };
        binding.listener = Some(attach(dom, node, &binding)?);
        self.bindings.push(binding);
        Ok(())
    }

    /// Swap the cached node for a fresh render, keeping its position and
    /// re-attaching bound handlers. No-op if nothing was rendered yet.
    pub fn rerender(&mut self, dom: &dyn Dom) -> Result<(), DomError> {
        let Some(old) = self.element.take() else {
            return Ok(());
        };
        let new = self.element(dom)?;
        dom.replace(new, old)?;
        dom.remove(old);
        Ok(())
    }

    /// Detach and forget the node; the next access renders a new one.
    pub fn remove(&mut self, dom: &dyn Dom) {
        if let Some(node) = self.element.take() {
            dom.remove(node);
        }
        for binding in &mut self.bindings {
            binding.listener = None;
        }
    }
}

fn attach(dom: &dyn Dom, node: NodeId, binding: &Binding) -> Result<ListenerId, DomError> {
    let slot = binding.callback.clone();
    dom.listen(
        node,
        binding.selector,
        binding.kind,
        Rc::new(move |event: &DomEvent| {
            let callback = slot.borrow().clone();
            callback(event);
        }),
    )
}

/// Remove an optional component and clear the slot.
pub fn remove_component<T: Template>(dom: &dyn Dom, slot: &mut Option<Component<T>>) {
    if let Some(mut component) = slot.take() {
        component.remove(dom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDom, RenderPosition};
    use std::cell::Cell;

    struct Badge {
        label: String,
    }

    impl Template for Badge {
        fn template(&self) -> String {
            format!("<span class=\"badge\">{}</span>", self.label)
        }
    }

    fn badge(label: &str) -> Component<Badge> {
        Component::new(Badge {
            label: label.into(),
        })
    }

    #[test]
    fn test_element_is_created_once() {
        let dom = MemoryDom::new();
        let mut component = badge("a");
        let first = component.element(&dom).unwrap();
        let second = component.element(&dom).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rebinding_swaps_callback_without_second_listener() {
        let dom = MemoryDom::new();
        let mut component = badge("a");
        let hits = Rc::new(Cell::new((0, 0)));

        let h = hits.clone();
        component
            .bind(&dom, Some(".badge"), EventKind::Click, move |_| h.set((h.get().0 + 1, h.get().1)))
            .unwrap();
        let h = hits.clone();
        component
            .bind(&dom, Some(".badge"), EventKind::Click, move |_| h.set((h.get().0, h.get().1 + 1)))
            .unwrap();

        assert_eq!(dom.element_listener_count(), 1);
        let node = component.node().unwrap();
        dom.fire(node, Some(".badge"), EventKind::Click, &DomEvent::default());
        assert_eq!(hits.get(), (0, 1));
    }

    #[test]
    fn test_remove_clears_cache_and_recreates_with_handlers() {
        let dom = MemoryDom::new();
        let root = dom.mount("host");
        let mut component = badge("a");
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        component
            .bind(&dom, None, EventKind::Click, move |_| h.set(h.get() + 1))
            .unwrap();
        let old = component.element(&dom).unwrap();
        dom.insert(root, old, RenderPosition::BeforeEnd).unwrap();

        component.remove(&dom);
        assert!(component.node().is_none());
        assert!(!dom.exists(old));
        assert_eq!(dom.element_listener_count(), 0);

        let fresh = component.element(&dom).unwrap();
        assert_ne!(fresh, old);
        dom.fire(fresh, None, EventKind::Click, &DomEvent::default());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_rerender_replaces_in_place() {
        let dom = MemoryDom::new();
        let root = dom.mount("host");
        let mut component = badge("old");
        component.bind(&dom, None, EventKind::Click, |_| {}).unwrap();
        let old = component.element(&dom).unwrap();
        dom.insert(root, old, RenderPosition::BeforeEnd).unwrap();

        component.view_mut().label = "new".into();
        component.rerender(&dom).unwrap();

        let new = component.node().unwrap();
        assert_eq!(dom.children(root), vec![new]);
        assert!(dom.markup(new).unwrap().contains("new"));
        assert!(!dom.exists(old));
        assert_eq!(dom.element_listener_count(), 1);
    }

    #[test]
    fn test_rerender_before_first_render_is_noop() {
        let dom = MemoryDom::new();
        let mut component = badge("a");
        component.rerender(&dom).unwrap();
        assert!(component.node().is_none());
    }
}
