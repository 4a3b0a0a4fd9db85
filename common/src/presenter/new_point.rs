use std::rc::Rc;

use tracing::debug;

use super::{Mailbox, Msg, NewPointEvent};
use crate::catalog::Catalogs;
use crate::dom::{Dom, DomEvent, EventKind, ListenerId, NodeId, RenderPosition};
use crate::error::DomError;
use crate::point::{Point, PointId};
use crate::update::{UpdateType, UserAction};
use crate::view::{Component, EditPointView, FormChange, FormMode};

/// Owns the creation form shown at the top of the list.
pub struct NewPointPresenter {
    dom: Rc<dyn Dom>,
    container: NodeId,
    mailbox: Rc<Mailbox>,
    form: Option<Component<EditPointView>>,
    escape: Option<ListenerId>,
}

impl NewPointPresenter {
    pub fn new(dom: Rc<dyn Dom>, container: NodeId, mailbox: Rc<Mailbox>) -> Self {
        Self {
            dom,
            container,
            mailbox,
            form: None,
            escape: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.form.is_some()
    }

    pub fn node(&self) -> Option<NodeId> {
        self.form.as_ref().and_then(Component::node)
    }

    /// Prepend a creation form seeded with `blank`. Does nothing if one is
    /// already open.
    pub fn init(
        &mut self,
        blank: Point,
        catalogs: Catalogs,
        date_format: &'static str,
    ) -> Result<(), DomError> {
        if self.form.is_some() {
            return Ok(());
        }
        let dom = self.dom.clone();
        let mut form = Component::new(EditPointView::new(
            blank,
            catalogs,
            FormMode::Creating,
            date_format,
        ));

        let mailbox = self.mailbox.clone();
        form.bind(dom.as_ref(), Some(EditPointView::FORM), EventKind::Submit, move |_| {
            mailbox.post(Msg::NewPoint(NewPointEvent::Submit))
        })?;
        let mailbox = self.mailbox.clone();
        form.bind(dom.as_ref(), Some(EditPointView::FORM), EventKind::Change, move |event| {
            if let Some(change) = FormChange::from_event(event) {
                mailbox.post(Msg::NewPoint(NewPointEvent::Changed(change)));
            }
        })?;
        let mailbox = self.mailbox.clone();
        form.bind(dom.as_ref(), Some(EditPointView::RESET), EventKind::Click, move |_| {
            mailbox.post(Msg::NewPoint(NewPointEvent::Cancel))
        })?;

        let node = form.element(dom.as_ref())?;
        dom.insert(self.container, node, RenderPosition::AfterBegin)?;
        self.form = Some(form);

        let mailbox = self.mailbox.clone();
        self.escape = Some(dom.listen_document(
            EventKind::KeyDown,
            Rc::new(move |event: &DomEvent| {
                if event.is_escape() {
                    mailbox.post(Msg::NewPoint(NewPointEvent::Escape));
                }
            }),
        ));
        Ok(())
    }

    pub fn destroy(&mut self) {
        if let Some(escape) = self.escape.take() {
            self.dom.unlisten(escape);
        }
        if let Some(mut form) = self.form.take() {
            form.remove(self.dom.as_ref());
        }
    }

    pub fn handle(
        &mut self,
        event: NewPointEvent,
    ) -> Result<Option<(UserAction, UpdateType)>, DomError> {
        let dom = self.dom.clone();
        let Some(form) = self.form.as_mut() else {
            return Ok(None);
        };
        match event {
            NewPointEvent::Submit => {
                if !form.view().is_submittable() {
                    debug!("new point submitted without a known destination");
                    return Ok(None);
                }
                let mut point = form.view().draft().clone();
                point.id = PointId::generate();
                Ok(Some((UserAction::AddPoint(point), UpdateType::Major)))
            }
            NewPointEvent::Cancel | NewPointEvent::Escape => {
                Ok(Some((UserAction::CancelAddPoint, UpdateType::Major)))
            }
            NewPointEvent::Changed(change) => {
                if form.view_mut().apply(change) {
                    form.rerender(dom.as_ref())?;
                }
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DestinationCatalog, OfferCatalog};
    use crate::dom::MemoryDom;
    use crate::format::DATE_INPUT_FORMAT;
    use crate::point::Destination;
    use chrono::{TimeZone, Utc};

    fn catalogs() -> Catalogs {
        Catalogs::new(
            Rc::new(DestinationCatalog::new(vec![Destination {
                name: "Lisbon".into(),
                ..Default::default()
            }])),
            Rc::new(OfferCatalog::default()),
        )
    }

    fn open() -> (Rc<MemoryDom>, NodeId, Rc<Mailbox>, NewPointPresenter) {
        let dom = Rc::new(MemoryDom::new());
        let list = dom.mount("trip-events__list");
        let existing = dom.create_element("<li class=\"trip-events__item\"></li>").unwrap();
        dom.insert(list, existing, RenderPosition::BeforeEnd).unwrap();
        let mailbox = Rc::new(Mailbox::new());
        let mut presenter = NewPointPresenter::new(dom.clone(), list, mailbox.clone());
        let blank = Point::blank(Utc.with_ymd_and_hms(2021, 4, 1, 12, 0, 0).unwrap());
        presenter.init(blank, catalogs(), DATE_INPUT_FORMAT).unwrap();
        (dom, list, mailbox, presenter)
    }

    #[test]
    fn test_form_is_prepended_in_creating_mode() {
        let (dom, list, _, presenter) = open();
        let children = dom.children(list);
        assert_eq!(children.len(), 2);
        assert_eq!(Some(children[0]), presenter.node());
        let markup = dom.markup(children[0]).unwrap();
        assert!(markup.contains(">Cancel</button>"));
        assert!(!markup.contains("event__rollup-btn"));
        assert_eq!(dom.document_listener_count(), 1);
    }

    #[test]
    fn test_submit_requires_destination_and_assigns_fresh_id() {
        let (_, _, _, mut presenter) = open();
        assert_eq!(presenter.handle(NewPointEvent::Submit).unwrap(), None);

        let seeded = presenter.form.as_ref().unwrap().view().draft().id.clone();
        presenter
            .handle(NewPointEvent::Changed(FormChange::Destination("Lisbon".into())))
            .unwrap();
        let Some((UserAction::AddPoint(point), update)) =
            presenter.handle(NewPointEvent::Submit).unwrap()
        else {
            panic!("expected an add action");
        };
        assert_eq!(update, UpdateType::Major);
        assert_eq!(point.destination.name, "Lisbon");
        assert_ne!(point.id, seeded);
    }

    #[test]
    fn test_escape_and_cancel_forward_cancel() {
        let (dom, _, mailbox, mut presenter) = open();
        dom.fire_document(EventKind::KeyDown, &DomEvent::key("Esc"));
        assert_eq!(mailbox.take(), Some(Msg::NewPoint(NewPointEvent::Escape)));
        assert_eq!(
            presenter.handle(NewPointEvent::Escape).unwrap(),
            Some((UserAction::CancelAddPoint, UpdateType::Major))
        );
    }

    #[test]
    fn test_destroy_and_second_init_is_noop() {
        let (dom, list, _, mut presenter) = open();
        let blank = Point::blank(Utc.with_ymd_and_hms(2021, 4, 1, 12, 0, 0).unwrap());
        presenter.init(blank, catalogs(), DATE_INPUT_FORMAT).unwrap();
        assert_eq!(dom.children(list).len(), 2);

        presenter.destroy();
        assert!(!presenter.is_open());
        assert_eq!(dom.children(list).len(), 1);
        assert_eq!(dom.document_listener_count(), 0);
        assert_eq!(presenter.handle(NewPointEvent::Submit).unwrap(), None);
    }
}
