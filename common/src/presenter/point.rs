use std::rc::Rc;

use tracing::debug;

use super::{Mailbox, Msg, PointEvent};
use crate::catalog::Catalogs;
use crate::dom::{Dom, DomEvent, EventKind, ListenerId, NodeId, RenderPosition};
use crate::error::DomError;
use crate::point::{is_major_change, Point, PointId};
use crate::update::{UpdateType, UserAction};
use crate::view::{Component, EditPointView, FormChange, FormMode, PointView};

/// Which of the two views is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Default,
    /// The form is shown and a document Escape listener is registered.
    Editing { escape: ListenerId },
}

/// Owns the card and the edit form of one point.
pub struct PointPresenter {
    dom: Rc<dyn Dom>,
    container: NodeId,
    mailbox: Rc<Mailbox>,
    catalogs: Catalogs,
    date_format: &'static str,
    point: Option<Point>,
    card: Option<Component<PointView>>,
    form: Option<Component<EditPointView>>,
    mode: Mode,
}

impl PointPresenter {
    pub fn new(
        dom: Rc<dyn Dom>,
        container: NodeId,
        mailbox: Rc<Mailbox>,
        catalogs: Catalogs,
        date_format: &'static str,
    ) -> Self {
        Self {
            dom,
            container,
            mailbox,
            catalogs,
            date_format,
            point: None,
            card: None,
            form: None,
            mode: Mode::Default,
        }
    }

    pub fn point(&self) -> Option<&Point> {
        self.point.as_ref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Editing { .. })
    }

    /// Node currently on screen for this point.
    pub fn mounted_node(&self) -> Option<NodeId> {
        match self.mode {
            Mode::Default => self.card.as_ref().and_then(Component::node),
            Mode::Editing { .. } => self.form.as_ref().and_then(Component::node),
        }
    }

    /// Render `point`. The first call appends the card to the list; later
    /// calls build fresh views and swap out whichever one is mounted.
    pub fn init(&mut self, point: Point, sync_failed: bool) -> Result<(), DomError> {
        let dom = self.dom.clone();
        let mut card = Component::new(PointView::new(point.clone(), sync_failed));
        let mut form = Component::new(EditPointView::new(
            point.clone(),
            self.catalogs.clone(),
            FormMode::Editing,
            self.date_format,
        ));
        self.bind_card(&mut card, &point.id)?;
        self.bind_form(&mut form, &point.id)?;

        let prev_card = self.card.replace(card);
        let prev_form = self.form.replace(form);
        self.point = Some(point);

        match (prev_card, prev_form) {
            (Some(mut prev_card), Some(mut prev_form)) => {
                let (new, old) = match self.mode {
                    Mode::Default => (self.card_node()?, prev_card.element(dom.as_ref())?),
                    Mode::Editing { .. } => (self.form_node()?, prev_form.element(dom.as_ref())?),
                };
                dom.replace(new, old)?;
                prev_card.remove(dom.as_ref());
                prev_form.remove(dom.as_ref());
            }
            _ => {
                let node = self.card_node()?;
                dom.insert(self.container, node, RenderPosition::BeforeEnd)?;
            }
        }
        Ok(())
    }

    /// Remove both views and the Escape listener.
    pub fn destroy(&mut self) {
        self.unlisten_escape();
        self.mode = Mode::Default;
        if let Some(mut card) = self.card.take() {
            card.remove(self.dom.as_ref());
        }
        if let Some(mut form) = self.form.take() {
            form.remove(self.dom.as_ref());
        }
    }

    /// Close the editor, dropping unsaved edits.
    pub fn reset_view(&mut self) -> Result<(), DomError> {
        if self.is_editing() {
            self.close_editor()?;
        }
        Ok(())
    }

    /// React to a view event. Returns the action the trip presenter should
    /// apply, if any.
    pub fn handle(&mut self, event: PointEvent) -> Result<Option<(UserAction, UpdateType)>, DomError> {
        let Some(point) = self.point.clone() else {
            return Ok(None);
        };
        match event {
            PointEvent::OpenEditor => {
                if !self.is_editing() {
                    self.open_editor(&point.id)?;
                }
                Ok(None)
            }
            PointEvent::CloseEditor | PointEvent::Escape => {
                self.reset_view()?;
                Ok(None)
            }
            PointEvent::Submit => {
                let Some(draft) = self.form.as_ref().map(|f| f.view().draft().clone()) else {
                    return Ok(None);
                };
                if !self.form.as_ref().is_some_and(|f| f.view().is_submittable()) {
                    debug!("point {} submitted with unknown destination", point.id);
                    return Ok(None);
                }
                let update = if is_major_change(&point, &draft) {
                    UpdateType::Major
                } else {
                    UpdateType::Patch
                };
                self.show_card()?;
                Ok(Some((UserAction::UpdatePoint(draft), update)))
            }
            PointEvent::Delete => Ok(Some((UserAction::DeletePoint(point), UpdateType::Major))),
            PointEvent::ToggleFavorite => {
                let mut toggled = point;
                toggled.is_favorite = !toggled.is_favorite;
                Ok(Some((UserAction::UpdatePoint(toggled), UpdateType::Patch)))
            }
            PointEvent::Changed(change) => {
                self.apply_change(change)?;
                Ok(None)
            }
        }
    }

    fn apply_change(&mut self, change: FormChange) -> Result<(), DomError> {
        let dom = self.dom.clone();
        let Some(form) = self.form.as_mut() else {
            return Ok(());
        };
        if form.view_mut().apply(change) {
            form.rerender(dom.as_ref())?;
        }
        Ok(())
    }

    fn open_editor(&mut self, id: &PointId) -> Result<(), DomError> {
        let (form, card) = (self.form_node()?, self.card_node()?);
        self.dom.replace(form, card)?;

        let mailbox = self.mailbox.clone();
        let id = id.clone();
        let escape = self.dom.listen_document(
            EventKind::KeyDown,
            Rc::new(move |event: &DomEvent| {
                if event.is_escape() {
                    mailbox.post(Msg::Point(id.clone(), PointEvent::Escape));
                }
            }),
        );
        self.mode = Mode::Editing { escape };
        Ok(())
    }

    fn close_editor(&mut self) -> Result<(), DomError> {
        self.show_card()?;
        let dom = self.dom.clone();
        if let (Some(form), Some(point)) = (self.form.as_mut(), self.point.as_ref()) {
            form.view_mut().reset(point);
            form.rerender(dom.as_ref())?;
        }
        Ok(())
    }

    /// Put the card back in place of the form.
    fn show_card(&mut self) -> Result<(), DomError> {
        if self.is_editing() {
            let (card, form) = (self.card_node()?, self.form_node()?);
            self.dom.replace(card, form)?;
        }
        self.unlisten_escape();
        self.mode = Mode::Default;
        Ok(())
    }

    fn unlisten_escape(&mut self) {
        if let Mode::Editing { escape } = self.mode {
            self.dom.unlisten(escape);
        }
    }

    fn card_node(&mut self) -> Result<NodeId, DomError> {
        let dom = self.dom.clone();
        match self.card.as_mut() {
            Some(card) => card.element(dom.as_ref()),
            None => Err(DomError::NoMatch(PointView::ROLLUP.to_string())),
        }
    }

    fn form_node(&mut self) -> Result<NodeId, DomError> {
        let dom = self.dom.clone();
        match self.form.as_mut() {
            Some(form) => form.element(dom.as_ref()),
            None => Err(DomError::NoMatch(EditPointView::FORM.to_string())),
        }
    }

    fn bind_card(&self, card: &mut Component<PointView>, id: &PointId) -> Result<(), DomError> {
        let dom = self.dom.as_ref();
        let (mailbox, point_id) = (self.mailbox.clone(), id.clone());
        card.bind(dom, Some(PointView::ROLLUP), EventKind::Click, move |_| {
            mailbox.post(Msg::Point(point_id.clone(), PointEvent::OpenEditor))
        })?;
        let (mailbox, point_id) = (self.mailbox.clone(), id.clone());
        card.bind(dom, Some(PointView::FAVORITE), EventKind::Click, move |_| {
            mailbox.post(Msg::Point(point_id.clone(), PointEvent::ToggleFavorite))
        })
    }

    fn bind_form(&self, form: &mut Component<EditPointView>, id: &PointId) -> Result<(), DomError> {
        let dom = self.dom.as_ref();
        let (mailbox, point_id) = (self.mailbox.clone(), id.clone());
        form.bind(dom, Some(EditPointView::FORM), EventKind::Submit, move |_| {
            mailbox.post(Msg::Point(point_id.clone(), PointEvent::Submit))
        })?;
        let (mailbox, point_id) = (self.mailbox.clone(), id.clone());
        form.bind(dom, Some(EditPointView::FORM), EventKind::Change, move |event| {
            if let Some(change) = FormChange::from_event(event) {
                mailbox.post(Msg::Point(point_id.clone(), PointEvent::Changed(change)));
            }
        })?;
        let (mailbox, point_id) = (self.mailbox.clone(), id.clone());
        form.bind(dom, Some(EditPointView::ROLLUP), EventKind::Click, move |_| {
            mailbox.post(Msg::Point(point_id.clone(), PointEvent::CloseEditor))
        })?;
        let (mailbox, point_id) = (self.mailbox.clone(), id.clone());
        form.bind(dom, Some(EditPointView::RESET), EventKind::Click, move |_| {
            mailbox.post(Msg::Point(point_id.clone(), PointEvent::Delete))
        })
    }
}
