use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use futures::FutureExt;
use tracing::{debug, info, warn};

use super::{Mailbox, Msg, NewPointEvent, NewPointPresenter, PointEvent, PointPresenter, SyncOutcome};
use crate::backend::{Backend, Spawner};
use crate::catalog::{Catalogs, OfferGroup};
use crate::config::TripConfig;
use crate::dom::{Dom, EventKind, NodeId, RenderPosition};
use crate::error::{DomError, ModelError, TripError};
use crate::filter::{filter_items, FilterType};
use crate::model::{DestinationsModel, FilterModel, Observed, OffersModel, PointsModel};
use crate::observer::SubscriptionId;
use crate::point::{is_major_change, Destination, Point, PointId};
use crate::sort::{project_points, SortType};
use crate::stats::TripStats;
use crate::update::{ModelEvent, UpdateType, UserAction};
use crate::view::{
    remove_component, Component, FiltersView, ListEmptyView, ListView, LoadingErrorView,
    LoadingView, MenuItem, MenuView, NewButtonView, SortView, StatsView, Template, TripInfoView,
};

/// Host containers the trip screen renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mounts {
    /// Page header: trip info and the new-point button.
    pub main: NodeId,
    /// Menu and filter bar.
    pub controls: NodeId,
    /// Sort bar, point list, placeholders and statistics.
    pub events: NodeId,
}

/// The models a trip screen observes.
#[derive(Clone, Default)]
pub struct Models {
    pub points: Rc<PointsModel>,
    pub filter: Rc<FilterModel>,
    pub destinations: Rc<DestinationsModel>,
    pub offers: Rc<OffersModel>,
}

impl Models {
    pub fn new(initial_filter: FilterType) -> Self {
        Self {
            filter: Rc::new(FilterModel::new(initial_filter)),
            ..Default::default()
        }
    }
}

/// Data sets still being fetched.
#[derive(Debug, Clone, Copy)]
struct LoadState {
    points: bool,
    destinations: bool,
    offers: bool,
}

impl LoadState {
    fn pending() -> Self {
        Self {
            points: true,
            destinations: true,
            offers: true,
        }
    }

    fn is_loading(&self) -> bool {
        self.points || self.destinations || self.offers
    }
}

/// Coordinates the whole trip screen.
pub struct TripPresenter<B: Backend + 'static> {
    dom: Rc<dyn Dom>,
    mounts: Mounts,
    models: Models,
    backend: Rc<B>,
    spawner: Spawner,
    mailbox: Rc<Mailbox>,
    config: TripConfig,

    sort: SortType,
    screen: MenuItem,
    loading: LoadState,
    load_failed: bool,
    presenters: HashMap<PointId, PointPresenter>,
    new_point: Option<NewPointPresenter>,
    failed: HashSet<PointId>,
    subscriptions: Vec<(Rc<dyn Observed>, SubscriptionId)>,

    menu: Option<Component<MenuView>>,
    new_button: Option<Component<NewButtonView>>,
    info: Option<Component<TripInfoView>>,
    filters: Option<Component<FiltersView>>,
    sort_bar: Option<Component<SortView>>,
    list: Option<Component<ListView>>,
    empty: Option<Component<ListEmptyView>>,
    loading_view: Option<Component<LoadingView>>,
    loading_error: Option<Component<LoadingErrorView>>,
    stats: Option<Component<StatsView>>,
}

impl<B: Backend + 'static> TripPresenter<B> {
    pub fn new(
        dom: Rc<dyn Dom>,
        mounts: Mounts,
        models: Models,
        backend: Rc<B>,
        spawner: Spawner,
        mailbox: Rc<Mailbox>,
        config: TripConfig,
    ) -> Self {
        Self {
            dom,
            mounts,
            models,
            backend,
            spawner,
            mailbox,
            sort: config.initial_sort,
            config,
            screen: MenuItem::Table,
            loading: LoadState::pending(),
            load_failed: false,
            presenters: HashMap::new(),
            new_point: None,
            failed: HashSet::new(),
            subscriptions: Vec::new(),
            menu: None,
            new_button: None,
            info: None,
            filters: None,
            sort_bar: None,
            list: None,
            empty: None,
            loading_view: None,
            loading_error: None,
            stats: None,
        }
    }

    /// Subscribe to the models and render the chrome that survives rebuilds.
    pub fn init(&mut self) -> Result<(), TripError> {
        if !self.subscriptions.is_empty() {
            return Ok(());
        }
        let observed: [Rc<dyn Observed>; 4] = [
            self.models.points.clone(),
            self.models.filter.clone(),
            self.models.destinations.clone(),
            self.models.offers.clone(),
        ];
        for model in observed {
            let mailbox = self.mailbox.clone();
            let id = model
                .observable()
                .subscribe(move |event: &ModelEvent| mailbox.post(Msg::Model(event.clone())));
            self.subscriptions.push((model, id));
        }

        self.render_menu()?;
        self.render_new_button()?;
        self.render_loading()?;
        Ok(())
    }

    /// Fetch points and catalogs. A failed fetch counts as an empty result.
    pub fn load(&self) {
        let backend = self.backend.clone();
        let mailbox = self.mailbox.clone();
        info!("loading trip from {} backend", backend.backend_name());
        (self.spawner)(
            async move {
                let points = backend.points().await.unwrap_or_else(|e| {
                    warn!("failed to load points: {e}");
                    Vec::new()
                });
                let destinations = backend.destinations().await.unwrap_or_else(|e| {
                    warn!("failed to load destinations: {e}");
                    Vec::new()
                });
                let offers = backend.offers().await.unwrap_or_else(|e| {
                    warn!("failed to load offers: {e}");
                    Vec::new()
                });
                mailbox.post(Msg::Loaded {
                    points,
                    destinations,
                    offers,
                });
            }
            .boxed_local(),
        );
    }

    /// Unsubscribe and remove everything this presenter rendered.
    pub fn dispose(&mut self) {
        for (model, id) in self.subscriptions.drain(..) {
            model.unsubscribe(id);
        }
        self.clear_trip();
        let dom = self.dom.clone();
        remove_component(dom.as_ref(), &mut self.stats);
        remove_component(dom.as_ref(), &mut self.menu);
        remove_component(dom.as_ref(), &mut self.new_button);
        remove_component(dom.as_ref(), &mut self.loading_view);
        remove_component(dom.as_ref(), &mut self.loading_error);
    }

    pub fn handle(&mut self, msg: Msg) -> Result<(), TripError> {
        match msg {
            Msg::Point(id, event) => self.handle_point_event(id, event),
            Msg::NewPoint(event) => self.handle_new_point_event(event),
            Msg::SortChanged(sort) => Ok(self.change_sort(sort)?),
            Msg::FilterChanged(filter) => {
                if filter != self.models.filter.filter() {
                    self.models.filter.set_filter(UpdateType::Major, filter);
                }
                Ok(())
            }
            Msg::MenuSelected(item) => Ok(self.switch_screen(item)?),
            Msg::NewPointRequested => self.request_new_point(),
            Msg::OpenNewPoint => Ok(self.open_new_point()?),
            Msg::Model(event) => Ok(self.handle_model_event(event)?),
            Msg::Loaded {
                points,
                destinations,
                offers,
            } => {
                self.apply_loaded(points, destinations, offers);
                Ok(())
            }
            Msg::Synced(outcome) => self.reconcile(outcome),
        }
    }

    /// Apply a user action to the models optimistically and send it to the
    /// backend.
    pub fn dispatch(&mut self, action: UserAction, update: UpdateType) -> Result<(), TripError> {
        debug!("dispatch {} ({update:?})", action.name());
        match action {
            UserAction::UpdatePoint(point) => {
                let prior = self
                    .models
                    .points
                    .get(&point.id)
                    .ok_or_else(|| ModelError::UnknownPoint(point.id.clone()))?;
                self.failed.remove(&point.id);
                self.models.points.update_point(update, point.clone())?;

                let backend = self.backend.clone();
                let mailbox = self.mailbox.clone();
                (self.spawner)(
                    async move {
                        let result = backend.update_point(point).await;
                        mailbox.post(Msg::Synced(SyncOutcome::Updated { prior, result }));
                    }
                    .boxed_local(),
                );
            }
            UserAction::AddPoint(point) => {
                self.destroy_new_point()?;
                self.models.points.add_point(update, point.clone())?;

                let backend = self.backend.clone();
                let mailbox = self.mailbox.clone();
                (self.spawner)(
                    async move {
                        let result = backend.add_point(point.clone()).await;
                        mailbox.post(Msg::Synced(SyncOutcome::Added {
                            local: point,
                            result,
                        }));
                    }
                    .boxed_local(),
                );
            }
            UserAction::DeletePoint(point) => {
                let prior = self.models.points.delete_point(update, &point.id)?;
                self.failed.remove(&prior.id);

                let backend = self.backend.clone();
                let mailbox = self.mailbox.clone();
                (self.spawner)(
                    async move {
                        let result = backend.delete_point(prior.id.clone()).await;
                        mailbox.post(Msg::Synced(SyncOutcome::Deleted { prior, result }));
                    }
                    .boxed_local(),
                );
            }
            UserAction::CancelAddPoint => self.destroy_new_point()?,
        }
        Ok(())
    }

    /// Points on screen: current filter, then current sort.
    pub fn visible_points(&self) -> Vec<Point> {
        project_points(
            &self.models.points.points(),
            self.models.filter.filter(),
            self.sort,
            self.config.now(),
        )
    }

    pub fn sort(&self) -> SortType {
        self.sort
    }

    pub fn screen(&self) -> MenuItem {
        self.screen
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn presenter_count(&self) -> usize {
        self.presenters.len()
    }

    pub fn presenter(&self, id: &PointId) -> Option<&PointPresenter> {
        self.presenters.get(id)
    }

    pub fn is_editing(&self, id: &PointId) -> bool {
        self.presenters.get(id).is_some_and(PointPresenter::is_editing)
    }

    pub fn has_new_point(&self) -> bool {
        self.new_point.is_some()
    }

    pub fn new_point_node(&self) -> Option<NodeId> {
        self.new_point.as_ref().and_then(NewPointPresenter::node)
    }

    pub fn is_sync_failed(&self, id: &PointId) -> bool {
        self.failed.contains(id)
    }

    pub fn list_node(&self) -> Option<NodeId> {
        self.list.as_ref().and_then(Component::node)
    }

    pub fn new_button_disabled(&self) -> bool {
        self.new_button.as_ref().is_some_and(|b| b.view().disabled)
    }

    pub fn models(&self) -> &Models {
        &self.models
    }

    fn catalogs(&self) -> Catalogs {
        Catalogs::new(
            self.models.destinations.catalog(),
            self.models.offers.catalog(),
        )
    }

    fn handle_point_event(&mut self, id: PointId, event: PointEvent) -> Result<(), TripError> {
        if !self.presenters.contains_key(&id) {
            debug!("event for point {id} with no presenter");
            return Ok(());
        }
        if event == PointEvent::OpenEditor {
            self.destroy_new_point()?;
            for (other, presenter) in self.presenters.iter_mut() {
                if other != &id {
                    presenter.reset_view()?;
                }
            }
        }
        let action = match self.presenters.get_mut(&id) {
            Some(presenter) => presenter.handle(event)?,
            None => None,
        };
        if let Some((action, update)) = action {
            self.dispatch(action, update)?;
        }
        Ok(())
    }

    fn handle_new_point_event(&mut self, event: NewPointEvent) -> Result<(), TripError> {
        let action = match self.new_point.as_mut() {
            Some(presenter) => presenter.handle(event)?,
            None => None,
        };
        if let Some((action, update)) = action {
            self.dispatch(action, update)?;
        }
        Ok(())
    }

    fn apply_loaded(&self, points: Vec<Point>, destinations: Vec<Destination>, offers: Vec<OfferGroup>) {
        info!(
            "loaded {} points, {} destinations, {} offer groups",
            points.len(),
            destinations.len(),
            offers.len()
        );
        self.models
            .destinations
            .set_destinations(UpdateType::InitDestinations, destinations);
        self.models.offers.set_offers(UpdateType::InitOffers, offers);
        self.models.points.set_points(UpdateType::Init, points);
    }

    fn handle_model_event(&mut self, event: ModelEvent) -> Result<(), DomError> {
        let flag = match event.update {
            UpdateType::Init => Some(&mut self.loading.points),
            UpdateType::InitDestinations => Some(&mut self.loading.destinations),
            UpdateType::InitOffers => Some(&mut self.loading.offers),
            _ => None,
        };
        if let Some(flag) = flag {
            if std::mem::replace(flag, false) {
                return self.finish_loading();
            }
            // Reload after start-up: rebuild like any structural change.
            return self.rebuild();
        }

        if self.loading.is_loading() || self.load_failed {
            return Ok(());
        }
        if self.screen == MenuItem::Stats {
            return self.render_stats();
        }
        match event.update {
            UpdateType::Patch => match event.point {
                Some(point) => self.patch_point(point),
                None => self.rerender_points(),
            },
            UpdateType::Minor => self.rerender_points(),
            _ => self.rebuild(),
        }
    }

    fn finish_loading(&mut self) -> Result<(), DomError> {
        if self.loading.is_loading() {
            return Ok(());
        }
        remove_component(self.dom.as_ref(), &mut self.loading_view);
        if self.models.destinations.catalog().is_empty() || self.models.offers.catalog().is_empty() {
            warn!("destinations or offers unavailable, trip cannot be edited");
            self.load_failed = true;
            let mut error = Component::new(LoadingErrorView);
            let node = error.element(self.dom.as_ref())?;
            self.dom
                .insert(self.mounts.events, node, RenderPosition::BeforeEnd)?;
            self.loading_error = Some(error);
            return Ok(());
        }
        self.set_button_disabled(false)?;
        self.render_trip()
    }

    fn rebuild(&mut self) -> Result<(), DomError> {
        if self.loading.is_loading() || self.load_failed {
            return Ok(());
        }
        if self.screen == MenuItem::Stats {
            return self.render_stats();
        }
        self.clear_trip();
        self.set_button_disabled(false)?;
        self.render_trip()
    }

    fn render_menu(&mut self) -> Result<(), DomError> {
        let dom = self.dom.clone();
        let mut menu = Component::new(MenuView::new(self.screen));
        let mailbox = self.mailbox.clone();
        menu.bind(dom.as_ref(), None, EventKind::Click, move |event| {
            if let Some(item) = event.value.as_deref().and_then(MenuItem::from_value) {
                mailbox.post(Msg::MenuSelected(item));
            }
        })?;
        let node = menu.element(dom.as_ref())?;
        dom.insert(self.mounts.controls, node, RenderPosition::AfterBegin)?;
        self.menu = Some(menu);
        Ok(())
    }

    fn render_new_button(&mut self) -> Result<(), DomError> {
        let dom = self.dom.clone();
        let mut button = Component::new(NewButtonView::new(true));
        let mailbox = self.mailbox.clone();
        button.bind(dom.as_ref(), None, EventKind::Click, move |_| {
            mailbox.post(Msg::NewPointRequested)
        })?;
        let node = button.element(dom.as_ref())?;
        dom.insert(self.mounts.main, node, RenderPosition::BeforeEnd)?;
        self.new_button = Some(button);
        Ok(())
    }

    fn render_loading(&mut self) -> Result<(), DomError> {
        let mut loading = Component::new(LoadingView);
        let node = loading.element(self.dom.as_ref())?;
        self.dom
            .insert(self.mounts.events, node, RenderPosition::AfterBegin)?;
        self.loading_view = Some(loading);
        Ok(())
    }

    /// Render filters, info, sort bar and list for the table screen.
    fn render_trip(&mut self) -> Result<(), DomError> {
        let dom = self.dom.clone();
        let all = self.models.points.points();
        let active = self.models.filter.filter();
        let now = self.config.now();

        let mut filters = Component::new(FiltersView::new(filter_items(&all, now), active));
        let mailbox = self.mailbox.clone();
        filters.bind(dom.as_ref(), None, EventKind::Change, move |event| {
            if let Some(filter) = event.value.as_deref().and_then(FilterType::from_input_value) {
                mailbox.post(Msg::FilterChanged(filter));
            }
        })?;
        insert(dom.as_ref(), &mut filters, self.mounts.controls, RenderPosition::BeforeEnd)?;
        self.filters = Some(filters);

        let visible = self.visible_points();
        if visible.is_empty() {
            self.render_list()?;
            self.render_empty()?;
            return Ok(());
        }

        let mut info = Component::new(TripInfoView::new(&all, self.config.info_title_limit));
        insert(dom.as_ref(), &mut info, self.mounts.main, RenderPosition::AfterBegin)?;
        self.info = Some(info);

        let mut sort_bar = Component::new(SortView::new(self.sort));
        let mailbox = self.mailbox.clone();
        sort_bar.bind(dom.as_ref(), None, EventKind::Change, move |event| {
            if let Some(sort) = event.value.as_deref().and_then(SortType::from_input_value) {
                mailbox.post(Msg::SortChanged(sort));
            }
        })?;
        insert(dom.as_ref(), &mut sort_bar, self.mounts.events, RenderPosition::AfterBegin)?;
        self.sort_bar = Some(sort_bar);

        self.render_list()?;
        self.render_points(visible)
    }

    fn render_list(&mut self) -> Result<(), DomError> {
        let mut list = Component::new(ListView);
        insert(self.dom.as_ref(), &mut list, self.mounts.events, RenderPosition::BeforeEnd)?;
        self.list = Some(list);
        Ok(())
    }

    fn render_empty(&mut self) -> Result<(), DomError> {
        if self.empty.is_some() {
            return Ok(());
        }
        let mut empty = Component::new(ListEmptyView::new(self.models.filter.filter()));
        insert(self.dom.as_ref(), &mut empty, self.mounts.events, RenderPosition::AfterBegin)?;
        self.empty = Some(empty);
        Ok(())
    }

    fn render_points(&mut self, points: Vec<Point>) -> Result<(), DomError> {
        let Some(list) = self.list_node() else {
            return Ok(());
        };
        let catalogs = self.catalogs();
        for point in points {
            let mut presenter = PointPresenter::new(
                self.dom.clone(),
                list,
                self.mailbox.clone(),
                catalogs.clone(),
                self.config.date_format,
            );
            let failed = self.failed.contains(&point.id);
            let id = point.id.clone();
            presenter.init(point, failed)?;
            self.presenters.insert(id, presenter);
        }
        Ok(())
    }

    fn clear_points(&mut self) -> Result<(), DomError> {
        self.destroy_new_point()?;
        for (_, mut presenter) in self.presenters.drain() {
            presenter.destroy();
        }
        Ok(())
    }

    /// Tear down everything a major update rebuilds. Menu and new-point
    /// button stay.
    fn clear_trip(&mut self) {
        if let Some(mut new_point) = self.new_point.take() {
            new_point.destroy();
        }
        for (_, mut presenter) in self.presenters.drain() {
            presenter.destroy();
        }
        let dom = self.dom.clone();
        remove_component(dom.as_ref(), &mut self.info);
        remove_component(dom.as_ref(), &mut self.filters);
        remove_component(dom.as_ref(), &mut self.sort_bar);
        remove_component(dom.as_ref(), &mut self.list);
        remove_component(dom.as_ref(), &mut self.empty);
    }

    /// Minor update: rebuild the point list, keep the chrome. Crossing
    /// between empty and non-empty swaps the chrome, so that takes a rebuild.
    fn rerender_points(&mut self) -> Result<(), DomError> {
        let visible = self.visible_points();
        if visible.is_empty() != self.empty.is_some() {
            return self.rebuild();
        }
        self.clear_points()?;
        self.render_points(visible)
    }

    /// Patch update: re-render the one affected card.
    fn patch_point(&mut self, point: Point) -> Result<(), DomError> {
        let failed = self.failed.contains(&point.id);
        match self.presenters.get_mut(&point.id) {
            Some(presenter) => presenter.init(point, failed),
            None => {
                debug!("patch for point {} not on screen", point.id);
                Ok(())
            }
        }
    }

    fn render_stats(&mut self) -> Result<(), DomError> {
        let dom = self.dom.clone();
        remove_component(dom.as_ref(), &mut self.stats);
        let stats = TripStats::collect(&self.models.points.points());
        let mut view = Component::new(StatsView::new(stats));
        insert(dom.as_ref(), &mut view, self.mounts.events, RenderPosition::BeforeEnd)?;
        self.stats = Some(view);
        Ok(())
    }

    fn set_menu(&mut self, item: MenuItem) -> Result<(), DomError> {
        self.screen = item;
        let dom = self.dom.clone();
        if let Some(menu) = self.menu.as_mut() {
            menu.view_mut().active = item;
            menu.rerender(dom.as_ref())?;
        }
        Ok(())
    }

    fn switch_screen(&mut self, item: MenuItem) -> Result<(), DomError> {
        if item == self.screen || self.loading.is_loading() || self.load_failed {
            return Ok(());
        }
        self.set_menu(item)?;
        match item {
            MenuItem::Stats => {
                self.clear_trip();
                self.set_button_disabled(false)?;
                self.render_stats()
            }
            MenuItem::Table => {
                remove_component(self.dom.as_ref(), &mut self.stats);
                self.sort = SortType::Default;
                self.render_trip()
            }
        }
    }

    fn change_sort(&mut self, sort: SortType) -> Result<(), DomError> {
        if sort == self.sort {
            return Ok(());
        }
        self.sort = sort;
        if let Some(bar) = self.sort_bar.as_mut() {
            bar.view_mut().active = sort;
        }
        self.rerender_points()
    }

    /// Bring the table into the default view, then open the form once the
    /// rebuild has run.
    fn request_new_point(&mut self) -> Result<(), TripError> {
        if self.loading.is_loading() || self.load_failed || self.new_point.is_some() {
            return Ok(());
        }
        let mut rebuild = false;
        if self.screen == MenuItem::Stats {
            remove_component(self.dom.as_ref(), &mut self.stats);
            self.set_menu(MenuItem::Table)?;
            rebuild = true;
        }
        if self.sort != SortType::Default {
            self.sort = SortType::Default;
            rebuild = true;
        }
        if self.models.filter.filter() != FilterType::Everything {
            self.models
                .filter
                .set_filter(UpdateType::Major, FilterType::Everything);
        } else if rebuild {
            self.clear_trip();
            self.render_trip()?;
        }
        self.mailbox.post(Msg::OpenNewPoint);
        Ok(())
    }

    fn open_new_point(&mut self) -> Result<(), DomError> {
        if self.new_point.is_some() || self.screen != MenuItem::Table {
            return Ok(());
        }
        let Some(list) = self.list_node() else {
            return Ok(());
        };
        for presenter in self.presenters.values_mut() {
            presenter.reset_view()?;
        }
        remove_component(self.dom.as_ref(), &mut self.empty);
        self.set_button_disabled(true)?;

        let mut presenter = NewPointPresenter::new(self.dom.clone(), list, self.mailbox.clone());
        let blank = Point::blank(self.config.now());
        presenter.init(blank, self.catalogs(), self.config.date_format)?;
        self.new_point = Some(presenter);
        Ok(())
    }

    fn destroy_new_point(&mut self) -> Result<(), DomError> {
        let Some(mut presenter) = self.new_point.take() else {
            return Ok(());
        };
        presenter.destroy();
        self.set_button_disabled(false)?;
        if self.screen == MenuItem::Table && self.list.is_some() && self.visible_points().is_empty() {
            self.render_empty()?;
        }
        Ok(())
    }

    fn set_button_disabled(&mut self, disabled: bool) -> Result<(), DomError> {
        let dom = self.dom.clone();
        if let Some(button) = self.new_button.as_mut() {
            if button.view().disabled != disabled {
                button.view_mut().disabled = disabled;
                button.rerender(dom.as_ref())?;
            }
        }
        Ok(())
    }

    fn reconcile(&mut self, outcome: SyncOutcome) -> Result<(), TripError> {
        let points = self.models.points.clone();
        match outcome {
            SyncOutcome::Updated { prior, result } => {
                let Some(current) = points.get(&prior.id) else {
                    debug!("point {} gone before its update synced", prior.id);
                    return Ok(());
                };
                match result {
                    Ok(canonical) => {
                        if canonical != current {
                            points.update_point(change_scope(&current, &canonical), canonical)?;
                        }
                    }
                    Err(e) => {
                        warn!("update of point {} failed: {e}", prior.id);
                        self.failed.insert(prior.id.clone());
                        points.update_point(change_scope(&current, &prior), prior)?;
                    }
                }
            }
            SyncOutcome::Added { local, result } => {
                let Some(current) = points.get(&local.id) else {
                    debug!("point {} gone before its add synced", local.id);
                    return Ok(());
                };
                match result {
                    Ok(canonical) if canonical.id != local.id => {
                        points.replace_point(UpdateType::Major, &local.id, canonical)?;
                    }
                    Ok(canonical) => {
                        if canonical != current {
                            points.update_point(change_scope(&current, &canonical), canonical)?;
                        }
                    }
                    Err(e) => {
                        warn!("adding point {} failed: {e}", local.id);
                        points.delete_point(UpdateType::Major, &local.id)?;
                    }
                }
            }
            SyncOutcome::Deleted { prior, result } => match result {
                Ok(()) => debug!("point {} deleted", prior.id),
                Err(e) => {
                    warn!("deleting point {} failed: {e}", prior.id);
                    if points.get(&prior.id).is_none() {
                        self.failed.insert(prior.id.clone());
                        points.add_point(UpdateType::Major, prior)?;
                    }
                }
            },
        }
        Ok(())
    }
}

fn change_scope(before: &Point, after: &Point) -> UpdateType {
    if is_major_change(before, after) {
        UpdateType::Major
    } else {
        UpdateType::Patch
    }
}

fn insert<T: Template>(
    dom: &dyn Dom,
    component: &mut Component<T>,
    container: NodeId,
    place: RenderPosition,
) -> Result<(), DomError> {
    let node = component.element(dom)?;
    dom.insert(container, node, place)
}
