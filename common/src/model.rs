//! In-memory models. Every mutation updates state, releases the borrow and
//! then notifies observers synchronously.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::catalog::{DestinationCatalog, OfferCatalog, OfferGroup};
use crate::error::ModelError;
use crate::filter::FilterType;
use crate::observer::{Observable, SubscriptionId};
use crate::point::{update_item, Destination, Point, PointId};
use crate::update::{ModelEvent, UpdateType};

/// Anything a presenter can subscribe to.
pub trait Observed {
    fn observable(&self) -> &Observable<ModelEvent>;

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observable().unsubscribe(id)
    }
}

#[derive(Default)]
pub struct PointsModel {
    points: RefCell<Vec<Point>>,
    observers: Observable<ModelEvent>,
}

impl PointsModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all points in insertion order.
    pub fn points(&self) -> Vec<Point> {
        self.points.borrow().clone()
    }

    pub fn get(&self, id: &PointId) -> Option<Point> {
        self.points.borrow().iter().find(|p| &p.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.points.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.borrow().is_empty()
    }

    pub fn set_points(&self, update: UpdateType, points: Vec<Point>) {
        *self.points.borrow_mut() = points;
        self.observers.notify(&ModelEvent::new(update, None));
    }

    pub fn update_point(&self, update: UpdateType, point: Point) -> Result<(), ModelError> {
        {
            let mut points = self.points.borrow_mut();
            *points = update_item(&points, point.clone())
                .ok_or_else(|| ModelError::UnknownPoint(point.id.clone()))?;
        }
        self.observers.notify(&ModelEvent::new(update, Some(point)));
        Ok(())
    }

    /// Replace the point stored under `id`; the replacement may carry a new id
    /// (server-assigned on add).
    pub fn replace_point(
        &self,
        update: UpdateType,
        id: &PointId,
        point: Point,
    ) -> Result<(), ModelError> {
        {
            let mut points = self.points.borrow_mut();
            if &point.id != id && points.iter().any(|p| p.id == point.id) {
                return Err(ModelError::DuplicatePoint(point.id));
            }
            let slot = points
                .iter_mut()
                .find(|p| &p.id == id)
                .ok_or_else(|| ModelError::UnknownPoint(id.clone()))?;
            *slot = point.clone();
        }
        self.observers.notify(&ModelEvent::new(update, Some(point)));
        Ok(())
    }

    pub fn add_point(&self, update: UpdateType, point: Point) -> Result<(), ModelError> {
        {
            let mut points = self.points.borrow_mut();
            if points.iter().any(|p| p.id == point.id) {
                return Err(ModelError::DuplicatePoint(point.id));
            }
            points.push(point.clone());
        }
        self.observers.notify(&ModelEvent::new(update, Some(point)));
        Ok(())
    }

    /// Removes and returns the point.
    pub fn delete_point(&self, update: UpdateType, id: &PointId) -> Result<Point, ModelError> {
        let removed = {
            let mut points = self.points.borrow_mut();
            let index = points
                .iter()
                .position(|p| &p.id == id)
                .ok_or_else(|| ModelError::UnknownPoint(id.clone()))?;
            points.remove(index)
        };
        self.observers.notify(&ModelEvent::new(update, None));
        Ok(removed)
    }
}

impl Observed for PointsModel {
    fn observable(&self) -> &Observable<ModelEvent> {
        &self.observers
    }
}

#[derive(Default)]
pub struct FilterModel {
    active: Cell<FilterType>,
    observers: Observable<ModelEvent>,
}

impl FilterModel {
    pub fn new(initial: FilterType) -> Self {
        Self {
            active: Cell::new(initial),
            observers: Observable::new(),
        }
    }

    pub fn filter(&self) -> FilterType {
        self.active.get()
    }

    pub fn set_filter(&self, update: UpdateType, filter: FilterType) {
        self.active.set(filter);
        self.observers.notify(&ModelEvent::new(update, None));
    }
}

impl Observed for FilterModel {
    fn observable(&self) -> &Observable<ModelEvent> {
        &self.observers
    }
}

#[derive(Default)]
pub struct DestinationsModel {
    catalog: RefCell<Rc<DestinationCatalog>>,
    observers: Observable<ModelEvent>,
}

impl DestinationsModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> Rc<DestinationCatalog> {
        self.catalog.borrow().clone()
    }

    pub fn set_destinations(&self, update: UpdateType, destinations: Vec<Destination>) {
        *self.catalog.borrow_mut() = Rc::new(DestinationCatalog::new(destinations));
        self.observers.notify(&ModelEvent::new(update, None));
    }
}

impl Observed for DestinationsModel {
    fn observable(&self) -> &Observable<ModelEvent> {
        &self.observers
    }
}

#[derive(Default)]
pub struct OffersModel {
    catalog: RefCell<Rc<OfferCatalog>>,
    observers: Observable<ModelEvent>,
}

impl OffersModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> Rc<OfferCatalog> {
        self.catalog.borrow().clone()
    }

    pub fn set_offers(&self, update: UpdateType, groups: Vec<OfferGroup>) {
        *self.catalog.borrow_mut() = Rc::new(OfferCatalog::from_groups(groups));
        self.observers.notify(&ModelEvent::new(update, None));
    }
}

impl Observed for OffersModel {
    fn observable(&self) -> &Observable<ModelEvent> {
        &self.observers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{Destination, PointType};
    use chrono::{TimeZone, Utc};

    fn point(id: &str, price: u32) -> Point {
        let start = Utc.with_ymd_and_hms(2021, 2, 1, 8, 0, 0).unwrap();
        Point {
            id: PointId(id.into()),
            kind: PointType::Ship,
            destination: Destination::default(),
            offers: vec![],
            price,
            start_time: start,
            end_time: start,
            is_favorite: false,
        }
    }

    fn recorder(model: &impl Observed) -> Rc<RefCell<Vec<ModelEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        model
            .observable()
            .subscribe(move |e: &ModelEvent| sink.borrow_mut().push(e.clone()));
        events
    }

    #[test]
    fn test_update_replaces_by_id_then_notifies() {
        let model = PointsModel::new();
        model.set_points(UpdateType::Init, vec![point("a", 1), point("b", 2)]);
        let events = recorder(&model);

        model.update_point(UpdateType::Patch, point("b", 20)).unwrap();

        assert_eq!(model.get(&PointId("b".into())).unwrap().price, 20);
        assert_eq!(model.points(), vec![point("a", 1), point("b", 20)]);
        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].update, UpdateType::Patch);
        assert_eq!(events[0].point.as_ref().unwrap().price, 20);
    }

    #[test]
    fn test_unknown_id_is_reported_noop() {
        let model = PointsModel::new();
        model.set_points(UpdateType::Init, vec![point("a", 1)]);
        let events = recorder(&model);

        assert_eq!(
            model.update_point(UpdateType::Patch, point("zzz", 5)),
            Err(ModelError::UnknownPoint(PointId("zzz".into())))
        );
        assert_eq!(
            model.delete_point(UpdateType::Major, &PointId("zzz".into())),
            Err(ModelError::UnknownPoint(PointId("zzz".into())))
        );
        assert!(events.borrow().is_empty());
        assert_eq!(model.points(), vec![point("a", 1)]);
    }

    #[test]
    fn test_add_and_delete() {
        let model = PointsModel::new();
        model.add_point(UpdateType::Major, point("a", 1)).unwrap();
        assert_eq!(
            model.add_point(UpdateType::Major, point("a", 1)),
            Err(ModelError::DuplicatePoint(PointId("a".into())))
        );
        let removed = model.delete_point(UpdateType::Major, &PointId("a".into())).unwrap();
        assert_eq!(removed.id.0, "a");
        assert!(model.is_empty());
    }

    #[test]
    fn test_replace_point_swaps_id() {
        let model = PointsModel::new();
        model.set_points(UpdateType::Init, vec![point("local", 1), point("other", 1)]);

        model
            .replace_point(UpdateType::Patch, &PointId("local".into()), point("server-7", 1))
            .unwrap();
        assert!(model.get(&PointId("server-7".into())).is_some());
        assert!(model.get(&PointId("local".into())).is_none());

        assert_eq!(
            model.replace_point(UpdateType::Patch, &PointId("server-7".into()), point("other", 1)),
            Err(ModelError::DuplicatePoint(PointId("other".into())))
        );
    }

    #[test]
    fn test_observer_can_read_model_during_notify() {
        let model = Rc::new(PointsModel::new());
        let seen = Rc::new(Cell::new(0));
        let reader = model.clone();
        let count = seen.clone();
        model.observable().subscribe(move |_| count.set(reader.len()));

        model.add_point(UpdateType::Major, point("a", 1)).unwrap();
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_filter_and_catalog_models_notify() {
        let filter = FilterModel::new(FilterType::Everything);
        let filter_events = recorder(&filter);
        filter.set_filter(UpdateType::Major, FilterType::Past);
        assert_eq!(filter.filter(), FilterType::Past);
        assert_eq!(filter_events.borrow()[0].update, UpdateType::Major);

        let destinations = DestinationsModel::new();
        let dest_events = recorder(&destinations);
        destinations.set_destinations(
            UpdateType::InitDestinations,
            vec![Destination {
                name: "Oslo".into(),
                ..Default::default()
            }],
        );
        assert!(destinations.catalog().find("Oslo").is_some());
        assert_eq!(dest_events.borrow()[0].update, UpdateType::InitDestinations);

        let offers = OffersModel::new();
        let offer_events = recorder(&offers);
        offers.set_offers(UpdateType::InitOffers, vec![]);
        assert!(offers.catalog().is_empty());
        assert_eq!(offer_events.borrow()[0].update, UpdateType::InitOffers);
    }
}
