use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::catalog::OfferGroup;
use crate::error::SyncError;
use crate::point::{Destination, Point, PointId};

/// Runs a backend call to completion on the local executor.
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// Remote trip API.
///
/// Calls are issued after the model was already changed optimistically;
/// the returned point is the server's canonical copy.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn points(&self) -> Result<Vec<Point>, SyncError>;

    async fn destinations(&self) -> Result<Vec<Destination>, SyncError>;

    async fn offers(&self) -> Result<Vec<OfferGroup>, SyncError>;

    async fn update_point(&self, point: Point) -> Result<Point, SyncError>;

    async fn add_point(&self, point: Point) -> Result<Point, SyncError>;

    async fn delete_point(&self, id: PointId) -> Result<(), SyncError>;

    /// Human-readable backend name for logs.
    fn backend_name(&self) -> &str;
}

/// Backend that keeps everything in memory and answers immediately.
#[derive(Default)]
pub struct MemoryBackend {
    points: RefCell<Vec<Point>>,
    destinations: Vec<Destination>,
    offers: Vec<OfferGroup>,
    failing: Cell<bool>,
    server_ids: Cell<bool>,
    next_id: Cell<u64>,
    calls: Cell<usize>,
}

impl MemoryBackend {
    pub fn new(points: Vec<Point>, destinations: Vec<Destination>, offers: Vec<OfferGroup>) -> Self {
        Self {
            points: RefCell::new(points),
            destinations,
            offers,
            ..Default::default()
        }
    }

    /// Make every following call fail with `SyncError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Assign `srv-N` ids to added points instead of keeping the client's.
    pub fn with_server_ids(self) -> Self {
        self.server_ids.set(true);
        self
    }

    /// Server-side copy of the stored points.
    pub fn stored(&self) -> Vec<Point> {
        self.points.borrow().clone()
    }

    /// Number of calls received, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    fn check(&self) -> Result<(), SyncError> {
        self.calls.set(self.calls.get() + 1);
        if self.failing.get() {
            return Err(SyncError::Unavailable("memory backend set to fail".into()));
        }
        Ok(())
    }
}

impl Backend for MemoryBackend {
    async fn points(&self) -> Result<Vec<Point>, SyncError> {
        self.check()?;
        Ok(self.stored())
    }

    async fn destinations(&self) -> Result<Vec<Destination>, SyncError> {
        self.check()?;
        Ok(self.destinations.clone())
    }

    async fn offers(&self) -> Result<Vec<OfferGroup>, SyncError> {
        self.check()?;
        Ok(self.offers.clone())
    }

    async fn update_point(&self, point: Point) -> Result<Point, SyncError> {
        self.check()?;
        let mut points = self.points.borrow_mut();
        let slot = points
            .iter_mut()
            .find(|p| p.id == point.id)
            .ok_or_else(|| SyncError::NotFound(point.id.clone()))?;
        *slot = point.clone();
        Ok(point)
    }

    async fn add_point(&self, mut point: Point) -> Result<Point, SyncError> {
        self.check()?;
        if self.server_ids.get() {
            let n = self.next_id.get() + 1;
            self.next_id.set(n);
            point.id = PointId(format!("srv-{n}"));
        }
        self.points.borrow_mut().push(point.clone());
        Ok(point)
    }

    async fn delete_point(&self, id: PointId) -> Result<(), SyncError> {
        self.check()?;
        let mut points = self.points.borrow_mut();
        let before = points.len();
        points.retain(|p| p.id != id);
        if points.len() == before {
            return Err(SyncError::NotFound(id));
        }
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::PointType;
    use chrono::{TimeZone, Utc};
    use futures::executor::block_on;

    fn point(id: &str) -> Point {
        let start = Utc.with_ymd_and_hms(2021, 3, 1, 12, 0, 0).unwrap();
        Point {
            id: PointId(id.into()),
            kind: PointType::Drive,
            destination: Destination::default(),
            offers: vec![],
            price: 10,
            start_time: start,
            end_time: start,
            is_favorite: false,
        }
    }

    #[test]
    fn test_crud_round() {
        let backend = MemoryBackend::new(vec![point("a")], vec![], vec![]);
        block_on(async {
            let mut changed = point("a");
            changed.price = 99;
            assert_eq!(backend.update_point(changed).await.unwrap().price, 99);
            backend.add_point(point("b")).await.unwrap();
            backend.delete_point(PointId("a".into())).await.unwrap();
            assert_eq!(
                backend.delete_point(PointId("a".into())).await,
                Err(SyncError::NotFound(PointId("a".into())))
            );
        });
        assert_eq!(backend.stored(), vec![point("b")]);
        assert_eq!(backend.call_count(), 4);
    }

    #[test]
    fn test_server_ids_and_failure() {
        let backend = MemoryBackend::default().with_server_ids();
        let added = block_on(backend.add_point(point("local"))).unwrap();
        assert_eq!(added.id.0, "srv-1");

        backend.set_failing(true);
        assert!(matches!(
            block_on(backend.points()),
            Err(SyncError::Unavailable(_))
        ));
    }
}
