//! In-browser stand-in for the trip server.
//!
//! Wraps [`MemoryBackend`] with generated data, a fixed delay on every call
//! and a configurable chance of rejecting writes, so the optimistic update
//! and rollback paths can be exercised without a network.

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info};

use trip_common::backend::{Backend, MemoryBackend};
use trip_common::catalog::OfferGroup;
use trip_common::error::SyncError;
use trip_common::mock;
use trip_common::point::{Destination, Point, PointId};

use super::config::UiConfig;

pub struct MockBackend {
    inner: MemoryBackend,
    #[cfg_attr(not(target_family = "wasm"), allow(dead_code))]
    latency_ms: u32,
    failure_rate: f64,
}

impl MockBackend {
    pub fn new(config: &UiConfig) -> Self {
        let mut rng = rand::thread_rng();
        let destinations = mock::destinations(&mut rng);
        let offers = mock::offers(&mut rng);
        let points = mock::points(&mut rng, config.point_count, Utc::now(), &destinations, &offers);
        info!(
            points = points.len(),
            destinations = destinations.len(),
            latency_ms = config.latency_ms,
            failure_rate = config.failure_rate,
            "mock backend ready"
        );
        Self {
            inner: MemoryBackend::new(points, destinations, offers),
            latency_ms: config.latency_ms,
            failure_rate: config.failure_rate,
        }
    }

    async fn delay(&self) {
        #[cfg(target_family = "wasm")]
        if self.latency_ms > 0 {
            gloo_timers::future::TimeoutFuture::new(self.latency_ms).await;
        }
    }

    fn roll(&self, call: &str) -> Result<(), SyncError> {
        if self.failure_rate > 0.0 && rand::thread_rng().gen_bool(self.failure_rate) {
            debug!("mock backend rejecting {call}");
            return Err(SyncError::Unavailable(format!("simulated failure on {call}")));
        }
        Ok(())
    }
}

impl Backend for MockBackend {
    async fn points(&self) -> Result<Vec<Point>, SyncError> {
        self.delay().await;
        self.inner.points().await
    }

    async fn destinations(&self) -> Result<Vec<Destination>, SyncError> {
        self.delay().await;
        self.inner.destinations().await
    }

    async fn offers(&self) -> Result<Vec<OfferGroup>, SyncError> {
        self.delay().await;
        self.inner.offers().await
    }

    async fn update_point(&self, point: Point) -> Result<Point, SyncError> {
        self.delay().await;
        self.roll("update")?;
        self.inner.update_point(point).await
    }

    async fn add_point(&self, point: Point) -> Result<Point, SyncError> {
        self.delay().await;
        self.roll("add")?;
        self.inner.add_point(point).await
    }

    async fn delete_point(&self, id: PointId) -> Result<(), SyncError> {
        self.delay().await;
        self.roll("delete")?;
        self.inner.delete_point(id).await
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn config(failure_rate: f64) -> UiConfig {
        UiConfig {
            point_count: 3,
            latency_ms: 0,
            failure_rate,
            ..UiConfig::default()
        }
    }

    #[test]
    fn test_serves_generated_trip() {
        let backend = MockBackend::new(&config(0.0));
        let points = block_on(backend.points()).unwrap();
        assert_eq!(points.len(), 3);
        assert!(!block_on(backend.destinations()).unwrap().is_empty());
        assert!(!block_on(backend.offers()).unwrap().is_empty());
    }

    #[test]
    fn test_certain_failure_rejects_writes_only() {
        let backend = MockBackend::new(&config(1.0));
        let points = block_on(backend.points()).unwrap();
        let first = points[0].clone();
        assert!(matches!(
            block_on(backend.update_point(first.clone())),
            Err(SyncError::Unavailable(_))
        ));
        assert!(block_on(backend.delete_point(first.id)).is_err());
        assert_eq!(block_on(backend.points()).unwrap().len(), 3);
    }
}
