use std::collections::BTreeMap;

use chrono::Duration;

use crate::point::{Point, PointType};

/// Per-type aggregates behind the statistics screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeStat<T> {
    pub kind: PointType,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TripStats {
    /// Sum of base prices, most expensive type first.
    pub money: Vec<TypeStat<u64>>,
    /// Number of points, most frequent type first.
    pub count: Vec<TypeStat<usize>>,
    /// Total time spent, longest first.
    pub time_spent: Vec<TypeStat<Duration>>,
}

impl TripStats {
    pub fn collect(points: &[Point]) -> Self {
        let mut money: BTreeMap<PointType, u64> = BTreeMap::new();
        let mut count: BTreeMap<PointType, usize> = BTreeMap::new();
        let mut time: BTreeMap<PointType, Duration> = BTreeMap::new();

        for point in points {
            *money.entry(point.kind).or_default() += u64::from(point.price);
            *count.entry(point.kind).or_default() += 1;
            let spent = time.entry(point.kind).or_insert_with(Duration::zero);
            *spent = *spent + point.duration();
        }

        Self {
            money: descending(money),
            count: descending(count),
            time_spent: descending(time),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count.is_empty()
    }
}

fn descending<T: Ord + Copy>(totals: BTreeMap<PointType, T>) -> Vec<TypeStat<T>> {
    let mut stats: Vec<TypeStat<T>> = totals
        .into_iter()
        .map(|(kind, value)| TypeStat { kind, value })
        .collect();
    // Stable: equal values keep type order.
    stats.sort_by(|a, b| b.value.cmp(&a.value));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{Destination, PointId};
    use chrono::{TimeZone, Utc};

    fn point(kind: PointType, price: u32, hours: i64) -> Point {
        let start = Utc.with_ymd_and_hms(2021, 5, 1, 8, 0, 0).unwrap();
        Point {
            id: PointId::generate(),
            kind,
            destination: Destination::default(),
            offers: vec![],
            price,
            start_time: start,
            end_time: start + Duration::hours(hours),
            is_favorite: false,
        }
    }

    #[test]
    fn test_collect_groups_and_orders() {
        let stats = TripStats::collect(&[
            point(PointType::Taxi, 20, 1),
            point(PointType::Flight, 400, 3),
            point(PointType::Taxi, 30, 2),
        ]);

        assert_eq!(
            stats.money,
            vec![
                TypeStat { kind: PointType::Flight, value: 400 },
                TypeStat { kind: PointType::Taxi, value: 50 },
            ]
        );
        assert_eq!(stats.count[0], TypeStat { kind: PointType::Taxi, value: 2 });
        assert_eq!(stats.time_spent[0].value, Duration::hours(3));
        assert_eq!(stats.time_spent[1].value, Duration::hours(3));
        // Tie on time keeps type order (Taxi before Flight).
        assert_eq!(stats.time_spent[0].kind, PointType::Taxi);
    }

    #[test]
    fn test_empty_trip() {
        assert!(TripStats::collect(&[]).is_empty());
    }
}
