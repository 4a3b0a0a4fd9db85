use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::FilterType;
use crate::point::Point;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortType {
    /// Chronological by start time.
    #[default]
    Default,
    /// Longest first.
    Time,
    /// Most expensive first.
    Price,
}

impl SortType {
    pub fn all() -> &'static [SortType] {
        &[SortType::Default, SortType::Time, SortType::Price]
    }

    pub fn input_value(self) -> &'static str {
        match self {
            SortType::Default => "sort-day",
            SortType::Time => "sort-time",
            SortType::Price => "sort-price",
        }
    }

    pub fn from_input_value(value: &str) -> Option<SortType> {
        SortType::all().iter().copied().find(|s| s.input_value() == value)
    }

    pub fn label(self) -> &'static str {
        match self {
            SortType::Default => "Day",
            SortType::Time => "Time",
            SortType::Price => "Price",
        }
    }

    pub fn compare(self, a: &Point, b: &Point) -> Ordering {
        match self {
            SortType::Default => by_date(a, b),
            SortType::Time => by_time(a, b),
            SortType::Price => by_price(a, b),
        }
    }

    /// Stable sort in place.
    pub fn sort(self, points: &mut [Point]) {
        points.sort_by(|a, b| self.compare(a, b));
    }
}

pub fn by_date(a: &Point, b: &Point) -> Ordering {
    a.start_time.cmp(&b.start_time)
}

pub fn by_time(a: &Point, b: &Point) -> Ordering {
    b.duration().cmp(&a.duration())
}

pub fn by_price(a: &Point, b: &Point) -> Ordering {
    b.price.cmp(&a.price)
}

/// The list the trip screen shows: filter first, then sort.
///
/// Always computed from the full point set; the input is never touched.
pub fn project_points(
    points: &[Point],
    filter: FilterType,
    sort: SortType,
    now: DateTime<Utc>,
) -> Vec<Point> {
    let mut visible = filter.apply(points, now);
    sort.sort(&mut visible);
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{Destination, PointId, PointType};
    use chrono::{Duration, TimeZone};

    fn point(id: &str, start_day: u32, hours: i64, price: u32) -> Point {
        let start = Utc.with_ymd_and_hms(2021, 3, start_day, 9, 0, 0).unwrap();
        Point {
            id: PointId(id.into()),
            kind: PointType::Train,
            destination: Destination::default(),
            offers: vec![],
            price,
            start_time: start,
            end_time: start + Duration::hours(hours),
            is_favorite: false,
        }
    }

    fn ids(points: &[Point]) -> Vec<&str> {
        points.iter().map(|p| p.id.0.as_str()).collect()
    }

    #[test]
    fn test_default_projection_is_chronological_permutation() {
        let points = vec![
            point("c", 20, 1, 5),
            point("a", 2, 3, 50),
            point("d", 28, 2, 1),
            point("b", 9, 5, 500),
        ];
        let now = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let visible = project_points(&points, FilterType::Everything, SortType::Default, now);

        assert_eq!(ids(&visible), vec!["a", "b", "c", "d"]);
        assert_eq!(visible.len(), points.len());
        assert!(visible.windows(2).all(|w| w[0].start_time <= w[1].start_time));
        // Backing list untouched.
        assert_eq!(ids(&points), vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn test_time_and_price_sorts_descend() {
        let points = vec![point("short", 1, 1, 300), point("long", 2, 8, 20), point("mid", 3, 4, 90)];
        let now = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();

        let by_time = project_points(&points, FilterType::Everything, SortType::Time, now);
        assert_eq!(ids(&by_time), vec!["long", "mid", "short"]);

        let by_price = project_points(&points, FilterType::Everything, SortType::Price, now);
        assert_eq!(ids(&by_price), vec!["short", "mid", "long"]);
    }

    #[test]
    fn test_projection_filters_before_sorting() {
        let points = vec![point("late", 25, 1, 10), point("early", 3, 1, 10)];
        let now = Utc.with_ymd_and_hms(2021, 3, 10, 0, 0, 0).unwrap();
        let future = project_points(&points, FilterType::Future, SortType::Default, now);
        assert_eq!(ids(&future), vec!["late"]);
    }

    #[test]
    fn test_sort_input_values() {
        for sort in SortType::all() {
            assert_eq!(SortType::from_input_value(sort.input_value()), Some(*sort));
        }
    }
}
