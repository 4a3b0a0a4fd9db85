use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::point::Point;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterType {
    #[default]
    Everything,
    Future,
    Past,
}

impl FilterType {
    pub fn all() -> &'static [FilterType] {
        &[FilterType::Everything, FilterType::Future, FilterType::Past]
    }

    /// Value of the radio input in the filter form.
    pub fn input_value(self) -> &'static str {
        match self {
            FilterType::Everything => "everything",
            FilterType::Future => "future",
            FilterType::Past => "past",
        }
    }

    pub fn from_input_value(value: &str) -> Option<FilterType> {
        FilterType::all()
            .iter()
            .copied()
            .find(|f| f.input_value() == value)
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterType::Everything => "Everything",
            FilterType::Future => "Future",
            FilterType::Past => "Past",
        }
    }

    /// Message shown when nothing passes this filter.
    pub fn empty_message(self) -> &'static str {
        match self {
            FilterType::Everything => "Click New Event to create your first point",
            FilterType::Future => "There are no future events now",
            FilterType::Past => "There are no past events now",
        }
    }

    pub fn matches(self, point: &Point, now: DateTime<Utc>) -> bool {
        match self {
            FilterType::Everything => true,
            FilterType::Future => point.start_time >= now,
            FilterType::Past => point.end_time < now,
        }
    }

    pub fn apply(self, points: &[Point], now: DateTime<Utc>) -> Vec<Point> {
        points
            .iter()
            .filter(|p| self.matches(p, now))
            .cloned()
            .collect()
    }
}

/// One entry of the filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterItem {
    pub filter: FilterType,
    pub count: usize,
}

/// Filter bar entries with the number of points each would show.
pub fn filter_items(points: &[Point], now: DateTime<Utc>) -> Vec<FilterItem> {
    FilterType::all()
        .iter()
        .map(|&filter| FilterItem {
            filter,
            count: points.iter().filter(|p| filter.matches(p, now)).count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{Destination, PointId, PointType};
    use chrono::{Duration, TimeZone};

    fn point(id: &str, start_offset_h: i64, len_h: i64, now: DateTime<Utc>) -> Point {
        let start = now + Duration::hours(start_offset_h);
        Point {
            id: PointId(id.into()),
            kind: PointType::Bus,
            destination: Destination::default(),
            offers: vec![],
            price: 10,
            start_time: start,
            end_time: start + Duration::hours(len_h),
            is_favorite: false,
        }
    }

    #[test]
    fn test_filters_split_by_now() {
        let now = Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap();
        let points = vec![
            point("past", -10, 2, now),
            point("ongoing", -1, 2, now),
            point("future", 5, 2, now),
        ];

        let ids = |f: FilterType| -> Vec<String> {
            f.apply(&points, now).into_iter().map(|p| p.id.0).collect()
        };
        assert_eq!(ids(FilterType::Everything), vec!["past", "ongoing", "future"]);
        assert_eq!(ids(FilterType::Future), vec!["future"]);
        assert_eq!(ids(FilterType::Past), vec!["past"]);
    }

    #[test]
    fn test_filter_item_counts() {
        let now = Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap();
        let items = filter_items(&[point("a", 3, 1, now)], now);
        assert_eq!(
            items,
            vec![
                FilterItem { filter: FilterType::Everything, count: 1 },
                FilterItem { filter: FilterType::Future, count: 1 },
                FilterItem { filter: FilterType::Past, count: 0 },
            ]
        );
    }

    #[test]
    fn test_input_values() {
        for filter in FilterType::all() {
            assert_eq!(FilterType::from_input_value(filter.input_value()), Some(*filter));
        }
        assert_eq!(FilterType::from_input_value("tomorrow"), None);
    }
}
