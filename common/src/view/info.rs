use super::Template;
use crate::format::{trip_cost, trip_dates, trip_title};
use crate::point::Point;
use crate::sort::SortType;

/// Route, dates and total cost of the whole trip.
pub struct TripInfoView {
    title: String,
    dates: String,
    cost: u64,
}

impl TripInfoView {
    pub fn new(points: &[Point], title_limit: usize) -> Self {
        let mut chronological = points.to_vec();
        SortType::Default.sort(&mut chronological);
        Self {
            title: trip_title(&chronological, title_limit),
            dates: trip_dates(&chronological),
            cost: trip_cost(&chronological),
        }
    }
}

impl Template for TripInfoView {
    fn template(&self) -> String {
        format!(
            "<section class=\"trip-main__trip-info trip-info\">\
             <div class=\"trip-info__main\">\
             <h1 class=\"trip-info__title\">{}</h1>\
             <p class=\"trip-info__dates\">{}</p>\
             </div>\
             <p class=\"trip-info__cost\">Total: &euro;&nbsp;<span class=\"trip-info__cost-value\">{}</span></p>\
             </section>",
            self.title, self.dates, self.cost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{Destination, Offer, PointId, PointType};
    use chrono::{Duration, TimeZone, Utc};

    fn point(name: &str, day: u32, price: u32, offers: Vec<Offer>) -> Point {
        let start = Utc.with_ymd_and_hms(2021, 3, day, 12, 0, 0).unwrap();
        Point {
            id: PointId(name.into()),
            kind: PointType::Flight,
            destination: Destination {
                name: name.into(),
                ..Default::default()
            },
            offers,
            price,
            start_time: start,
            end_time: start + Duration::hours(2),
            is_favorite: false,
        }
    }

    #[test]
    fn test_info_uses_chronological_route_and_full_cost() {
        let extra = Offer {
            id: 1,
            title: "Add meal".into(),
            price: 15,
        };
        let view = TripInfoView::new(
            &[point("Geneva", 20, 100, vec![]), point("Amsterdam", 18, 50, vec![extra])],
            3,
        );
        let markup = view.template();
        assert!(markup.contains("Amsterdam &mdash; Geneva"));
        assert!(markup.contains("MAR 18&nbsp;&mdash;&nbsp;20"));
        assert!(markup.contains("<span class=\"trip-info__cost-value\">165</span>"));
    }
}
