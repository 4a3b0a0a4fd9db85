use super::Template;
use crate::format::{escape_html, format_clock, format_day, format_duration};
use crate::point::Point;

/// Read-only card for one point.
pub struct PointView {
    point: Point,
    sync_failed: bool,
}

impl PointView {
    pub const ROLLUP: &'static str = ".event__rollup-btn";
    pub const FAVORITE: &'static str = ".event__favorite-btn";

    pub fn new(point: Point, sync_failed: bool) -> Self {
        Self { point, sync_failed }
    }

    pub fn point(&self) -> &Point {
        &self.point
    }
}

impl Template for PointView {
    fn template(&self) -> String {
        let point = &self.point;
        let start = point.start_time;
        let end = point.end_time;

        let offers: String = point
            .offers
            .iter()
            .map(|offer| {
                format!(
                    "<li class=\"event__offer\">\
                     <span class=\"event__offer-title\">{}</span>\
                     &plus;&nbsp;&euro;&nbsp;<span class=\"event__offer-price\">{}</span></li>",
                    escape_html(&offer.title),
                    offer.price
                )
            })
            .collect();

        let favorite = if point.is_favorite {
            "event__favorite-btn event__favorite-btn--active"
        } else {
            "event__favorite-btn"
        };
        let failed = if self.sync_failed {
            "<p class=\"event__sync-error\">Changes were not saved</p>"
        } else {
            ""
        };
        let state = if self.sync_failed { " event--sync-failed" } else { "" };

        format!(
            "<li class=\"trip-events__item\" data-point-id=\"{id}\">\
             <div class=\"event{state}\">\
             <time class=\"event__date\" datetime=\"{start_iso}\">{day}</time>\
             <div class=\"event__type\">\
             <img class=\"event__type-icon\" width=\"42\" height=\"42\" src=\"img/icons/{slug}.png\" alt=\"Event type icon\">\
             </div>\
             <h3 class=\"event__title\">{label} {destination}</h3>\
             <div class=\"event__schedule\"><p class=\"event__time\">\
             <time class=\"event__start-time\" datetime=\"{start_iso}\">{start_clock}</time>\
             &mdash;\
             <time class=\"event__end-time\" datetime=\"{end_iso}\">{end_clock}</time>\
             </p><p class=\"event__duration\">{duration}</p></div>\
             <p class=\"event__price\">&euro;&nbsp;<span class=\"event__price-value\">{price}</span></p>\
             <h4 class=\"visually-hidden\">Offers:</h4>\
             <ul class=\"event__selected-offers\">{offers}</ul>\
             {failed}\
             <button class=\"{favorite}\" type=\"button\"><span class=\"visually-hidden\">Add to favorite</span></button>\
             <button class=\"event__rollup-btn\" type=\"button\"><span class=\"visually-hidden\">Open event</span></button>\
             </div></li>",
            id = escape_html(&point.id.0),
            start_iso = start.to_rfc3339(),
            end_iso = end.to_rfc3339(),
            day = format_day(start),
            slug = point.kind.slug(),
            label = point.kind.label(),
            destination = escape_html(&point.destination.name),
            start_clock = format_clock(start),
            end_clock = format_clock(end),
            duration = format_duration(point.duration()),
            price = point.price,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{Destination, Offer, PointId, PointType};
    use chrono::{Duration, TimeZone, Utc};

    fn point() -> Point {
        let start = Utc.with_ymd_and_hms(2021, 3, 18, 10, 30, 0).unwrap();
        Point {
            id: PointId("p-1".into()),
            kind: PointType::CheckIn,
            destination: Destination {
                name: "Chamonix <Alps>".into(),
                ..Default::default()
            },
            offers: vec![Offer {
                id: 3,
                title: "Add breakfast".into(),
                price: 50,
            }],
            price: 160,
            start_time: start,
            end_time: start + Duration::minutes(95),
            is_favorite: true,
        }
    }

    #[test]
    fn test_card_markup() {
        let markup = PointView::new(point(), false).template();
        assert!(markup.contains("data-point-id=\"p-1\""));
        assert!(markup.contains("Check-in Chamonix &lt;Alps&gt;"));
        assert!(markup.contains(">Mar 18</time>"));
        assert!(markup.contains(">10:30</time>"));
        assert!(markup.contains(">12:05</time>"));
        assert!(markup.contains("01H 35M"));
        assert!(markup.contains("event__favorite-btn--active"));
        assert!(markup.contains("Add breakfast"));
        assert!(markup.contains("src=\"img/icons/check-in.png\""));
        assert!(!markup.contains("event__sync-error"));
    }

    #[test]
    fn test_sync_failure_is_flagged() {
        let markup = PointView::new(point(), true).template();
        assert!(markup.contains("event--sync-failed"));
        assert!(markup.contains("Changes were not saved"));
    }
}
