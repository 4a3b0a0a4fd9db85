use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique point identifier (UUID v4, unique across sessions).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PointId(pub String);

impl PointId {
    pub fn generate() -> Self {
        PointId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transport or activity category of a point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointType {
    Taxi,
    Bus,
    Train,
    Ship,
    Transport,
    Drive,
    #[default]
    Flight,
    CheckIn,
    Sightseeing,
    Restaurant,
}

impl PointType {
    pub fn all() -> &'static [PointType] {
        &[
            PointType::Taxi,
            PointType::Bus,
            PointType::Train,
            PointType::Ship,
            PointType::Transport,
            PointType::Drive,
            PointType::Flight,
            PointType::CheckIn,
            PointType::Sightseeing,
            PointType::Restaurant,
        ]
    }

    /// Wire/form value, also used for icon file names.
    pub fn slug(self) -> &'static str {
        match self {
            PointType::Taxi => "taxi",
            PointType::Bus => "bus",
            PointType::Train => "train",
            PointType::Ship => "ship",
            PointType::Transport => "transport",
            PointType::Drive => "drive",
            PointType::Flight => "flight",
            PointType::CheckIn => "check-in",
            PointType::Sightseeing => "sightseeing",
            PointType::Restaurant => "restaurant",
        }
    }

    pub fn from_slug(slug: &str) -> Option<PointType> {
        PointType::all().iter().copied().find(|t| t.slug() == slug)
    }

    pub fn label(self) -> &'static str {
        match self {
            PointType::Taxi => "Taxi",
            PointType::Bus => "Bus",
            PointType::Train => "Train",
            PointType::Ship => "Ship",
            PointType::Transport => "Transport",
            PointType::Drive => "Drive",
            PointType::Flight => "Flight",
            PointType::CheckIn => "Check-in",
            PointType::Sightseeing => "Sightseeing",
            PointType::Restaurant => "Restaurant",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub src: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    pub description: String,
    pub pictures: Vec<Picture>,
}

/// Optional paid add-on for a point type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: u32,
    pub title: String,
    pub price: u32,
}

/// A single trip event: where, when, how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    #[serde(rename = "type")]
    pub kind: PointType,
    pub destination: Destination,
    pub offers: Vec<Offer>,
    #[serde(rename = "base_price")]
    pub price: u32,
    #[serde(rename = "date_from")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "date_to")]
    pub end_time: DateTime<Utc>,
    pub is_favorite: bool,
}

impl Point {
    /// Blank point used to seed the new-point form.
    pub fn blank(start_time: DateTime<Utc>) -> Self {
        Self {
            id: PointId::generate(),
            kind: PointType::default(),
            destination: Destination::default(),
            offers: Vec::new(),
            price: 0,
            start_time,
            end_time: start_time,
            is_favorite: false,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Base price plus every selected offer.
    pub fn total_price(&self) -> u64 {
        let offers: u64 = self.offers.iter().map(|o| u64::from(o.price)).sum();
        u64::from(self.price) + offers
    }

    pub fn has_offer(&self, offer_id: u32) -> bool {
        self.offers.iter().any(|o| o.id == offer_id)
    }
}

/// Two offer sets are equal when they have the same length and every offer
/// of `a` has an id present in `b`.
pub fn offers_equal(a: &[Offer], b: &[Offer]) -> bool {
    a.len() == b.len() && a.iter().all(|offer| b.iter().any(|other| other.id == offer.id))
}

/// Whether an edit from `before` to `after` needs more than a single-card
/// re-render: dates, price, destination or offers changed.
pub fn is_major_change(before: &Point, after: &Point) -> bool {
    before.start_time != after.start_time
        || before.end_time != after.end_time
        || before.price != after.price
        || before.destination.name != after.destination.name
        || !offers_equal(&before.offers, &after.offers)
}

/// Replace the entry with the same id, returning the updated list.
/// Returns `None` when no entry matches.
pub fn update_item(points: &[Point], update: Point) -> Option<Vec<Point>> {
    let index = points.iter().position(|p| p.id == update.id)?;
    let mut updated = points.to_vec();
    updated[index] = update;
    Some(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn offer(id: u32) -> Offer {
        Offer {
            id,
            title: format!("Offer {id}"),
            price: 10 * id,
        }
    }

    fn point() -> Point {
        let start = Utc.with_ymd_and_hms(2021, 3, 18, 10, 30, 0).unwrap();
        Point {
            id: PointId("p1".into()),
            kind: PointType::Taxi,
            destination: Destination {
                name: "Amsterdam".into(),
                description: "Canals".into(),
                pictures: vec![],
            },
            offers: vec![offer(1), offer(2)],
            price: 100,
            start_time: start,
            end_time: start + Duration::minutes(90),
            is_favorite: false,
        }
    }

    #[test]
    fn test_offers_equal_ignores_order() {
        assert!(offers_equal(&[offer(1), offer(2)], &[offer(2), offer(1)]));
        assert!(!offers_equal(&[offer(1)], &[offer(1), offer(2)]));
        assert!(!offers_equal(&[offer(1), offer(3)], &[offer(1), offer(2)]));
        assert!(offers_equal(&[], &[]));
    }

    #[test]
    fn test_major_change_classification() {
        let before = point();

        let mut favorite = before.clone();
        favorite.is_favorite = true;
        assert!(!is_major_change(&before, &favorite));

        let mut kind = before.clone();
        kind.kind = PointType::Bus;
        assert!(!is_major_change(&before, &kind));

        let mut price = before.clone();
        price.price = 150;
        assert!(is_major_change(&before, &price));

        let mut destination = before.clone();
        destination.destination.name = "Oslo".into();
        assert!(is_major_change(&before, &destination));

        let mut offers = before.clone();
        offers.offers.pop();
        assert!(is_major_change(&before, &offers));

        let mut end = before.clone();
        end.end_time += Duration::hours(1);
        assert!(is_major_change(&before, &end));
    }

    #[test]
    fn test_total_price_includes_offers() {
        assert_eq!(point().total_price(), 100 + 10 + 20);
    }

    #[test]
    fn test_update_item() {
        let points = vec![point()];
        let mut changed = point();
        changed.price = 7;
        let updated = update_item(&points, changed).unwrap();
        assert_eq!(updated[0].price, 7);

        let mut stranger = point();
        stranger.id = PointId("nope".into());
        assert!(update_item(&points, stranger).is_none());
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(point()).unwrap();
        assert_eq!(json["type"], "taxi");
        assert_eq!(json["base_price"], 100);
        assert_eq!(json["is_favorite"], false);
        assert!(json["date_from"].is_string());

        let back: Point = serde_json::from_value(json).unwrap();
        assert_eq!(back, point());
    }

    #[test]
    fn test_point_type_slugs() {
        for kind in PointType::all() {
            assert_eq!(PointType::from_slug(kind.slug()), Some(*kind));
        }
        assert_eq!(
            serde_json::to_value(PointType::CheckIn).unwrap(),
            serde_json::json!("check-in")
        );
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(PointId::generate(), PointId::generate());
    }
}
