//! Random trip data for the dev build and the mock backend.

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::OfferGroup;
use crate::point::{Destination, Offer, Picture, Point, PointId, PointType};

const DESTINATIONS: &[&str] = &[
    "London",
    "Sydney",
    "Munich",
    "Oslo",
    "Reykjavik",
    "Lisboa",
    "New York",
    "Dublin",
    "Calais",
    "Tokyo",
    "Amsterdam",
    "Copenhagen",
];

const DESCRIPTIONS: &[&str] = &[
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit.",
    "Cras aliquet varius magna, non porta ligula feugiat eget.",
    "Fusce tristique felis at fermentum pharetra.",
    "Aliquam id orci ut lectus varius viverra.",
    "Nullam nunc ex, convallis sed finibus eget, sollicitudin eget ante.",
    "Sed sed nisi sed augue convallis suscipit in sed felis.",
    "Aliquam erat volutpat.",
    "Nunc fermentum tortor ac porta dapibus.",
];

const OFFER_TITLES: &[&str] = &[
    "Add luggage",
    "Switch to comfort",
    "Add meal",
    "Choose seats",
    "Travel by train",
    "Rent a car",
    "Order Uber",
    "Add breakfast",
];

const OFFER_PRICES: &[u32] = &[10, 20, 30, 40, 50];
const MAX_OFFERS_PER_TYPE: usize = 5;
const MIN_PRICE: u32 = 10;
const MAX_PRICE: u32 = 1000;
/// Points are spread this many days either side of "now".
const SPREAD_DAYS: i64 = 30;

pub fn destinations(rng: &mut impl Rng) -> Vec<Destination> {
    DESTINATIONS
        .iter()
        .map(|&name| {
            let pictures = (0..rng.gen_range(0..=4))
                .map(|_| Picture {
                    src: format!("https://picsum.photos/248/152?r={}", rng.gen::<u32>()),
                    description: format!("{name} view"),
                })
                .collect();
            Destination {
                name: name.to_string(),
                description: DESCRIPTIONS.choose(rng).copied().unwrap_or_default().to_string(),
                pictures,
            }
        })
        .collect()
}

/// Offer groups for every point type. Ids are unique within a type.
pub fn offers(rng: &mut impl Rng) -> Vec<OfferGroup> {
    PointType::all()
        .iter()
        .map(|&kind| {
            let count = rng.gen_range(0..=MAX_OFFERS_PER_TYPE);
            let offers = OFFER_TITLES
                .choose_multiple(rng, count)
                .zip(1u32..)
                .map(|(&title, id)| Offer {
                    id,
                    title: title.to_string(),
                    price: OFFER_PRICES.choose(rng).copied().unwrap_or(MIN_PRICE),
                })
                .collect();
            OfferGroup { kind, offers }
        })
        .collect()
}

/// One random point drawn from the given catalogs.
pub fn point(
    rng: &mut impl Rng,
    now: DateTime<Utc>,
    destinations: &[Destination],
    offers: &[OfferGroup],
) -> Point {
    let kind = PointType::all().choose(rng).copied().unwrap_or_default();
    let start = now + Duration::minutes(rng.gen_range(-SPREAD_DAYS * 1440..SPREAD_DAYS * 1440));
    let end = start + Duration::hours(rng.gen_range(1..=12)) + Duration::minutes(rng.gen_range(0..60));
    let available: Vec<Offer> = offers
        .iter()
        .filter(|group| group.kind == kind)
        .flat_map(|group| group.offers.iter().cloned())
        .collect();
    let count = rng.gen_range(0..=available.len());
    let selected = available.choose_multiple(rng, count).cloned().collect();

    Point {
        id: PointId::generate(),
        kind,
        destination: destinations.choose(rng).cloned().unwrap_or_default(),
        offers: selected,
        price: rng.gen_range(MIN_PRICE..=MAX_PRICE),
        start_time: start,
        end_time: end,
        is_favorite: rng.gen_bool(0.5),
    }
}

pub fn points(
    rng: &mut impl Rng,
    count: usize,
    now: DateTime<Utc>,
    destinations: &[Destination],
    offers: &[OfferGroup],
) -> Vec<Point> {
    (0..count)
        .map(|_| point(rng, now, destinations, offers))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_points_use_catalog_offers_of_their_type() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap();
        let destinations = destinations(&mut rng);
        let offers = offers(&mut rng);
        let points = points(&mut rng, 25, now, &destinations, &offers);

        assert_eq!(points.len(), 25);
        for point in &points {
            assert!(point.start_time < point.end_time);
            assert!(destinations.iter().any(|d| d == &point.destination));
            let group = offers.iter().find(|g| g.kind == point.kind).unwrap();
            assert!(point.offers.iter().all(|o| group.offers.contains(o)));
        }
    }
}
