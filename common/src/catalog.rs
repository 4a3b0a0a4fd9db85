use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::point::{Destination, Offer, PointType};

/// Offers available for one point type, as served by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferGroup {
    #[serde(rename = "type")]
    pub kind: PointType,
    pub offers: Vec<Offer>,
}

/// Offer catalog keyed by point type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferCatalog {
    by_type: BTreeMap<PointType, Vec<Offer>>,
}

impl OfferCatalog {
    pub fn from_groups(groups: Vec<OfferGroup>) -> Self {
        let mut by_type: BTreeMap<PointType, Vec<Offer>> = BTreeMap::new();
        for group in groups {
            by_type.entry(group.kind).or_default().extend(group.offers);
        }
        Self { by_type }
    }

    pub fn for_type(&self, kind: PointType) -> &[Offer] {
        self.by_type.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find(&self, kind: PointType, offer_id: u32) -> Option<&Offer> {
        self.for_type(kind).iter().find(|o| o.id == offer_id)
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.values().all(Vec::is_empty)
    }
}

/// All known destinations, in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationCatalog {
    destinations: Vec<Destination>,
}

impl DestinationCatalog {
    pub fn new(destinations: Vec<Destination>) -> Self {
        Self { destinations }
    }

    pub fn find(&self, name: &str) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.destinations.iter().map(|d| d.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

/// Shared snapshot of both catalogs handed to the edit forms.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub destinations: Rc<DestinationCatalog>,
    pub offers: Rc<OfferCatalog>,
}

impl Catalogs {
    pub fn new(destinations: Rc<DestinationCatalog>, offers: Rc<OfferCatalog>) -> Self {
        Self {
            destinations,
            offers,
        }
    }
}
