use serde::{Deserialize, Serialize};

use crate::point::Point;

/// How much of the screen a model change invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateType {
    /// One point changed; re-render its card only.
    Patch,
    /// List contents changed; rebuild the list, keep the chrome.
    Minor,
    /// Structural change; tear everything down and rebuild.
    Major,
    /// Points finished loading.
    Init,
    /// Destination catalog finished loading.
    InitDestinations,
    /// Offer catalog finished loading.
    InitOffers,
}

/// Notification delivered to model observers.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEvent {
    pub update: UpdateType,
    /// The changed point for `Patch`, otherwise usually `None`.
    pub point: Option<Point>,
}

impl ModelEvent {
    pub fn new(update: UpdateType, point: Option<Point>) -> Self {
        Self { update, point }
    }
}

/// Mutation requested by the user through a presenter.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    UpdatePoint(Point),
    AddPoint(Point),
    DeletePoint(Point),
    CancelAddPoint,
}

impl UserAction {
    pub fn name(&self) -> &'static str {
        match self {
            UserAction::UpdatePoint(_) => "UPDATE_POINT",
            UserAction::AddPoint(_) => "ADD_POINT",
            UserAction::DeletePoint(_) => "DELETE_POINT",
            UserAction::CancelAddPoint => "CANCEL_ADD_POINT",
        }
    }
}
