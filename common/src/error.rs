use std::fmt;

use serde::{Deserialize, Serialize};

use crate::point::PointId;

/// Errors from DOM operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// Markup did not produce an element.
    EmptyMarkup,
    /// Handle does not refer to a live node.
    UnknownNode(u64),
    /// Selector matched nothing inside the element.
    NoMatch(String),
    /// Host DOM call failed.
    Host(String),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMarkup => write!(f, "markup produced no element"),
            Self::UnknownNode(id) => write!(f, "unknown node #{id}"),
            Self::NoMatch(selector) => write!(f, "selector {selector:?} matched nothing"),
            Self::Host(msg) => write!(f, "dom call failed: {msg}"),
        }
    }
}

impl std::error::Error for DomError {}

/// Errors from model mutations. The model is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UnknownPoint(PointId),
    DuplicatePoint(PointId),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPoint(id) => write!(f, "no point with id {id}"),
            Self::DuplicatePoint(id) => write!(f, "point {id} already exists"),
        }
    }
}

impl std::error::Error for ModelError {}

/// Errors from the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncError {
    Rejected(String),
    NotFound(PointId),
    Unavailable(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(msg) => write!(f, "request rejected: {msg}"),
            Self::NotFound(id) => write!(f, "point {id} not found on server"),
            Self::Unavailable(msg) => write!(f, "server unavailable: {msg}"),
        }
    }
}

impl std::error::Error for SyncError {}

/// Errors surfaced while a presenter handles a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripError {
    Dom(DomError),
    Model(ModelError),
}

impl fmt::Display for TripError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dom(e) => write!(f, "render failed: {e}"),
            Self::Model(e) => write!(f, "model update failed: {e}"),
        }
    }
}

impl std::error::Error for TripError {}

impl From<DomError> for TripError {
    fn from(e: DomError) -> Self {
        Self::Dom(e)
    }
}

impl From<ModelError> for TripError {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}
