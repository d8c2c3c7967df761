//! Error taxonomy: input validation, travel-time queries, and fatal engine
//! defects. Policy rejections and call abandonment are normal outcomes and
//! are recorded in the dispatch log, not here.

use std::fmt;

use crate::clock::EventKind;
use crate::ecs::{AmbulanceState, CallId, CallState};
use crate::network::LocationId;

/// Errors raised by travel-time queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    /// The queried location is not part of the network's node set.
    UnknownLocation(LocationId),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::UnknownLocation(id) => {
                write!(f, "unknown location id {}", id.0)
            }
        }
    }
}

impl std::error::Error for NetworkError {}

/// Input validation failures, surfaced before a run starts. A failed build
/// leaves the world untouched; there is no partial application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// A record references a location name absent from the network.
    UnknownLocation { name: String, context: &'static str },
    DuplicateUnitId(String),
    DuplicateCallId(u64),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::UnknownLocation { name, context } => {
                write!(f, "{context} references unknown location '{name}'")
            }
            InputError::DuplicateUnitId(id) => write!(f, "duplicate ambulance id '{id}'"),
            InputError::DuplicateCallId(id) => write!(f, "duplicate call id {id}"),
        }
    }
}

impl std::error::Error for InputError {}

/// Fatal defects detected while processing an event. Any of these stops the
/// run before the next event is popped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An ambulance state change skipped a step of its lifecycle.
    InvalidUnitTransition { from: AmbulanceState, to: AmbulanceState },
    /// A call state change skipped a step of its lifecycle.
    InvalidCallTransition { from: CallState, to: CallState },
    /// An event referenced a call or unit that does not exist.
    MissingSubject { kind: EventKind, timestamp: u64 },
    /// A dispatched unit has no route to its target; the pairing should
    /// never have been made.
    NoRoute { from: LocationId, to: LocationId },
    /// A call reached a terminal state with lifecycle timestamps missing.
    MissingLifecycle { call: CallId },
    Network(NetworkError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidUnitTransition { from, to } => {
                write!(f, "invalid ambulance transition {from:?} -> {to:?}")
            }
            EngineError::InvalidCallTransition { from, to } => {
                write!(f, "invalid call transition {from:?} -> {to:?}")
            }
            EngineError::MissingSubject { kind, timestamp } => {
                write!(f, "{kind:?} event at t={timestamp} references a missing entity")
            }
            EngineError::NoRoute { from, to } => {
                write!(f, "no route from location {} to location {}", from.0, to.0)
            }
            EngineError::MissingLifecycle { call } => {
                write!(f, "call {} completed with missing lifecycle timestamps", call.0)
            }
            EngineError::Network(err) => write!(f, "network error: {err}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<NetworkError> for EngineError {
    fn from(err: NetworkError) -> Self {
        EngineError::Network(err)
    }
}
