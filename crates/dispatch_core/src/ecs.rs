use bevy_ecs::prelude::{Component, Entity};
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::network::LocationId;

/// External identifier of a call, from the input log.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Component, Serialize, Deserialize,
)]
pub struct CallId(pub u64);

/// External identifier of an ambulance unit (the roster's unit number).
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Component, Serialize, Deserialize,
)]
pub struct UnitId(pub String);

/// Ordered call priority, mapped from call-type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriorityLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl PriorityLevel {
    /// Rank for queue ordering: higher value outranks lower.
    pub fn rank(self) -> u8 {
        match self {
            PriorityLevel::Critical => 3,
            PriorityLevel::High => 2,
            PriorityLevel::Medium => 1,
            PriorityLevel::Low => 0,
        }
    }

    /// Critical and High calls qualify for reserved units.
    pub fn is_urgent(self) -> bool {
        matches!(self, PriorityLevel::Critical | PriorityLevel::High)
    }

    /// Map the input tables' integer priority codes (1 = most urgent).
    /// Unknown codes fall back to `Low`.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => PriorityLevel::Critical,
            2 => PriorityLevel::High,
            3 => PriorityLevel::Medium,
            _ => PriorityLevel::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallState {
    Pending,
    Assigned,
    EnRoute,
    OnScene,
    Completed,
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmbulanceState {
    Idle,
    Dispatched,
    EnRoute,
    OnScene,
    Returning,
}

/// An emergency call. Spawned when its arrival event fires; mutated only by
/// the engine systems. Lifecycle timestamps fill in as the call advances.
#[derive(Debug, Clone, Component)]
pub struct Call {
    pub state: CallState,
    pub priority: PriorityLevel,
    pub origin: LocationId,
    pub arrived_at: u64,
    /// Unit serving this call; one-to-one with [`Ambulance::assigned_call`].
    pub assigned_unit: Option<Entity>,
    pub assigned_at: Option<u64>,
    pub en_route_at: Option<u64>,
    pub on_scene_at: Option<u64>,
}

impl Call {
    pub fn new(priority: PriorityLevel, origin: LocationId, arrived_at: u64) -> Self {
        Self {
            state: CallState::Pending,
            priority,
            origin,
            arrived_at,
            assigned_unit: None,
            assigned_at: None,
            en_route_at: None,
            on_scene_at: None,
        }
    }

    /// Advance the call lifecycle. Anything other than the next step of
    /// `Pending -> Assigned -> EnRoute -> OnScene -> Completed`, or
    /// `Pending -> Abandoned`, is a fatal engine defect.
    pub fn transition_to(&mut self, next: CallState) -> Result<(), EngineError> {
        let allowed = matches!(
            (self.state, next),
            (CallState::Pending, CallState::Assigned)
                | (CallState::Pending, CallState::Abandoned)
                | (CallState::Assigned, CallState::EnRoute)
                | (CallState::EnRoute, CallState::OnScene)
                | (CallState::OnScene, CallState::Completed)
        );
        if !allowed {
            return Err(EngineError::InvalidCallTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, CallState::Completed | CallState::Abandoned)
    }
}

/// An ambulance unit. `busy_ms` accumulates dispatched-to-returned spans for
/// the utilization aggregate.
#[derive(Debug, Clone, Component)]
pub struct Ambulance {
    pub state: AmbulanceState,
    pub base: LocationId,
    pub location: LocationId,
    /// Call this unit serves; one-to-one with [`Call::assigned_unit`].
    pub assigned_call: Option<Entity>,
    pub busy_since: Option<u64>,
    pub busy_ms: u64,
}

impl Ambulance {
    pub fn new(base: LocationId) -> Self {
        Self {
            state: AmbulanceState::Idle,
            base,
            location: base,
            assigned_call: None,
            busy_since: None,
            busy_ms: 0,
        }
    }

    /// Advance the unit lifecycle. The only cycle is
    /// `Idle -> Dispatched -> EnRoute -> OnScene -> Returning -> Idle`;
    /// no transition skips a step.
    pub fn transition_to(&mut self, next: AmbulanceState) -> Result<(), EngineError> {
        let allowed = matches!(
            (self.state, next),
            (AmbulanceState::Idle, AmbulanceState::Dispatched)
                | (AmbulanceState::Dispatched, AmbulanceState::EnRoute)
                | (AmbulanceState::EnRoute, AmbulanceState::OnScene)
                | (AmbulanceState::OnScene, AmbulanceState::Returning)
                | (AmbulanceState::Returning, AmbulanceState::Idle)
        );
        if !allowed {
            return Err(EngineError::InvalidUnitTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}
