use bevy_ecs::prelude::Entity;

use crate::ecs::{CallId, PriorityLevel};
use crate::network::LocationId;

/// The pending call a policy is asked to serve.
#[derive(Debug, Clone, Copy)]
pub struct CallContext {
    pub entity: Entity,
    pub call_id: CallId,
    pub origin: LocationId,
    pub priority: PriorityLevel,
    pub arrived_at: u64,
}

/// Queue and configuration facts a policy may weigh besides the fleet.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchContext {
    /// How many Idle units the reservation policy holds back for urgent
    /// calls.
    pub reserved_units: usize,
    /// Critical/High calls currently pending, including the one offered.
    pub urgent_pending: usize,
    pub now: u64,
}
