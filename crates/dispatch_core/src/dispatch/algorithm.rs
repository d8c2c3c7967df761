use bevy_ecs::prelude::Entity;

use super::types::{CallContext, DispatchContext};
use crate::fleet::FleetSnapshot;

/// Trait for dispatch policies that pick an ambulance for a pending call.
///
/// Policies are pure functions of the call, the Idle-fleet snapshot, and the
/// dispatch context, with no hidden state, so strategies stay independently
/// testable and swappable without touching the clock or the fleet.
///
/// Returning `None` leaves the call Pending; it is re-evaluated at the next
/// dispatch attempt (a later arrival, or a unit returning to service). The
/// engine validates the returned entity against the snapshot, so a defective
/// policy degrades to a logged rejection rather than a corrupted fleet.
pub trait DispatchPolicy: Send + Sync {
    /// Pick a unit for `call`, or `None` to defer it.
    fn select(
        &self,
        call: &CallContext,
        fleet: &FleetSnapshot,
        ctx: &DispatchContext,
    ) -> Option<Entity>;
}
