use bevy_ecs::prelude::Entity;

use super::algorithm::DispatchPolicy;
use super::types::{CallContext, DispatchContext};
use crate::fleet::FleetSnapshot;

/// Nearest-available dispatch: the Idle unit with minimum travel time to the
/// call origin, ties broken by unit id.
///
/// Greedy per call with no lookahead. Useful as the baseline the other
/// strategies are measured against, and deterministic by construction.
#[derive(Debug, Default)]
pub struct NearestAvailable;

impl DispatchPolicy for NearestAvailable {
    fn select(
        &self,
        _call: &CallContext,
        fleet: &FleetSnapshot,
        _ctx: &DispatchContext,
    ) -> Option<Entity> {
        fleet.ranked().first().map(|unit| unit.entity)
    }
}
