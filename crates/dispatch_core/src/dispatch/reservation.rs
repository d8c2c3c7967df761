use std::collections::HashSet;

use bevy_ecs::prelude::Entity;

use super::algorithm::DispatchPolicy;
use super::types::{CallContext, DispatchContext};
use crate::ecs::UnitId;
use crate::fleet::FleetSnapshot;

/// Priority-weighted reservation: hold back part of the Idle fleet for
/// urgent calls.
///
/// The `reserved_units` lowest unit ids among the currently Idle units form
/// the reserve pool. Urgent (Critical/High) calls may take any unit. Lower
/// priority calls may take reserved units only while no urgent call is
/// pending; within the eligible pool, selection falls back to
/// nearest-available.
#[derive(Debug, Default)]
pub struct PriorityReservation;

impl DispatchPolicy for PriorityReservation {
    fn select(
        &self,
        call: &CallContext,
        fleet: &FleetSnapshot,
        ctx: &DispatchContext,
    ) -> Option<Entity> {
        let reserve_active = !call.priority.is_urgent()
            && ctx.urgent_pending > 0
            && ctx.reserved_units > 0;
        if !reserve_active {
            return fleet.ranked().first().map(|unit| unit.entity);
        }

        // The snapshot is sorted by unit id, so its prefix is the pool.
        let reserved: HashSet<&UnitId> = fleet
            .units
            .iter()
            .take(ctx.reserved_units)
            .map(|unit| &unit.unit_id)
            .collect();
        fleet
            .ranked()
            .into_iter()
            .find(|unit| !reserved.contains(&unit.unit_id))
            .map(|unit| unit.entity)
    }
}
