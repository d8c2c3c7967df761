//! World building: validate inputs, then install resources and the fleet.

use std::collections::{HashSet, VecDeque};

use bevy_ecs::prelude::World;

use crate::clock::{EventKind, SimulationClock};
use crate::dispatch::{DispatchPolicy, DispatchPolicyResource, NearestAvailable, PriorityReservation};
use crate::ecs::{Ambulance, CallId, UnitId};
use crate::errors::InputError;
use crate::network::RoadNetwork;
use crate::queue::CallQueue;
use crate::routing::{build_travel_time_provider, TravelTimeResource};
use crate::runner::RunStatus;
use crate::scenario::params::{DispatchPolicyKind, ScenarioParams, SimulationEndTimeMs};
use crate::scenario::records::{PendingCallRecords, ResolvedCall, ScenarioInputs};
use crate::telemetry::{DispatchLog, SimTelemetry};

/// Construct a boxed policy from its kind descriptor.
pub fn build_dispatch_policy(kind: DispatchPolicyKind) -> Box<dyn DispatchPolicy> {
    match kind {
        DispatchPolicyKind::NearestAvailable => Box::new(NearestAvailable),
        DispatchPolicyKind::PriorityReservation => Box::new(PriorityReservation),
    }
}

/// Validate `inputs` and populate `world` for one run.
///
/// All validation happens before any resource is inserted or entity is
/// spawned: a failed build leaves the world untouched.
pub fn build_scenario(
    world: &mut World,
    params: &ScenarioParams,
    inputs: &ScenarioInputs,
) -> Result<(), InputError> {
    // Network first; everything else resolves names against it.
    let mut network = RoadNetwork::new();
    for edge in &inputs.edges {
        network.add_edge(&edge.from, &edge.to, edge.cost_ms);
    }

    let mut unit_ids = HashSet::new();
    let mut roster = Vec::with_capacity(inputs.ambulances.len());
    for record in &inputs.ambulances {
        if !unit_ids.insert(record.id.as_str()) {
            return Err(InputError::DuplicateUnitId(record.id.clone()));
        }
        let base = network
            .lookup(&record.base_location)
            .ok_or_else(|| InputError::UnknownLocation {
                name: record.base_location.clone(),
                context: "ambulance base",
            })?;
        roster.push((record.id.clone(), base));
    }

    let mut call_ids = HashSet::new();
    let mut resolved = Vec::with_capacity(inputs.calls.len());
    for record in &inputs.calls {
        if !call_ids.insert(record.id) {
            return Err(InputError::DuplicateCallId(record.id));
        }
        let origin = network
            .lookup(&record.origin)
            .ok_or_else(|| InputError::UnknownLocation {
                name: record.origin.clone(),
                context: "call origin",
            })?;
        resolved.push(ResolvedCall {
            id: CallId(record.id),
            arrival_ms: record.arrival_ms,
            origin,
            priority: inputs.priorities.level_for(&record.call_type),
        });
    }
    // Stable sort keeps input order among equal arrival times (FIFO).
    resolved.sort_by_key(|call| call.arrival_ms);

    let mut clock = SimulationClock::default();
    for call in &resolved {
        clock.schedule_at(call.arrival_ms, EventKind::CallArrival, None);
    }

    let travel = build_travel_time_provider(
        params.travel_time,
        &network,
        params.travel_cache_capacity,
    );

    for (id, base) in roster {
        world.spawn((UnitId(id), Ambulance::new(base)));
    }

    world.insert_resource(clock);
    world.insert_resource(CallQueue::default());
    world.insert_resource(PendingCallRecords(resolved.into_iter().collect::<VecDeque<_>>()));
    world.insert_resource(TravelTimeResource(travel));
    world.insert_resource(DispatchPolicyResource::new(build_dispatch_policy(
        params.policy,
    )));
    world.insert_resource(params.config);
    world.insert_resource(DispatchLog::default());
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(RunStatus::default());
    if let Some(end_time_ms) = params.simulation_end_time_ms {
        world.insert_resource(SimulationEndTimeMs(end_time_ms));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::PriorityLevel;
    use crate::scenario::records::{AmbulanceRecord, CallRecord, EdgeRecord, PriorityMapping};

    fn inputs() -> ScenarioInputs {
        let mut priorities = PriorityMapping::default();
        priorities.insert("Cardiac", PriorityLevel::Critical);
        ScenarioInputs {
            edges: vec![
                EdgeRecord {
                    from: "Station".into(),
                    to: "Plaza".into(),
                    cost_ms: 300_000,
                },
                EdgeRecord {
                    from: "Plaza".into(),
                    to: "Station".into(),
                    cost_ms: 300_000,
                },
            ],
            ambulances: vec![AmbulanceRecord {
                id: "A1".into(),
                base_location: "Station".into(),
            }],
            calls: vec![CallRecord {
                id: 1,
                arrival_ms: 0,
                origin: "Plaza".into(),
                call_type: "Cardiac".into(),
            }],
            priorities,
        }
    }

    #[test]
    fn build_installs_fleet_and_schedules_arrivals() {
        let mut world = World::new();
        build_scenario(&mut world, &ScenarioParams::default(), &inputs()).expect("build");

        let units: Vec<&UnitId> = world.query::<&UnitId>().iter(&world).collect();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].0, "A1");

        let clock = world.resource::<SimulationClock>();
        assert_eq!(clock.pending_events(), 1);

        let staged = world.resource::<PendingCallRecords>();
        assert_eq!(staged.0.len(), 1);
        assert_eq!(staged.0[0].priority, PriorityLevel::Critical);
    }

    #[test]
    fn unknown_call_origin_fails_before_any_mutation() {
        let mut bad = inputs();
        bad.calls[0].origin = "Nowhere".into();

        let mut world = World::new();
        let err = build_scenario(&mut world, &ScenarioParams::default(), &bad).unwrap_err();
        assert!(matches!(err, InputError::UnknownLocation { .. }));
        assert!(world.get_resource::<SimulationClock>().is_none());
        assert_eq!(world.query::<&UnitId>().iter(&world).count(), 0);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut dup_units = inputs();
        dup_units.ambulances.push(AmbulanceRecord {
            id: "A1".into(),
            base_location: "Station".into(),
        });
        let mut world = World::new();
        assert_eq!(
            build_scenario(&mut world, &ScenarioParams::default(), &dup_units).unwrap_err(),
            InputError::DuplicateUnitId("A1".into())
        );

        let mut dup_calls = inputs();
        dup_calls.calls.push(dup_calls.calls[0].clone());
        let mut world = World::new();
        assert_eq!(
            build_scenario(&mut world, &ScenarioParams::default(), &dup_calls).unwrap_err(),
            InputError::DuplicateCallId(1)
        );
    }

    #[test]
    fn unknown_call_type_maps_to_low_priority() {
        let mut unknown_type = inputs();
        unknown_type.calls[0].call_type = "Unlisted".into();

        let mut world = World::new();
        build_scenario(&mut world, &ScenarioParams::default(), &unknown_type).expect("build");
        let staged = world.resource::<PendingCallRecords>();
        assert_eq!(staged.0[0].priority, PriorityLevel::Low);
    }
}
