use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::ecs::{Ambulance, AmbulanceState, Call, CallId, CallState, UnitId};
use crate::errors::EngineError;
use crate::routing::TravelTimeResource;
use crate::runner::RunStatus;
use crate::telemetry::{CompletedCallRecord, DispatchLog, SimTelemetry};

/// On-scene service ends: the call completes and is archived to telemetry,
/// and the unit starts its return leg to base.
pub fn service_complete_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    travel: Res<TravelTimeResource>,
    mut status: ResMut<RunStatus>,
    mut log: ResMut<DispatchLog>,
    mut telemetry: ResMut<SimTelemetry>,
    mut calls: Query<(&CallId, &mut Call)>,
    mut units: Query<(&UnitId, &mut Ambulance)>,
) {
    if event.0.kind != EventKind::ServiceComplete {
        return;
    }
    let now = clock.now();
    let Some(EventSubject::Call(call_entity)) = event.0.subject else {
        status.fail(EngineError::MissingSubject {
            kind: EventKind::ServiceComplete,
            timestamp: now,
        });
        return;
    };
    let Ok((call_id, mut call)) = calls.get_mut(call_entity) else {
        status.fail(EngineError::MissingSubject {
            kind: EventKind::ServiceComplete,
            timestamp: now,
        });
        return;
    };
    let Some(unit_entity) = call.assigned_unit else {
        status.fail(EngineError::MissingSubject {
            kind: EventKind::ServiceComplete,
            timestamp: now,
        });
        return;
    };
    let Ok((unit_id, mut unit)) = units.get_mut(unit_entity) else {
        status.fail(EngineError::MissingSubject {
            kind: EventKind::ServiceComplete,
            timestamp: now,
        });
        return;
    };

    if let Err(error) = call.transition_to(CallState::Completed) {
        status.fail(error);
        return;
    }
    if let Err(error) = unit.transition_to(AmbulanceState::Returning) {
        status.fail(error);
        return;
    }
    unit.assigned_call = None;

    let (Some(assigned_at), Some(en_route_at), Some(on_scene_at)) =
        (call.assigned_at, call.en_route_at, call.on_scene_at)
    else {
        status.fail(EngineError::MissingLifecycle { call: *call_id });
        return;
    };
    telemetry.completed_calls.push(CompletedCallRecord {
        call_id: *call_id,
        unit_id: unit_id.clone(),
        priority: call.priority,
        arrived_at: call.arrived_at,
        assigned_at,
        en_route_at,
        on_scene_at,
        completed_at: now,
    });
    log.record(
        EventKind::ServiceComplete,
        now,
        Some(*call_id),
        Some(unit_id.clone()),
    );

    match travel.travel_time(unit.location, unit.base) {
        Ok(Some(return_ms)) => {
            clock.schedule_in(
                return_ms,
                EventKind::ReturnComplete,
                Some(EventSubject::Unit(unit_entity)),
            );
        }
        // No way home in an asymmetric network: the unit stays Returning
        // and the run summary reports it as mid-cycle.
        Ok(None) => {
            eprintln!(
                "WARNING: unit {} has no return path to base; it stays out of service",
                unit_id.0
            );
        }
        Err(error) => {
            status.fail(error.into());
        }
    }
}
