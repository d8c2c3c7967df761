use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::ecs::{Ambulance, AmbulanceState, Call, CallId, CallState, UnitId};
use crate::errors::EngineError;
use crate::routing::TravelTimeResource;
use crate::runner::RunStatus;
use crate::telemetry::DispatchLog;

/// The assigned unit leaves its station: both sides go EnRoute and the
/// on-scene arrival is scheduled one travel time ahead.
pub fn departure_complete_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    travel: Res<TravelTimeResource>,
    mut status: ResMut<RunStatus>,
    mut log: ResMut<DispatchLog>,
    mut calls: Query<(&CallId, &mut Call)>,
    mut units: Query<(&UnitId, &mut Ambulance)>,
) {
    if event.0.kind != EventKind::DepartureComplete {
        return;
    }
    let now = clock.now();
    let Some(EventSubject::Call(call_entity)) = event.0.subject else {
        status.fail(EngineError::MissingSubject {
            kind: EventKind::DepartureComplete,
            timestamp: now,
        });
        return;
    };
    let Ok((call_id, mut call)) = calls.get_mut(call_entity) else {
        status.fail(EngineError::MissingSubject {
            kind: EventKind::DepartureComplete,
            timestamp: now,
        });
        return;
    };
    let Some(unit_entity) = call.assigned_unit else {
        status.fail(EngineError::MissingSubject {
            kind: EventKind::DepartureComplete,
            timestamp: now,
        });
        return;
    };
    let Ok((unit_id, mut unit)) = units.get_mut(unit_entity) else {
        status.fail(EngineError::MissingSubject {
            kind: EventKind::DepartureComplete,
            timestamp: now,
        });
        return;
    };

    let travel_ms = match travel.travel_time(unit.location, call.origin) {
        Ok(Some(travel_ms)) => travel_ms,
        // The pairing was validated against a reachable route; losing it
        // here means the run state is corrupt.
        Ok(None) => {
            status.fail(EngineError::NoRoute {
                from: unit.location,
                to: call.origin,
            });
            return;
        }
        Err(error) => {
            status.fail(error.into());
            return;
        }
    };

    if let Err(error) = call.transition_to(CallState::EnRoute) {
        status.fail(error);
        return;
    }
    call.en_route_at = Some(now);
    if let Err(error) = unit.transition_to(AmbulanceState::EnRoute) {
        status.fail(error);
        return;
    }

    log.record(
        EventKind::DepartureComplete,
        now,
        Some(*call_id),
        Some(unit_id.clone()),
    );
    clock.schedule_in(
        travel_ms,
        EventKind::ArrivalOnScene,
        Some(EventSubject::Call(call_entity)),
    );
}
