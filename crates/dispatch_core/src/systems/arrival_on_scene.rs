use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::ecs::{Ambulance, AmbulanceState, Call, CallId, CallState, UnitId};
use crate::errors::EngineError;
use crate::runner::RunStatus;
use crate::scenario::DispatchConfig;
use crate::telemetry::DispatchLog;

/// The unit reaches the scene: both sides go OnScene, the unit's position
/// moves to the call origin, and service completion is scheduled.
pub fn arrival_on_scene_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    config: Res<DispatchConfig>,
    mut status: ResMut<RunStatus>,
    mut log: ResMut<DispatchLog>,
    mut calls: Query<(&CallId, &mut Call)>,
    mut units: Query<(&UnitId, &mut Ambulance)>,
) {
    if event.0.kind != EventKind::ArrivalOnScene {
        return;
    }
    let now = clock.now();
    let Some(EventSubject::Call(call_entity)) = event.0.subject else {
        status.fail(EngineError::MissingSubject {
            kind: EventKind::ArrivalOnScene,
            timestamp: now,
        });
        return;
    };
    let Ok((call_id, mut call)) = calls.get_mut(call_entity) else {
        status.fail(EngineError::MissingSubject {
            kind: EventKind::ArrivalOnScene,
            timestamp: now,
        });
        return;
    };
    let Some(unit_entity) = call.assigned_unit else {
        status.fail(EngineError::MissingSubject {
            kind: EventKind::ArrivalOnScene,
            timestamp: now,
        });
        return;
    };
    let Ok((unit_id, mut unit)) = units.get_mut(unit_entity) else {
        status.fail(EngineError::MissingSubject {
            kind: EventKind::ArrivalOnScene,
            timestamp: now,
        });
        return;
    };

    if let Err(error) = call.transition_to(CallState::OnScene) {
        status.fail(error);
        return;
    }
    call.on_scene_at = Some(now);
    if let Err(error) = unit.transition_to(AmbulanceState::OnScene) {
        status.fail(error);
        return;
    }
    unit.location = call.origin;

    log.record(
        EventKind::ArrivalOnScene,
        now,
        Some(*call_id),
        Some(unit_id.clone()),
    );
    clock.schedule_in(
        config.service_time_ms,
        EventKind::ServiceComplete,
        Some(EventSubject::Call(call_entity)),
    );
}
