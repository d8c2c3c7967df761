use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::ecs::{Ambulance, AmbulanceState, UnitId};
use crate::errors::EngineError;
use crate::queue::CallQueue;
use crate::runner::RunStatus;
use crate::telemetry::DispatchLog;

/// The unit is back at base: it returns to Idle, its busy span is banked,
/// and a freed unit triggers a fresh look at the backlog.
pub fn return_complete_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    mut status: ResMut<RunStatus>,
    mut log: ResMut<DispatchLog>,
    queue: Res<CallQueue>,
    mut units: Query<(&UnitId, &mut Ambulance)>,
) {
    if event.0.kind != EventKind::ReturnComplete {
        return;
    }
    let now = clock.now();
    let Some(EventSubject::Unit(unit_entity)) = event.0.subject else {
        status.fail(EngineError::MissingSubject {
            kind: EventKind::ReturnComplete,
            timestamp: now,
        });
        return;
    };
    let Ok((unit_id, mut unit)) = units.get_mut(unit_entity) else {
        status.fail(EngineError::MissingSubject {
            kind: EventKind::ReturnComplete,
            timestamp: now,
        });
        return;
    };

    if let Err(error) = unit.transition_to(AmbulanceState::Idle) {
        status.fail(error);
        return;
    }
    unit.location = unit.base;
    if let Some(since) = unit.busy_since.take() {
        unit.busy_ms += now.saturating_sub(since);
    }

    log.record(EventKind::ReturnComplete, now, None, Some(unit_id.clone()));
    if !queue.is_empty() {
        clock.schedule_at(now, EventKind::DispatchAttempt, None);
    }
}
