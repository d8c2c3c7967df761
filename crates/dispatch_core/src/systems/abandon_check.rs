use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::ecs::{Call, CallId, CallState};
use crate::errors::EngineError;
use crate::queue::CallQueue;
use crate::runner::RunStatus;
use crate::telemetry::{AbandonedCallRecord, DispatchLog, SimTelemetry};

/// Aging check scheduled at enqueue time: a call still Pending when its
/// deadline fires is abandoned. A normal terminal outcome, not an error.
/// The check also re-triggers dispatch for the remaining backlog: a call
/// leaving the queue can change what the policy is willing to release.
pub fn abandon_check_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    mut status: ResMut<RunStatus>,
    mut queue: ResMut<CallQueue>,
    mut log: ResMut<DispatchLog>,
    mut telemetry: ResMut<SimTelemetry>,
    mut calls: Query<(&CallId, &mut Call)>,
) {
    if event.0.kind != EventKind::AbandonCheck {
        return;
    }
    let now = clock.now();
    let Some(EventSubject::Call(call_entity)) = event.0.subject else {
        status.fail(EngineError::MissingSubject {
            kind: EventKind::AbandonCheck,
            timestamp: now,
        });
        return;
    };
    let Ok((call_id, mut call)) = calls.get_mut(call_entity) else {
        status.fail(EngineError::MissingSubject {
            kind: EventKind::AbandonCheck,
            timestamp: now,
        });
        return;
    };
    if call.state == CallState::Pending {
        if let Err(error) = call.transition_to(CallState::Abandoned) {
            status.fail(error);
            return;
        }
        queue.dequeue(call_entity, call.priority);
        telemetry.abandoned_calls.push(AbandonedCallRecord {
            call_id: *call_id,
            priority: call.priority,
            arrived_at: call.arrived_at,
            abandoned_at: now,
        });
        log.record(EventKind::CallAbandoned, now, Some(*call_id), None);
    }

    if !queue.is_empty() {
        clock.schedule_at(now, EventKind::DispatchAttempt, None);
    }
}
