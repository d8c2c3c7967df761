use bevy_ecs::prelude::{Entity, Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::dispatch::{CallContext, DispatchContext, DispatchPolicyResource};
use crate::ecs::{Ambulance, AmbulanceState, Call, CallId, CallState, UnitId};
use crate::errors::EngineError;
use crate::fleet::FleetSnapshot;
use crate::queue::CallQueue;
use crate::routing::TravelTimeResource;
use crate::runner::RunStatus;
use crate::scenario::DispatchConfig;
use crate::telemetry::{DispatchLog, SimTelemetry};

/// Walks the queue in priority order and offers each pending call to the
/// policy. A valid pick is applied immediately (call Assigned, unit
/// Dispatched) so no two calls can claim the same unit within one attempt;
/// an invalid pick is rejected and logged, leaving the call Pending.
pub fn dispatch_attempt_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    travel: Res<TravelTimeResource>,
    policy: Res<DispatchPolicyResource>,
    config: Res<DispatchConfig>,
    mut status: ResMut<RunStatus>,
    mut queue: ResMut<CallQueue>,
    mut log: ResMut<DispatchLog>,
    mut telemetry: ResMut<SimTelemetry>,
    mut calls: Query<(&CallId, &mut Call)>,
    mut units: Query<(Entity, &UnitId, &mut Ambulance)>,
) {
    if event.0.kind != EventKind::DispatchAttempt {
        return;
    }

    let now = clock.now();
    for entry in queue.iter_ordered() {
        let (call_id, origin, priority, arrived_at) = {
            let Ok((call_id, call)) = calls.get(entry.call) else {
                status.fail(EngineError::MissingSubject {
                    kind: EventKind::DispatchAttempt,
                    timestamp: now,
                });
                return;
            };
            if call.state != CallState::Pending {
                continue;
            }
            (*call_id, call.origin, call.priority, call.arrived_at)
        };

        let snapshot = match FleetSnapshot::collect(units.iter(), origin, travel.0.as_ref()) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                status.fail(error);
                return;
            }
        };
        // No Idle unit anywhere; later calls cannot be served either.
        if snapshot.is_empty() {
            break;
        }

        let call_ctx = CallContext {
            entity: entry.call,
            call_id,
            origin,
            priority,
            arrived_at,
        };
        let dispatch_ctx = DispatchContext {
            reserved_units: config.reserved_units,
            urgent_pending: queue.urgent_pending(),
            now,
        };
        let Some(selected) = policy.select(&call_ctx, &snapshot, &dispatch_ctx) else {
            continue;
        };

        // Validate the pick: it must be an Idle unit from the snapshot with
        // a route to the scene. Anything else is a recoverable rejection.
        let reachable = snapshot
            .get(selected)
            .is_some_and(|unit| unit.travel_ms.is_some());
        if !reachable {
            telemetry.policy_rejections += 1;
            log.record(EventKind::PolicyRejected, now, Some(call_id), None);
            eprintln!(
                "WARNING: policy picked an ineligible unit for call {}; leaving it pending",
                call_id.0
            );
            continue;
        }

        let unit_id = {
            let Ok((_, unit_id, mut unit)) = units.get_mut(selected) else {
                status.fail(EngineError::MissingSubject {
                    kind: EventKind::DispatchAttempt,
                    timestamp: now,
                });
                return;
            };
            if let Err(error) = unit.transition_to(AmbulanceState::Dispatched) {
                status.fail(error);
                return;
            }
            unit.assigned_call = Some(entry.call);
            unit.busy_since = Some(now);
            unit_id.clone()
        };

        {
            let Ok((_, mut call)) = calls.get_mut(entry.call) else {
                status.fail(EngineError::MissingSubject {
                    kind: EventKind::DispatchAttempt,
                    timestamp: now,
                });
                return;
            };
            if let Err(error) = call.transition_to(CallState::Assigned) {
                status.fail(error);
                return;
            }
            call.assigned_unit = Some(selected);
            call.assigned_at = Some(now);
        }

        queue.dequeue(entry.call, priority);
        log.record(EventKind::AssignmentMade, now, Some(call_id), Some(unit_id));
        clock.schedule_in(
            config.turnout_delay_ms,
            EventKind::DepartureComplete,
            Some(EventSubject::Call(entry.call)),
        );
    }
}
