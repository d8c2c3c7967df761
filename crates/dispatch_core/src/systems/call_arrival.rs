use bevy_ecs::prelude::{Commands, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::ecs::Call;
use crate::queue::CallQueue;
use crate::scenario::{DispatchConfig, PendingCallRecords};
use crate::telemetry::DispatchLog;

/// Materializes the next staged call record: spawns the call entity,
/// enqueues it, and schedules the dispatch attempt and the abandonment
/// deadline.
pub fn call_arrival_system(
    mut commands: Commands,
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    mut staged: ResMut<PendingCallRecords>,
    mut queue: ResMut<CallQueue>,
    mut log: ResMut<DispatchLog>,
    config: Res<DispatchConfig>,
) {
    if event.0.kind != EventKind::CallArrival {
        return;
    }
    // Arrival events are scheduled in staged order, so the front record is
    // the one this event announces.
    let Some(record) = staged.0.pop_front() else {
        return;
    };

    let now = clock.now();
    let entity = commands
        .spawn((record.id, Call::new(record.priority, record.origin, now)))
        .id();
    queue.enqueue(entity, record.priority, now);
    log.record(EventKind::CallArrival, now, Some(record.id), None);

    clock.schedule_at(now, EventKind::DispatchAttempt, None);
    if let Some(max_wait) = config.max_pending_wait_ms {
        clock.schedule_in(
            max_wait,
            EventKind::AbandonCheck,
            Some(EventSubject::Call(entity)),
        );
    }
}
