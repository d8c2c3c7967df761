//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each
//! step pops the next event from [`SimulationClock`], inserts it as
//! [`CurrentEvent`], then runs the schedule. A recorded fatal error or an
//! end-time cutoff stops the loop before the next event is popped, so a run
//! is only ever cancelled between events, never mid-event.

use bevy_ecs::prelude::{Res, Resource};
use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::{apply_deferred, IntoSystemConfigs};

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::ecs::{Ambulance, AmbulanceState, Call};
use crate::errors::EngineError;
use crate::scenario::{PendingCallRecords, SimulationEndTimeMs};
use crate::systems::{
    abandon_check::abandon_check_system, arrival_on_scene::arrival_on_scene_system,
    call_arrival::call_arrival_system, departure_complete::departure_complete_system,
    dispatch_attempt::dispatch_attempt_system, return_complete::return_complete_system,
    service_complete::service_complete_system,
};
use crate::telemetry::SimTelemetry;

/// Run-level status: the first fatal error recorded by a system. The runner
/// refuses to process further events once a failure is present.
#[derive(Debug, Default, Resource)]
pub struct RunStatus {
    pub failure: Option<EngineError>,
}

impl RunStatus {
    pub fn fail(&mut self, error: EngineError) {
        if self.failure.is_none() {
            self.failure = Some(error);
        }
    }
}

// Condition functions for each event kind
fn is_call_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::CallArrival)
        .unwrap_or(false)
}

fn is_dispatch_attempt(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::DispatchAttempt)
        .unwrap_or(false)
}

fn is_departure_complete(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::DepartureComplete)
        .unwrap_or(false)
}

fn is_arrival_on_scene(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::ArrivalOnScene)
        .unwrap_or(false)
}

fn is_service_complete(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::ServiceComplete)
        .unwrap_or(false)
}

fn is_return_complete(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::ReturnComplete)
        .unwrap_or(false)
}

fn is_abandon_check(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::AbandonCheck)
        .unwrap_or(false)
}

/// Runs one simulation step: pops the next event, inserts it as
/// [`CurrentEvent`], then runs the schedule. Returns `false` when the clock
/// is empty, a failure is recorded, or the next event is at or past
/// [`SimulationEndTimeMs`] (when that resource is present).
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    if world
        .get_resource::<RunStatus>()
        .is_some_and(|status| status.failure.is_some())
    {
        return false;
    }
    let stop_at = world.get_resource::<SimulationEndTimeMs>().map(|e| e.0);
    let next_ts = world
        .get_resource::<SimulationClock>()
        .and_then(|c| c.next_event_time());
    if let (Some(end_ms), Some(ts)) = (stop_at, next_ts) {
        if ts >= end_ms {
            return false;
        }
    }

    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(event) => event,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
    true
}

/// Runs one simulation step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> bool
where
    F: FnMut(&World, &Event),
{
    if !run_next_event(world, schedule) {
        return false;
    }
    let event = world.resource::<CurrentEvent>().0;
    hook(world, &event);
    true
}

/// Runs simulation steps until the event queue is empty or `max_steps` is
/// reached. Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule) {
        steps += 1;
    }
    steps
}

/// Runs simulation steps until empty and invokes `hook` after each step.
/// The hook makes whole-run cancellation observable: callers can watch wall
/// time or an abort flag and stop feeding the loop.
pub fn run_until_empty_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    mut hook: F,
) -> usize
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while steps < max_steps && run_next_event_with_hook(world, schedule, &mut hook) {
        steps += 1;
    }
    steps
}

/// Builds the default simulation schedule: all event-reacting systems plus
/// [`apply_deferred`] so entities spawned by `call_arrival_system` are
/// applied before the next step.
///
/// Systems are conditionally executed based on event type to reduce
/// overhead.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.add_systems((
        // CallArrival
        call_arrival_system.run_if(is_call_arrival),
        // DispatchAttempt
        dispatch_attempt_system.run_if(is_dispatch_attempt),
        // DepartureComplete
        departure_complete_system.run_if(is_departure_complete),
        // ArrivalOnScene
        arrival_on_scene_system.run_if(is_arrival_on_scene),
        // ServiceComplete
        service_complete_system.run_if(is_service_complete),
        // ReturnComplete
        return_complete_system.run_if(is_return_complete),
        // AbandonCheck
        abandon_check_system.run_if(is_abandon_check),
        // Always run apply_deferred so spawned call entities are available
        apply_deferred,
    ));

    schedule
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    pub completed_calls: usize,
    pub abandoned_calls: usize,
    /// Calls that never reached a terminal state: the run was truncated, or
    /// aging is disabled and no unit could ever serve them.
    pub unresolved_calls: usize,
    /// Units not Idle when the run stopped.
    pub units_mid_cycle: usize,
    pub end_time_ms: u64,
}

impl RunSummary {
    /// True when every call reached exactly one terminal state.
    pub fn is_complete(&self) -> bool {
        self.unresolved_calls == 0
    }
}

/// Drives the run until the heap drains, a failure is recorded, or
/// `max_steps` is hit. Fatal engine errors are returned; otherwise the
/// summary accounts for every call, so nothing is silently dropped.
pub fn run_to_completion(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
) -> Result<RunSummary, EngineError> {
    let steps = run_until_empty(world, schedule, max_steps);
    if let Some(failure) = world.resource::<RunStatus>().failure.clone() {
        return Err(failure);
    }

    let end_time_ms = world.resource::<SimulationClock>().now();
    let (completed_calls, abandoned_calls) = {
        let telemetry = world.resource::<SimTelemetry>();
        (
            telemetry.completed_calls.len(),
            telemetry.abandoned_calls.len(),
        )
    };
    // Records never materialized (truncated run) count as unresolved too.
    let mut unresolved_calls = world.resource::<PendingCallRecords>().0.len();
    for call in world.query::<&Call>().iter(world) {
        if !call.is_terminal() {
            unresolved_calls += 1;
        }
    }
    let units_mid_cycle = world
        .query::<&Ambulance>()
        .iter(world)
        .filter(|unit| unit.state != AmbulanceState::Idle)
        .count();

    Ok(RunSummary {
        steps,
        completed_calls,
        abandoned_calls,
        unresolved_calls,
        units_mid_cycle,
        end_time_ms,
    })
}
