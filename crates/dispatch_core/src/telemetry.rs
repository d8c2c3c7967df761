//! Telemetry: the dispatch log (the engine's primary output) and per-run
//! aggregates.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::clock::EventKind;
use crate::ecs::{CallId, PriorityLevel, UnitId};

/// One dispatch-log record. The ordered log is the engine's primary output;
/// identical inputs and configuration produce identical logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub kind: EventKind,
    pub timestamp: u64,
    pub call_id: Option<CallId>,
    pub unit_id: Option<UnitId>,
}

/// Ordered event log for one run.
#[derive(Debug, Default, Resource)]
pub struct DispatchLog {
    pub records: Vec<LogRecord>,
}

impl DispatchLog {
    pub fn record(
        &mut self,
        kind: EventKind,
        timestamp: u64,
        call_id: Option<CallId>,
        unit_id: Option<UnitId>,
    ) {
        self.records.push(LogRecord {
            kind,
            timestamp,
            call_id,
            unit_id,
        });
    }
}

/// One completed call, recorded when its unit finishes on-scene service.
/// Timestamps are simulation ms; use the helper methods for derived KPIs.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedCallRecord {
    pub call_id: CallId,
    pub unit_id: UnitId,
    pub priority: PriorityLevel,
    pub arrived_at: u64,
    pub assigned_at: u64,
    pub en_route_at: u64,
    pub on_scene_at: u64,
    pub completed_at: u64,
}

impl CompletedCallRecord {
    /// Call arrival to unit-on-scene: the headline response time.
    pub fn response_time(&self) -> u64 {
        self.on_scene_at.saturating_sub(self.arrived_at)
    }

    /// Call arrival to assignment.
    pub fn wait_for_assignment(&self) -> u64 {
        self.assigned_at.saturating_sub(self.arrived_at)
    }

    /// Departure to on-scene.
    pub fn travel_time(&self) -> u64 {
        self.on_scene_at.saturating_sub(self.en_route_at)
    }
}

/// One call that aged out of the queue.
#[derive(Debug, Clone, Serialize)]
pub struct AbandonedCallRecord {
    pub call_id: CallId,
    pub priority: PriorityLevel,
    pub arrived_at: u64,
    pub abandoned_at: u64,
}

/// Collects per-run aggregates alongside the dispatch log.
#[derive(Debug, Default, Resource)]
pub struct SimTelemetry {
    pub completed_calls: Vec<CompletedCallRecord>,
    pub abandoned_calls: Vec<AbandonedCallRecord>,
    pub policy_rejections: u64,
}
