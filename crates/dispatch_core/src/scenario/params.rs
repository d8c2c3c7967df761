use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::routing::TravelTimeKind;

/// Default on-scene service time: 10 minutes.
const DEFAULT_SERVICE_TIME_MS: u64 = 10 * 60 * 1000;

/// Default maximum pending wait before a call is abandoned: 30 minutes.
const DEFAULT_MAX_PENDING_WAIT_MS: u64 = 30 * 60 * 1000;

/// Which dispatch policy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchPolicyKind {
    #[default]
    NearestAvailable,
    PriorityReservation,
}

/// Engine timing and policy knobs, inserted as a resource.
#[derive(Debug, Clone, Copy, Resource, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Delay between assignment and departure (crew turnout).
    pub turnout_delay_ms: u64,
    /// Time a unit spends on scene before the call completes.
    pub service_time_ms: u64,
    /// Pending calls older than this are abandoned; `None` disables aging,
    /// and calls that never find a unit leave the run incomplete.
    pub max_pending_wait_ms: Option<u64>,
    /// Idle units held back for urgent calls by the reservation policy.
    pub reserved_units: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            turnout_delay_ms: 0,
            service_time_ms: DEFAULT_SERVICE_TIME_MS,
            max_pending_wait_ms: Some(DEFAULT_MAX_PENDING_WAIT_MS),
            reserved_units: 1,
        }
    }
}

/// Simulation end time in milliseconds. When set, the runner stops once the
/// next event would be at or after this timestamp.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimulationEndTimeMs(pub u64);

/// Full parameter set for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub policy: DispatchPolicyKind,
    pub travel_time: TravelTimeKind,
    /// LRU capacity for the on-demand provider's cache.
    pub travel_cache_capacity: usize,
    pub config: DispatchConfig,
    pub simulation_end_time_ms: Option<u64>,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            policy: DispatchPolicyKind::default(),
            travel_time: TravelTimeKind::default(),
            travel_cache_capacity: 20_000,
            config: DispatchConfig::default(),
            simulation_end_time_ms: None,
        }
    }
}

impl ScenarioParams {
    pub fn with_policy(mut self, policy: DispatchPolicyKind) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_travel_time(mut self, kind: TravelTimeKind) -> Self {
        self.travel_time = kind;
        self
    }

    pub fn with_service_time_ms(mut self, service_time_ms: u64) -> Self {
        self.config.service_time_ms = service_time_ms;
        self
    }

    pub fn with_max_pending_wait_ms(mut self, max_pending_wait_ms: Option<u64>) -> Self {
        self.config.max_pending_wait_ms = max_pending_wait_ms;
        self
    }

    pub fn with_reserved_units(mut self, reserved_units: usize) -> Self {
        self.config.reserved_units = reserved_units;
        self
    }

    pub fn with_simulation_end_time_ms(mut self, end_time_ms: u64) -> Self {
        self.simulation_end_time_ms = Some(end_time_ms);
        self
    }
}
