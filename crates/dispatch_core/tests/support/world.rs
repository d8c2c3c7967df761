#![allow(dead_code)]

use bevy_ecs::prelude::{Schedule, World};
use dispatch_core::ecs::PriorityLevel;
use dispatch_core::runner::simulation_schedule;
use dispatch_core::scenario::{
    build_scenario, AmbulanceRecord, CallRecord, EdgeRecord, PriorityMapping, ScenarioInputs,
    ScenarioParams,
};

pub const MINUTE_MS: u64 = 60_000;

/// Builder for reproducible test scenarios over a named-location network.
#[derive(Debug, Default, Clone)]
pub struct TestScenarioBuilder {
    inputs: ScenarioInputs,
    params: ScenarioParams,
}

impl TestScenarioBuilder {
    pub fn new() -> Self {
        let mut builder = Self::default();
        builder.inputs.priorities = default_priorities();
        builder
    }

    /// Add a one-way edge costing `minutes`.
    pub fn edge(mut self, from: &str, to: &str, minutes: u64) -> Self {
        self.inputs.edges.push(EdgeRecord {
            from: from.into(),
            to: to.into(),
            cost_ms: minutes * MINUTE_MS,
        });
        self
    }

    /// Add a two-way edge costing `minutes` in both directions.
    pub fn road(self, a: &str, b: &str, minutes: u64) -> Self {
        self.edge(a, b, minutes).edge(b, a, minutes)
    }

    pub fn unit(mut self, id: &str, base: &str) -> Self {
        self.inputs.ambulances.push(AmbulanceRecord {
            id: id.into(),
            base_location: base.into(),
        });
        self
    }

    pub fn call(mut self, id: u64, arrival_ms: u64, origin: &str, call_type: &str) -> Self {
        self.inputs.calls.push(CallRecord {
            id,
            arrival_ms,
            origin: origin.into(),
            call_type: call_type.into(),
        });
        self
    }

    pub fn params(mut self, params: ScenarioParams) -> Self {
        self.params = params;
        self
    }

    pub fn inputs(&self) -> &ScenarioInputs {
        &self.inputs
    }

    /// Build the world and the default schedule.
    pub fn build(self) -> (World, Schedule) {
        let mut world = World::new();
        build_scenario(&mut world, &self.params, &self.inputs).expect("scenario should build");
        (world, simulation_schedule())
    }
}

/// Call types used across the integration suites.
pub fn default_priorities() -> PriorityMapping {
    let mut priorities = PriorityMapping::default();
    priorities.insert("Cardiac", PriorityLevel::Critical);
    priorities.insert("Stroke", PriorityLevel::High);
    priorities.insert("Fracture", PriorityLevel::Medium);
    priorities.insert("Fall", PriorityLevel::Low);
    priorities
}
