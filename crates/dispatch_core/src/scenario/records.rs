use std::collections::{HashMap, VecDeque};

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::ecs::{CallId, PriorityLevel};
use crate::network::LocationId;

/// Ambulance roster row: unit id and staging (base) location name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbulanceRecord {
    pub id: String,
    pub base_location: String,
}

/// Incoming call row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: u64,
    pub arrival_ms: u64,
    pub origin: String,
    pub call_type: String,
}

/// Directed network edge row; cost in simulation milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub cost_ms: u64,
}

/// Map from call-type code to priority level. Unknown codes resolve to
/// `Low`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriorityMapping {
    map: HashMap<String, PriorityLevel>,
}

impl PriorityMapping {
    pub fn insert(&mut self, call_type: impl Into<String>, level: PriorityLevel) {
        self.map.insert(call_type.into(), level);
    }

    pub fn level_for(&self, call_type: &str) -> PriorityLevel {
        self.map
            .get(call_type)
            .copied()
            .unwrap_or(PriorityLevel::Low)
    }
}

impl FromIterator<(String, PriorityLevel)> for PriorityMapping {
    fn from_iter<I: IntoIterator<Item = (String, PriorityLevel)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

/// Everything the engine consumes for one run; produced by an external
/// loader.
#[derive(Debug, Clone, Default)]
pub struct ScenarioInputs {
    pub edges: Vec<EdgeRecord>,
    pub ambulances: Vec<AmbulanceRecord>,
    pub calls: Vec<CallRecord>,
    pub priorities: PriorityMapping,
}

/// A call record with its names resolved against the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCall {
    pub id: CallId,
    pub arrival_ms: u64,
    pub origin: LocationId,
    pub priority: PriorityLevel,
}

/// Staged call records in arrival order; `CallArrival` events consume from
/// the front.
#[derive(Debug, Default, Resource)]
pub struct PendingCallRecords(pub VecDeque<ResolvedCall>);
