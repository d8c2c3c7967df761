//! Scenario setup: typed input records, run parameters, and world building.
//!
//! Inputs arrive as string-keyed records from an external loader; building a
//! scenario validates every reference against the network before any state
//! is installed.

mod build;
mod params;
mod records;

pub use build::{build_dispatch_policy, build_scenario};
pub use params::{DispatchConfig, DispatchPolicyKind, ScenarioParams, SimulationEndTimeMs};
pub use records::{
    AmbulanceRecord, CallRecord, EdgeRecord, PendingCallRecords, PriorityMapping, ResolvedCall,
    ScenarioInputs,
};
