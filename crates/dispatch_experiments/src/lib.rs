//! Loaders, metrics, and parallel experiment execution around
//! `dispatch_core`.
//!
//! This crate is the engine's external collaborator: it reads the four CSV
//! input tables, generates synthetic workloads, runs policy comparisons and
//! seed sweeps in parallel, and exports dispatch logs and results.
//!
//! # Quick Start
//!
//! ```no_run
//! use dispatch_core::scenario::{DispatchPolicyKind, ScenarioParams};
//! use dispatch_experiments::loader::load_scenario_inputs;
//! use dispatch_experiments::runner::{run_parallel_experiments, ExperimentVariant};
//!
//! let inputs = load_scenario_inputs("data").expect("input tables");
//! let variants = vec![
//!     ExperimentVariant::new("nearest", ScenarioParams::default()),
//!     ExperimentVariant::new(
//!         "reservation",
//!         ScenarioParams::default().with_policy(DispatchPolicyKind::PriorityReservation),
//!     ),
//! ];
//! let results = run_parallel_experiments(&inputs, variants, None);
//! ```

pub mod export;
pub mod loader;
pub mod metrics;
pub mod runner;
pub mod workload;

pub use export::{write_dispatch_log_csv, write_results_csv, write_results_json};
pub use loader::load_scenario_inputs;
pub use metrics::{extract_metrics, SimulationResult};
pub use runner::{run_parallel_experiments, run_single_simulation, ExperimentVariant};
