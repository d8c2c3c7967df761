//! Parallel simulation execution using rayon.
//!
//! Each run owns an isolated world; nothing is shared between variants, so
//! policy comparisons and seed sweeps parallelize without locks.

use std::fmt;

use bevy_ecs::prelude::World;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use dispatch_core::errors::{EngineError, InputError};
use dispatch_core::runner::{run_to_completion, simulation_schedule, RunSummary};
use dispatch_core::scenario::{build_scenario, ScenarioInputs, ScenarioParams};
use dispatch_core::telemetry::{DispatchLog, LogRecord};

use crate::metrics::{extract_metrics, SimulationResult};

/// Upper bound on events per run; a backstop against misconfigured
/// scenarios, far above anything a real input log produces.
const MAX_STEPS: usize = 2_000_000;

#[derive(Debug)]
pub enum SimulationError {
    Input(InputError),
    Engine(EngineError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Input(err) => write!(f, "input error: {err}"),
            SimulationError::Engine(err) => write!(f, "engine error: {err}"),
        }
    }
}

impl std::error::Error for SimulationError {}

impl From<InputError> for SimulationError {
    fn from(err: InputError) -> Self {
        SimulationError::Input(err)
    }
}

impl From<EngineError> for SimulationError {
    fn from(err: EngineError) -> Self {
        SimulationError::Engine(err)
    }
}

/// One labeled parameter set in a comparison or sweep.
#[derive(Debug, Clone)]
pub struct ExperimentVariant {
    pub label: String,
    pub params: ScenarioParams,
}

impl ExperimentVariant {
    pub fn new(label: impl Into<String>, params: ScenarioParams) -> Self {
        Self {
            label: label.into(),
            params,
        }
    }
}

/// Everything a single run produces.
#[derive(Debug, Clone)]
pub struct SimulationArtifacts {
    pub metrics: SimulationResult,
    pub summary: RunSummary,
    pub dispatch_log: Vec<LogRecord>,
}

/// Run one parameter set to completion and return metrics, run summary, and
/// the dispatch log.
pub fn run_single_simulation_with_artifacts(
    inputs: &ScenarioInputs,
    params: &ScenarioParams,
) -> Result<SimulationArtifacts, SimulationError> {
    let mut world = World::new();
    build_scenario(&mut world, params, inputs)?;

    let mut schedule = simulation_schedule();
    let summary = run_to_completion(&mut world, &mut schedule, MAX_STEPS)?;

    let metrics = extract_metrics(&mut world);
    let dispatch_log = std::mem::take(&mut world.resource_mut::<DispatchLog>().records);
    Ok(SimulationArtifacts {
        metrics,
        summary,
        dispatch_log,
    })
}

/// Run a single simulation and return only its metrics.
pub fn run_single_simulation(
    inputs: &ScenarioInputs,
    params: &ScenarioParams,
) -> Result<SimulationResult, SimulationError> {
    run_single_simulation_with_artifacts(inputs, params).map(|artifacts| artifacts.metrics)
}

/// Run every variant against the same inputs in parallel.
///
/// Results come back in variant order. A failed variant reports its error in
/// place without aborting the others.
pub fn run_parallel_experiments(
    inputs: &ScenarioInputs,
    variants: Vec<ExperimentVariant>,
    num_threads: Option<usize>,
) -> Vec<(String, Result<SimulationResult, SimulationError>)> {
    run_parallel_experiments_with_progress(inputs, variants, num_threads, true)
}

/// Run every variant against the same inputs in parallel, with an optional
/// progress bar.
pub fn run_parallel_experiments_with_progress(
    inputs: &ScenarioInputs,
    variants: Vec<ExperimentVariant>,
    num_threads: Option<usize>,
    show_progress: bool,
) -> Vec<(String, Result<SimulationResult, SimulationError>)> {
    let total = variants.len();
    let progress = if show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(bar)
    } else {
        None
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build().expect("Failed to create thread pool");

    let progress_clone = progress.clone();
    let results = pool.install(|| {
        variants
            .par_iter()
            .map(|variant| {
                let result = run_single_simulation(inputs, &variant.params);
                if let Some(ref bar) = progress_clone {
                    bar.inc(1);
                }
                (variant.label.clone(), result)
            })
            .collect()
    });

    if let Some(ref bar) = progress {
        bar.finish_with_message("Completed");
    }

    results
}
