//! Example: compare dispatch policies on one synthetic workload.
//!
//! Builds a small city network, generates a seeded call workload, runs both
//! policies (each with both travel-time backends) in parallel, prints the
//! comparison, and exports results plus one dispatch log.

use dispatch_core::ecs::PriorityLevel;
use dispatch_core::routing::TravelTimeKind;
use dispatch_core::scenario::{
    AmbulanceRecord, DispatchPolicyKind, EdgeRecord, PriorityMapping, ScenarioInputs,
    ScenarioParams,
};
use dispatch_experiments::runner::{
    run_parallel_experiments, run_single_simulation_with_artifacts, ExperimentVariant,
};
use dispatch_experiments::workload::{generate_calls, WorkloadConfig};
use dispatch_experiments::{write_dispatch_log_csv, write_results_csv};

fn city_inputs() -> ScenarioInputs {
    let roads: &[(&str, &str, u64)] = &[
        ("Station North", "Old Town", 4),
        ("Old Town", "Station North", 5),
        ("Old Town", "Harbor", 3),
        ("Harbor", "Old Town", 3),
        ("Station South", "Harbor", 2),
        ("Harbor", "Station South", 2),
        ("Old Town", "University", 6),
        ("University", "Old Town", 6),
        ("Station North", "University", 7),
        ("University", "Station North", 8),
    ];
    let mut priorities = PriorityMapping::default();
    priorities.insert("Cardiac", PriorityLevel::Critical);
    priorities.insert("Stroke", PriorityLevel::High);
    priorities.insert("Fracture", PriorityLevel::Medium);
    priorities.insert("Fall", PriorityLevel::Low);

    ScenarioInputs {
        edges: roads
            .iter()
            .map(|(from, to, minutes)| EdgeRecord {
                from: (*from).into(),
                to: (*to).into(),
                cost_ms: minutes * 60_000,
            })
            .collect(),
        ambulances: vec![
            AmbulanceRecord { id: "A1".into(), base_location: "Station North".into() },
            AmbulanceRecord { id: "A2".into(), base_location: "Station South".into() },
            AmbulanceRecord { id: "A3".into(), base_location: "Station South".into() },
        ],
        calls: generate_calls(&WorkloadConfig {
            seed: 42,
            call_count: 120,
            calls_per_min: 0.8,
            origins: vec!["Old Town".into(), "Harbor".into(), "University".into()],
            call_types: vec![
                ("Cardiac".into(), 1.0),
                ("Stroke".into(), 2.0),
                ("Fracture".into(), 3.0),
                ("Fall".into(), 4.0),
            ],
        }),
        priorities,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Generating workload...");
    let inputs = city_inputs();
    println!(
        "{} calls over {} locations, {} units",
        inputs.calls.len(),
        5,
        inputs.ambulances.len()
    );

    let base = ScenarioParams::default().with_service_time_ms(12 * 60_000);
    let variants = vec![
        ExperimentVariant::new("nearest/on-demand", base.clone()),
        ExperimentVariant::new(
            "nearest/all-pairs",
            base.clone().with_travel_time(TravelTimeKind::AllPairs),
        ),
        ExperimentVariant::new(
            "reservation/on-demand",
            base.clone()
                .with_policy(DispatchPolicyKind::PriorityReservation)
                .with_reserved_units(1),
        ),
        ExperimentVariant::new(
            "reservation/all-pairs",
            base.clone()
                .with_policy(DispatchPolicyKind::PriorityReservation)
                .with_reserved_units(1)
                .with_travel_time(TravelTimeKind::AllPairs),
        ),
    ];

    println!("Running {} variants in parallel...", variants.len());
    let outcomes = run_parallel_experiments(&inputs, variants, None);

    let mut results = Vec::new();
    println!("\n=== Comparison ===");
    for (label, outcome) in outcomes {
        match outcome {
            Ok(metrics) => {
                println!(
                    "{label:<24} completed={:<4} abandoned={:<3} avg_response={:>6.1}min p90={:>6.1}min util={:>5.1}%",
                    metrics.completed_calls,
                    metrics.abandoned_calls,
                    metrics.avg_response_time_ms / 60_000.0,
                    metrics.p90_response_time_ms / 60_000.0,
                    metrics.mean_utilization * 100.0,
                );
                results.push((label, metrics));
            }
            Err(error) => eprintln!("{label}: run failed: {error}"),
        }
    }

    write_results_csv("policy_comparison.csv", &results)?;
    println!("\nExported results to policy_comparison.csv");

    let artifacts = run_single_simulation_with_artifacts(&inputs, &base)?;
    write_dispatch_log_csv("dispatch_log_nearest.csv", &artifacts.dispatch_log)?;
    println!("Exported dispatch log to dispatch_log_nearest.csv");

    Ok(())
}
