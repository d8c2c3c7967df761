//! Example: run a small hand-built scenario and print its dispatch log.

use bevy_ecs::prelude::World;
use dispatch_core::ecs::PriorityLevel;
use dispatch_core::runner::{run_to_completion, simulation_schedule};
use dispatch_core::scenario::{
    build_scenario, AmbulanceRecord, CallRecord, EdgeRecord, PriorityMapping, ScenarioInputs,
    ScenarioParams,
};
use dispatch_core::telemetry::{DispatchLog, SimTelemetry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let minutes = |m: u64| m * 60_000;

    let mut priorities = PriorityMapping::default();
    priorities.insert("Cardiac", PriorityLevel::Critical);
    priorities.insert("Fracture", PriorityLevel::Medium);

    let inputs = ScenarioInputs {
        edges: vec![
            EdgeRecord { from: "Station North".into(), to: "Old Town".into(), cost_ms: minutes(4) },
            EdgeRecord { from: "Old Town".into(), to: "Station North".into(), cost_ms: minutes(5) },
            EdgeRecord { from: "Old Town".into(), to: "Harbor".into(), cost_ms: minutes(3) },
            EdgeRecord { from: "Harbor".into(), to: "Old Town".into(), cost_ms: minutes(3) },
            EdgeRecord { from: "Station South".into(), to: "Harbor".into(), cost_ms: minutes(2) },
            EdgeRecord { from: "Harbor".into(), to: "Station South".into(), cost_ms: minutes(2) },
        ],
        ambulances: vec![
            AmbulanceRecord { id: "A1".into(), base_location: "Station North".into() },
            AmbulanceRecord { id: "A2".into(), base_location: "Station South".into() },
        ],
        calls: vec![
            CallRecord { id: 1, arrival_ms: 0, origin: "Old Town".into(), call_type: "Cardiac".into() },
            CallRecord { id: 2, arrival_ms: minutes(1), origin: "Harbor".into(), call_type: "Fracture".into() },
        ],
        priorities,
    };

    let params = ScenarioParams::default().with_service_time_ms(minutes(8));
    let mut world = World::new();
    build_scenario(&mut world, &params, &inputs)?;

    let mut schedule = simulation_schedule();
    let summary = run_to_completion(&mut world, &mut schedule, 100_000)?;

    println!("=== Dispatch log ===");
    for record in &world.resource::<DispatchLog>().records {
        let call = record
            .call_id
            .map(|id| format!("call {}", id.0))
            .unwrap_or_default();
        let unit = record
            .unit_id
            .as_ref()
            .map(|id| format!("unit {}", id.0))
            .unwrap_or_default();
        println!("t={:>7}ms  {:?}  {call} {unit}", record.timestamp, record.kind);
    }

    println!("\n=== Responses ===");
    for record in &world.resource::<SimTelemetry>().completed_calls {
        println!(
            "call {} ({:?}) served by {} in {:.1} min",
            record.call_id.0,
            record.priority,
            record.unit_id.0,
            record.response_time() as f64 / 60_000.0,
        );
    }

    println!(
        "\ncompleted={} abandoned={} unresolved={} steps={} end={}ms",
        summary.completed_calls,
        summary.abandoned_calls,
        summary.unresolved_calls,
        summary.steps,
        summary.end_time_ms,
    );
    Ok(())
}
