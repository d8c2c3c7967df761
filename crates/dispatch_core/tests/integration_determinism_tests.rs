mod support;

use dispatch_core::routing::TravelTimeKind;
use dispatch_core::runner::run_to_completion;
use dispatch_core::scenario::{DispatchPolicyKind, ScenarioParams};
use dispatch_core::telemetry::{DispatchLog, LogRecord};
use support::world::{TestScenarioBuilder, MINUTE_MS};

fn busy_scenario(params: ScenarioParams) -> TestScenarioBuilder {
    TestScenarioBuilder::new()
        .road("Station North", "Old Town", 4)
        .road("Old Town", "Harbor", 3)
        .road("Station South", "Harbor", 2)
        .edge("Station North", "Harbor", 9)
        .unit("A1", "Station North")
        .unit("A2", "Station South")
        .unit("A3", "Station South")
        .call(1, 0, "Old Town", "Cardiac")
        .call(2, 0, "Harbor", "Fall")
        .call(3, 30_000, "Harbor", "Stroke")
        .call(4, 90_000, "Old Town", "Fracture")
        .call(5, 90_000, "Harbor", "Fall")
        .params(params)
}

fn run_log(params: ScenarioParams) -> Vec<LogRecord> {
    let (mut world, mut schedule) = busy_scenario(params).build();
    run_to_completion(&mut world, &mut schedule, 10_000).expect("run");
    world.resource::<DispatchLog>().records.clone()
}

#[test]
fn identical_runs_produce_identical_logs() {
    let params = ScenarioParams::default().with_service_time_ms(5 * MINUTE_MS);
    let first = run_log(params.clone());
    let second = run_log(params);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn identical_runs_with_reservation_policy_are_deterministic() {
    let params = ScenarioParams::default()
        .with_policy(DispatchPolicyKind::PriorityReservation)
        .with_service_time_ms(5 * MINUTE_MS)
        .with_reserved_units(1);
    let first = run_log(params.clone());
    let second = run_log(params);
    assert_eq!(first, second);
}

#[test]
fn travel_time_backends_do_not_change_the_outcome() {
    let on_demand = run_log(
        ScenarioParams::default()
            .with_service_time_ms(5 * MINUTE_MS)
            .with_travel_time(TravelTimeKind::OnDemand),
    );
    let all_pairs = run_log(
        ScenarioParams::default()
            .with_service_time_ms(5 * MINUTE_MS)
            .with_travel_time(TravelTimeKind::AllPairs),
    );
    assert_eq!(on_demand, all_pairs);
}
