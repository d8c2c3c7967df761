pub mod abandon_check;
pub mod arrival_on_scene;
pub mod call_arrival;
pub mod departure_complete;
pub mod dispatch_attempt;
pub mod return_complete;
pub mod service_complete;

#[cfg(test)]
mod end_to_end_tests {
    use bevy_ecs::prelude::World;

    use crate::ecs::{Ambulance, AmbulanceState, Call, CallState, PriorityLevel, UnitId};
    use crate::runner::{run_until_empty, simulation_schedule};
    use crate::scenario::{
        build_scenario, AmbulanceRecord, CallRecord, EdgeRecord, PriorityMapping, ScenarioInputs,
        ScenarioParams,
    };
    use crate::telemetry::SimTelemetry;

    fn line_network() -> Vec<EdgeRecord> {
        // Station <-> Plaza <-> Docks, one minute per hop.
        let hops = [
            ("Station", "Plaza"),
            ("Plaza", "Station"),
            ("Plaza", "Docks"),
            ("Docks", "Plaza"),
        ];
        hops.iter()
            .map(|(from, to)| EdgeRecord {
                from: (*from).into(),
                to: (*to).into(),
                cost_ms: 60_000,
            })
            .collect()
    }

    fn priorities() -> PriorityMapping {
        let mut map = PriorityMapping::default();
        map.insert("Cardiac", PriorityLevel::Critical);
        map.insert("Fall", PriorityLevel::Low);
        map
    }

    #[test]
    fn simulates_one_call_end_to_end() {
        let inputs = ScenarioInputs {
            edges: line_network(),
            ambulances: vec![AmbulanceRecord {
                id: "A1".into(),
                base_location: "Station".into(),
            }],
            calls: vec![CallRecord {
                id: 7,
                arrival_ms: 1_000,
                origin: "Docks".into(),
                call_type: "Cardiac".into(),
            }],
            priorities: priorities(),
        };
        let params = ScenarioParams::default().with_service_time_ms(5 * 60_000);

        let mut world = World::new();
        build_scenario(&mut world, &params, &inputs).expect("build");
        let mut schedule = simulation_schedule();
        let steps = run_until_empty(&mut world, &mut schedule, 1_000);
        assert!(steps < 1_000, "runner did not converge");

        let call = world.query::<&Call>().single(&world);
        assert_eq!(call.state, CallState::Completed);

        let unit = world.query::<&Ambulance>().single(&world);
        assert_eq!(unit.state, AmbulanceState::Idle);
        assert_eq!(unit.location, unit.base);
        assert_eq!(unit.assigned_call, None);

        let telemetry = world.resource::<SimTelemetry>();
        assert_eq!(telemetry.completed_calls.len(), 1);
        let record = &telemetry.completed_calls[0];
        assert_eq!(record.arrived_at, 1_000);
        assert_eq!(record.assigned_at, 1_000);
        // Station -> Docks is two one-minute hops.
        assert_eq!(record.response_time(), 2 * 60_000);
        assert!(record.assigned_at <= record.en_route_at);
        assert!(record.en_route_at <= record.on_scene_at);
        assert!(record.on_scene_at <= record.completed_at);
        // Travel out, service, travel back.
        assert_eq!(unit.busy_ms, 2 * 60_000 + 5 * 60_000 + 2 * 60_000);
    }

    #[test]
    fn simulates_two_concurrent_calls_end_to_end() {
        let inputs = ScenarioInputs {
            edges: line_network(),
            ambulances: vec![
                AmbulanceRecord {
                    id: "A1".into(),
                    base_location: "Station".into(),
                },
                AmbulanceRecord {
                    id: "A2".into(),
                    base_location: "Plaza".into(),
                },
            ],
            calls: vec![
                CallRecord {
                    id: 1,
                    arrival_ms: 0,
                    origin: "Docks".into(),
                    call_type: "Cardiac".into(),
                },
                CallRecord {
                    id: 2,
                    arrival_ms: 30_000,
                    origin: "Plaza".into(),
                    call_type: "Fall".into(),
                },
            ],
            priorities: priorities(),
        };
        let params = ScenarioParams::default()
            .with_service_time_ms(60_000)
            .with_reserved_units(0);

        let mut world = World::new();
        build_scenario(&mut world, &params, &inputs).expect("build");
        let mut schedule = simulation_schedule();
        let steps = run_until_empty(&mut world, &mut schedule, 1_000);
        assert!(steps < 1_000, "runner did not converge");

        let calls: Vec<&Call> = world.query::<&Call>().iter(&world).collect();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.state == CallState::Completed));

        for (unit_id, unit) in world.query::<(&UnitId, &Ambulance)>().iter(&world) {
            assert_eq!(unit.state, AmbulanceState::Idle, "unit {} mid-cycle", unit_id.0);
            assert!(unit.busy_ms > 0, "unit {} never served", unit_id.0);
        }

        let telemetry = world.resource::<SimTelemetry>();
        assert_eq!(telemetry.completed_calls.len(), 2);
        assert!(telemetry.abandoned_calls.is_empty());
    }
}
