//! Performance benchmarks for dispatch_core using Criterion.rs.

use bevy_ecs::prelude::World;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dispatch_core::network::{LocationId, RoadNetwork};
use dispatch_core::routing::{
    AllPairsProvider, CachedProvider, DijkstraProvider, TravelTimeKind, TravelTimeProvider,
};
use dispatch_core::runner::{run_until_empty, simulation_schedule};
use dispatch_core::scenario::{
    build_scenario, AmbulanceRecord, CallRecord, EdgeRecord, PriorityMapping, ScenarioInputs,
    ScenarioParams,
};

/// Ring network of `n` nodes with asymmetric forward/backward costs.
fn ring_network(n: u32) -> RoadNetwork {
    let mut network = RoadNetwork::new();
    for i in 0..n {
        let from = format!("L{i}");
        let to = format!("L{}", (i + 1) % n);
        network.add_edge(&from, &to, 60_000);
        network.add_edge(&to, &from, 90_000);
    }
    network
}

fn ring_inputs(nodes: u32, units: u32, calls: u64) -> ScenarioInputs {
    let mut edges = Vec::new();
    for i in 0..nodes {
        let from = format!("L{i}");
        let to = format!("L{}", (i + 1) % nodes);
        edges.push(EdgeRecord {
            from: from.clone(),
            to: to.clone(),
            cost_ms: 60_000,
        });
        edges.push(EdgeRecord {
            from: to,
            to: from,
            cost_ms: 90_000,
        });
    }
    let ambulances = (0..units)
        .map(|i| AmbulanceRecord {
            id: format!("A{i:03}"),
            base_location: format!("L{}", (i * nodes / units.max(1)) % nodes),
        })
        .collect();
    let calls = (0..calls)
        .map(|i| CallRecord {
            id: i,
            arrival_ms: i * 30_000,
            origin: format!("L{}", (i * 7) % nodes as u64),
            call_type: "Fall".into(),
        })
        .collect();
    let mut priorities = PriorityMapping::default();
    priorities.insert("Fall", dispatch_core::ecs::PriorityLevel::Medium);
    ScenarioInputs {
        edges,
        ambulances,
        calls,
        priorities,
    }
}

fn bench_simulation_run(c: &mut Criterion) {
    let scenarios = vec![("small", 20, 4, 50), ("medium", 50, 10, 200), ("large", 100, 20, 500)];

    let mut group = c.benchmark_group("simulation_run");
    for (name, nodes, units, calls) in scenarios {
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(nodes, units, calls),
            |b, &(nodes, units, calls)| {
                let inputs = ring_inputs(nodes, units, calls);
                b.iter(|| {
                    let mut world = World::new();
                    let params =
                        ScenarioParams::default().with_travel_time(TravelTimeKind::AllPairs);
                    build_scenario(&mut world, &params, &inputs).expect("build");
                    let mut schedule = simulation_schedule();
                    black_box(run_until_empty(&mut world, &mut schedule, 1_000_000));
                });
            },
        );
    }
    group.finish();
}

fn bench_travel_time_providers(c: &mut Criterion) {
    let network = ring_network(100);
    let queries: Vec<(LocationId, LocationId)> = (0..100u32)
        .map(|i| (LocationId(i), LocationId((i * 37 + 11) % 100)))
        .collect();

    let mut group = c.benchmark_group("travel_time_providers");

    let dijkstra = DijkstraProvider::new(network.clone());
    group.bench_function("dijkstra_100_queries", |b| {
        b.iter(|| {
            for &(from, to) in &queries {
                black_box(dijkstra.travel_time(from, to).expect("query"));
            }
        });
    });

    let cached = CachedProvider::new(Box::new(DijkstraProvider::new(network.clone())), 20_000);
    group.bench_function("cached_dijkstra_100_queries", |b| {
        b.iter(|| {
            for &(from, to) in &queries {
                black_box(cached.travel_time(from, to).expect("query"));
            }
        });
    });

    group.bench_function("all_pairs_setup", |b| {
        b.iter(|| black_box(AllPairsProvider::new(&network)));
    });

    let all_pairs = AllPairsProvider::new(&network);
    group.bench_function("all_pairs_100_lookups", |b| {
        b.iter(|| {
            for &(from, to) in &queries {
                black_box(all_pairs.travel_time(from, to).expect("query"));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_simulation_run, bench_travel_time_providers);
criterion_main!(benches);
