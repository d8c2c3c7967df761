//! Metrics extraction from finished simulation worlds.

use bevy_ecs::prelude::World;

use dispatch_core::clock::SimulationClock;
use dispatch_core::ecs::{Ambulance, UnitId};
use dispatch_core::telemetry::SimTelemetry;

/// Busy time and utilization for one unit.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UnitUtilization {
    pub unit_id: String,
    pub busy_ms: u64,
    /// Busy time over run duration; 0 for a zero-length run.
    pub utilization: f64,
}

/// Aggregated metrics from a single simulation run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SimulationResult {
    pub total_calls: usize,
    pub completed_calls: usize,
    pub abandoned_calls: usize,
    pub policy_rejections: u64,
    /// Response time: call arrival to unit on scene.
    pub avg_response_time_ms: f64,
    pub median_response_time_ms: f64,
    pub p90_response_time_ms: f64,
    pub mean_utilization: f64,
    pub unit_utilization: Vec<UnitUtilization>,
    pub run_duration_ms: u64,
}

impl SimulationResult {
    /// Average, median, and P90 of a sample.
    fn calculate_stats(values: &[u64]) -> (f64, f64, f64) {
        if values.is_empty() {
            return (0.0, 0.0, 0.0);
        }

        let mut sorted = values.to_vec();
        sorted.sort_unstable();

        let avg = sorted.iter().sum::<u64>() as f64 / sorted.len() as f64;
        let median = if sorted.len() % 2 == 0 {
            (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) as f64 / 2.0
        } else {
            sorted[sorted.len() / 2] as f64
        };
        let p90_idx = ((sorted.len() - 1) as f64 * 0.9) as usize;
        let p90 = sorted[p90_idx.min(sorted.len() - 1)] as f64;

        (avg, median, p90)
    }
}

/// Extract metrics from a completed simulation world.
///
/// Response-time statistics come from the telemetry's completed-call
/// records; utilization comes from the busy spans accumulated on each
/// ambulance, including a still-open span on a truncated run.
pub fn extract_metrics(world: &mut World) -> SimulationResult {
    let run_duration_ms = world.resource::<SimulationClock>().now();

    let (completed, abandoned, policy_rejections, response_times) = {
        let telemetry = world.resource::<SimTelemetry>();
        let response_times: Vec<u64> = telemetry
            .completed_calls
            .iter()
            .map(|record| record.response_time())
            .collect();
        (
            telemetry.completed_calls.len(),
            telemetry.abandoned_calls.len(),
            telemetry.policy_rejections,
            response_times,
        )
    };

    let mut unit_utilization: Vec<UnitUtilization> = world
        .query::<(&UnitId, &Ambulance)>()
        .iter(world)
        .map(|(unit_id, unit)| {
            let mut busy_ms = unit.busy_ms;
            if let Some(since) = unit.busy_since {
                busy_ms += run_duration_ms.saturating_sub(since);
            }
            let utilization = if run_duration_ms > 0 {
                busy_ms as f64 / run_duration_ms as f64
            } else {
                0.0
            };
            UnitUtilization {
                unit_id: unit_id.0.clone(),
                busy_ms,
                utilization,
            }
        })
        .collect();
    unit_utilization.sort_by(|a, b| a.unit_id.cmp(&b.unit_id));

    let mean_utilization = if unit_utilization.is_empty() {
        0.0
    } else {
        unit_utilization.iter().map(|u| u.utilization).sum::<f64>() / unit_utilization.len() as f64
    };

    let (avg_response_time_ms, median_response_time_ms, p90_response_time_ms) =
        SimulationResult::calculate_stats(&response_times);

    SimulationResult {
        total_calls: completed + abandoned,
        completed_calls: completed,
        abandoned_calls: abandoned,
        policy_rejections,
        avg_response_time_ms,
        median_response_time_ms,
        p90_response_time_ms,
        mean_utilization,
        unit_utilization,
        run_duration_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_cover_avg_median_and_p90() {
        let values = vec![50, 10, 30, 20, 40];
        let (avg, median, p90) = SimulationResult::calculate_stats(&values);
        assert_eq!(avg, 30.0);
        assert_eq!(median, 30.0);
        assert_eq!(p90, 40.0);
    }

    #[test]
    fn stats_median_averages_the_middle_pair() {
        let values = vec![10, 20, 30, 40];
        let (_, median, _) = SimulationResult::calculate_stats(&values);
        assert_eq!(median, 25.0);
    }

    #[test]
    fn stats_on_empty_sample_are_zero() {
        let (avg, median, p90) = SimulationResult::calculate_stats(&[]);
        assert_eq!(avg, 0.0);
        assert_eq!(median, 0.0);
        assert_eq!(p90, 0.0);
    }
}
