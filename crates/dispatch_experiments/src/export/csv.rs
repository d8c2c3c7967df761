use std::fs::File;
use std::path::Path;

use dispatch_core::clock::EventKind;
use dispatch_core::telemetry::LogRecord;

use crate::metrics::SimulationResult;

fn event_kind_label(kind: EventKind) -> &'static str {
    match kind {
        EventKind::CallArrival => "call_arrival",
        EventKind::DispatchAttempt => "dispatch_attempt",
        EventKind::AssignmentMade => "assignment_made",
        EventKind::PolicyRejected => "policy_rejected",
        EventKind::DepartureComplete => "departure_complete",
        EventKind::ArrivalOnScene => "arrival_on_scene",
        EventKind::ServiceComplete => "service_complete",
        EventKind::ReturnComplete => "return_complete",
        EventKind::AbandonCheck => "abandon_check",
        EventKind::CallAbandoned => "call_abandoned",
    }
}

/// Write one run's ordered dispatch log.
pub fn write_dispatch_log_csv(
    path: impl AsRef<Path>,
    records: &[LogRecord],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_writer(File::create(path.as_ref())?);
    writer.write_record(["event", "timestamp_ms", "call_id", "ambulance_id"])?;
    for record in records {
        writer.write_record([
            event_kind_label(record.kind),
            &record.timestamp.to_string(),
            &record
                .call_id
                .map(|id| id.0.to_string())
                .unwrap_or_default(),
            record
                .unit_id
                .as_ref()
                .map(|id| id.0.as_str())
                .unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write per-variant result rows for a comparison or sweep.
pub fn write_results_csv(
    path: impl AsRef<Path>,
    results: &[(String, SimulationResult)],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_writer(File::create(path.as_ref())?);
    writer.write_record([
        "variant",
        "total_calls",
        "completed_calls",
        "abandoned_calls",
        "policy_rejections",
        "avg_response_time_ms",
        "median_response_time_ms",
        "p90_response_time_ms",
        "mean_utilization",
        "run_duration_ms",
    ])?;
    for (label, result) in results {
        writer.write_record([
            label.as_str(),
            &result.total_calls.to_string(),
            &result.completed_calls.to_string(),
            &result.abandoned_calls.to_string(),
            &result.policy_rejections.to_string(),
            &result.avg_response_time_ms.to_string(),
            &result.median_response_time_ms.to_string(),
            &result.p90_response_time_ms.to_string(),
            &result.mean_utilization.to_string(),
            &result.run_duration_ms.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
