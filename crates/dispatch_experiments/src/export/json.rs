use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use crate::metrics::SimulationResult;

/// Write per-variant results as a JSON object keyed by variant label.
/// `BTreeMap` keeps the output stable across runs.
pub fn write_results_json(
    path: impl AsRef<Path>,
    results: &[(String, SimulationResult)],
) -> Result<(), Box<dyn std::error::Error>> {
    let by_label: BTreeMap<&str, &SimulationResult> = results
        .iter()
        .map(|(label, result)| (label.as_str(), result))
        .collect();
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &by_label)?;
    Ok(())
}
