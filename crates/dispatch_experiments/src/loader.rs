//! CSV loaders for the four input tables.
//!
//! Header names follow the operational exports these tables come from:
//! `location_network.csv` (`Start`, `End`, `Travel Time`, `Traffic Delay`),
//! `call_priority.csv` (`Call Type`, `Priority`), `ambulance.csv`
//! (`Ambulance Number`, `Staging Location`) and `calls.csv` (`Call ID`,
//! `Location`, `Call Type`, optional `Arrival Time`). Times in the tables
//! are fractional minutes (arrival times fractional seconds); everything is
//! converted to simulation milliseconds here.

use std::fmt;
use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use dispatch_core::ecs::PriorityLevel;
use dispatch_core::scenario::{
    AmbulanceRecord, CallRecord, EdgeRecord, PriorityMapping, ScenarioInputs,
};

const MINUTE_MS: f64 = 60_000.0;

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Csv(csv::Error),
    Malformed { table: &'static str, detail: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "io error: {err}"),
            LoadError::Csv(err) => write!(f, "csv error: {err}"),
            LoadError::Malformed { table, detail } => {
                write!(f, "malformed {table} row: {detail}")
            }
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct NetworkRow {
    #[serde(rename = "Start")]
    start: String,
    #[serde(rename = "End")]
    end: String,
    #[serde(rename = "Travel Time")]
    travel_time: String,
    #[serde(rename = "Traffic Delay")]
    traffic_delay: String,
}

/// Load network edges. Edge weight is travel time plus traffic delay, in
/// minutes. Rows with non-numeric or negative weights are skipped with a
/// warning rather than failing the whole table.
pub fn load_network_edges(path: impl AsRef<Path>) -> Result<Vec<EdgeRecord>, LoadError> {
    let mut reader = csv::Reader::from_reader(File::open(path.as_ref())?);
    let mut edges = Vec::new();
    for row in reader.deserialize::<NetworkRow>() {
        let row = row?;
        let parsed = row
            .travel_time
            .trim()
            .parse::<f64>()
            .and_then(|travel| row.traffic_delay.trim().parse::<f64>().map(|d| travel + d));
        match parsed {
            Ok(total_minutes) if total_minutes >= 0.0 => edges.push(EdgeRecord {
                from: row.start,
                to: row.end,
                cost_ms: (total_minutes * MINUTE_MS).round() as u64,
            }),
            _ => {
                eprintln!(
                    "Warning: skipping network row with invalid data: {} -> {}",
                    row.start, row.end
                );
            }
        }
    }
    Ok(edges)
}

#[derive(Debug, Deserialize)]
struct PriorityRow {
    #[serde(rename = "Call Type")]
    call_type: String,
    #[serde(rename = "Priority")]
    priority: String,
}

/// Load the call-type priority mapping. Priority codes are integers with 1
/// as the most urgent.
pub fn load_priority_mapping(path: impl AsRef<Path>) -> Result<PriorityMapping, LoadError> {
    let mut reader = csv::Reader::from_reader(File::open(path.as_ref())?);
    let mut mapping = PriorityMapping::default();
    for row in reader.deserialize::<PriorityRow>() {
        let row = row?;
        let code = row
            .priority
            .trim()
            .parse::<u8>()
            .map_err(|err| LoadError::Malformed {
                table: "call_priority",
                detail: format!("priority '{}' for '{}': {err}", row.priority, row.call_type),
            })?;
        mapping.insert(row.call_type, PriorityLevel::from_code(code));
    }
    Ok(mapping)
}

#[derive(Debug, Deserialize)]
struct AmbulanceRow {
    #[serde(rename = "Ambulance Number")]
    id: String,
    #[serde(rename = "Staging Location")]
    staging_location: String,
}

pub fn load_ambulances(path: impl AsRef<Path>) -> Result<Vec<AmbulanceRecord>, LoadError> {
    let mut reader = csv::Reader::from_reader(File::open(path.as_ref())?);
    let mut records = Vec::new();
    for row in reader.deserialize::<AmbulanceRow>() {
        let row = row?;
        records.push(AmbulanceRecord {
            id: row.id,
            base_location: row.staging_location,
        });
    }
    Ok(records)
}

#[derive(Debug, Deserialize)]
struct CallRow {
    #[serde(rename = "Call ID")]
    id: u64,
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Call Type")]
    call_type: String,
    /// Seconds since the start of the run. Older exports lack this column;
    /// those calls all arrive at t=0.
    #[serde(rename = "Arrival Time", default)]
    arrival_secs: Option<f64>,
}

pub fn load_calls(path: impl AsRef<Path>) -> Result<Vec<CallRecord>, LoadError> {
    let mut reader = csv::Reader::from_reader(File::open(path.as_ref())?);
    let mut records = Vec::new();
    for row in reader.deserialize::<CallRow>() {
        let row = row?;
        let arrival_secs = row.arrival_secs.unwrap_or(0.0);
        if arrival_secs < 0.0 {
            return Err(LoadError::Malformed {
                table: "calls",
                detail: format!("negative arrival time for call {}", row.id),
            });
        }
        records.push(CallRecord {
            id: row.id,
            arrival_ms: (arrival_secs * 1_000.0).round() as u64,
            origin: row.location,
            call_type: row.call_type,
        });
    }
    Ok(records)
}

/// Load all four tables from their conventional file names under `dir`.
pub fn load_scenario_inputs(dir: impl AsRef<Path>) -> Result<ScenarioInputs, LoadError> {
    let dir = dir.as_ref();
    Ok(ScenarioInputs {
        edges: load_network_edges(dir.join("location_network.csv"))?,
        priorities: load_priority_mapping(dir.join("call_priority.csv"))?,
        ambulances: load_ambulances(dir.join("ambulance.csv"))?,
        calls: load_calls(dir.join("calls.csv"))?,
    })
}
