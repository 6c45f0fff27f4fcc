//! # QNS CLI
//!
//! Command-line front end for the dense state-vector simulator: loads a
//! qobj document from disk and runs it through one of the three simulator
//! modes.

use std::path::Path;

use anyhow::{Context, Result};
use qns_core::types::qobj::Qobj;
use qns_simulator::{run_qobj, JobResult, SimulatorMode};

/// Reads and parses a qobj document from `path`.
pub fn load_qobj(path: &Path) -> Result<Qobj> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read qobj file: {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse qobj file: {}", path.display()))
}

/// Loads the qobj at `path` and runs it through `mode`, tagging the job with
/// `job_id`.
pub fn run_from_path(path: &Path, mode: SimulatorMode, job_id: impl Into<String>) -> Result<JobResult> {
    let qobj = load_qobj(path)?;
    Ok(run_qobj(&qobj, mode, job_id))
}
