//! Job-level orchestration: runs every experiment in a [`Qobj`] through one
//! [`SimulatorMode`], catching a fatal per-experiment error so that
//! already-completed sibling experiments are still returned (7).

use qns_core::types::qobj::Qobj;
use qns_core::BackendConfiguration;

use crate::modes::{run_experiment, ExperimentData, ExperimentResult, SimulatorMode};

/// One job's full result set, mirroring the per-job output shape of
/// section 6.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct JobResult {
    pub backend_name: String,
    pub backend_version: String,
    pub qobj_id: String,
    pub job_id: String,
    pub results: Vec<ExperimentResult>,
    pub status: String,
    pub success: bool,
    pub time_taken: f64,
}

/// Runs every experiment in `qobj` through `mode`. A fatal error in one
/// experiment is caught and recorded as `success: false` with the error
/// message in that experiment's `status`; sibling experiments still run and
/// are returned. The job as a whole is `success: true` only if every
/// experiment succeeded.
pub fn run_qobj(qobj: &Qobj, mode: SimulatorMode, job_id: impl Into<String>) -> JobResult {
    let start = std::time::Instant::now();
    let backend = BackendConfiguration::new(0);

    let mut results = Vec::with_capacity(qobj.experiments.len());
    let mut all_succeeded = true;

    for experiment in &qobj.experiments {
        match run_experiment(&qobj.config, experiment, mode, None, None) {
            Ok(result) => results.push(result),
            Err(err) => {
                tracing::error!(error = %err, "experiment failed");
                all_succeeded = false;
                results.push(ExperimentResult {
                    seed_simulator: 0,
                    shots: qobj.config.shots_or_default(),
                    status: format!("ERROR: {}", err),
                    success: false,
                    time_taken: 0.0,
                    header: experiment.header.clone(),
                    data: ExperimentData::default(),
                });
            },
        }
    }

    JobResult {
        backend_name: backend.backend_name,
        backend_version: backend.backend_version,
        qobj_id: qobj.qobj_id.clone(),
        job_id: job_id.into(),
        results,
        status: "COMPLETED".to_string(),
        success: all_succeeded,
        time_taken: start.elapsed().as_secs_f64(),
    }
}
