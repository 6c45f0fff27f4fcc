//! The three public simulator modes (2): sampling, state-vector, and split.
//! All three share the same evolution engine (dispatcher, measurement
//! kernel, sampling optimiser, split engine); they differ only in what they
//! ask the shot driver / split engine to return.

use std::collections::HashMap;

use qns_core::types::qobj::{Experiment, ExperimentConfig, Header, QobjConfig};
use qns_core::Result;

use crate::emission::emit_statevector;
use crate::options::{self, ResolvedOptions};
use crate::shot_driver;
use crate::split::{self, ResultTree};
use crate::state::SimulatorState;

/// Which of the three simulator modes to run an experiment through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorMode {
    Sampling,
    Statevector,
    Split,
}

/// The `data` payload of one experiment's result (6): exactly the fields
/// populated depend on which [`SimulatorMode`] produced it.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ExperimentData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<HashMap<String, usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statevector: Option<Vec<(f64, f64)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statevector_tree: Option<ResultTree>,
}

/// One experiment's fully-resolved result, mirroring the per-experiment
/// output shape of section 6.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ExperimentResult {
    pub seed_simulator: u64,
    pub shots: u64,
    pub status: String,
    pub success: bool,
    pub time_taken: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,
    pub data: ExperimentData,
}

/// Runs one experiment through `mode`, resolving its options first (4.7)
/// then dispatching to the shot driver or split engine.
pub fn run_experiment(
    qobj_config: &QobjConfig,
    experiment: &Experiment,
    mode: SimulatorMode,
    backend_initial_statevector: Option<&[num_complex::Complex64]>,
    backend_chop_threshold: Option<f64>,
) -> Result<ExperimentResult> {
    let start = std::time::Instant::now();
    let resolved = options::resolve(qobj_config, experiment, backend_initial_statevector, backend_chop_threshold)?;

    let data = match mode {
        SimulatorMode::Sampling => run_sampling(experiment, &resolved)?,
        SimulatorMode::Statevector => run_statevector(experiment, &resolved)?,
        SimulatorMode::Split => run_split_mode(experiment, &resolved)?,
    };

    Ok(ExperimentResult {
        seed_simulator: resolved.seed,
        shots: resolved.shots,
        status: "DONE".to_string(),
        success: true,
        time_taken: start.elapsed().as_secs_f64(),
        header: experiment.header.clone(),
        data,
    })
}

fn initial_amplitudes(resolved: &ResolvedOptions) -> Option<Vec<num_complex::Complex64>> {
    resolved.initial_statevector.clone()
}

fn run_sampling(experiment: &Experiment, resolved: &ResolvedOptions) -> Result<ExperimentData> {
    let initial = initial_amplitudes(resolved);
    let out = shot_driver::run(
        &experiment.instructions,
        resolved.n_qubits,
        resolved.memory_slots,
        initial.as_deref(),
        resolved.seed,
        resolved.shots,
        resolved.allows_measure_sampling,
        resolved.emit_memory && resolved.memory_slots > 0,
        false,
    )?;
    Ok(ExperimentData {
        counts: Some(out.counts),
        memory: out.memory,
        statevector: None,
        statevector_tree: None,
    })
}

fn run_statevector(experiment: &Experiment, resolved: &ResolvedOptions) -> Result<ExperimentData> {
    let initial = initial_amplitudes(resolved);
    let out = shot_driver::run(
        &experiment.instructions,
        resolved.n_qubits,
        resolved.memory_slots,
        initial.as_deref(),
        resolved.seed,
        resolved.shots,
        resolved.allows_measure_sampling,
        resolved.emit_memory && resolved.memory_slots > 0,
        true,
    )?;
    let statevector = out
        .final_tensor
        .as_ref()
        .map(|tensor| emit_statevector(tensor, resolved.chop_threshold));
    Ok(ExperimentData {
        counts: Some(out.counts),
        memory: out.memory,
        statevector,
        statevector_tree: None,
    })
}

fn run_split_mode(experiment: &Experiment, resolved: &ResolvedOptions) -> Result<ExperimentData> {
    let tensor = match &resolved.initial_statevector {
        Some(amps) => qns_tensor::StateTensor::from_amplitudes(resolved.n_qubits, amps.clone())?,
        None => qns_tensor::StateTensor::zero_state(resolved.n_qubits),
    };
    let state = SimulatorState::from_tensor(tensor, resolved.seed);

    let mut next_seed_state = resolved.seed;
    let mut next_seed = move || {
        next_seed_state = next_seed_state.wrapping_mul(6364136223846793005).wrapping_add(1);
        next_seed_state
    };

    let tree = split::run_split(&experiment.instructions, state, 0, resolved.chop_threshold, &mut next_seed)?;
    let memory = (resolved.emit_memory && resolved.memory_slots > 0).then(|| tree.leaf_values());
    let counts = memory.as_ref().map(|values| {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in values {
            *counts.entry(value.clone()).or_insert(0) += 1;
        }
        counts
    });

    Ok(ExperimentData {
        counts,
        memory,
        statevector: None,
        statevector_tree: Some(tree),
    })
}
