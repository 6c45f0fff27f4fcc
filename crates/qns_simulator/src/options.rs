//! Option & validation layer: resolves backend options, experiment config,
//! and job config into one concrete set of run options, applying the
//! documented precedence and bounds, and surfacing non-fatal warnings.

use num_complex::Complex64;
use qns_core::backend::{available_memory_bytes, max_qubits_for_memory, ABSOLUTE_MAX_QUBITS};
use qns_core::types::qobj::{Experiment, ExperimentConfig, QobjConfig};
use qns_core::{QnsError, Result};

/// Fully-resolved options for one experiment run.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub n_qubits: usize,
    pub memory_slots: usize,
    pub shots: u64,
    pub seed: u64,
    pub initial_statevector: Option<Vec<Complex64>>,
    pub chop_threshold: f64,
    pub allows_measure_sampling: Option<bool>,
    pub emit_memory: bool,
}

/// Resolves run options for `experiment` against the job-wide `qobj_config`,
/// consulting `backend_initial_statevector`/`backend_chop_threshold` as the
/// highest-precedence overrides (backend options > experiment config >
/// defaults).
pub fn resolve(
    qobj_config: &QobjConfig,
    experiment: &Experiment,
    backend_initial_statevector: Option<&[Complex64]>,
    backend_chop_threshold: Option<f64>,
) -> Result<ResolvedOptions> {
    let experiment_config = experiment.config.as_ref();

    let n_qubits = experiment_config
        .and_then(|c| c.n_qubits)
        .or(qobj_config.n_qubits)
        .ok_or_else(|| QnsError::config("experiment is missing n_qubits"))?;

    let max_n = max_qubits_for_memory(available_memory_bytes()).min(ABSOLUTE_MAX_QUBITS);
    if n_qubits > max_n {
        return Err(QnsError::DimensionMismatch(max_n, n_qubits));
    }

    let memory_slots = experiment_config
        .and_then(|c| c.memory_slots)
        .or(qobj_config.memory_slots)
        .unwrap_or(0);
    if memory_slots == 0 {
        tracing::warn!("experiment declares zero classical memory slots");
    }

    if !experiment
        .instructions
        .iter()
        .any(|instr| instr.name == "measure")
    {
        tracing::warn!("experiment contains no measurement instruction");
    }

    let shots = qobj_config.shots_or_default();

    let seed = experiment_config
        .and_then(|c| c.seed)
        .or(qobj_config.seed)
        .unwrap_or_else(random_seed);

    let initial_statevector = resolve_initial_statevector(
        backend_initial_statevector,
        experiment_config,
        qobj_config,
        n_qubits,
    )?;

    let chop_threshold = backend_chop_threshold
        .or_else(|| experiment_config.and_then(|c| c.chop_threshold))
        .or(qobj_config.chop_threshold)
        .unwrap_or(1e-15);

    let allows_measure_sampling = experiment_config
        .and_then(|c| c.allows_measure_sampling)
        .or(qobj_config.allows_measure_sampling);

    let emit_memory = qobj_config.memory.unwrap_or(false);

    Ok(ResolvedOptions {
        n_qubits,
        memory_slots,
        shots,
        seed,
        initial_statevector,
        chop_threshold,
        allows_measure_sampling,
        emit_memory,
    })
}

fn resolve_initial_statevector(
    backend: Option<&[Complex64]>,
    experiment_config: Option<&ExperimentConfig>,
    qobj_config: &QobjConfig,
    n_qubits: usize,
) -> Result<Option<Vec<Complex64>>> {
    let pairs = backend.map(|amps| amps.iter().map(|c| (c.re, c.im)).collect::<Vec<_>>()).or_else(|| {
        experiment_config
            .and_then(|c| c.initial_statevector.clone())
            .or_else(|| qobj_config.initial_statevector.clone())
    });

    let Some(pairs) = pairs else {
        return Ok(None);
    };

    let expected = 1usize << n_qubits;
    if pairs.len() != expected {
        return Err(QnsError::DimensionMismatch(expected, pairs.len()));
    }

    let amplitudes: Vec<Complex64> = pairs.into_iter().map(|(re, im)| Complex64::new(re, im)).collect();
    let norm_sq: f64 = amplitudes.iter().map(|a| a.norm_sqr()).sum();
    if (norm_sq.sqrt() - 1.0).abs() > 1e-12 {
        return Err(QnsError::NotNormalised(norm_sq.sqrt()));
    }

    Ok(Some(amplitudes))
}

fn random_seed() -> u64 {
    use rand::Rng;
    rand::thread_rng().gen_range(0..(1u64 << 31))
}
