//! Shot driver (4.6): runs `shots` independent evolutions of an instruction
//! list, building the classical-outcome histogram either by collapsing each
//! shot individually or, when the sampling optimiser allows it, by running
//! the circuit once and drawing every shot's outcome from the final joint
//! marginal of the measured qubits.

use std::collections::HashMap;

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use qns_core::types::instruction::format_hex;
use qns_core::{ClassicalState, Instruction, Result};
use qns_tensor::StateTensor;

use crate::dispatcher;
use crate::emission::emit_statevector;
use crate::sampling;
use crate::state::SimulatorState;

/// The outcome of driving `shots` worth of evolution for one experiment.
#[derive(Debug, Clone)]
pub struct ShotDriverOutput {
    pub counts: HashMap<String, usize>,
    pub memory: Option<Vec<String>>,
    /// The final state tensor of the last shot run, captured only when the
    /// caller asked for it (the state-vector simulator mode).
    pub final_tensor: Option<StateTensor>,
}

/// Drives `shots` shots of `instructions` against an `n_qubits`-qubit system,
/// starting each shot from `initial` (or `|0...0>` when absent).
///
/// `capture_final_state` retains the last shot's tensor for the caller (the
/// state-vector simulator mode); sampling-mode callers pass `false` since
/// `sample_measure` already needs exactly that tensor internally and a
/// second copy would be wasted work.
#[allow(clippy::too_many_arguments)]
pub fn run(
    instructions: &[Instruction],
    n_qubits: usize,
    memory_slots: usize,
    initial: Option<&[Complex64]>,
    seed: u64,
    shots: u64,
    allows_measure_sampling: Option<bool>,
    emit_memory: bool,
    capture_final_state: bool,
) -> Result<ShotDriverOutput> {
    let use_sample_measure = sampling::sample_measure(shots, allows_measure_sampling, instructions);

    if use_sample_measure {
        return run_sample_measure(
            instructions,
            n_qubits,
            memory_slots,
            initial,
            seed,
            shots,
            emit_memory,
            capture_final_state,
        );
    }

    run_per_shot(
        instructions,
        n_qubits,
        memory_slots,
        initial,
        seed,
        shots,
        emit_memory,
        capture_final_state,
    )
}

fn fresh_tensor(n_qubits: usize, initial: Option<&[Complex64]>) -> Result<StateTensor> {
    match initial {
        Some(amps) => StateTensor::from_amplitudes(n_qubits, amps.to_vec()).map_err(Into::into),
        None => Ok(StateTensor::zero_state(n_qubits)),
    }
}

struct ShotResult {
    memory: String,
    tensor: Option<StateTensor>,
}

fn run_per_shot(
    instructions: &[Instruction],
    n_qubits: usize,
    memory_slots: usize,
    initial: Option<&[Complex64]>,
    seed: u64,
    shots: u64,
    emit_memory: bool,
    capture_final_state: bool,
) -> Result<ShotDriverOutput> {
    let run_one = |shot_index: u64| -> Result<ShotResult> {
        let tensor = fresh_tensor(n_qubits, initial)?;
        let sub_seed = seed.wrapping_add(shot_index);
        let mut state = SimulatorState::from_tensor(tensor, sub_seed);
        for instr in instructions {
            dispatcher::dispatch(&mut state, instr)?;
        }
        let memory = state.classical().cmem_hex();
        let tensor = capture_final_state.then(|| state.tensor().clone());
        Ok(ShotResult { memory, tensor })
    };

    // Parallel only when every shot is independent: no shared RNG/state and
    // a deterministic per-shot sub-seed, per the concurrency model (5).
    let results: Vec<Result<ShotResult>> = if shots > 1 {
        (0..shots).into_par_iter().map(run_one).collect()
    } else {
        (0..shots).map(run_one).collect()
    };

    // A zero-classical-slot circuit has no memory word to tally — per §4.6
    // step 2, the "if cmem_slots > 0" guard governs both the memory list and
    // the counts histogram built from it.
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut memory = emit_memory.then(Vec::new);
    let mut final_tensor = None;
    for result in results {
        let result = result?;
        if memory_slots > 0 {
            *counts.entry(result.memory.clone()).or_insert(0) += 1;
        }
        if let Some(list) = memory.as_mut() {
            list.push(result.memory);
        }
        if result.tensor.is_some() {
            final_tensor = result.tensor;
        }
    }

    Ok(ShotDriverOutput {
        counts,
        memory,
        final_tensor,
    })
}

fn run_sample_measure(
    instructions: &[Instruction],
    n_qubits: usize,
    memory_slots: usize,
    initial: Option<&[Complex64]>,
    seed: u64,
    shots: u64,
    emit_memory: bool,
    capture_final_state: bool,
) -> Result<ShotDriverOutput> {
    let tensor = fresh_tensor(n_qubits, initial)?;
    let mut state = SimulatorState::from_tensor(tensor, seed);
    let mut recorded: Vec<(usize, Option<usize>)> = Vec::new();
    for instr in instructions {
        dispatcher::dispatch_sampling(&mut state, instr, &mut recorded)?;
    }

    let mut distinct_qubits: Vec<usize> = recorded.iter().map(|&(q, _)| q).collect();
    distinct_qubits.sort_unstable();
    distinct_qubits.dedup();
    let slot_for = |qubit: usize| recorded.iter().find(|&&(q, _)| q == qubit).and_then(|&(_, slot)| slot);

    let base_classical = *state.classical();
    let probs = joint_marginal(state.tensor(), &distinct_qubits);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut memory = emit_memory.then(Vec::new);

    for _ in 0..shots.max(1) {
        let word = draw_index(&probs, &mut rng);
        let mut classical = base_classical;
        for (j, &qubit) in distinct_qubits.iter().enumerate() {
            if let Some(slot) = slot_for(qubit) {
                let bit = ((word >> j) & 1) as u8;
                classical.write_cmem_bit(slot, bit);
            }
        }
        let hex = format_hex(classical.cmem());
        if memory_slots > 0 {
            *counts.entry(hex.clone()).or_insert(0) += 1;
        }
        if let Some(list) = memory.as_mut() {
            list.push(hex);
        }
    }

    let final_tensor = capture_final_state.then(|| state.tensor().clone());
    Ok(ShotDriverOutput {
        counts,
        memory,
        final_tensor,
    })
}

/// Computes the joint marginal distribution over `qubits` (sorted ascending)
/// as a length-`2^k` probability vector: entry `w` is the probability that
/// qubit `qubits[j]` reads bit `j` of `w`, for every `j`.
fn joint_marginal(tensor: &StateTensor, qubits: &[usize]) -> Vec<f64> {
    let n = tensor.num_qubits();
    let k = qubits.len();
    let mut probs = vec![0.0f64; 1usize << k];
    for (idx, amp) in tensor.amplitudes().indexed_iter() {
        let mut word = 0usize;
        for (j, &qubit) in qubits.iter().enumerate() {
            let axis = n - 1 - qubit;
            if idx[axis] == 1 {
                word |= 1 << j;
            }
        }
        probs[word] += amp.norm_sqr();
    }
    probs
}

/// Draws an index from a discrete distribution `probs` (need not sum to
/// exactly 1 due to floating-point error; the final bucket absorbs slack).
fn draw_index(probs: &[f64], rng: &mut impl Rng) -> usize {
    if probs.is_empty() {
        return 0;
    }
    let total: f64 = probs.iter().sum();
    if total <= 0.0 {
        return 0;
    }
    let draw = rng.gen::<f64>() * total;
    let mut acc = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        acc += p;
        if draw < acc {
            return i;
        }
    }
    probs.len() - 1
}
