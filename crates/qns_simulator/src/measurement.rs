//! Measurement kernel: marginal probability, Born-rule sampling, collapse,
//! and reset, all expressed as contractions against `qns_tensor::StateTensor`.

use num_complex::Complex64;
use qns_core::{QnsError, Result};
use qns_tensor::{Matrix2x2, StateTensor};
use rand::Rng;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Returns `(p0, p1)`, the marginal probability of finding `qubit` in state
/// `|0>` or `|1>`, summed over every other qubit's amplitude.
pub fn marginal(tensor: &StateTensor, qubit: usize) -> Result<(f64, f64)> {
    let n = tensor.num_qubits();
    if qubit >= n {
        return Err(QnsError::InvalidQubit(qubit, n.saturating_sub(1)));
    }
    let axis = n - 1 - qubit;
    let amplitudes = tensor.amplitudes();
    let mut p0 = 0.0;
    let mut p1 = 0.0;
    for (idx, amp) in amplitudes.indexed_iter() {
        let bit = idx[axis];
        let p = amp.norm_sqr();
        if bit == 0 {
            p0 += p;
        } else {
            p1 += p;
        }
    }
    Ok((p0, p1))
}

/// Draws a Born-rule outcome (0 or 1) given the marginal probabilities.
pub fn sample_outcome(p0: f64, p1: f64, rng: &mut impl Rng) -> u8 {
    let total = p0 + p1;
    if total <= 0.0 {
        return 0;
    }
    let draw: f64 = rng.gen::<f64>() * total;
    if draw < p0 {
        0
    } else {
        1
    }
}

/// Collapses `qubit` to `outcome`, applying the diagonal projector
/// `diag(1/sqrt(p), 0)` (outcome 0) or `diag(0, 1/sqrt(p))` (outcome 1).
/// Renormalizes by construction; no separate normalization pass is needed.
pub fn collapse(tensor: &mut StateTensor, qubit: usize, outcome: u8, p_outcome: f64) -> Result<()> {
    let scale = if p_outcome > 0.0 {
        Complex64::new(1.0 / p_outcome.sqrt(), 0.0)
    } else {
        ZERO
    };
    let matrix: Matrix2x2 = if outcome == 0 {
        [[scale, ZERO], [ZERO, ZERO]]
    } else {
        [[ZERO, ZERO], [ZERO, scale]]
    };
    tensor.apply_one(&matrix, qubit).map_err(Into::into)
}

/// Resets `qubit` to `|0>` given an already-sampled `outcome` and its
/// marginal probability. When `outcome == 0` this is identical to
/// [`collapse`]; when `outcome == 1` the off-diagonal projector
/// `[[0, 1/sqrt(p)], [0, 0]]` swaps the `|1>` amplitude into the `|0>` slot,
/// renormalizing by construction.
pub fn reset(tensor: &mut StateTensor, qubit: usize, outcome: u8, p_outcome: f64) -> Result<()> {
    if outcome == 0 {
        return collapse(tensor, qubit, 0, p_outcome);
    }
    let scale = if p_outcome > 0.0 {
        Complex64::new(1.0 / p_outcome.sqrt(), 0.0)
    } else {
        ZERO
    };
    let matrix: Matrix2x2 = [[ZERO, scale], [ZERO, ZERO]];
    tensor.apply_one(&matrix, qubit).map_err(Into::into)
}

/// Writes a sampled measurement outcome into the classical bit-vectors: the
/// `cmem` slot named by `memory_slot` (if present) and the `creg` slot named
/// by `register_slot` (if present).
pub fn write_classical(
    classical: &mut qns_core::ClassicalState,
    outcome: u8,
    memory_slot: Option<usize>,
    register_slot: Option<usize>,
) {
    if let Some(slot) = memory_slot {
        classical.write_cmem_bit(slot, outcome);
    }
    if let Some(slot) = register_slot {
        classical.write_creg_bit(slot, outcome);
    }
}
