//! Instruction dispatcher: conditional gating plus the dispatch table for
//! the recognized instruction set.

use qns_core::physics::{self, C64};
use qns_core::types::instruction::parse_hex;
use qns_core::{Instruction, InstructionParams, QnsError, Result};
use qns_tensor::{Matrix2x2, Matrix4x4};

use crate::measurement;
use crate::state::SimulatorState;

/// Outcome of dispatching a single instruction: whether the instruction
/// executed (it may have been skipped by conditional gating), and, for
/// `measure`, the sampled bit.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchOutcome {
    pub executed: bool,
    pub measured_bit: Option<u8>,
}

/// Dispatches one instruction against `state`, honoring any `conditional`
/// gate first.
pub fn dispatch(state: &mut SimulatorState, instr: &Instruction) -> Result<DispatchOutcome> {
    if let Some(conditional) = &instr.conditional {
        let satisfied = conditional.is_satisfied(state.classical().cmem(), state.classical().creg())?;
        if !satisfied {
            return Ok(DispatchOutcome::default());
        }
    }

    match instr.name.as_str() {
        "U" | "u3" => {
            let angles = instr.angles()?;
            require_len(angles, 3, &instr.name)?;
            apply_one_matrix(state, &physics::u3(angles[0], angles[1], angles[2]), single_qubit(instr)?)?;
        },
        "u2" => {
            let angles = instr.angles()?;
            require_len(angles, 2, &instr.name)?;
            apply_one_matrix(state, &physics::u2(angles[0], angles[1]), single_qubit(instr)?)?;
        },
        "u1" => {
            let angles = instr.angles()?;
            require_len(angles, 1, &instr.name)?;
            apply_one_matrix(state, &physics::u1(angles[0]), single_qubit(instr)?)?;
        },
        "id" | "u0" => {
            // No-op: identity evolution.
        },
        "CX" | "cx" => {
            let (control, target) = two_qubits(instr)?;
            state.tensor_mut().apply_two(&physics::CNOT, control, target)?;
        },
        "unitary" => {
            apply_unitary(state, instr)?;
        },
        "barrier" => {
            // No-op: scheduling hint only.
        },
        "reset" => {
            let qubit = single_qubit(instr)?;
            reset_qubit(state, qubit)?;
        },
        "measure" => {
            let qubit = single_qubit(instr)?;
            let bit = measure_qubit(state, qubit, instr)?;
            return Ok(DispatchOutcome {
                executed: true,
                measured_bit: Some(bit),
            });
        },
        "bfunc" => {
            apply_bfunc(state, instr)?;
        },
        other => return Err(QnsError::UnrecognizedOperation(other.to_string())),
    }

    Ok(DispatchOutcome {
        executed: true,
        measured_bit: None,
    })
}

fn require_len(angles: &[f64], expected: usize, name: &str) -> Result<()> {
    if angles.len() != expected {
        return Err(QnsError::invalid_instruction(format!(
            "instruction \"{}\" requires {} params, got {}",
            name,
            expected,
            angles.len()
        )));
    }
    Ok(())
}

pub(crate) fn single_qubit(instr: &Instruction) -> Result<usize> {
    match instr.qubits.as_slice() {
        [q] => Ok(*q),
        other => Err(QnsError::invalid_instruction(format!(
            "instruction \"{}\" requires exactly one qubit, got {}",
            instr.name,
            other.len()
        ))),
    }
}

fn two_qubits(instr: &Instruction) -> Result<(usize, usize)> {
    match instr.qubits.as_slice() {
        [a, b] => Ok((*a, *b)),
        other => Err(QnsError::invalid_instruction(format!(
            "instruction \"{}\" requires exactly two qubits, got {}",
            instr.name,
            other.len()
        ))),
    }
}

fn apply_one_matrix(state: &mut SimulatorState, matrix: &Matrix2x2, qubit: usize) -> Result<()> {
    state.tensor_mut().apply_one(matrix, qubit).map_err(Into::into)
}

fn apply_unitary(state: &mut SimulatorState, instr: &Instruction) -> Result<()> {
    let raw = instr.matrix()?;
    match instr.qubits.as_slice() {
        [q] => {
            let matrix = to_matrix2x2(raw)?;
            apply_one_matrix(state, &matrix, *q)
        },
        [a, b] => {
            let matrix = to_matrix4x4(raw)?;
            state.tensor_mut().apply_two(&matrix, *a, *b).map_err(Into::into)
        },
        other => Err(QnsError::invalid_instruction(format!(
            "unitary instruction requires one or two qubits, got {}",
            other.len()
        ))),
    }
}

fn to_matrix2x2(raw: &[Vec<(f64, f64)>]) -> Result<Matrix2x2> {
    if raw.len() != 2 || raw.iter().any(|row| row.len() != 2) {
        return Err(QnsError::invalid_instruction("unitary matrix must be 2x2 for a single qubit"));
    }
    Ok([
        [c(raw[0][0]), c(raw[0][1])],
        [c(raw[1][0]), c(raw[1][1])],
    ])
}

fn to_matrix4x4(raw: &[Vec<(f64, f64)>]) -> Result<Matrix4x4> {
    if raw.len() != 4 || raw.iter().any(|row| row.len() != 4) {
        return Err(QnsError::invalid_instruction("unitary matrix must be 4x4 for two qubits"));
    }
    let mut matrix = [[C64::default(); 4]; 4];
    for (i, row) in raw.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            matrix[i][j] = c(*value);
        }
    }
    Ok(matrix)
}

fn c(pair: (f64, f64)) -> C64 {
    C64::new(pair.0, pair.1)
}

/// Dispatches one instruction in sample-measure mode: `measure` is recorded
/// as a `(qubit, memory_slot)` pair instead of sampling and collapsing, so
/// the shot driver can draw every outcome at once from the final state
/// (4.3/4.6). Every other instruction behaves exactly as [`dispatch`].
pub fn dispatch_sampling(
    state: &mut SimulatorState,
    instr: &Instruction,
    recorded: &mut Vec<(usize, Option<usize>)>,
) -> Result<DispatchOutcome> {
    if let Some(conditional) = &instr.conditional {
        let satisfied = conditional.is_satisfied(state.classical().cmem(), state.classical().creg())?;
        if !satisfied {
            return Ok(DispatchOutcome::default());
        }
    }
    if instr.name == "measure" {
        let qubit = single_qubit(instr)?;
        let memory_slot = slot_for_qubit(&instr.qubits, instr.memory.as_deref(), qubit);
        recorded.push((qubit, memory_slot));
        return Ok(DispatchOutcome {
            executed: true,
            measured_bit: None,
        });
    }
    dispatch(state, instr)
}

fn reset_qubit(state: &mut SimulatorState, qubit: usize) -> Result<()> {
    let (p0, p1) = measurement::marginal(state.tensor(), qubit)?;
    let outcome = measurement::sample_outcome(p0, p1, state.rng_mut());
    let p_outcome = if outcome == 0 { p0 } else { p1 };
    measurement::reset(state.tensor_mut(), qubit, outcome, p_outcome)
}

fn measure_qubit(state: &mut SimulatorState, qubit: usize, instr: &Instruction) -> Result<u8> {
    let (p0, p1) = measurement::marginal(state.tensor(), qubit)?;
    let outcome = measurement::sample_outcome(p0, p1, state.rng_mut());
    let p_outcome = if outcome == 0 { p0 } else { p1 };
    measurement::collapse(state.tensor_mut(), qubit, outcome, p_outcome)?;

    let memory_slot = slot_for_qubit(instr.qubits.as_slice(), instr.memory.as_deref(), qubit);
    let register_slot = slot_for_qubit(instr.qubits.as_slice(), instr.register.as_deref(), qubit);
    measurement::write_classical(state.classical_mut(), outcome, memory_slot, register_slot);

    Ok(outcome)
}

pub(crate) fn slot_for_qubit(qubits: &[usize], slots: Option<&[usize]>, qubit: usize) -> Option<usize> {
    let slots = slots?;
    let position = qubits.iter().position(|&q| q == qubit)?;
    slots.get(position).copied()
}

fn apply_bfunc(state: &mut SimulatorState, instr: &Instruction) -> Result<()> {
    let mask = instr
        .mask
        .as_deref()
        .ok_or_else(|| QnsError::invalid_instruction("bfunc requires a mask"))?;
    let val = instr
        .val
        .as_deref()
        .ok_or_else(|| QnsError::invalid_instruction("bfunc requires a val"))?;
    let relation = instr
        .relation
        .ok_or_else(|| QnsError::invalid_instruction("bfunc requires a relation"))?;
    let register = instr
        .register
        .as_ref()
        .and_then(|r| r.first().copied())
        .ok_or_else(|| QnsError::invalid_instruction("bfunc requires a register slot"))?;

    let mask = parse_hex(mask)?;
    let val = parse_hex(val)?;
    let memory = instr.memory.as_ref().and_then(|m| m.first().copied());
    state.classical_mut().apply_bfunc(mask, val, relation, register, memory);
    Ok(())
}
