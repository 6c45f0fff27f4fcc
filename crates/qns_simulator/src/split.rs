//! Split engine: forks the simulation at a `measure` instruction whenever
//! both outcomes are classically possible, rather than sampling one and
//! discarding the other branch.
//!
//! The parent state is frozen at the pre-measurement superposition; its two
//! children each receive a deep clone, collapsed to one outcome, and resume
//! from the instruction after the fork. Assembly is depth-first, path 0
//! before path 1. Per the resolved open question, once a node has forked it
//! contributes no further memory entries itself — only leaves do, since a
//! forked node's "outcome" is really two outcomes, not one.

use serde::{Deserialize, Serialize};

use qns_core::{Instruction, Result};

use crate::dispatcher;
use crate::emission::emit_statevector;
use crate::measurement;
use crate::state::SimulatorState;

/// The recursive result of a split-mode run: either a single completed path
/// (`Leaf`) or a fork point with both children (`Branch`). Untagged so a
/// leaf serializes without any `path_*` keys. `value` is the externally
/// emitted state vector at this node (4.8): the pre-measurement
/// superposition for a `Branch`, the final state for a `Leaf`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultTree {
    Leaf {
        value: Vec<(f64, f64)>,
        /// The leaf's classical memory word, not part of the wire format —
        /// only a leaf contributes to the run's memory list (9, open
        /// question), so this is carried internally and stripped before
        /// serialization.
        #[serde(skip)]
        memory: String,
    },
    Branch {
        value: Vec<(f64, f64)>,
        path_0_probability: f64,
        path_0: Box<ResultTree>,
        path_1_probability: f64,
        path_1: Box<ResultTree>,
    },
}

impl ResultTree {
    /// Collects every leaf's classical memory value, depth-first, path 0
    /// before path 1 — the per-shot memory list a caller ultimately wants.
    pub fn leaf_values(&self) -> Vec<String> {
        let mut values = Vec::new();
        self.collect_leaf_values(&mut values);
        values
    }

    fn collect_leaf_values(&self, out: &mut Vec<String>) {
        match self {
            ResultTree::Leaf { memory, .. } => out.push(memory.clone()),
            ResultTree::Branch { path_0, path_1, .. } => {
                path_0.collect_leaf_values(out);
                path_1.collect_leaf_values(out);
            },
        }
    }
}

/// Runs `instructions[start..]` against `state`, forking at any `measure`
/// whose two outcomes are both classically possible. `next_seed` hands out
/// fresh per-child seeds so forked branches diverge deterministically from
/// a single top-level seed.
pub fn run_split(
    instructions: &[Instruction],
    mut state: SimulatorState,
    start: usize,
    chop_threshold: f64,
    next_seed: &mut impl FnMut() -> u64,
) -> Result<ResultTree> {
    for (offset, instr) in instructions.iter().enumerate().skip(start) {
        if instr.name == "measure" {
            let qubit = dispatcher::single_qubit(instr)?;
            let (p0, p1) = measurement::marginal(state.tensor(), qubit)?;

            if p0 > 0.0 && p1 > 0.0 {
                let value = emit_statevector(state.tensor(), chop_threshold);
                let memory_slot = dispatcher::slot_for_qubit(&instr.qubits, instr.memory.as_deref(), qubit);
                let register_slot = dispatcher::slot_for_qubit(&instr.qubits, instr.register.as_deref(), qubit);

                let mut child_0 = state.fork(next_seed());
                measurement::collapse(child_0.tensor_mut(), qubit, 0, p0)?;
                measurement::write_classical(child_0.classical_mut(), 0, memory_slot, register_slot);

                let mut child_1 = state.fork(next_seed());
                measurement::collapse(child_1.tensor_mut(), qubit, 1, p1)?;
                measurement::write_classical(child_1.classical_mut(), 1, memory_slot, register_slot);

                let path_0 = run_split(instructions, child_0, offset + 1, chop_threshold, next_seed)?;
                let path_1 = run_split(instructions, child_1, offset + 1, chop_threshold, next_seed)?;

                return Ok(ResultTree::Branch {
                    value,
                    path_0_probability: p0,
                    path_0: Box::new(path_0),
                    path_1_probability: p1,
                    path_1: Box::new(path_1),
                });
            }
        }

        dispatcher::dispatch(&mut state, instr)?;
    }

    Ok(ResultTree::Leaf {
        value: emit_statevector(state.tensor(), chop_threshold),
        memory: state.classical().cmem_hex(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHOP: f64 = 1e-15;

    fn seeder(start: u64) -> impl FnMut() -> u64 {
        let mut next = start;
        move || {
            next += 1;
            next
        }
    }

    #[test]
    fn test_no_split_on_deterministic_measurement() {
        let state = SimulatorState::new(1, 1);
        let instructions = vec![Instruction::new("measure", vec![0]).with_memory(vec![0])];
        let tree = run_split(&instructions, state, 0, CHOP, &mut seeder(1)).unwrap();
        assert!(matches!(tree, ResultTree::Leaf { .. }));
        assert_eq!(tree.leaf_values(), vec!["0x0".to_string()]);
    }

    #[test]
    fn test_split_on_superposition_measurement() {
        let mut state = SimulatorState::new(1, 1);
        let hadamard = Instruction::new("u2", vec![0]).with_params(vec![0.0, std::f64::consts::PI]);
        dispatcher::dispatch(&mut state, &hadamard).unwrap();

        let instructions = vec![hadamard, Instruction::new("measure", vec![0]).with_memory(vec![0])];
        let tree = run_split(&instructions, state, 1, CHOP, &mut seeder(1)).unwrap();
        match &tree {
            ResultTree::Branch {
                path_0_probability,
                path_1_probability,
                value,
                ..
            } => {
                assert!((path_0_probability - 0.5).abs() < 1e-10);
                assert!((path_1_probability - 0.5).abs() < 1e-10);
                // Pre-measurement superposition: both amplitudes nonzero.
                assert!(value[0].0.abs() > 1e-6);
                assert!(value[1].0.abs() > 1e-6);
            },
            ResultTree::Leaf { .. } => panic!("expected a fork on a superposition measurement"),
        }
        let mut leaves = tree.leaf_values();
        leaves.sort();
        assert_eq!(leaves, vec!["0x0".to_string(), "0x1".to_string()]);
    }

    #[test]
    fn test_leaf_statevector_concentrates_on_measured_outcome() {
        let mut state = SimulatorState::new(1, 1);
        let hadamard = Instruction::new("u2", vec![0]).with_params(vec![0.0, std::f64::consts::PI]);
        dispatcher::dispatch(&mut state, &hadamard).unwrap();
        let instructions = vec![hadamard, Instruction::new("measure", vec![0]).with_memory(vec![0])];
        let tree = run_split(&instructions, state, 1, CHOP, &mut seeder(1)).unwrap();
        if let ResultTree::Branch { path_0, path_1, .. } = tree {
            if let ResultTree::Leaf { value, .. } = *path_0 {
                assert!((value[0].0 - 1.0).abs() < 1e-9);
                assert!(value[1].0.abs() < 1e-9);
            } else {
                panic!("expected leaf");
            }
            if let ResultTree::Leaf { value, .. } = *path_1 {
                assert!(value[0].0.abs() < 1e-9);
                assert!((value[1].0 - 1.0).abs() < 1e-9);
            } else {
                panic!("expected leaf");
            }
        } else {
            panic!("expected branch");
        }
    }

    #[test]
    fn test_path_0_before_path_1_ordering() {
        let mut state = SimulatorState::new(2, 1);
        let h0 = Instruction::new("u2", vec![0]).with_params(vec![0.0, std::f64::consts::PI]);
        let h1 = Instruction::new("u2", vec![1]).with_params(vec![0.0, std::f64::consts::PI]);
        dispatcher::dispatch(&mut state, &h0).unwrap();
        dispatcher::dispatch(&mut state, &h1).unwrap();

        let instructions = vec![
            h0,
            h1,
            Instruction::new("measure", vec![0]).with_memory(vec![0]),
            Instruction::new("measure", vec![1]).with_memory(vec![1]),
        ];
        let tree = run_split(&instructions, state, 2, CHOP, &mut seeder(1)).unwrap();
        let leaves = tree.leaf_values();
        assert_eq!(leaves.len(), 4);
        assert_eq!(leaves[0], "0x0");
        assert_eq!(leaves[leaves.len() - 1], "0x3");
    }

    #[test]
    fn test_leaf_serializes_without_memory_key() {
        let state = SimulatorState::new(1, 1);
        let instructions = vec![Instruction::new("measure", vec![0]).with_memory(vec![0])];
        let tree = run_split(&instructions, state, 0, CHOP, &mut seeder(1)).unwrap();
        let json = serde_json::to_string(&tree).unwrap();
        assert!(json.contains("\"value\""));
        assert!(!json.contains("\"memory\""));
        assert!(!json.contains("path_0"));
    }
}
