//! The running simulator instance: a state tensor paired with classical
//! memory and a seeded RNG.

use qns_core::ClassicalState;
use qns_tensor::StateTensor;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// One live simulation: the quantum state tensor, the classical bit-vectors
/// it writes measurement outcomes into, and the RNG driving sampling.
///
/// Seeded (not `ThreadRng`) so that a fixed seed reproduces identical shot
/// and split-path outcomes regardless of thread scheduling.
pub struct SimulatorState {
    tensor: StateTensor,
    classical: ClassicalState,
    rng: StdRng,
}

impl SimulatorState {
    /// Builds a fresh `|0...0>` simulator state seeded from `seed`.
    pub fn new(num_qubits: usize, seed: u64) -> Self {
        Self {
            tensor: StateTensor::zero_state(num_qubits),
            classical: ClassicalState::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Builds a simulator state from a caller-supplied initial tensor,
    /// seeded from `seed`.
    pub fn from_tensor(tensor: StateTensor, seed: u64) -> Self {
        Self {
            tensor,
            classical: ClassicalState::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.tensor.num_qubits()
    }

    pub fn tensor(&self) -> &StateTensor {
        &self.tensor
    }

    pub fn tensor_mut(&mut self) -> &mut StateTensor {
        &mut self.tensor
    }

    pub fn classical(&self) -> &ClassicalState {
        &self.classical
    }

    pub fn classical_mut(&mut self) -> &mut ClassicalState {
        &mut self.classical
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Deep-clones this state for the split engine: a fresh tensor copy,
    /// classical state copy, and an RNG reseeded from `child_seed` so the
    /// two children of a fork diverge deterministically.
    pub fn fork(&self, child_seed: u64) -> Self {
        Self {
            tensor: self.tensor.clone(),
            classical: self.classical,
            rng: StdRng::seed_from_u64(child_seed),
        }
    }
}
