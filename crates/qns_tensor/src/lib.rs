//! Dense rank-n state tensor and its gate-contraction kernels.
//!
//! The state vector is stored as an `ndarray::ArrayD<Complex64>` of shape
//! `[2; n]` rather than a flat `2^n`-length vector: each qubit gets its own
//! axis, and applying a gate becomes "reshape + contract an axis", the same
//! technique a matrix-product-state engine uses for its bond contractions,
//! just against a tensor with no bond dimensions to truncate.
//!
//! Qubit `i` maps to axis `n - 1 - i` (little-endian): axis 0 is therefore
//! the most significant bit of the flattened amplitude index, and the
//! standard row-major iteration order of the array already yields amplitudes
//! in the conventional `index = sum_i bit(qubit_i) * 2^i` order.

use ndarray::{ArrayD, Axis, IxDyn};
use num_complex::Complex64;
use qns_core::QnsError;
use thiserror::Error;

/// Errors specific to tensor contraction, convertible into [`QnsError`].
#[derive(Error, Debug)]
pub enum TensorError {
    #[error("dimension mismatch: expected {0}, got {1}")]
    DimensionMismatch(usize, usize),
    #[error("invalid qubit index {0} for a {1}-qubit tensor")]
    InvalidQubit(usize, usize),
    #[error("qubit indices must differ, got {0} twice")]
    DuplicateQubit(usize),
}

impl From<TensorError> for QnsError {
    fn from(err: TensorError) -> Self {
        match err {
            TensorError::DimensionMismatch(expected, got) => QnsError::DimensionMismatch(expected, got),
            TensorError::InvalidQubit(qubit, max) => QnsError::InvalidQubit(qubit, max),
            TensorError::DuplicateQubit(qubit) => {
                QnsError::invalid_instruction(format!("duplicate qubit index {}", qubit))
            },
        }
    }
}

type Result<T> = std::result::Result<T, TensorError>;

/// A 2x2 gate matrix, row-major.
pub type Matrix2x2 = [[Complex64; 2]; 2];
/// A 4x4 gate matrix, row-major.
pub type Matrix4x4 = [[Complex64; 4]; 4];

/// The dense state tensor of an `n`-qubit system.
#[derive(Debug, Clone)]
pub struct StateTensor {
    num_qubits: usize,
    data: ArrayD<Complex64>,
}

impl StateTensor {
    /// Builds the `|0...0>` state tensor for `num_qubits` qubits.
    pub fn zero_state(num_qubits: usize) -> Self {
        let shape = vec![2usize; num_qubits];
        let mut data = ArrayD::<Complex64>::zeros(IxDyn(&shape));
        data[IxDyn(&vec![0usize; num_qubits])] = Complex64::new(1.0, 0.0);
        Self { num_qubits, data }
    }

    /// Builds a state tensor from a flat `2^n`-length amplitude vector in
    /// the conventional `index = sum_i bit(qubit_i) * 2^i` order.
    pub fn from_amplitudes(num_qubits: usize, amplitudes: Vec<Complex64>) -> Result<Self> {
        let expected = 1usize << num_qubits;
        if amplitudes.len() != expected {
            return Err(TensorError::DimensionMismatch(expected, amplitudes.len()));
        }
        let shape = vec![2usize; num_qubits];
        let data = ArrayD::from_shape_vec(IxDyn(&shape), amplitudes)
            .map_err(|_| TensorError::DimensionMismatch(expected, expected))?;
        Ok(Self { num_qubits, data })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Read-only access to the underlying tensor, for the measurement kernel.
    pub fn amplitudes(&self) -> &ArrayD<Complex64> {
        &self.data
    }

    /// Mutable access to the underlying tensor, for measurement collapse and
    /// reset.
    pub fn amplitudes_mut(&mut self) -> &mut ArrayD<Complex64> {
        &mut self.data
    }

    /// Flattens the tensor to a `2^n`-length amplitude vector in the
    /// conventional order.
    pub fn to_dense_vec(&self) -> Vec<Complex64> {
        self.data.iter().copied().collect()
    }

    fn axis_of(&self, qubit: usize) -> Result<usize> {
        if qubit >= self.num_qubits {
            return Err(TensorError::InvalidQubit(qubit, self.num_qubits.saturating_sub(1)));
        }
        Ok(self.num_qubits - 1 - qubit)
    }

    /// Contracts a single-qubit gate `matrix` into `qubit`'s axis.
    pub fn apply_one(&mut self, matrix: &Matrix2x2, qubit: usize) -> Result<()> {
        let axis = self.axis_of(qubit)?;
        for mut lane in self.data.lanes_mut(Axis(axis)) {
            let a = lane[0];
            let b = lane[1];
            lane[0] = matrix[0][0] * a + matrix[0][1] * b;
            lane[1] = matrix[1][0] * a + matrix[1][1] * b;
        }
        Ok(())
    }

    /// Contracts a two-qubit gate `matrix` (row/column order
    /// `qubit0`-major, `qubit1`-minor) into `qubit0` and `qubit1`'s axes.
    /// Order-independent: `apply_two(m, a, b)` targets the same physical
    /// qubits as `apply_two(m, b, a)` composed with the matching basis
    /// permutation, but callers are expected to pass `qubit0`/`qubit1` in
    /// the same order the matrix rows/columns were built for.
    pub fn apply_two(&mut self, matrix: &Matrix4x4, qubit0: usize, qubit1: usize) -> Result<()> {
        if qubit0 == qubit1 {
            return Err(TensorError::DuplicateQubit(qubit0));
        }
        let axis0 = self.axis_of(qubit0)?;
        let axis1 = self.axis_of(qubit1)?;

        let combos = [(0usize, 0usize), (0, 1), (1, 0), (1, 1)];
        let shape = self.data.shape().to_vec();
        let mut idx = vec![0usize; shape.len()];

        loop {
            if idx[axis0] == 0 && idx[axis1] == 0 {
                let mut values = [Complex64::default(); 4];
                for (k, &(b0, b1)) in combos.iter().enumerate() {
                    idx[axis0] = b0;
                    idx[axis1] = b1;
                    values[k] = self.data[IxDyn(&idx)];
                }
                let mut new_values = [Complex64::default(); 4];
                for (row, new_value) in new_values.iter_mut().enumerate() {
                    let mut sum = Complex64::default();
                    for (col, value) in values.iter().enumerate() {
                        sum += matrix[row][col] * value;
                    }
                    *new_value = sum;
                }
                for (k, &(b0, b1)) in combos.iter().enumerate() {
                    idx[axis0] = b0;
                    idx[axis1] = b1;
                    self.data[IxDyn(&idx)] = new_values[k];
                }
                idx[axis0] = 0;
                idx[axis1] = 0;
            }

            if !advance_index(&mut idx, &shape, axis0, axis1) {
                break;
            }
        }

        Ok(())
    }
}

/// Increments `idx` in row-major order, skipping `skip_a`/`skip_b` (which
/// are pinned at 0 by the caller and visited explicitly inside the loop
/// body). Returns `false` once every combination has been visited.
fn advance_index(idx: &mut [usize], shape: &[usize], skip_a: usize, skip_b: usize) -> bool {
    for axis in (0..idx.len()).rev() {
        if axis == skip_a || axis == skip_b {
            continue;
        }
        idx[axis] += 1;
        if idx[axis] < shape[axis] {
            return true;
        }
        idx[axis] = 0;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    const TOLERANCE: f64 = 1e-10;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn hadamard() -> Matrix2x2 {
        [
            [c(FRAC_1_SQRT_2, 0.0), c(FRAC_1_SQRT_2, 0.0)],
            [c(FRAC_1_SQRT_2, 0.0), c(-FRAC_1_SQRT_2, 0.0)],
        ]
    }

    fn cnot() -> Matrix4x4 {
        [
            [c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)],
            [c(0.0, 0.0), c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)],
            [c(0.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0)],
            [c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)],
        ]
    }

    #[test]
    fn test_zero_state_is_all_zero_basis() {
        let st = StateTensor::zero_state(2);
        let dense = st.to_dense_vec();
        assert_eq!(dense.len(), 4);
        assert!((dense[0] - c(1.0, 0.0)).norm() < TOLERANCE);
        for amp in &dense[1..] {
            assert!(amp.norm() < TOLERANCE);
        }
    }

    #[test]
    fn test_apply_one_hadamard_on_qubit_0() {
        let mut st = StateTensor::zero_state(1);
        st.apply_one(&hadamard(), 0).unwrap();
        let dense = st.to_dense_vec();
        assert!((dense[0] - c(FRAC_1_SQRT_2, 0.0)).norm() < TOLERANCE);
        assert!((dense[1] - c(FRAC_1_SQRT_2, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn test_bell_pair_via_apply_two() {
        let mut st = StateTensor::zero_state(2);
        st.apply_one(&hadamard(), 0).unwrap();
        st.apply_two(&cnot(), 0, 1).unwrap();
        let dense = st.to_dense_vec();
        // |00> and |11> each with amplitude 1/sqrt(2); |01>, |10> are zero.
        assert!((dense[0] - c(FRAC_1_SQRT_2, 0.0)).norm() < TOLERANCE);
        assert!(dense[1].norm() < TOLERANCE);
        assert!(dense[2].norm() < TOLERANCE);
        assert!((dense[3] - c(FRAC_1_SQRT_2, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn test_apply_two_order_independence_on_identity() {
        let identity4 = [
            [c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)],
            [c(0.0, 0.0), c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)],
            [c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)],
            [c(0.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0)],
        ];
        let mut a = StateTensor::zero_state(3);
        a.apply_one(&hadamard(), 1).unwrap();
        a.apply_two(&identity4, 0, 2).unwrap();

        let mut b = StateTensor::zero_state(3);
        b.apply_one(&hadamard(), 1).unwrap();
        b.apply_two(&identity4, 2, 0).unwrap();

        assert_eq!(a.to_dense_vec(), b.to_dense_vec());
    }

    #[test]
    fn test_apply_one_rejects_out_of_range_qubit() {
        let mut st = StateTensor::zero_state(2);
        assert!(matches!(
            st.apply_one(&hadamard(), 5),
            Err(TensorError::InvalidQubit(5, _))
        ));
    }

    #[test]
    fn test_apply_two_rejects_duplicate_qubit() {
        let mut st = StateTensor::zero_state(2);
        assert!(matches!(
            st.apply_two(&cnot(), 0, 0),
            Err(TensorError::DuplicateQubit(0))
        ));
    }

    #[test]
    fn test_from_amplitudes_rejects_wrong_length() {
        let result = StateTensor::from_amplitudes(2, vec![c(1.0, 0.0)]);
        assert!(matches!(result, Err(TensorError::DimensionMismatch(4, 1))));
    }
}
