//! External state-vector emission (4.8): flattens the dense tensor to its
//! `2^n`-length little-endian amplitude order, splits each complex number
//! into a `[re, im]` pair, and zeros any component whose magnitude falls
//! below `chop_threshold`.

use qns_tensor::StateTensor;

/// Flattens `tensor` and chops small-magnitude components to exactly zero.
///
/// The real and imaginary parts are chopped independently, not as a pair
/// gated by the combined magnitude: `(1.0, 1e-20)` becomes `(1.0, 0.0)`
/// rather than being left untouched.
pub fn emit_statevector(tensor: &StateTensor, chop_threshold: f64) -> Vec<(f64, f64)> {
    let chop = |x: f64| if x.abs() < chop_threshold { 0.0 } else { x };
    tensor
        .to_dense_vec()
        .into_iter()
        .map(|amp| (chop(amp.re), chop(amp.im)))
        .collect()
}
