//! Gate matrix library.
//!
//! This module plays the role of the "external" gate library the
//! specification treats as a collaborator: given a gate name and its
//! parameters, it returns the 2x2 or 4x4 complex matrix to contract into the
//! state tensor. Everything here is a pure function of its arguments — no
//! qubit indices, no simulator state.

use num_complex::Complex64;

/// Complex number type alias for readability.
pub type C64 = Complex64;

/// Create a complex number from real and imaginary parts.
#[inline]
pub const fn c(re: f64, im: f64) -> C64 {
    C64::new(re, im)
}

/// Complex zero.
pub const ZERO: C64 = C64::new(0.0, 0.0);

/// Complex one.
pub const ONE: C64 = C64::new(1.0, 0.0);

/// 2x2 matrix type: `[[a, b], [c, d]]`, row-major.
pub type Matrix2x2 = [[C64; 2]; 2];

/// 4x4 matrix type for two-qubit gates, row-major.
pub type Matrix4x4 = [[C64; 4]; 4];

/// Identity matrix, used for `id`/`u0`/no-op bookkeeping.
pub const IDENTITY: Matrix2x2 = [[ONE, ZERO], [ZERO, ONE]];

/// The general single-qubit unitary `U(theta, phi, lambda)`:
///
/// ```text
/// U(θ,φ,λ) = [[cos(θ/2),            -e^(iλ) sin(θ/2)     ],
///             [e^(iφ) sin(θ/2),      e^(i(φ+λ)) cos(θ/2) ]]
/// ```
///
/// `u1(λ) = U(0,0,λ)`, `u2(φ,λ) = U(π/2,φ,λ)`, `u3(θ,φ,λ) = U(θ,φ,λ)`.
pub fn u(theta: f64, phi: f64, lambda: f64) -> Matrix2x2 {
    let cos = (theta / 2.0).cos();
    let sin = (theta / 2.0).sin();
    let e_il = Complex64::from_polar(1.0, lambda);
    let e_ip = Complex64::from_polar(1.0, phi);
    let e_ipl = Complex64::from_polar(1.0, phi + lambda);

    [
        [c(cos, 0.0), -e_il * c(sin, 0.0)],
        [e_ip * c(sin, 0.0), e_ipl * c(cos, 0.0)],
    ]
}

/// `u1(lambda) = U(0, 0, lambda)`, a diagonal phase gate.
pub fn u1(lambda: f64) -> Matrix2x2 {
    u(0.0, 0.0, lambda)
}

/// `u2(phi, lambda) = U(pi/2, phi, lambda)`.
pub fn u2(phi: f64, lambda: f64) -> Matrix2x2 {
    u(std::f64::consts::FRAC_PI_2, phi, lambda)
}

/// `u3(theta, phi, lambda) = U(theta, phi, lambda)`.
pub fn u3(theta: f64, phi: f64, lambda: f64) -> Matrix2x2 {
    u(theta, phi, lambda)
}

/// CNOT (CX) gate matrix (control=qubit0, target=qubit1).
/// `|00⟩ → |00⟩, |01⟩ → |01⟩, |10⟩ → |11⟩, |11⟩ → |10⟩`.
pub const CNOT: Matrix4x4 = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
    [ZERO, ZERO, ONE, ZERO],
];

/// Hermitian conjugate (conjugate transpose) of a 2x2 matrix.
pub fn dagger_2x2(m: &Matrix2x2) -> Matrix2x2 {
    [
        [m[0][0].conj(), m[1][0].conj()],
        [m[0][1].conj(), m[1][1].conj()],
    ]
}

/// Hermitian conjugate (conjugate transpose) of a 4x4 matrix.
pub fn dagger_4x4(m: &Matrix4x4) -> Matrix4x4 {
    let mut out = [[ZERO; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            out[i][j] = m[j][i].conj();
        }
    }
    out
}

/// Multiplies two 2x2 matrices.
pub fn mul_2x2(a: &Matrix2x2, b: &Matrix2x2) -> Matrix2x2 {
    [
        [
            a[0][0] * b[0][0] + a[0][1] * b[1][0],
            a[0][0] * b[0][1] + a[0][1] * b[1][1],
        ],
        [
            a[1][0] * b[0][0] + a[1][1] * b[1][0],
            a[1][0] * b[0][1] + a[1][1] * b[1][1],
        ],
    ]
}

/// Checks if a 2x2 matrix is approximately unitary (U†U ≈ I).
pub fn is_unitary_2x2(m: &Matrix2x2, tolerance: f64) -> bool {
    let product = mul_2x2(&dagger_2x2(m), m);

    (product[0][0] - ONE).norm() < tolerance
        && product[0][1].norm() < tolerance
        && product[1][0].norm() < tolerance
        && (product[1][1] - ONE).norm() < tolerance
}
