//! Backend configuration description and memory-bound discovery.
//!
//! This mirrors the advertised configuration a simulator backend reports to
//! a caller (section 6) plus the memory-derived qubit cap the option &
//! validation layer consults (section 4.7).

use serde::{Deserialize, Serialize};
use sysinfo::{System, SystemExt};

/// Hard ceiling on addressable qubits regardless of available memory.
pub const ABSOLUTE_MAX_QUBITS: usize = 24;

/// Bytes required to hold one complex amplitude (two `f64`s).
const BYTES_PER_AMPLITUDE: u64 = 16;

/// Maximum shots a single job may request.
pub const MAX_SHOTS: u64 = 65_536;

/// Fallback assumed-available memory when the host cannot be queried,
/// chosen conservatively (2 GiB) rather than guessing a larger number.
const FALLBACK_MEMORY_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Advertised backend configuration, as handed back to a caller describing
/// this simulator's capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfiguration {
    pub backend_name: String,
    pub backend_version: String,
    pub n_qubits: usize,
    pub basis_gates: Vec<String>,
    pub max_shots: u64,
    pub conditional: bool,
    pub memory: bool,
    pub local: bool,
    pub simulator: bool,
    pub description: String,
}

impl BackendConfiguration {
    /// Builds the advertised configuration for a given memory-derived qubit
    /// bound.
    pub fn new(n_qubits: usize) -> Self {
        Self {
            backend_name: "qns_statevector_simulator".to_string(),
            backend_version: env!("CARGO_PKG_VERSION").to_string(),
            n_qubits,
            basis_gates: vec![
                "u1".to_string(),
                "u2".to_string(),
                "u3".to_string(),
                "cx".to_string(),
                "id".to_string(),
                "unitary".to_string(),
            ],
            max_shots: MAX_SHOTS,
            conditional: true,
            memory: true,
            local: true,
            simulator: true,
            description: "a dense state-vector simulator of quantum circuits".to_string(),
        }
    }
}

/// Queries total system memory in bytes, falling back to a conservative
/// constant if the host cannot be introspected.
pub fn available_memory_bytes() -> u64 {
    let mut system = System::new();
    system.refresh_memory();
    let total = system.total_memory(); // sysinfo 0.30 reports bytes.
    if total == 0 {
        FALLBACK_MEMORY_BYTES
    } else {
        total
    }
}

/// Computes the maximum addressable qubit count given `memory_bytes` of
/// available RAM: `floor(log2(memory_bytes / 16))`, capped at
/// [`ABSOLUTE_MAX_QUBITS`].
pub fn max_qubits_for_memory(memory_bytes: u64) -> usize {
    if memory_bytes < BYTES_PER_AMPLITUDE {
        return 0;
    }
    let amplitudes = memory_bytes / BYTES_PER_AMPLITUDE;
    let bound = 63 - amplitudes.leading_zeros() as usize;
    bound.min(ABSOLUTE_MAX_QUBITS)
}
