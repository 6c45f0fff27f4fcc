//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust
//! use qns_core::prelude::*;
//! ```

pub use crate::backend::{available_memory_bytes, max_qubits_for_memory, BackendConfiguration};
pub use crate::config::{QnsConfig, SimulatorConfig};
pub use crate::error::{QnsError, Result};
pub use crate::physics::{u, u1, u2, u3, Matrix2x2, Matrix4x4, C64, CNOT, IDENTITY};
pub use crate::types::{
    ClassicalState, Conditional, Experiment, ExperimentConfig, Header, Instruction,
    InstructionParams, Qobj, QobjConfig, Relation,
};
