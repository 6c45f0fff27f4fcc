//! # QNS Core
//!
//! Shared types and utilities for the QNS state-vector simulator workspace.
//!
//! This crate provides:
//! - `Instruction`/`Qobj`/`Experiment`: wire-level circuit submission types
//! - `ClassicalState`: the `cmem`/`creg` classical bit-vector pair
//! - `physics`: the gate-matrix library (`u`/`u1`/`u2`/`u3`, `CNOT`)
//! - `backend`: advertised backend configuration and memory-bound discovery
//! - `QnsError`: unified error type
//!
//! ## Example
//!
//! ```rust
//! use qns_core::prelude::*;
//!
//! let instr = Instruction::new("u3", vec![0]).with_params(vec![0.0, 0.0, 0.0]);
//! assert_eq!(instr.angles().unwrap(), &[0.0, 0.0, 0.0]);
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod physics;
pub mod prelude;
pub mod types;

pub use backend::BackendConfiguration;
pub use error::{QnsError, Result};
pub use types::{ClassicalState, Conditional, Experiment, Instruction, Qobj};
