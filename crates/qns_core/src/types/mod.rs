//! Core type definitions for QNS.

pub mod classical;
pub mod instruction;
pub mod qobj;

pub use classical::ClassicalState;
pub use instruction::{Conditional, Instruction, InstructionParams, Relation};
pub use qobj::{Experiment, ExperimentConfig, Header, Qobj, QobjConfig};
