//! Error types for QNS.

use thiserror::Error;

/// Unified error type for QNS operations.
#[derive(Error, Debug)]
pub enum QnsError {
    /// `n_qubits` exceeds the backend's addressable maximum, or a supplied
    /// initial statevector's length does not equal `2^n`.
    #[error("dimension mismatch: expected {0}, got {1}")]
    DimensionMismatch(usize, usize),

    /// An `initial_statevector` was supplied whose L2 norm does not round to
    /// 1 at 12 decimal places.
    #[error("initial statevector is not normalized: norm {0} != 1")]
    NotNormalised(f64),

    /// Instruction `name` is not in the recognized instruction set.
    #[error("unrecognized operation \"{0}\"")]
    UnrecognizedOperation(String),

    /// Out-of-range qubit index, duplicate two-qubit targets, or an invalid
    /// `bfunc` relation / malformed conditional.
    #[error("invalid instruction: {0}")]
    InvalidInstruction(String),

    /// Invalid qubit index relative to the circuit's qubit count.
    #[error("invalid qubit index {0}, maximum is {1}")]
    InvalidQubit(usize, usize),

    /// Generic simulator error for conditions that don't fit a more specific
    /// variant (internal invariant violations, unreachable states).
    #[error("simulator error: {0}")]
    Simulator(String),

    /// Configuration error (malformed qobj/experiment config).
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error loading a qobj document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for QNS operations.
pub type Result<T> = std::result::Result<T, QnsError>;

impl QnsError {
    /// Creates a simulator error with the given message.
    pub fn simulator(msg: impl Into<String>) -> Self {
        Self::Simulator(msg.into())
    }

    /// Creates a config error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an invalid-instruction error with the given message.
    pub fn invalid_instruction(msg: impl Into<String>) -> Self {
        Self::InvalidInstruction(msg.into())
    }
}
