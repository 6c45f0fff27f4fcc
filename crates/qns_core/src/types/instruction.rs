//! Instruction and conditional-gating types.

use serde::{Deserialize, Serialize};

use crate::error::{QnsError, Result};

/// A single classical-comparison relation used by `bfunc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
}

impl Relation {
    /// Evaluates `compared <relation> 0`, where `compared` is already the
    /// difference `(cmem & mask) - val` computed by the caller.
    pub fn evaluate(self, compared: i128) -> bool {
        match self {
            Relation::Eq => compared == 0,
            Relation::Ne => compared != 0,
            Relation::Lt => compared < 0,
            Relation::Le => compared <= 0,
            Relation::Gt => compared > 0,
            Relation::Ge => compared >= 0,
        }
    }
}

/// Conditional gating attached to an instruction.
///
/// The integer form gates on a single `creg` bit; the masked form compares a
/// shifted-down region of `cmem` against a hex-encoded value. The two forms
/// are never unified: real circuits use both independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Conditional {
    /// Gate on a single classical-register bit.
    Register(usize),
    /// Gate on a masked comparison against classical memory.
    Masked { mask: String, val: String },
}

impl Conditional {
    /// Returns `true` when the instruction should execute given the current
    /// classical register and memory words.
    pub fn is_satisfied(&self, cmem: u64, creg: u64) -> Result<bool> {
        match self {
            Conditional::Register(bit) => Ok((creg >> bit) & 1 == 1),
            Conditional::Masked { mask, val } => {
                let mask = parse_hex(mask)?;
                let val = parse_hex(val)?;
                if mask == 0 {
                    return Ok(true);
                }
                let mut shifted_mask = mask;
                let mut shifted_value = cmem & mask;
                while shifted_mask & 1 == 0 {
                    shifted_mask >>= 1;
                    shifted_value >>= 1;
                }
                Ok(shifted_value == val)
            },
        }
    }
}

/// Parses a lowercase-or-uppercase `0x`-prefixed (or bare) hex string into a
/// `u64`, as used for `cmem` masks/values and conditional comparisons.
pub fn parse_hex(s: &str) -> Result<u64> {
    let s = s.trim_start_matches("0x").trim_start_matches("0X");
    u64::from_str_radix(s, 16)
        .map_err(|e| QnsError::invalid_instruction(format!("malformed hex value \"{}\": {}", s, e)))
}

/// Formats a classical memory/register word as a lowercase `0x`-prefixed hex
/// string with no leading-zero padding, as required for result output.
pub fn format_hex(value: u64) -> String {
    format!("{:#x}", value)
}

/// A single instruction drawn from the recognized instruction set.
///
/// Mirrors the qobj instruction schema directly: unused fields are `None`
/// rather than given type-level meaning (e.g. `memory` is only meaningful for
/// `measure` and `bfunc`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub name: String,
    #[serde(default)]
    pub qubits: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<InstructionParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<Conditional>,
    // bfunc-only fields, folded onto the instruction per the wire schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<Relation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val: Option<String>,
}

/// The `params` payload of an instruction: either a flat list of real
/// parameters (rotation angles for `u1`/`u2`/`u3`) or a complex matrix (for
/// `unitary`), distinguished by JSON shape on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstructionParams {
    Angles(Vec<f64>),
    Matrix(Vec<Vec<(f64, f64)>>),
}

impl Instruction {
    /// Builds a `U`/`u1`/`u2`/`u3`/`id` instruction.
    pub fn new(name: impl Into<String>, qubits: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            qubits,
            memory: None,
            register: None,
            params: None,
            conditional: None,
            mask: None,
            relation: None,
            val: None,
        }
    }

    pub fn with_params(mut self, params: Vec<f64>) -> Self {
        self.params = Some(InstructionParams::Angles(params));
        self
    }

    pub fn with_matrix(mut self, matrix: Vec<Vec<(f64, f64)>>) -> Self {
        self.params = Some(InstructionParams::Matrix(matrix));
        self
    }

    pub fn with_memory(mut self, memory: Vec<usize>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_register(mut self, register: Vec<usize>) -> Self {
        self.register = Some(register);
        self
    }

    pub fn with_conditional(mut self, conditional: Conditional) -> Self {
        self.conditional = Some(conditional);
        self
    }

    /// Returns the flat real-valued parameters, erroring if `params` is
    /// absent or holds a matrix instead.
    pub fn angles(&self) -> Result<&[f64]> {
        match &self.params {
            Some(InstructionParams::Angles(v)) => Ok(v),
            _ => Err(QnsError::invalid_instruction(format!(
                "instruction \"{}\" requires numeric params",
                self.name
            ))),
        }
    }

    /// Returns the matrix parameter as a flat row-major `Vec<Complex64>`
    /// grid, erroring if `params` is absent or holds angles instead.
    pub fn matrix(&self) -> Result<&[Vec<(f64, f64)>]> {
        match &self.params {
            Some(InstructionParams::Matrix(m)) => Ok(m),
            _ => Err(QnsError::invalid_instruction(format!(
                "instruction \"{}\" requires a matrix param",
                self.name
            ))),
        }
    }
}
