//! Wire-level qobj document types: the JSON schema carried between a client
//! and the simulator.

use serde::{Deserialize, Serialize};

use super::instruction::Instruction;

/// Top-level submission document: a batch of experiments sharing one
/// backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Qobj {
    pub qobj_id: String,
    #[serde(rename = "type", default = "default_qobj_type")]
    pub qobj_type: String,
    #[serde(default)]
    pub schema_version: Option<String>,
    pub config: QobjConfig,
    pub experiments: Vec<Experiment>,
    #[serde(default)]
    pub header: Option<Header>,
}

fn default_qobj_type() -> String {
    "QASM".to_string()
}

/// Job-wide configuration, overridable per-experiment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QobjConfig {
    #[serde(default)]
    pub shots: Option<u64>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub memory_slots: Option<usize>,
    #[serde(default)]
    pub n_qubits: Option<usize>,
    #[serde(default)]
    pub initial_statevector: Option<Vec<(f64, f64)>>,
    #[serde(default)]
    pub chop_threshold: Option<f64>,
    #[serde(default)]
    pub allows_measure_sampling: Option<bool>,
    #[serde(default)]
    pub memory: Option<bool>,
}

/// A single circuit, with its own instruction list and optional
/// per-experiment config overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub config: Option<ExperimentConfig>,
    #[serde(default)]
    pub header: Option<Header>,
}

/// Per-experiment overrides of the job-wide [`QobjConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperimentConfig {
    #[serde(default)]
    pub n_qubits: Option<usize>,
    #[serde(default)]
    pub memory_slots: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub initial_statevector: Option<Vec<(f64, f64)>>,
    #[serde(default)]
    pub chop_threshold: Option<f64>,
    #[serde(default)]
    pub allows_measure_sampling: Option<bool>,
}

/// Free-form, passthrough metadata attached to a job or an experiment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl QobjConfig {
    /// Resolves `shots`, defaulting to 1 when absent.
    pub fn shots_or_default(&self) -> u64 {
        self.shots.unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qobj_deserialize_minimal() {
        let json = r#"{
            "qobj_id": "job-1",
            "type": "QASM",
            "config": {"shots": 10, "memory_slots": 2, "n_qubits": 2},
            "experiments": [
                {"instructions": [{"name": "u3", "qubits": [0], "params": [3.14159, 0.0, 3.14159]}]}
            ]
        }"#;
        let qobj: Qobj = serde_json::from_str(json).unwrap();
        assert_eq!(qobj.qobj_id, "job-1");
        assert_eq!(qobj.config.shots_or_default(), 10);
        assert_eq!(qobj.experiments.len(), 1);
        assert_eq!(qobj.experiments[0].instructions[0].name, "u3");
    }

    #[test]
    fn test_experiment_config_override() {
        let json = r#"{
            "instructions": [],
            "config": {"n_qubits": 3, "seed": 42}
        }"#;
        let exp: Experiment = serde_json::from_str(json).unwrap();
        let cfg = exp.config.unwrap();
        assert_eq!(cfg.n_qubits, Some(3));
        assert_eq!(cfg.seed, Some(42));
    }

    #[test]
    fn test_shots_default() {
        let cfg = QobjConfig::default();
        assert_eq!(cfg.shots_or_default(), 1);
    }
}
