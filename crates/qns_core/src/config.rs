//! Configuration management for QNS.

use serde::{Deserialize, Serialize};

/// Global configuration for the simulator crate family.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QnsConfig {
    /// Simulator defaults, overridable per-job/per-experiment.
    pub simulator: SimulatorConfig,
}

/// Simulator-wide defaults, layered beneath per-job and per-experiment
/// overrides resolved by the option & validation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Hard ceiling on addressable qubits, independent of the memory-derived
    /// bound (see `backend::max_qubits_for_memory`).
    pub max_qubits: usize,
    /// Default shot count when a qobj omits `config.shots`.
    pub default_shots: u64,
    /// Default chop threshold applied to emitted statevector amplitudes.
    pub default_chop_threshold: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: 24,
            default_shots: 1024,
            default_chop_threshold: 1e-15,
        }
    }
}

impl QnsConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a JSON string.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        tracing::debug!(max_qubits = config.simulator.max_qubits, "loaded simulator config");
        Ok(config)
    }

    /// Serializes configuration to a JSON string.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QnsConfig::default();
        assert_eq!(config.simulator.max_qubits, 24);
        assert_eq!(config.simulator.default_shots, 1024);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = QnsConfig::default();
        let json = config.to_json().unwrap();
        let parsed = QnsConfig::from_json(&json).unwrap();

        assert_eq!(config.simulator.max_qubits, parsed.simulator.max_qubits);
    }
}
