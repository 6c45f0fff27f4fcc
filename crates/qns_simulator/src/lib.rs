//! # QNS Simulator
//!
//! The evolution engine for the dense state-vector simulator: tensor
//! contraction (via `qns_tensor`), measurement/sampling, conditional
//! dispatch, and the three public simulator modes that share it.
//!
//! ## Modules
//! - [`state`]: the running simulator instance (tensor + `cmem`/`creg` +
//!   seeded RNG).
//! - [`measurement`]: marginal probability, Born-rule sampling, collapse,
//!   reset.
//! - [`sampling`]: the measure-sampling optimiser.
//! - [`dispatcher`]: conditional gating and the instruction dispatch table.
//! - [`split`]: the fork-at-measurement split engine.
//! - [`emission`]: external state-vector flatten/chop.
//! - [`shot_driver`]: runs `shots` shots and builds the outcome histogram.
//! - [`options`]: option & validation layer.
//! - [`modes`]: `SamplingSimulator`/`StatevectorSimulator`/`SplitSimulator`.
//! - [`job`]: job-level orchestration across a qobj's experiments.

pub mod dispatcher;
pub mod emission;
pub mod job;
pub mod measurement;
pub mod modes;
pub mod options;
pub mod sampling;
pub mod shot_driver;
pub mod split;
pub mod state;

pub use job::{run_qobj, JobResult};
pub use modes::{run_experiment, ExperimentData, ExperimentResult, SimulatorMode};
pub use options::{resolve as resolve_options, ResolvedOptions};
pub use split::ResultTree;
pub use state::SimulatorState;
