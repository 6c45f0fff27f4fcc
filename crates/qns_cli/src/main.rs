//! QNS CLI - dense state-vector simulator front end.
//!
//! Provides commands for:
//! - Running a qobj document through one of the three simulator modes
//! - Showing the advertised backend configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use qns_core::backend::{available_memory_bytes, max_qubits_for_memory, BackendConfiguration, ABSOLUTE_MAX_QUBITS};
use qns_simulator::SimulatorMode;

/// QNS - dense state-vector quantum circuit simulator.
#[derive(Parser)]
#[command(name = "qns")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ModeArg {
    Sampling,
    Statevector,
    Split,
}

impl From<ModeArg> for SimulatorMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sampling => SimulatorMode::Sampling,
            ModeArg::Statevector => SimulatorMode::Statevector,
            ModeArg::Split => SimulatorMode::Split,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a qobj document through the simulator
    Run {
        /// Path to a qobj JSON document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Which simulator mode to run the qobj through
        #[arg(short, long, default_value = "sampling")]
        mode: ModeArg,

        /// Job identifier carried into the output
        #[arg(long, default_value = "qns-job")]
        job_id: String,
    },

    /// Show the advertised backend configuration
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let _ = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .try_init();

    match cli.command {
        Commands::Run { input, mode, job_id } => cmd_run(&input, mode.into(), job_id, cli.format),
        Commands::Info => cmd_info(cli.format),
    }
}

fn cmd_run(input: &PathBuf, mode: SimulatorMode, job_id: String, format: OutputFormat) -> Result<()> {
    tracing::info!(file = %input.display(), "running qobj");
    let result =
        qns_cli::run_from_path(input, mode, job_id).with_context(|| format!("failed to run {}", input.display()))?;

    match format {
        OutputFormat::Text => {
            println!("\n=== QNS Run Result ===");
            println!("Job:        {}", result.job_id);
            println!("Status:     {}", result.status);
            println!("Success:    {}", result.success);
            println!("Time:       {:.3} ms", result.time_taken * 1000.0);
            println!();
            for (i, experiment) in result.results.iter().enumerate() {
                println!("Experiment {}: {} (shots={})", i, experiment.status, experiment.shots);
                if let Some(counts) = &experiment.data.counts {
                    let mut keys: Vec<_> = counts.keys().collect();
                    keys.sort();
                    for key in keys {
                        println!("  {}: {}", key, counts[key]);
                    }
                }
            }
        },
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        },
    }

    Ok(())
}

fn cmd_info(format: OutputFormat) -> Result<()> {
    let max_qubits = max_qubits_for_memory(available_memory_bytes()).min(ABSOLUTE_MAX_QUBITS);
    let config = BackendConfiguration::new(max_qubits);

    match format {
        OutputFormat::Text => {
            println!("\n=== {} ===", config.backend_name);
            println!("Version:    {}", config.backend_version);
            println!("Max qubits: {}", config.n_qubits);
            println!("Max shots:  {}", config.max_shots);
            println!("Basis:      {}", config.basis_gates.join(", "));
            println!("{}", config.description);
        },
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        },
    }

    Ok(())
}
