//! # Trellis CLI Module
//!
//! This module implements the CLI interface for Trellis.
//!
//! ## Available Commands
//!
//! - `assess` - Classify the lifecycle stage of a business intake
//! - `diagnose` - Detect and rank growth bottlenecks
//! - `roadmap` - Generate the full 90-day growth roadmap
//! - `priorities` - Produce the ranked execution list
//! - `kpis` - Set 90-day KPI targets (optionally with trajectories)
//! - `template` - Emit a blank intake file to fill in

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trellis_core::TrellisError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Trellis - Growth Blueprint Engine
///
/// A deterministic growth-planning engine. The same intake snapshot always
/// produces the same diagnosis, roadmap, priorities, and targets.
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify the lifecycle stage of a business
    Assess {
        /// Path to the intake file (JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Detect and rank growth bottlenecks
    Diagnose {
        /// Path to the intake file (JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Generate the full 90-day growth roadmap
    Roadmap {
        /// Path to the intake file (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Write the roadmap as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Produce the ranked execution list
    Priorities {
        /// Path to the intake file (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Pull entries matching this area (substring of action or rationale)
        /// to the front
        #[arg(long)]
        focus: Option<String>,

        /// Drop entries that have known blocking factors
        #[arg(long)]
        exclude_blocked: bool,
    },

    /// Set 90-day KPI targets
    Kpis {
        /// Path to the intake file (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Also project a 3-period trajectory per target
        #[arg(short, long)]
        trajectory: bool,
    },

    /// Emit a blank intake template to fill in
    Template {
        /// Write the template to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), TrellisError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Assess { file } => cmd_assess(&file, json_mode),
        Commands::Diagnose { file } => cmd_diagnose(&file, json_mode),
        Commands::Roadmap { file, output } => cmd_roadmap(&file, output.as_deref(), json_mode),
        Commands::Priorities {
            file,
            focus,
            exclude_blocked,
        } => cmd_priorities(&file, focus, exclude_blocked, json_mode),
        Commands::Kpis { file, trajectory } => cmd_kpis(&file, trajectory, json_mode),
        Commands::Template { output } => cmd_template(output.as_deref()),
    }
}
