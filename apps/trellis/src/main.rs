//! # Trellis - Growth Blueprint Engine
//!
//! The main binary for the Trellis deterministic growth-planning engine.
//!
//! This application provides:
//! - CLI interface for assessments, diagnoses, roadmaps, priorities, and KPIs
//! - Intake file loading and JSON report writing
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                apps/trellis (THE BINARY)              │
//! │                                                       │
//! │  ┌─────────────┐    ┌──────────────────────────────┐ │
//! │  │   CLI       │    │  Runtime Ports               │ │
//! │  │  (clap)     │    │  (wall clock, UUID v4)       │ │
//! │  └──────┬──────┘    └──────────────┬───────────────┘ │
//! │         │                          │                  │
//! │         └────────────┬─────────────┘                  │
//! │                      ▼                                │
//! │              ┌───────────────┐                        │
//! │              │ trellis-core  │                        │
//! │              │  (THE LOGIC)  │                        │
//! │              └───────────────┘                        │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Stage assessment for an intake snapshot
//! trellis assess -f intake.json
//!
//! # Full 90-day roadmap, written to a report file
//! trellis roadmap -f intake.json -o roadmap.json
//!
//! # Ranked execution list, filtered and focused
//! trellis priorities -f intake.json --focus churn --exclude-blocked
//! ```

mod cli;
mod runtime;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing — TRELLIS_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("TRELLIS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "trellis=debug"
    } else {
        "trellis=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Trellis startup banner.
fn print_banner() {
    println!(
        r#"
  ████████╗██████╗ ███████╗██╗     ██╗     ██╗███████╗
  ╚══██╔══╝██╔══██╗██╔════╝██║     ██║     ██║██╔════╝
     ██║   ██████╔╝█████╗  ██║     ██║     ██║███████╗
     ██║   ██╔══██╗██╔══╝  ██║     ██║     ██║╚════██║
     ██║   ██║  ██║███████╗███████╗███████╗██║███████║
     ╚═╝   ╚═╝  ╚═╝╚══════╝╚══════╝╚══════╝╚═╝╚══════╝

  Growth Blueprint Engine v{}

  Deterministic • Staged • Actionable
"#,
        env!("CARGO_PKG_VERSION")
    );
}
