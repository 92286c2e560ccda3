//! # Site File Checker
//!
//! Loads a site file exactly as a till would at startup and prints what it
//! would register.
//!
//! ## Usage
//! ```bash
//! # Check the site file in the platform config dir (or the defaults)
//! cargo run -p till-site --bin till-site-check
//!
//! # Check a specific file
//! cargo run -p till-site --bin till-site-check -- --config ./site.toml
//!
//! # Machine-readable output
//! cargo run -p till-site --bin till-site-check -- --json
//! ```
//!
//! Exits non-zero when the site file would stop a till from starting.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use till_site::{Site, SiteResult};

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--json" | "-j" => json = true,
            "--help" | "-h" => {
                println!("Till Site File Checker");
                println!();
                println!("Usage: till-site-check [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Site file (default: $TILL_SITE_CONFIG or platform config dir)");
                println!("  -j, --json           Print the report as JSON");
                println!("  -h, --help           Show this help message");
                return ExitCode::SUCCESS;
            }
            other => eprintln!("Ignoring unknown argument: {other}"),
        }
        i += 1;
    }

    match run(config_path, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Site file rejected");
            eprintln!("✗ {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<PathBuf>, json: bool) -> SiteResult<()> {
    let site = Site::open(config_path)?;
    let report = site.report();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
        println!();
        println!("✓ Site file OK");
    }
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=till=trace` - Show trace for till crates only
/// - Default: INFO, DEBUG for the till crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,till=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
