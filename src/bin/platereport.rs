//! CLI binary for platereport.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ReportConfig`, loads the fleet file, and writes the rendered PDF.

use anyhow::{Context, Result};
use clap::Parser;
use platereport::{generate_to_file, JsonVehicleStore, ReportConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

/// Generate a vehicle damage-report PDF from a license-plate photo.
#[derive(Parser, Debug)]
#[command(name = "platereport", version, about)]
struct Cli {
    /// Path to the plate photo (sent to the recognition service as-is).
    image: PathBuf,

    /// Fleet file with known cars and their damage records (JSON).
    #[arg(short, long, default_value = "fleet.json")]
    fleet: PathBuf,

    /// Output PDF path.
    #[arg(short, long, default_value = "report.pdf")]
    output: PathBuf,

    /// Recognition service endpoint.
    #[arg(long, env = "PLATEREPORT_URL")]
    url: Option<String>,

    /// Recognition service username.
    #[arg(long, env = "PLATEREPORT_USERNAME")]
    username: String,

    /// Recognition service password.
    #[arg(long, env = "PLATEREPORT_PASSWORD", hide_env_values = true)]
    password: String,

    /// Per-call timeout for the recognition request, in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Retry budget for transport failures on the recognition call.
    #[arg(long, default_value_t = 1)]
    retries: u32,

    /// Verbose logging (repeat for more: -v = info, -vv = debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut builder = ReportConfig::builder()
        .credentials(cli.username.as_str(), cli.password.as_str())
        .api_timeout_secs(cli.timeout)
        .max_retries(cli.retries);
    if let Some(ref url) = cli.url {
        builder = builder.recognition_url(url.as_str());
    }
    let config = builder.build()?;

    let store = JsonVehicleStore::load(&cli.fleet)
        .with_context(|| format!("loading fleet file {}", cli.fleet.display()))?;

    let image = std::fs::read(&cli.image)
        .with_context(|| format!("reading image {}", cli.image.display()))?;

    match generate_to_file(&image, Arc::new(store), &config, &cli.output).await {
        Ok(stats) => {
            println!(
                "{} report written to {}",
                green("✓"),
                cli.output.display()
            );
            println!(
                "{}",
                dim(&format!(
                    "  recognition {}ms ({} retries) · lookup {}ms · render {}ms · {} damage record(s)",
                    stats.recognition_ms,
                    stats.recognition_retries,
                    stats.lookup_ms,
                    stats.render_ms,
                    stats.damage_count
                ))
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {} {}", red("✗"), e.public_detail(), dim(&format!("({e})")));
            std::process::exit(1);
        }
    }
}

/// Route library tracing to stderr; `RUST_LOG` overrides the -v levels.
fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "platereport=warn",
        1 => "platereport=info",
        _ => "platereport=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}
