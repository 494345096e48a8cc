use clap::Parser;
use geocode_audit::config::{LoggingSettings, Settings};
use geocode_audit::io::{self, OutputPaths};
use geocode_audit::{LocationClient, Pipeline, Reconciler};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Reconcile place descriptions against a place index and report deviations
#[derive(Debug, Parser)]
#[command(name = "geocode-audit", version, about)]
struct Cli {
    /// Extra configuration file, layered over config/default and config/local
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input CSV (overrides files.input)
    #[arg(short, long)]
    input: Option<String>,

    /// Output base name (overrides files.output)
    #[arg(short, long)]
    output: Option<String>,
}

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.json().init(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Logging is not up yet, so configuration errors go to stderr
    let mut settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(input) = cli.input {
        settings.files.input = input;
    }
    if let Some(output) = cli.output {
        settings.files.output = output;
    }

    init_logging(&settings.logging);

    info!("Starting geocode audit...");

    match run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Audit failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let client = LocationClient::from_settings(&settings.provider)?;

    info!(
        region = %settings.provider.region,
        index = %settings.provider.index_name,
        countries = ?settings.provider.countries,
        "Location client initialized"
    );

    let records = io::read_input(
        Path::new(&settings.files.input),
        settings.files.strict_coordinates,
    )?;

    info!(input = %settings.files.input, records = records.len(), "Input loaded");

    let reconciler = Reconciler::new(
        client,
        settings.provider.countries.clone(),
        settings.reconcile.confidence_threshold,
    );
    let result = Pipeline::new(reconciler).run(&records).await;

    let paths = OutputPaths::new(
        &settings.files.output,
        settings.files.output_dir.as_deref(),
        chrono::Utc::now().timestamp(),
    );
    io::write_output(&result.outputs, &paths.output)?;
    io::write_errors(&result.errors, &paths.errors)?;

    let summary = result.summary();
    info!(
        total = summary.total,
        ok = summary.ok,
        low_confidence = summary.low_confidence,
        failed = summary.failed,
        output = %paths.output.display(),
        errors = %paths.errors.display(),
        "Audit complete"
    );

    Ok(())
}
