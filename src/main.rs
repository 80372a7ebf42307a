//! Learnify API Server
//!
//! Run with: cargo run --bin learnify
//!
//! Configuration is read from `--config`, or else from the default
//! locations (see [`Config::load_default`]), with `LEARNIFY_*` environment
//! overrides. `RUST_LOG` takes precedence over the configured log level.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use learnify_charts::api::{serve, AppState};
use learnify_charts::config::{Config, LoggingConfig};
use learnify_charts::query::{QueryExecutor, QueryInterpreter};
use learnify_charts::store::MemoryStore;

#[derive(Parser)]
#[command(name = "learnify")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chart query server for student performance data")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Student CSV to load (overrides the config)
    #[arg(long)]
    data: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => Config::load_with_env(path).map(|config| (config, Some(path.clone()))),
        None => Config::load_default(),
    };

    let (mut config, source) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            init_tracing(&LoggingConfig::default());
            tracing::error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };
    if let Some(data) = args.data {
        config.store.csv_path = data;
    }

    init_tracing(&config.logging);

    tracing::info!("Starting Learnify API server v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }

    let store = load_store(&config)?;
    tracing::info!("Student store ready with {} records", store.len());

    let interpreter = QueryInterpreter::standard()?;
    tracing::info!(
        "Vocabulary loaded with {} aliases",
        interpreter.vocabulary().len()
    );

    let executor = Arc::new(
        QueryExecutor::new(interpreter, Arc::new(store)).with_limits(config.query.limits()),
    );

    let state = AppState::new(executor, config.api.clone());
    serve(state, &config.api).await?;

    tracing::info!("Learnify API server stopped");
    Ok(())
}

/// Initialize tracing from the logging config
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "learnify_charts={level},learnify={level},tower_http={level}",
            level = logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Load the student CSV; a missing file starts the server with no data
fn load_store(config: &Config) -> anyhow::Result<MemoryStore> {
    let path = &config.store.csv_path;
    if !path.exists() {
        tracing::warn!(
            "Student data {:?} not found, starting with an empty store",
            path
        );
        return Ok(MemoryStore::default());
    }

    Ok(MemoryStore::from_csv(path)?)
}
