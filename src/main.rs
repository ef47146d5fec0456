//! Roll Call - desktop attendance tracker.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use roll_call as app;

use app::cli::{self, Cli};
use app::config::{AppConfig, ConfigLoadResult};
use app::storage::FileStore;
use app::store::AttendanceStore;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Determine config path based on mode
    let config_path = if cli.dev {
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };
    let config_result = AppConfig::try_load(&config_path);
    let config = match &config_result {
        ConfigLoadResult::Loaded(config) => config.clone(),
        _ => AppConfig::default(),
    };

    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| config.data_dir())
        .ok_or_else(|| app::AppError::config("Could not determine a data directory"))?;

    // Initialize logging
    let log_dir = data_dir.join("logs");
    let file_logging = config.logging.file_enabled && std::fs::create_dir_all(&log_dir).is_ok();
    let _log_guard = app::logging::init(file_logging.then_some(log_dir.as_path()));

    tracing::info!("Roll Call starting...");
    if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
    }
    tracing::info!("Config path: {:?}", config_path);
    match config_result {
        ConfigLoadResult::Loaded(_) => tracing::info!("Config loaded successfully"),
        ConfigLoadResult::Missing => tracing::info!("Config missing, using defaults"),
        ConfigLoadResult::Invalid(e) => tracing::warn!("Config invalid, using defaults: {}", e),
    }

    let storage =
        FileStore::open(&data_dir).with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
    let mut store = AttendanceStore::load(storage).with_batch_dedup(config.import.dedupe_within_batch);

    match cli.command {
        Some(command) => {
            let stdin = io::stdin();
            cli::run(command, &mut store, &config, &mut io::stdout(), &mut stdin.lock())?;
        }
        None => {
            let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
            app::ui::run(store, config, rt).map_err(|e| anyhow::anyhow!("Window error: {e}"))?;
        }
    }

    Ok(())
}
