use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use usuarios_ad_export::config::{self, Config, ConfigError};
use usuarios_ad_export::{ExportError, Exporter};

/// Explicit config file; when set, no other location is tried
const CONFIG_ENV: &str = "USUARIOS_EXPORT_CONFIG";

fn main() -> anyhow::Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let mut config = load_or_default_config()?;
    config.apply_env_overrides(|key| env::var(key).ok())?;

    debug!(
        addr = %config.database.addr(),
        database = %config.database.database,
        user_table = %config.schema.user_table,
        "Starting export"
    );

    report(Exporter::new(config).run())
}

/// Print the one outcome line and pick the exit status.
///
/// Database errors are reported and end the run with a failure status; any
/// other error propagates out of `main`.
fn report(result: Result<PathBuf, ExportError>) -> anyhow::Result<ExitCode> {
    match result {
        Ok(path) => {
            info!(path = %path.display(), "Data exported successfully");
            Ok(ExitCode::SUCCESS)
        }
        Err(ExportError::Source(e)) => {
            error!(error = %e, "Database export failed");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn load_or_default_config() -> Result<Config, ConfigError> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        let config = config::load_config(&path)?;
        debug!(path = %path, "Loaded configuration");
        return Ok(config);
    }

    // Try to load from config file
    let config_paths = ["config/usuarios_export.toml", "usuarios_export.toml"];

    for path in config_paths {
        match config::load_config(path) {
            Ok(config) => {
                debug!(path = path, "Loaded configuration");
                return Ok(config);
            }
            Err(ConfigError::IoError(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = path, "No config file");
            }
            Err(e) => {
                warn!(path = path, error = %e, "Failed to load config");
            }
        }
    }

    debug!("Using default configuration");
    Ok(Config::default())
}
