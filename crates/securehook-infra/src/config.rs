//! Data directory and server configuration loading.
//!
//! Reads `config.toml` from the data directory (`~/.securehook/` by default)
//! and deserializes it into [`ServerConfig`]. A missing file means defaults;
//! callers decide how to fall back from a malformed one.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use securehook_types::config::ServerConfig;
use securehook_types::error::ConfigError;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SECUREHOOK_DATA_DIR";

/// Name of the config file inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory.
///
/// Priority:
/// 1. `SECUREHOOK_DATA_DIR`
/// 2. `~/.securehook`
/// 3. `./.securehook`
pub fn resolve_data_dir() -> PathBuf {
    data_dir_from(std::env::var_os(DATA_DIR_ENV))
}

fn data_dir_from(env_override: Option<OsString>) -> PathBuf {
    if let Some(dir) = env_override.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".securehook");
    }

    PathBuf::from(".securehook")
}

/// Read server configuration from `{data_dir}/config.toml`.
///
/// A missing file is not an error and yields [`ServerConfig::default()`].
pub async fn read_server_config(data_dir: &Path) -> Result<ServerConfig, ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return Ok(ServerConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: config_path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    toml::from_str::<ServerConfig>(&content).map_err(|err| ConfigError::Parse {
        path: config_path.display().to_string(),
        message: err.to_string(),
    })
}
