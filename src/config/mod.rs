mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./ssql.toml", "~/.config/ssql/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if !config.database.is_sqlite() {
        anyhow::bail!(
            "Unsupported database driver '{}' (expected 'sqlite')",
            config.database.driver
        );
    }

    if config.database.max_connections == 0 {
        anyhow::bail!("database.max_connections cannot be 0");
    }

    if config.database.connection_timeout_ms == 0 {
        anyhow::bail!("database.connection_timeout_ms cannot be 0");
    }

    if config.statements.pattern.trim().is_empty() {
        anyhow::bail!("statements.pattern cannot be empty");
    }

    Ok(())
}
