//! CLI subcommands.

pub mod batch;
pub mod classify;
pub mod config;

use std::path::Path;

use acceso_core::AccesoConfig;

/// Load configuration: an explicit `--config` path, the user config file if
/// one exists, or the built-in defaults.
pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<AccesoConfig> {
    if let Some(path) = config_path {
        return Ok(AccesoConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        return Ok(AccesoConfig::from_file(&default_path)?);
    }

    Ok(AccesoConfig::default())
}
