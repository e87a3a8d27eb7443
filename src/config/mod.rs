//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<KeycueConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {:?}", path))?;
    let config: KeycueConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse {:?}", path))?;
    config.validate()?;
    Ok(config)
}

/// Load configuration, or the defaults when the file does not exist
pub fn load_or_default(path: &Path) -> Result<KeycueConfig> {
    if path.exists() {
        load_config(path)
    } else {
        log::debug!("{:?} not found, using default configuration", path);
        Ok(KeycueConfig::default())
    }
}
