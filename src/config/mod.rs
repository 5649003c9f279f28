use crate::constants;
use crate::registry::Endpoints;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the pinned images file is written
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Registry endpoints
    #[serde(default)]
    pub registries: Endpoints,
}

/// The pins file inside the checkout this binary was built from
fn default_output() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(constants::output::DEFAULT_PATH)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: default_output(),
            registries: Endpoints::default(),
        }
    }
}

impl Config {
    /// Load `<config dir>/docker-pins/config.toml` if it exists, otherwise defaults
    pub fn load() -> anyhow::Result<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("docker-pins").join("config.toml");
            if config_path.exists() {
                return Self::load_from(&config_path);
            }
        }
        Ok(Config::default())
    }

    /// Load an explicit config file; it must exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}
