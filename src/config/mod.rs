use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::PathParameters;

fn default_home_agl_m() -> f64 {
    1.5
}

fn default_repeater_agl_m() -> f64 {
    15.0
}

/// Defaults applied by the calling layer before it hands inputs to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LosConfig {
    #[serde(default)]
    pub path: PathParameters,
    /// Used when a home location has no antenna height
    #[serde(default = "default_home_agl_m")]
    pub home_agl_m: f64,
    /// Used when a repeater has no antenna height
    #[serde(default = "default_repeater_agl_m")]
    pub repeater_agl_m: f64,
    #[serde(default)]
    pub trust_strict_horizon: bool,
}

impl Default for LosConfig {
    fn default() -> Self {
        Self {
            path: PathParameters::default(),
            home_agl_m: default_home_agl_m(),
            repeater_agl_m: default_repeater_agl_m(),
            trust_strict_horizon: false,
        }
    }
}

impl LosConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open config {:?}", path))?;
        let config: LosConfig = match serde_json::from_reader(std::io::BufReader::new(file)) {
            Ok(config) => config,
            Err(e) => {
                warn!(?path, error = %e, "config file could not be parsed");
                return Err(e).with_context(|| format!("Failed to parse config {:?}", path));
            }
        };
        config
            .path
            .validate()
            .with_context(|| format!("Invalid path parameters in {:?}", path))?;
        info!(?path, "loaded configuration");
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
