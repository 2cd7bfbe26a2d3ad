use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "bucket-audit.toml";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// USD per GB-month used when a bucket carries no explicit monthly cost.
    pub rate: Option<f64>,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))
    }

    /// Look for `bucket-audit.toml` in the working directory.
    pub fn discover() -> Option<Self> {
        Self::discover_in(Path::new("."))
    }

    /// A config that exists but fails to load is logged and ignored.
    pub fn discover_in(dir: &Path) -> Option<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return None;
        }
        match Config::load(&path) {
            Ok(cfg) => {
                tracing::debug!(path = %path.display(), rate = ?cfg.rate, "loaded config");
                Some(cfg)
            }
            Err(e) => {
                let error = format!("{e:#}");
                tracing::warn!(path = %path.display(), %error, "ignoring unreadable config");
                None
            }
        }
    }
}
