//! Pipeline configuration.
//!
//! One TOML file (`pipeline.toml`) covers the broker connection, the
//! telescopes to plan for, the plan parameters and the HTTP bind address.
//! Every section has defaults so the server runs with no file at all.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::Telescope;
use crate::plans::PlanParams;

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub gcn: GcnConfig,
    /// Telescopes to generate plans for, by catalog name.
    pub telescopes: Vec<String>,
    pub plan: PlanParams,
    pub http: HttpConfig,
}

/// VOEvent broker connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GcnConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait before reconnecting after a dropped connection.
    pub reconnect_delay_secs: u64,
}

/// HTTP API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind_addr: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            gcn: GcnConfig::default(),
            telescopes: vec!["ZTF".to_string(), "Gattini".to_string()],
            plan: PlanParams::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for GcnConfig {
    fn default() -> Self {
        Self {
            host: "68.169.57.253".to_string(),
            port: 8099,
            reconnect_delay_secs: 5,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `pipeline.toml` from the current or parent directory, falling
    /// back to defaults when no file exists.
    pub fn from_default_location() -> anyhow::Result<Self> {
        let search_paths = [
            PathBuf::from("pipeline.toml"),
            PathBuf::from("../pipeline.toml"),
        ];
        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    /// Resolve the configured telescope names against the catalog.
    ///
    /// Unknown names are an error so a typo does not silently drop an
    /// instrument from follow-up.
    pub fn resolve_telescopes(&self) -> anyhow::Result<Vec<Telescope>> {
        self.telescopes
            .iter()
            .map(|name| {
                Telescope::by_name(name)
                    .ok_or_else(|| anyhow::anyhow!("Unknown telescope: {}", name))
            })
            .collect()
    }
}
