use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub history_files: Option<Vec<String>>,
    pub output_format: Option<String>,
    pub enrich: Option<bool>,

    // Feature configs
    pub enrichment: Option<EnrichmentConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub top_n: Option<usize>,
    pub batch_size: Option<usize>,
    pub batch_pause_ms: Option<u64>,
    pub max_concurrency: Option<usize>,
    // Remote service settings
    pub api_base_url: Option<String>,
    pub access_token: Option<String>,
    pub min_request_interval_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub fallback_enabled: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
