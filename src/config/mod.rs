mod file_config;

pub use file_config::{EnrichmentConfig, FileConfig};

use crate::enrichment::{REMOTE_CALLS_PER_LOOKUP, SPOTIFY_API_BASE};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

/// How the analysis report is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single-line JSON.
    #[default]
    Compact,
    /// Indented JSON.
    Pretty,
}

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub history_files: Vec<PathBuf>,
    pub output_format: OutputFormat,
    pub enrich: bool,
    pub top_n: Option<usize>,
    pub spotify_token: Option<String>,
    pub api_base_url: Option<String>,
    pub min_request_interval_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub no_fallback: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub history_files: Vec<PathBuf>,
    pub output_format: OutputFormat,
    pub enrich: bool,

    // Feature configs (with defaults)
    pub enrichment: EnrichmentSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let history_files: Vec<PathBuf> = match file.history_files {
            Some(files) if !files.is_empty() => files.into_iter().map(PathBuf::from).collect(),
            _ => cli.history_files.clone(),
        };
        if history_files.is_empty() {
            bail!("At least one history file must be specified on the command line or in config file");
        }
        for path in &history_files {
            if !path.exists() {
                bail!("History file does not exist: {:?}", path);
            }
            if !path.is_file() {
                bail!("History path is not a file: {:?}", path);
            }
        }

        let output_format = match file.output_format {
            Some(s) => match parse_output_format(&s) {
                Some(format) => format,
                None => bail!("Invalid output_format '{}', expected compact or pretty", s),
            },
            None => cli.output_format,
        };

        let enrich = file.enrich.unwrap_or(cli.enrich);

        // Enrichment settings - merge file config with CLI and defaults
        let defaults = EnrichmentSettings::default();
        let en_file = file.enrichment.unwrap_or_default();
        let enrichment = EnrichmentSettings {
            top_n: en_file.top_n.or(cli.top_n).unwrap_or(defaults.top_n),
            batch_size: en_file.batch_size.unwrap_or(defaults.batch_size),
            batch_pause_ms: en_file.batch_pause_ms.unwrap_or(defaults.batch_pause_ms),
            max_concurrency: en_file.max_concurrency.unwrap_or(defaults.max_concurrency),
            api_base_url: en_file
                .api_base_url
                .or_else(|| cli.api_base_url.clone())
                .unwrap_or(defaults.api_base_url),
            access_token: en_file
                .access_token
                .or_else(|| cli.spotify_token.clone())
                .filter(|t| !t.trim().is_empty()),
            min_request_interval_ms: en_file
                .min_request_interval_ms
                .or(cli.min_request_interval_ms)
                .unwrap_or(defaults.min_request_interval_ms),
            request_timeout_secs: en_file
                .request_timeout_secs
                .or(cli.request_timeout_secs)
                .unwrap_or(defaults.request_timeout_secs),
            fallback_enabled: en_file
                .fallback_enabled
                .unwrap_or(!cli.no_fallback && defaults.fallback_enabled),
        };

        if enrichment.batch_size == 0 {
            bail!("enrichment.batch_size must be greater than 0");
        }
        if enrichment.max_concurrency == 0 {
            bail!("enrichment.max_concurrency must be greater than 0");
        }

        Ok(Self {
            history_files,
            output_format,
            enrich,
            enrichment,
        })
    }
}

#[derive(Debug, Clone)]
pub struct EnrichmentSettings {
    /// How many of the most played tracks to enrich.
    pub top_n: usize,
    pub batch_size: usize,
    pub batch_pause_ms: u64,
    /// Upper bound on lookups in flight at once.
    pub max_concurrency: usize,
    pub api_base_url: String,
    pub access_token: Option<String>,
    pub min_request_interval_ms: u64,
    pub request_timeout_secs: u64,
    /// Use generated metadata when the remote lookup fails or no token is set.
    pub fallback_enabled: bool,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            top_n: 100,
            batch_size: 5,
            batch_pause_ms: 100,
            max_concurrency: 5,
            api_base_url: SPOTIFY_API_BASE.to_string(),
            access_token: None,
            min_request_interval_ms: 1000,
            request_timeout_secs: 10,
            fallback_enabled: !cfg!(feature = "no_fallback"),
        }
    }
}

impl EnrichmentSettings {
    pub fn batch_pause(&self) -> Duration {
        Duration::from_millis(self.batch_pause_ms)
    }

    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    /// Timeout of a single call to the metadata service.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Upper bound on a whole track lookup.
    ///
    /// Each remote call may wait for the throttler behind every other lookup
    /// in flight before its own timeout starts.
    pub fn lookup_deadline(&self) -> Duration {
        let concurrency = u32::try_from(self.max_concurrency.max(1)).unwrap_or(u32::MAX);
        self.min_request_interval()
            .saturating_mul(concurrency)
            .saturating_add(self.request_timeout())
            .saturating_mul(REMOTE_CALLS_PER_LOOKUP)
    }
}

/// Parses an output format string into OutputFormat.
/// Uses clap's ValueEnum trait for parsing.
fn parse_output_format(s: &str) -> Option<OutputFormat> {
    OutputFormat::from_str(s, true).ok()
}
