use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use spotify_history_analyzer::config::{self, OutputFormat};
use spotify_history_analyzer::enrichment::{build_resolver, select_top_tracks, EnrichmentEngine};
use spotify_history_analyzer::history::load_history_files;
use spotify_history_analyzer::stats::{analyze, distinct_track_count};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[clap(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"))]
struct CliArgs {
    /// Streaming history JSON files. Overlapping exports are merged.
    #[clap(value_parser = parse_path)]
    pub history_files: Vec<PathBuf>,

    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Enrich the most played tracks with genres and audio features.
    #[clap(long)]
    pub enrich: bool,

    /// How many of the most played tracks to enrich.
    #[clap(long)]
    pub top_n: Option<usize>,

    /// Spotify Web API bearer token. Without one, generated metadata is used.
    #[clap(long, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
    pub spotify_token: Option<String>,

    /// Base URL of the Spotify Web API.
    #[clap(long)]
    pub api_base_url: Option<String>,

    /// Minimum delay between two calls to the Spotify Web API, in milliseconds.
    #[clap(long)]
    pub min_request_interval_ms: Option<u64>,

    /// Timeout of a single track lookup, in seconds.
    #[clap(long)]
    pub request_timeout_secs: Option<u64>,

    /// Report tracks whose lookup failed as unknown instead of generating metadata.
    #[clap(long)]
    pub no_fallback: bool,

    /// Output format of the report.
    #[clap(long, default_value = "compact")]
    pub output_format: OutputFormat,

    /// Shorthand for `--output-format pretty`.
    #[clap(long)]
    pub pretty: bool,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            history_files: args.history_files.clone(),
            output_format: if args.pretty {
                OutputFormat::Pretty
            } else {
                args.output_format
            },
            enrich: args.enrich,
            top_n: args.top_n,
            spotify_token: args.spotify_token.clone(),
            api_base_url: args.api_base_url.clone(),
            min_request_interval_ms: args.min_request_interval_ms,
            request_timeout_secs: args.request_timeout_secs,
            no_fallback: args.no_fallback,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    // stdout carries the report, so logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Loading {} history file(s)...", app_config.history_files.len());
    let history = load_history_files(&app_config.history_files[..])
        .context("Failed to import history")?;
    info!(
        "Imported {} plays of {} distinct tracks ({} entries skipped)",
        history.records.len(),
        distinct_track_count(&history.records),
        history.report.skipped
    );

    let mut report = analyze(&history.records);

    if app_config.enrich {
        let settings = &app_config.enrichment;
        let resolver = build_resolver(settings)?;
        let engine = EnrichmentEngine::new(resolver, settings);
        let queries = select_top_tracks(&history.records, settings.top_n);

        let cancel = CancellationToken::new();
        let ctrl_c_token = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Received Ctrl+C, stopping enrichment");
                ctrl_c_token.cancel();
            }
        });

        let tracks = engine.enrich_with_cancel(&queries, &cancel).await;
        report = report.with_enrichment(tracks);
    }

    let json = match app_config.output_format {
        OutputFormat::Compact => serde_json::to_string(&report),
        OutputFormat::Pretty => serde_json::to_string_pretty(&report),
    }
    .context("Failed to serialize report")?;
    println!("{}", json);

    Ok(())
}
