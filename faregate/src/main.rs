use aggregator::api::{self, ApiError, SearchApi};
use aggregator::service::SearchService;
use aggregator::stub::StubGds;
use clap::Parser;
use farecache::TokenCache;
use metrics_exporter_statsd::StatsdBuilder;
use shared::metrics_defs::register_all;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod config;
use config::{Config, ConfigError, MetricsConfig};

#[derive(Parser)]
#[command(about = "Flight fare metasearch gateway")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "example_config.yaml")]
    config: PathBuf,
}

#[derive(thiserror::Error, Debug)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not install metrics recorder: {0}")]
    Metrics(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let cli = Cli::parse();
    let config = Config::from_file(&cli.config)?;

    init_logging(&config);
    init_metrics(config.common.metrics.as_ref())?;

    let cache = Arc::new(TokenCache::in_memory(&config.cache));
    let mut service = SearchService::new(cache);
    for provider in &config.aggregator.providers {
        service.add_provider(Arc::new(StubGds::new(
            provider.name.clone(),
            Duration::from_millis(provider.delay_ms),
            provider.offers,
        )));
    }
    tracing::info!(providers = service.provider_count(), "starting search gateway");

    let api = SearchApi::new(
        Arc::new(service),
        Duration::from_millis(config.aggregator.request_timeout_ms),
    );
    api::run(
        &config.aggregator.listener.host,
        config.aggregator.listener.port,
        api,
    )
    .await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let default_directive = config
        .common
        .logging
        .as_ref()
        .map(|logging| logging.level.clone())
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Installs the StatsD recorder when configured; without it metric
/// macros are no-ops.
fn init_metrics(config: Option<&MetricsConfig>) -> Result<(), StartupError> {
    let Some(metrics_config) = config else {
        return Ok(());
    };

    let recorder = StatsdBuilder::from(&metrics_config.statsd_host, metrics_config.statsd_port)
        .build(Some("faregate"))
        .map_err(|e| StartupError::Metrics(e.to_string()))?;
    metrics::set_global_recorder(recorder).map_err(|e| StartupError::Metrics(e.to_string()))?;

    register_all(aggregator::metrics_defs::ALL_METRICS);
    register_all(farecache::metrics_defs::ALL_METRICS);
    Ok(())
}
