use crate::cli::RemoteArgs;
use metrics_exporter_prometheus::PrometheusHandle;
use scorecard::config::{AppConfig, RemoteConfig};
use scorecard::error::AppError;
use scorecard::evaluation::RestEvaluationClient;
use scorecard::telemetry;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Resolves the remote settings, letting `--api-url` win over the environment.
pub(crate) fn remote_config(config: &AppConfig, args: RemoteArgs) -> Result<RemoteConfig, AppError> {
    match args.api_url {
        Some(url) => Ok(RemoteConfig::new(url, config.remote.timeout)?),
        None => Ok(config.remote.clone()),
    }
}

/// Loads configuration, installs logging, and builds the evaluations client.
pub(crate) fn remote_client(args: RemoteArgs) -> Result<RestEvaluationClient, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let remote = remote_config(&config, args)?;
    Ok(RestEvaluationClient::new(remote)?)
}
