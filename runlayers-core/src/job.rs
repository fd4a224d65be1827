//! One end-to-end run: forecast, advice, message, delivery.

use reqwest::Client;
use std::time::Duration;
use tracing::{info, instrument};

use crate::{
    advice::{AdviceEngine, RemoteAdvice},
    config::Config,
    error::JobError,
    format::format_message,
    notify::WebhookNotifier,
    provider::{ForecastProvider, OpenMeteoProvider},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Post the message to the webhook.
    Deliver,
    /// Build the message but do not post it.
    DryRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub message: String,
    pub delivered: bool,
}

pub fn http_client(config: &Config) -> Result<Client, JobError> {
    Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .user_agent(concat!("runlayers/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| JobError::Config(format!("failed to build HTTP client: {e}")))
}

pub fn advice_engine(config: &Config, http: &Client) -> AdviceEngine {
    if !config.ai.enabled {
        return AdviceEngine::rule_based();
    }

    AdviceEngine::with_remote(RemoteAdvice::new(
        http.clone(),
        config.ai.endpoint.clone(),
        config.ai.model.clone(),
        config.ai.token.clone(),
    ))
}

#[instrument(skip(config), fields(location = %config.location_name), level = "info")]
pub async fn run_job(config: &Config, mode: RunMode) -> Result<JobReport, JobError> {
    config.validate(mode == RunMode::Deliver)?;

    let http = http_client(config)?;
    let provider = OpenMeteoProvider::new(http.clone(), config.forecast_base_url.clone());

    info!(
        latitude = config.latitude,
        longitude = config.longitude,
        "Fetching weather for {}",
        config.location_name
    );
    let weather = provider
        .fetch_weather(config.latitude, config.longitude)
        .await?;

    let engine = advice_engine(config, &http);
    let advice = engine.advise(&weather).await;

    let message = format_message(&config.location_name, &weather, &advice);

    if mode == RunMode::DryRun {
        info!("Dry run; message not posted");
        return Ok(JobReport {
            message,
            delivered: false,
        });
    }

    WebhookNotifier::new(http)
        .post(config.webhook_url()?, &message)
        .await?;
    info!("Weather message posted to webhook");

    Ok(JobReport {
        message,
        delivered: true,
    })
}
