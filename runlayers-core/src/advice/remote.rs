use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    error::{JobError, truncate_body},
    format::display_number,
    model::WeatherRecord,
};

use super::AdviceStrategy;

const SERVICE: &str = "chat model";
pub const DEFAULT_ENDPOINT: &str = "https://models.github.ai/inference/chat/completions";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You are a running coach. Give conservative, practical clothing layers advice for an outdoor run. Keep it to 1-2 short sentences. Mention rain/wind only if relevant. No medical claims.";

/// Advice from an OpenAI-compatible chat-completion endpoint.
#[derive(Clone)]
pub struct RemoteAdvice {
    http: Client,
    endpoint: String,
    model: String,
    token: Option<String>,
}

impl std::fmt::Debug for RemoteAdvice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteAdvice")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl RemoteAdvice {
    pub fn new(
        http: Client,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            model: model.into(),
            token,
        }
    }

    #[instrument(skip(self, summary), level = "info")]
    async fn complete(&self, summary: &str) -> Result<String, JobError> {
        let token = self
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| JobError::Auth("GH_MODELS_TOKEN is not set for the model call".into()))?;

        let user_prompt = format!("Weather: {summary} . Recommend running layers.");
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
        };

        let res = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(JobError::transport(SERVICE))?;

        let status = res.status();
        let text = res.text().await.map_err(JobError::transport(SERVICE))?;

        if !status.is_success() {
            return Err(JobError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                body: truncate_body(&text),
            });
        }

        extract_content(&text)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

fn extract_content(body: &str) -> Result<String, JobError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| JobError::malformed(SERVICE, e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| JobError::malformed(SERVICE, "response missing message content"))
}

/// Coarse label for the local hour in `timezone`.
///
/// A missing or unrecognised timezone is treated as midday.
pub fn time_of_day(timezone: Option<&str>, now: DateTime<Utc>) -> &'static str {
    let hour = timezone
        .and_then(|tz| tz.parse::<Tz>().ok())
        .map(|tz| now.with_timezone(&tz).hour())
        .unwrap_or(12);

    match hour {
        h if h < 12 => "morning",
        h if h >= 17 => "evening",
        _ => "afternoon",
    }
}

/// One-line weather summary embedded in the user prompt.
pub fn build_summary(weather: &WeatherRecord, now: DateTime<Utc>) -> String {
    let current = &weather.current;
    let daily = &weather.daily;

    [
        format!("Now {}F", display_number(current.temperature_f)),
        format!(
            "Low/High {}F/{}F",
            display_number(daily.low_f),
            display_number(daily.high_f)
        ),
        format!("{}% precip chance", display_number(daily.precip_probability)),
        format!("Wind {} mph", display_number(current.wind_mph)),
        format!("Conditions: {}", current.weather_desc),
        format!("Time: {}", time_of_day(weather.timezone.as_deref(), now)),
    ]
    .join(", ")
}

#[async_trait]
impl AdviceStrategy for RemoteAdvice {
    async fn advise(&self, weather: &WeatherRecord) -> Result<String, JobError> {
        let summary = build_summary(weather, Utc::now());
        debug!(%summary, "Requesting model advice");
        self.complete(&summary).await
    }
}
