/// Errors produced by the runlayers pipeline.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("{service} request failed with status {status}: {body}")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Malformed {service} response: {reason}")]
    MalformedResponse {
        service: &'static str,
        reason: String,
    },

    #[error("Missing credential: {0}")]
    Auth(String),

    #[error("Webhook delivery failed with status {status}: {body}")]
    Delivery { status: u16, body: String },

    #[error("Failed to reach {service}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl JobError {
    pub(crate) fn malformed(service: &'static str, reason: impl Into<String>) -> Self {
        JobError::MalformedResponse {
            service,
            reason: reason.into(),
        }
    }

    /// The request URL is dropped: webhook URLs embed their token.
    pub(crate) fn transport(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| JobError::Transport {
            service,
            source: source.without_url(),
        }
    }
}

/// Keep error bodies short enough for a single log line.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
