//! Running-layer advice: a remote language model when enabled, with the
//! rule table as the answer of last resort.

use async_trait::async_trait;
use std::fmt::Debug;
use tracing::{info, warn};

use crate::{error::JobError, model::WeatherRecord};

pub mod remote;
pub mod rules;

pub use remote::RemoteAdvice;
pub use rules::RuleBasedAdvice;

#[async_trait]
pub trait AdviceStrategy: Send + Sync + Debug {
    async fn advise(&self, weather: &WeatherRecord) -> Result<String, JobError>;
}

/// Produces advice text that never fails.
///
/// A configured remote strategy is tried first. Any error it returns is
/// logged and replaced by the rule-based answer for the same record.
#[derive(Debug, Default)]
pub struct AdviceEngine {
    rules: RuleBasedAdvice,
    remote: Option<Box<dyn AdviceStrategy>>,
}

impl AdviceEngine {
    pub fn rule_based() -> Self {
        Self::default()
    }

    pub fn with_remote(remote: impl AdviceStrategy + 'static) -> Self {
        Self {
            rules: RuleBasedAdvice,
            remote: Some(Box::new(remote)),
        }
    }

    pub fn uses_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn advise(&self, weather: &WeatherRecord) -> String {
        if let Some(remote) = &self.remote {
            match remote.advise(weather).await {
                Ok(text) => {
                    info!("Using model-generated running layers");
                    return text;
                }
                Err(err) => {
                    warn!(error = %err, "AI advice failed, using fallback");
                }
            }
        }

        self.rules.layers_for(weather)
    }
}
