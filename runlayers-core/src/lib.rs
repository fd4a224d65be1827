//! Core library for the `runlayers` job.
//!
//! This crate defines:
//! - The weather-code table and normalized forecast model
//! - The Open-Meteo forecast client
//! - Running-layer advice (model-generated with a rule-based fallback)
//! - Message formatting and webhook delivery
//! - Configuration and the job orchestrator
//!
//! It is used by `runlayers-cli`, but the job can be driven from any binary.

pub mod advice;
pub mod codes;
pub mod config;
pub mod error;
pub mod format;
pub mod job;
pub mod model;
pub mod notify;
pub mod provider;

pub use advice::{AdviceEngine, AdviceStrategy, RemoteAdvice, RuleBasedAdvice};
pub use config::{AiConfig, Config, Overrides};
pub use error::JobError;
pub use job::{JobReport, RunMode, run_job};
pub use model::{CurrentConditions, DailySummary, WeatherRecord};
pub use provider::{ForecastProvider, OpenMeteoProvider};
