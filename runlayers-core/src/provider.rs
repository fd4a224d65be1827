use crate::{error::JobError, model::WeatherRecord};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

pub use open_meteo::OpenMeteoProvider;

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Fetch today's forecast for a coordinate, in Fahrenheit and mph.
    async fn fetch_weather(&self, latitude: f64, longitude: f64)
    -> Result<WeatherRecord, JobError>;
}
