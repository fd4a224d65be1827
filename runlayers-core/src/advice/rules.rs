use async_trait::async_trait;

use crate::{error::JobError, model::WeatherRecord};

use super::AdviceStrategy;

pub const VERY_COLD: &str =
    "Very cold: thermal tights, long-sleeve base, insulated jacket, gloves, warm hat.";
pub const COLD: &str =
    "Cold: tights, long-sleeve base, light insulated or fleece layer, gloves, ear coverage.";
pub const CHILLY: &str = "Chilly: tights or light joggers, long-sleeve, light jacket or vest.";
pub const MILD: &str =
    "Mild: shorts or light tights, breathable long- or short-sleeve, optional light vest.";
pub const WARM: &str = "Warm: shorts and light top; focus on hydration.";
pub const HOT: &str = "Hot: light singlet and shorts, sunscreen, hydrate well.";

pub const RAIN_SHELL: &str = "Carry a light shell if rain starts.";
pub const WIND_LAYER: &str = "Add a wind-blocking layer.";

const RAIN_THRESHOLD_PCT: f64 = 40.0;
const WIND_THRESHOLD_MPH: f64 = 20.0;

/// Upper bounds are inclusive; the first matching band wins.
const BANDS: &[(f64, &str)] = &[
    (20.0, VERY_COLD),
    (32.0, COLD),
    (45.0, CHILLY),
    (60.0, MILD),
    (75.0, WARM),
];

/// Deterministic advice from temperature, rain chance and wind.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedAdvice;

impl RuleBasedAdvice {
    pub fn layers_for(&self, weather: &WeatherRecord) -> String {
        let mut parts = vec![temperature_band(weather.current.temperature_f)];

        if weather
            .daily
            .precip_probability
            .is_some_and(|p| p >= RAIN_THRESHOLD_PCT)
        {
            parts.push(RAIN_SHELL);
        }
        if weather
            .current
            .wind_mph
            .is_some_and(|w| w >= WIND_THRESHOLD_MPH)
        {
            parts.push(WIND_LAYER);
        }

        parts.join(" ")
    }
}

/// A missing reading matches no bounded band and lands in the hot band.
fn temperature_band(temperature_f: Option<f64>) -> &'static str {
    BANDS
        .iter()
        .find(|(upper, _)| temperature_f.is_some_and(|t| t <= *upper))
        .map(|(_, sentence)| *sentence)
        .unwrap_or(HOT)
}

#[async_trait]
impl AdviceStrategy for RuleBasedAdvice {
    async fn advise(&self, weather: &WeatherRecord) -> Result<String, JobError> {
        Ok(self.layers_for(weather))
    }
}
