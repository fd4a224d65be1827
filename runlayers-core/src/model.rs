use serde::Serialize;

/// Normalized snapshot of current and daily forecast data for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRecord {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// IANA timezone resolved by the provider, e.g. "America/Chicago".
    pub timezone: Option<String>,
    pub timezone_abbreviation: Option<String>,
    pub current: CurrentConditions,
    pub daily: DailySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    /// `None` when the provider sent no reading.
    pub temperature_f: Option<f64>,
    pub weather_code: Option<i32>,
    pub weather_desc: &'static str,
    pub weather_emoji: &'static str,
    pub wind_mph: Option<f64>,
}

/// First day of the daily series. Fields missing upstream stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub low_f: Option<f64>,
    pub high_f: Option<f64>,
    /// 0-100
    pub precip_probability: Option<f64>,
    pub weather_code: Option<i32>,
    pub weather_desc: &'static str,
    pub weather_emoji: &'static str,
    /// Local time, e.g. "2025-12-17T07:07".
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::codes::map_code;

    /// Record used across module tests; tweak fields per case.
    pub fn record(temperature_f: f64, precip: Option<f64>, wind_mph: f64) -> WeatherRecord {
        let now = map_code(2);
        let day = map_code(61);
        WeatherRecord {
            latitude: Some(31.565),
            longitude: Some(-93.484),
            timezone: Some("America/Chicago".into()),
            timezone_abbreviation: Some("CST".into()),
            current: CurrentConditions {
                temperature_f: Some(temperature_f),
                weather_code: Some(2),
                weather_desc: now.desc,
                weather_emoji: now.emoji,
                wind_mph: Some(wind_mph),
            },
            daily: DailySummary {
                low_f: Some(38.2),
                high_f: Some(61.6),
                precip_probability: precip,
                weather_code: Some(61),
                weather_desc: day.desc,
                weather_emoji: day.emoji,
                sunrise: Some("2025-12-17T07:07".into()),
                sunset: Some("2025-12-17T17:14".into()),
            },
        }
    }
}
