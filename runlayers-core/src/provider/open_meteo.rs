use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, instrument};

use crate::{
    codes::map_optional_code,
    error::{JobError, truncate_body},
    model::{CurrentConditions, DailySummary, WeatherRecord},
};

use super::ForecastProvider;

const SERVICE: &str = "Open-Meteo";
pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

const CURRENT_FIELDS: &str = "temperature_2m,weather_code,wind_speed_10m";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_probability_max,weather_code,sunrise,sunset";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }
}

#[derive(Debug, Serialize)]
struct ForecastQuery<'a> {
    latitude: f64,
    longitude: f64,
    current: &'a str,
    daily: &'a str,
    temperature_unit: &'a str,
    wind_speed_unit: &'a str,
    timezone: &'a str,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<String>,
    timezone_abbreviation: Option<String>,
    current: Option<OmCurrent>,
    daily: Option<OmDaily>,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    #[serde(default)]
    temperature_2m: Option<f64>,
    #[serde(default)]
    weather_code: Option<i32>,
    #[serde(default)]
    wind_speed_10m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    #[serde(default, deserialize_with = "null_as_empty")]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    weather_code: Vec<Option<i32>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    sunrise: Vec<Option<String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    sunset: Vec<Option<String>>,
}

/// Open-Meteo sends `null` for a requested series it has no data for.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn first<T: Clone>(series: &[Option<T>]) -> Option<T> {
    series.first().cloned().flatten()
}

fn parse_forecast(body: &str) -> Result<WeatherRecord, JobError> {
    let parsed: OmResponse =
        serde_json::from_str(body).map_err(|e| JobError::malformed(SERVICE, e.to_string()))?;

    let (Some(current), Some(daily)) = (parsed.current, parsed.daily) else {
        return Err(JobError::malformed(
            SERVICE,
            "missing `current` or `daily` section",
        ));
    };

    let now = map_optional_code(current.weather_code);
    let daily_code = first(&daily.weather_code);
    let today = map_optional_code(daily_code);

    Ok(WeatherRecord {
        latitude: parsed.latitude,
        longitude: parsed.longitude,
        timezone: parsed.timezone,
        timezone_abbreviation: parsed.timezone_abbreviation,
        current: CurrentConditions {
            temperature_f: current.temperature_2m,
            weather_code: current.weather_code,
            weather_desc: now.desc,
            weather_emoji: now.emoji,
            wind_mph: current.wind_speed_10m,
        },
        daily: DailySummary {
            low_f: first(&daily.temperature_2m_min),
            high_f: first(&daily.temperature_2m_max),
            precip_probability: first(&daily.precipitation_probability_max),
            weather_code: daily_code,
            weather_desc: today.desc,
            weather_emoji: today.emoji,
            sunrise: first(&daily.sunrise),
            sunset: first(&daily.sunset),
        },
    })
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    #[instrument(skip(self), level = "info")]
    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherRecord, JobError> {
        let url = format!("{}/v1/forecast", self.base_url.trim_end_matches('/'));
        let query = ForecastQuery {
            latitude,
            longitude,
            current: CURRENT_FIELDS,
            daily: DAILY_FIELDS,
            temperature_unit: "fahrenheit",
            wind_speed_unit: "mph",
            timezone: "auto",
        };

        let res = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(JobError::transport(SERVICE))?;

        let status = res.status();
        let body = res.text().await.map_err(JobError::transport(SERVICE))?;

        if !status.is_success() {
            return Err(JobError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let record = parse_forecast(&body)?;
        debug!(
            temperature_f = ?record.current.temperature_f,
            timezone = record.timezone.as_deref().unwrap_or("unknown"),
            "Parsed Open-Meteo forecast"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_body() -> serde_json::Value {
        serde_json::json!({
            "latitude": 31.56,
            "longitude": -93.48,
            "timezone": "America/Chicago",
            "timezone_abbreviation": "CST",
            "current": {
                "time": "2025-12-17T06:45",
                "temperature_2m": 41.3,
                "weather_code": 3,
                "wind_speed_10m": 7.9
            },
            "daily": {
                "time": ["2025-12-17", "2025-12-18"],
                "temperature_2m_max": [58.4, 60.1],
                "temperature_2m_min": [36.9, 40.0],
                "precipitation_probability_max": [15, 70],
                "weather_code": [61, 63],
                "sunrise": ["2025-12-17T07:07", "2025-12-18T07:08"],
                "sunset": ["2025-12-17T17:14", "2025-12-18T17:15"]
            }
        })
    }

    #[tokio::test]
    async fn fetch_weather_normalizes_first_day() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("temperature_unit", "fahrenheit"))
            .and(query_param("wind_speed_unit", "mph"))
            .and(query_param("timezone", "auto"))
            .and(query_param("latitude", "31.565"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .mount(&mock_server)
            .await;

        let provider = OpenMeteoProvider::new(Client::new(), mock_server.uri());
        let record = provider.fetch_weather(31.565, -93.484).await.unwrap();

        assert_eq!(record.timezone.as_deref(), Some("America/Chicago"));
        assert_eq!(record.timezone_abbreviation.as_deref(), Some("CST"));
        assert_eq!(record.current.temperature_f, Some(41.3));
        assert_eq!(record.current.wind_mph, Some(7.9));
        assert_eq!(record.current.weather_desc, "Overcast");
        assert_eq!(record.daily.low_f, Some(36.9));
        assert_eq!(record.daily.high_f, Some(58.4));
        assert_eq!(record.daily.precip_probability, Some(15.0));
        assert_eq!(record.daily.weather_desc, "Light rain");
        assert_eq!(record.daily.sunrise.as_deref(), Some("2025-12-17T07:07"));
        assert_eq!(record.daily.sunset.as_deref(), Some("2025-12-17T17:14"));
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(400).set_body_string("{\"reason\":\"bad lat\"}"))
            .mount(&mock_server)
            .await;

        let provider = OpenMeteoProvider::new(Client::new(), mock_server.uri());
        let err = provider.fetch_weather(999.0, 0.0).await.unwrap_err();

        match err {
            JobError::Upstream { status, body, .. } => {
                assert_eq!(status, 400);
                assert!(body.contains("bad lat"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_daily_section_is_malformed() {
        let body = serde_json::json!({
            "current": { "temperature_2m": 40.0, "weather_code": 0, "wind_speed_10m": 3.0 }
        });
        let err = parse_forecast(&body.to_string()).unwrap_err();
        assert!(matches!(err, JobError::MalformedResponse { .. }));
    }

    #[test]
    fn null_current_section_is_malformed() {
        let body = serde_json::json!({ "current": null, "daily": {} });
        let err = parse_forecast(&body.to_string()).unwrap_err();
        assert!(matches!(err, JobError::MalformedResponse { .. }));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = parse_forecast("<html>oops</html>").unwrap_err();
        assert!(matches!(err, JobError::MalformedResponse { .. }));
    }

    #[test]
    fn absent_daily_series_stay_none() {
        let body = serde_json::json!({
            "timezone": "America/Chicago",
            "current": { "temperature_2m": 40.0, "weather_code": 0, "wind_speed_10m": 3.0 },
            "daily": {
                "temperature_2m_max": [],
                "precipitation_probability_max": [null],
                "sunset": ["2025-12-17T17:14"]
            }
        });
        let record = parse_forecast(&body.to_string()).unwrap();

        assert_eq!(record.daily.high_f, None);
        assert_eq!(record.daily.low_f, None);
        assert_eq!(record.daily.precip_probability, None);
        assert_eq!(record.daily.sunrise, None);
        assert_eq!(record.daily.sunset.as_deref(), Some("2025-12-17T17:14"));
        assert_eq!(record.daily.weather_code, None);
        assert_eq!(record.daily.weather_desc, "Unknown");
        assert_eq!(record.timezone_abbreviation, None);
    }

    #[test]
    fn null_daily_series_stay_none() {
        let body = serde_json::json!({
            "current": { "temperature_2m": 40.0, "weather_code": 0, "wind_speed_10m": 3.0 },
            "daily": {
                "temperature_2m_max": null,
                "temperature_2m_min": [31.0],
                "precipitation_probability_max": null,
                "weather_code": null,
                "sunrise": null,
                "sunset": ["2025-12-17T17:14"]
            }
        });
        let record = parse_forecast(&body.to_string()).unwrap();

        assert_eq!(record.daily.high_f, None);
        assert_eq!(record.daily.low_f, Some(31.0));
        assert_eq!(record.daily.precip_probability, None);
        assert_eq!(record.daily.weather_desc, "Unknown");
        assert_eq!(record.daily.sunrise, None);
        assert_eq!(record.daily.sunset.as_deref(), Some("2025-12-17T17:14"));
    }

    #[test]
    fn null_or_absent_current_readings_stay_none() {
        let body = serde_json::json!({
            "current": { "temperature_2m": null, "weather_code": null },
            "daily": {}
        });
        let record = parse_forecast(&body.to_string()).unwrap();

        assert_eq!(record.current.temperature_f, None);
        assert_eq!(record.current.wind_mph, None);
        assert_eq!(record.current.weather_desc, "Unknown");
    }
}
