//! Rendering of the three-line chat message.

use regex::Regex;
use std::sync::LazyLock;

use crate::model::WeatherRecord;

static CLOCK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"T(\d{2}):(\d{2})").expect("clock pattern is valid"));

const DEFAULT_TZ_ABBREVIATION: &str = "CST";
const NOT_AVAILABLE: &str = "N/A";

/// Round half towards positive infinity, so 2.5 -> 3 and -2.5 -> -2.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Rounded number, or "N/A" when the value is missing or not finite.
pub fn display_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => round_half_up(v).to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Turn the `HH:MM` part of a local timestamp into `h:MM AM/PM <abbr>`.
///
/// Only the hour and minute digits are read; any date or offset is ignored.
pub fn format_time(local: Option<&str>, abbreviation: Option<&str>) -> String {
    let Some(caps) = local.and_then(|s| CLOCK_PATTERN.captures(s)) else {
        return NOT_AVAILABLE.to_string();
    };
    let Ok(hour) = caps[1].parse::<u32>() else {
        return NOT_AVAILABLE.to_string();
    };
    let minute = &caps[2];

    let suffix = if hour >= 12 { "PM" } else { "AM" };
    let hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    let abbreviation = abbreviation
        .filter(|a| !a.is_empty())
        .unwrap_or(DEFAULT_TZ_ABBREVIATION);

    format!("{hour}:{minute} {suffix} {abbreviation}")
}

pub fn format_message(location_name: &str, weather: &WeatherRecord, advice: &str) -> String {
    let current = &weather.current;
    let daily = &weather.daily;

    let icon = if current.weather_emoji.is_empty() {
        "⛅"
    } else {
        current.weather_emoji
    };
    let condition = if current.weather_desc.is_empty() {
        "Unknown conditions"
    } else {
        current.weather_desc
    };

    let line1 = format!(
        "{icon} Weather ({location_name}): Now {}°F | Low/High {}°/{}° | {}% rain | {condition}",
        display_number(current.temperature_f),
        display_number(daily.low_f),
        display_number(daily.high_f),
        display_number(daily.precip_probability),
    );

    let abbreviation = weather.timezone_abbreviation.as_deref();
    let line2 = format!(
        "🌅 Sunrise {} | Sunset {}",
        format_time(daily.sunrise.as_deref(), abbreviation),
        format_time(daily.sunset.as_deref(), abbreviation),
    );
    let line3 = format!("🏃 Running layers: {advice}");

    [line1, line2, line3].join("\n")
}
