//! WMO weather interpretation codes as reported by Open-Meteo.
//! See: https://open-meteo.com/en/docs#weathervariables

/// Description and glyph for a single weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherCode {
    pub desc: &'static str,
    pub emoji: &'static str,
}

pub const UNKNOWN: WeatherCode = WeatherCode {
    desc: "Unknown",
    emoji: "❔",
};

const fn code(desc: &'static str, emoji: &'static str) -> WeatherCode {
    WeatherCode { desc, emoji }
}

static TABLE: &[(i32, WeatherCode)] = &[
    (0, code("Clear sky", "☀️")),
    (1, code("Mainly clear", "🌤️")),
    (2, code("Partly cloudy", "⛅")),
    (3, code("Overcast", "☁️")),
    (45, code("Fog", "🌫️")),
    (48, code("Depositing rime fog", "🌫️")),
    (51, code("Light drizzle", "🌦️")),
    (53, code("Drizzle", "🌦️")),
    (55, code("Dense drizzle", "🌧️")),
    (56, code("Freezing drizzle", "🌧️")),
    (57, code("Heavy freezing drizzle", "🌧️")),
    (61, code("Light rain", "🌦️")),
    (63, code("Rain", "🌧️")),
    (65, code("Heavy rain", "🌧️")),
    (66, code("Freezing rain", "🌧️")),
    (67, code("Heavy freezing rain", "🌧️")),
    (71, code("Light snow", "🌨️")),
    (73, code("Snow", "🌨️")),
    (75, code("Heavy snow", "❄️")),
    (77, code("Snow grains", "❄️")),
    (80, code("Light rain showers", "🌦️")),
    (81, code("Rain showers", "🌦️")),
    (82, code("Violent rain showers", "⛈️")),
    (85, code("Snow showers", "🌨️")),
    (86, code("Heavy snow showers", "❄️")),
    (95, code("Thunderstorm", "⛈️")),
    (96, code("Thunderstorm with hail", "⛈️")),
    (99, code("Thunderstorm with heavy hail", "⛈️")),
];

/// Look up a weather code. Codes outside the table map to [`UNKNOWN`].
pub fn map_code(code: i32) -> WeatherCode {
    TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, wc)| *wc)
        .unwrap_or(UNKNOWN)
}

pub fn map_optional_code(code: Option<i32>) -> WeatherCode {
    code.map(map_code).unwrap_or(UNKNOWN)
}
