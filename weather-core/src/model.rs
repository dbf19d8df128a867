//! Shape of a WeatherAPI.com `forecast.json` response.
//!
//! Only the fields the card draws are required; the rest default when the
//! upstream omits them.

use serde::{Deserialize, Serialize};

/// One upstream response, read-only once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: Forecast,
}

impl WeatherRecord {
    /// First forecast day, i.e. "today" in the location's time zone.
    pub fn today(&self) -> Option<&ForecastDay> {
        self.forecast.forecastday.first()
    }

    /// "<city>, <country>"
    pub fn heading(&self) -> String {
        format!("{}, {}", self.location.name, self.location.country)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub region: String,
    pub country: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    /// IANA time zone id, e.g. "Europe/Paris".
    pub tz_id: String,
    #[serde(default)]
    pub localtime_epoch: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    /// Protocol-relative URL, e.g. "//cdn.weatherapi.com/weather/64x64/day/113.png".
    pub icon: String,
    pub code: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub last_updated_epoch: i64,
    pub temp_c: f64,
    #[serde(default)]
    pub temp_f: Option<f64>,
    #[serde(default)]
    pub is_day: u8,
    pub condition: Condition,
    pub wind_kph: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub date_epoch: i64,
    #[serde(default)]
    pub day: Option<DaySummary>,
    #[serde(default)]
    pub astro: Option<Astro>,
    /// Ordered by `time_epoch` ascending.
    #[serde(default)]
    pub hour: Vec<HourSample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    #[serde(default)]
    pub avgtemp_c: Option<f64>,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
}

/// One hour of a day's forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourSample {
    pub time_epoch: i64,
    /// Local time as reported upstream, e.g. "2024-06-01 14:00".
    #[serde(default)]
    pub time: String,
    pub temp_c: f64,
    #[serde(default)]
    pub temp_f: Option<f64>,
    #[serde(default)]
    pub is_day: u8,
    pub condition: Condition,
}
