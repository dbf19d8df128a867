//! Shared test data.

use crate::model::{
    Condition, CurrentConditions, Forecast, ForecastDay, HourSample, Location, WeatherRecord,
};

/// 2024-06-01 00:00 in Europe/Paris (22:00 UTC the day before).
pub const PARIS_MIDNIGHT: i64 = 1_717_192_800;
/// 2024-06-01 14:00 in Europe/Paris, a Saturday.
pub const PARIS_NOW: i64 = PARIS_MIDNIGHT + 14 * 3600;

pub fn condition(code: u32) -> Condition {
    Condition {
        text: format!("Condition {code}"),
        icon: format!("//cdn.weatherapi.com/weather/64x64/day/{code}.png"),
        code,
    }
}

pub fn hour(time_epoch: i64, temp_c: f64, code: u32) -> HourSample {
    HourSample {
        time_epoch,
        time: String::new(),
        temp_c,
        temp_f: None,
        is_day: 1,
        condition: condition(code),
    }
}

pub fn day(hours: Vec<HourSample>) -> ForecastDay {
    ForecastDay { date: String::new(), date_epoch: 0, day: None, astro: None, hour: hours }
}

/// Hourly codes for the Paris fixture, midnight to 23:00.
const PARIS_CODES: [u32; 24] = [
    1000, 1000, 1000, 1000, 1000, 1000, 1000, 1000, 1000, 1000, 1000, 1000, //
    1000, 1000, 1000, 1000, 1000, 1000, 1003, 1003, 1063, 1063, 1063, 1000,
];

/// Paris, 21°C and sunny, with a full day of hourly samples.
pub fn paris() -> WeatherRecord {
    let hours = PARIS_CODES
        .iter()
        .enumerate()
        .map(|(i, &code)| hour(PARIS_MIDNIGHT + i as i64 * 3600, 12.0 + i as f64 * 0.5, code))
        .collect();

    WeatherRecord {
        location: Location {
            name: "Paris".into(),
            region: "Ile-de-France".into(),
            country: "France".into(),
            lat: 48.87,
            lon: 2.33,
            tz_id: "Europe/Paris".into(),
            localtime_epoch: Some(PARIS_NOW),
        },
        current: CurrentConditions {
            last_updated_epoch: PARIS_NOW,
            temp_c: 21.0,
            temp_f: Some(69.8),
            is_day: 1,
            condition: Condition { text: "Sunny".into(), icon: "//x/64.png".into(), code: 1000 },
            wind_kph: 10.0,
            humidity: 40,
        },
        forecast: Forecast { forecastday: vec![day(hours)] },
    }
}
