use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::CardResult, model::WeatherRecord};

pub mod weatherapi;

/// Source of current conditions plus today's hourly forecast.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch weather for a free-form location query (city name, coordinates,
    /// IP address, ...). Exactly one upstream call, no retry.
    async fn fetch_weather(&self, location: &str) -> CardResult<WeatherRecord>;
}
