use async_trait::async_trait;
use reqwest::Client;
use std::fmt;

use crate::{
    config::Config,
    error::{CardError, CardResult},
    model::WeatherRecord,
};

use super::WeatherProvider;

/// WeatherAPI.com `forecast.json` client.
#[derive(Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl fmt::Debug for WeatherApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherApiProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl WeatherApiProvider {
    pub fn new(api_key: String, base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http }
    }

    /// Build the client from config; fails if no API key is configured.
    pub fn from_config(config: &Config, http: Client) -> CardResult<Self> {
        let api_key = config.api_key()?;
        Ok(Self::new(api_key.to_owned(), config.api_base_url.as_str(), http))
    }

    pub fn forecast_url(&self) -> String {
        format!("{}/forecast.json", self.base_url)
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch_weather(&self, location: &str) -> CardResult<WeatherRecord> {
        let url = self.forecast_url();
        tracing::debug!(%url, location, "Requesting WeatherAPI forecast");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", location)])
            .send()
            .await
            .map_err(|e| {
                // the request URL carries the key
                let e = e.without_url();
                CardError::Upstream(format!("Failed to send request to WeatherAPI.com: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            CardError::Upstream(format!("Failed to read WeatherAPI forecast response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(CardError::Upstream(format!(
                "WeatherAPI forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        parse_forecast_body(&body)
    }
}

/// Parse a `forecast.json` body.
pub fn parse_forecast_body(body: &str) -> CardResult<WeatherRecord> {
    serde_json::from_str(body).map_err(|e| {
        CardError::Upstream(format!(
            "Failed to parse WeatherAPI forecast JSON: {e} (body: {})",
            truncate_body(body)
        ))
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
