use async_trait::async_trait;
use image::RgbaImage;
use reqwest::Client;
use std::fmt::Debug;

use crate::error::{CardError, CardResult};

/// Loads condition icons referenced by the weather record.
#[async_trait]
pub trait IconSource: Send + Sync + Debug {
    async fn load(&self, url: &str) -> CardResult<RgbaImage>;
}

/// Fetches icons over HTTP with a shared client.
#[derive(Debug, Clone)]
pub struct HttpIconSource {
    http: Client,
}

impl HttpIconSource {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl IconSource for HttpIconSource {
    async fn load(&self, url: &str) -> CardResult<RgbaImage> {
        tracing::debug!(url, "Loading icon");

        let res = self.http.get(url).send().await.map_err(|e| CardError::asset_load(url, e))?;

        let status = res.status();
        if !status.is_success() {
            return Err(CardError::asset_load(url, format!("status {status}")));
        }

        let bytes = res.bytes().await.map_err(|e| CardError::asset_load(url, e))?;
        decode_icon(url, &bytes)
    }
}

/// Decode icon bytes of any format the `image` crate recognises.
pub fn decode_icon(url: &str, bytes: &[u8]) -> CardResult<RgbaImage> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| CardError::asset_load(url, e))
}

/// Absolute URL for an upstream icon path. WeatherAPI hands out
/// protocol-relative paths such as `//cdn.weatherapi.com/weather/64x64/day/113.png`.
pub fn icon_url(icon: &str) -> String {
    if icon.starts_with("//") {
        format!("https:{icon}")
    } else {
        icon.to_string()
    }
}

/// The 128px variant of an icon, obtained by swapping every `64` for `128`.
pub fn large_icon_url(icon: &str) -> String {
    icon_url(icon).replace("64", "128")
}
