use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use crate::{
    error::{CardError, CardResult},
    surface::Color,
};

/// Environment variable holding the WeatherAPI.com key.
pub const API_KEY_ENV: &str = "API_KEY";

pub const DEFAULT_API_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Clock used for every time label on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Clock {
    #[default]
    #[serde(rename = "24h")]
    H24,
    #[serde(rename = "12h")]
    H12,
}

/// Top-level configuration, built once at startup and shared read-only.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// bg_color = "white"
/// muted_font_color = "#3E3E3E"
/// clock = "24h"
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// WeatherAPI.com key. `API_KEY` in the environment takes precedence.
    pub api_key: Option<String>,

    pub api_base_url: String,

    pub bg_color: String,
    pub main_font_color: String,
    /// Used for the wind/humidity block and the forecast strip.
    pub muted_font_color: String,

    /// TrueType font used for all text on the card, replacing the bundled
    /// DejaVu Sans Condensed.
    pub font_path: Option<PathBuf>,

    /// Draw the hourly forecast strip to the right of the wind/humidity block.
    pub forecast_strip: bool,
    pub clock: Clock,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            bg_color: "white".to_string(),
            main_font_color: "black".to_string(),
            muted_font_color: "#3E3E3E".to_string(),
            font_path: None,
            forecast_strip: true,
            clock: Clock::H24,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("bg_color", &self.bg_color)
            .field("main_font_color", &self.main_font_color)
            .field("muted_font_color", &self.muted_font_color)
            .field("font_path", &self.font_path)
            .field("forecast_strip", &self.forecast_strip)
            .field("clock", &self.clock)
            .finish()
    }
}

impl Config {
    /// Load config from `path` (or the platform default location), then apply
    /// the `API_KEY` environment variable.
    ///
    /// A missing file is not an error: defaults are used. Neither is a
    /// platform without a config directory when no `path` is given.
    pub fn load(path: Option<&Path>) -> CardResult<Self> {
        Self::resolve(path, Self::config_file_path(), std::env::var(API_KEY_ENV).ok())
    }

    fn resolve(
        path: Option<&Path>,
        default_path: CardResult<PathBuf>,
        api_key: Option<String>,
    ) -> CardResult<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_path {
                Ok(p) => Self::from_file(&p)?,
                Err(e) => {
                    tracing::warn!(error = %e, "No config directory, using defaults");
                    Self::default()
                }
            },
        };

        cfg.apply_api_key_override(api_key);
        Ok(cfg)
    }

    /// Read a TOML config file, returning defaults if it doesn't exist.
    pub fn from_file(path: &Path) -> CardResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            CardError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        toml::from_str(&contents).map_err(|e| {
            CardError::Config(format!("Failed to parse config file {}: {e}", path.display()))
        })
    }

    /// Path to the default config file.
    pub fn config_file_path() -> CardResult<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-card", "weather-card").ok_or_else(|| {
            CardError::Config("Could not determine platform config directory".to_string())
        })?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace the API key with `value` unless it is absent or blank.
    pub fn apply_api_key_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }

    pub fn api_key(&self) -> CardResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            CardError::Config(format!(
                "No WeatherAPI key configured.\n\
                 Hint: set the {API_KEY_ENV} environment variable or `api_key` in the config file."
            ))
        })
    }

    /// Resolve the drawing style from the configured color strings.
    pub fn style(&self) -> CardResult<Style> {
        Ok(Style {
            background: parse_color("bg_color", &self.bg_color)?,
            main: parse_color("main_font_color", &self.main_font_color)?,
            muted: parse_color("muted_font_color", &self.muted_font_color)?,
            clock: self.clock,
            forecast_strip: self.forecast_strip,
        })
    }
}

fn parse_color(field: &str, value: &str) -> CardResult<Color> {
    value
        .parse()
        .map_err(|e| CardError::Config(format!("Invalid value for '{field}': {e}")))
}

/// Resolved drawing style passed to the layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub background: Color,
    pub main: Color,
    pub muted: Color,
    pub clock: Clock,
    pub forecast_strip: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            main: Color::BLACK,
            muted: Color::rgb(0x3E, 0x3E, 0x3E),
            clock: Clock::H24,
            forecast_strip: true,
        }
    }
}
