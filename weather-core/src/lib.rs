//! Core library for the weather card server.
//!
//! This crate defines:
//! - Configuration and style handling
//! - The WeatherAPI.com client behind the [`WeatherProvider`] trait
//! - Shared domain models (the forecast response body)
//! - Forecast hour selection and the card layout
//! - The raster drawing surface and PNG encoding
//!
//! It is used by `weather-card`, but the layout can be driven by any
//! [`Surface`] implementation.

pub mod config;
pub mod error;
pub mod forecast;
pub mod icons;
pub mod layout;
pub mod model;
pub mod provider;
pub mod surface;
pub mod timefmt;

pub use config::{Clock, Config, Style};
pub use error::{CardError, CardResult};
pub use forecast::{MAX_FORECAST_HOURS, select_hours};
pub use icons::{HttpIconSource, IconSource};
pub use layout::{CANVAS_HEIGHT, CANVAS_WIDTH, render, render_png};
pub use model::{Condition, CurrentConditions, ForecastDay, HourSample, Location, WeatherRecord};
pub use provider::{WeatherProvider, weatherapi::WeatherApiProvider};
pub use surface::{Color, RasterSurface, Shadow, Surface, TextMetrics};

#[cfg(test)]
pub(crate) mod fixtures;
