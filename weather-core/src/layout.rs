//! Card layout: maps a [`WeatherRecord`] onto fixed pixel positions.
//!
//! Every text position that depends on another element is derived from an
//! explicit [`Surface::measure_text`] call, so the layout is a pure function
//! of the record, the style and the surface's text metrics (plus the icons).

use chrono_tz::Tz;
use rusttype::Font;
use std::sync::Arc;

use crate::{
    config::Style,
    error::CardResult,
    forecast::select_hours,
    icons::{IconSource, icon_url, large_icon_url},
    model::{HourSample, WeatherRecord},
    surface::{RasterSurface, Shadow, Surface},
    timefmt::{card_date, hour_label, resolve_tz},
};

pub const CANVAS_WIDTH: u32 = 1170;
pub const CANVAS_HEIGHT: u32 = 230;

const LEFT: f32 = 62.0;

const HEADING_PX: f32 = 40.0;
const HEADING_TOP: f32 = 25.0;

const ICON_X: f32 = 62.0;
const ICON_Y: f32 = 52.0;

const STATUS_PX: f32 = 25.0;
const STATUS_TOP: f32 = 176.0;

const TEMP_PX: f32 = 70.0;
const TEMP_X: f32 = 200.0;
const UNIT: &str = "°C";
const UNIT_PX: f32 = 30.0;
const UNIT_TOP: f32 = 90.0;

const DETAIL_PX: f32 = 20.0;
/// Gap between the temperature numeral and the wind/humidity block.
const DETAIL_GAP: f32 = 50.0;
const DETAIL_LINE: f32 = 30.0;

const STRIP_GUTTER: f32 = 30.0;
const STRIP_ICON: u32 = 64;
const STRIP_TEMP_DY: f32 = 80.0;

/// Draw the whole card onto `surface`.
///
/// Fails with [`CardError::AssetLoad`](crate::CardError::AssetLoad) as soon as
/// any icon can't be loaded; there is no placeholder.
pub async fn render<S>(
    surface: &mut S,
    weather: &WeatherRecord,
    icons: &dyn IconSource,
    style: &Style,
) -> CardResult<()>
where
    S: Surface + ?Sized,
{
    let tz = resolve_tz(&weather.location.tz_id);
    let current = &weather.current;

    surface.fill(style.background);

    let heading = weather.heading();
    let ascent = surface.measure_text(&heading, HEADING_PX).ascent;
    surface.fill_text(&heading, LEFT, HEADING_TOP + ascent, HEADING_PX, style.main);

    let icon = icons.load(&large_icon_url(&current.condition.icon)).await?;
    surface.draw_image(&icon, ICON_X, ICON_Y, None, Some(&Shadow::CARD));

    let status = format!(
        "{} · {}",
        current.condition.text,
        card_date(current.last_updated_epoch, tz, style.clock)
    );
    let ascent = surface.measure_text(&status, STATUS_PX).ascent;
    surface.fill_text(&status, LEFT, STATUS_TOP + ascent, STATUS_PX, style.main);

    // Temperature in the API's own precision: 21 stays "21", 21.5 stays "21.5".
    let temperature = plain_number(current.temp_c);
    let temp = surface.measure_text(&temperature, TEMP_PX);
    let temp_y = icon.height() as f32 / 2.5 + TEMP_PX / 2.0 + temp.ascent;
    surface.fill_text(&temperature, TEMP_X, temp_y, TEMP_PX, style.main);

    let ascent = surface.measure_text(UNIT, UNIT_PX).ascent;
    surface.fill_text(UNIT, TEMP_X + temp.width, UNIT_TOP + ascent, UNIT_PX, style.main);

    let detail_x = TEMP_X + temp.width + DETAIL_GAP;
    let detail_y = UNIT_TOP + surface.measure_text(UNIT, DETAIL_PX).ascent;

    let wind = format!("Wind: {} KMPH", plain_number(current.wind_kph));
    surface.fill_text(&wind, detail_x, detail_y, DETAIL_PX, style.muted);
    let wind_width = surface.measure_text(&wind, DETAIL_PX).width;

    let humidity = format!("humidity: {}%", current.humidity);
    surface.fill_text(&humidity, detail_x, detail_y + DETAIL_LINE, DETAIL_PX, style.muted);

    if !style.forecast_strip {
        return Ok(());
    }

    match weather.today() {
        Some(today) => {
            let hours = select_hours(today, current.last_updated_epoch);
            let strip = Strip { start_x: detail_x + wind_width, y: detail_y, tz, style };
            strip.draw(surface, &hours, icons).await
        }
        None => Ok(()),
    }
}

/// Render the card on a fresh canvas and encode it as PNG.
pub async fn render_png(
    weather: &WeatherRecord,
    icons: &dyn IconSource,
    style: &Style,
    font: Arc<Font<'static>>,
) -> CardResult<Vec<u8>> {
    let mut surface = RasterSurface::new(CANVAS_WIDTH, CANVAS_HEIGHT, font);
    render(&mut surface, weather, icons, style).await?;
    surface.into_png()
}

/// Hourly forecast columns, left to right. Nothing is clipped at the canvas edge.
struct Strip<'a> {
    start_x: f32,
    y: f32,
    tz: Tz,
    style: &'a Style,
}

impl Strip<'_> {
    async fn draw<S>(
        &self,
        surface: &mut S,
        hours: &[&HourSample],
        icons: &dyn IconSource,
    ) -> CardResult<()>
    where
        S: Surface + ?Sized,
    {
        let color = self.style.muted;
        let mut x = self.start_x + STRIP_GUTTER;

        for hour in hours {
            let label = hour_label(hour.time_epoch, self.tz, self.style.clock);
            let icon = icons.load(&icon_url(&hour.condition.icon)).await?;
            let temperature = format!("{}{UNIT}", round_half_up(hour.temp_c));

            surface.fill_text(&label, x, self.y, DETAIL_PX, color);
            surface.draw_image(&icon, x, self.y, Some((STRIP_ICON, STRIP_ICON)), None);
            surface.fill_text(&temperature, x, self.y + STRIP_TEMP_DY, DETAIL_PX, color);

            // each column starts after the previous label plus the gutter
            x += surface.measure_text(&label, DETAIL_PX).width + STRIP_GUTTER;
        }
        Ok(())
    }
}

/// Shortest decimal form of `value`, with negative zero printed as "0".
fn plain_number(value: f64) -> String {
    if value == 0.0 { "0".to_string() } else { value.to_string() }
}

/// Nearest whole degree, halves towards positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
