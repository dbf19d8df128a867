//! Drawing surface used by the card layout.
//!
//! [`Surface`] is the small 2D API the layout needs: fill, measure, draw text
//! at a baseline, draw images. [`RasterSurface`] implements it on an
//! in-memory RGBA buffer with rusttype glyphs and encodes the result as PNG.

use image::{
    DynamicImage, ImageOutputFormat, Rgba, RgbaImage,
    imageops::{self, FilterType},
};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_text_mut},
    rect::Rect,
};
use rusttype::{Font, Scale, point};
use std::{fmt, io::Cursor, path::Path, str::FromStr, sync::Arc};
use thiserror::Error;

use crate::error::{CardError, CardResult};

/// DejaVu Sans Condensed, used unless `font_path` names another font.
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansCondensed.ttf");

/// Result of measuring a string at a given font size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    /// Advance width of the whole string.
    pub width: f32,
    /// Distance from the baseline to the top of the tallest glyph.
    pub ascent: f32,
}

/// Straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0, 255]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba(c.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised color '{0}' (expected a name or #RGB, #RRGGBB, #RRGGBBAA)")]
pub struct ColorParseError(String);

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ColorParseError(s.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            if !hex.is_ascii() {
                return Err(err());
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16).map_err(|_| err())
            };
            return match hex.len() {
                3 => {
                    let nibble = |i: usize| channel(i..i + 1).map(|v| v * 17);
                    Ok(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
                }
                6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
                8 => Ok(Color::rgba(channel(0..2)?, channel(2..4)?, channel(4..6)?, channel(6..8)?)),
                _ => Err(err()),
            };
        }

        match s.to_ascii_lowercase().as_str() {
            "white" => Ok(Color::WHITE),
            "black" => Ok(Color::BLACK),
            "gray" | "grey" => Ok(Color::rgb(128, 128, 128)),
            "lightgray" | "lightgrey" => Ok(Color::rgb(211, 211, 211)),
            "darkgray" | "darkgrey" => Ok(Color::rgb(169, 169, 169)),
            "red" => Ok(Color::rgb(255, 0, 0)),
            "green" => Ok(Color::rgb(0, 128, 0)),
            "blue" => Ok(Color::rgb(0, 0, 255)),
            "navy" => Ok(Color::rgb(0, 0, 128)),
            "transparent" => Ok(Color::rgba(0, 0, 0, 0)),
            _ => Err(err()),
        }
    }
}

/// Drop shadow cast by an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    /// Blur radius in pixels; the gaussian sigma is half of it.
    pub blur: f32,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl Shadow {
    /// Shadow under the current-conditions icon.
    pub const CARD: Shadow = Shadow {
        color: Color::rgba(0, 0, 0, 128),
        blur: 10.0,
        offset_x: 5,
        offset_y: 5,
    };

    /// Build the shadow layer for `image`. Returns the layer and the margin
    /// added on each side to leave room for the blur.
    pub fn cast_by(&self, image: &RgbaImage) -> (RgbaImage, u32) {
        let margin = if self.blur > 0.0 { (self.blur * 1.5).ceil() as u32 } else { 0 };
        let [r, g, b, a] = self.color.0;

        let mut layer = RgbaImage::from_pixel(
            image.width() + 2 * margin,
            image.height() + 2 * margin,
            Rgba([r, g, b, 0]),
        );
        for (x, y, px) in image.enumerate_pixels() {
            let alpha = (u16::from(px[3]) * u16::from(a) / 255) as u8;
            layer.put_pixel(x + margin, y + margin, Rgba([r, g, b, alpha]));
        }

        if self.blur > 0.0 {
            layer = imageproc::filter::gaussian_blur_f32(&layer, self.blur / 2.0);
        }
        (layer, margin)
    }
}

/// The drawing operations the card layout issues.
///
/// Text is positioned by its baseline, like a 2D canvas `fillText`.
pub trait Surface {
    fn fill(&mut self, color: Color);

    fn measure_text(&self, text: &str, size_px: f32) -> TextMetrics;

    fn fill_text(&mut self, text: &str, x: f32, y: f32, size_px: f32, color: Color);

    /// Draw `image` with its top-left corner at `(x, y)`, scaled to `size`
    /// when given.
    fn draw_image(
        &mut self,
        image: &RgbaImage,
        x: f32,
        y: f32,
        size: Option<(u32, u32)>,
        shadow: Option<&Shadow>,
    );
}

/// In-memory RGBA canvas.
pub struct RasterSurface {
    image: RgbaImage,
    font: Arc<Font<'static>>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, font: Arc<Font<'static>>) -> Self {
        Self { image: RgbaImage::new(width, height), font }
    }

    /// The font compiled into the binary.
    pub fn bundled_font() -> CardResult<Font<'static>> {
        Font::try_from_bytes(FONT_DATA).ok_or_else(|| {
            CardError::Config("Bundled font is not a valid TrueType font".to_string())
        })
    }

    /// Load `path` when an override is configured, the bundled font otherwise.
    pub fn resolve_font(path: Option<&Path>) -> CardResult<Font<'static>> {
        match path {
            Some(path) => Self::load_font(path),
            None => Self::bundled_font(),
        }
    }

    /// Read and parse a TrueType font file.
    pub fn load_font(path: &Path) -> CardResult<Font<'static>> {
        let bytes = std::fs::read(path).map_err(|e| {
            CardError::Config(format!("Failed to read font {}: {e}", path.display()))
        })?;

        Font::try_from_vec(bytes).ok_or_else(|| {
            CardError::Config(format!("Font {} is not a valid TrueType font", path.display()))
        })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Encode the canvas as PNG, consuming it.
    pub fn into_png(self) -> CardResult<Vec<u8>> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(self.image)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .map_err(|e| CardError::Render(format!("PNG encoding failed: {e}")))?;
        Ok(bytes)
    }
}

impl fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterSurface").field("size", &self.image.dimensions()).finish()
    }
}

impl Surface for RasterSurface {
    fn fill(&mut self, color: Color) {
        let (w, h) = self.image.dimensions();
        draw_filled_rect_mut(&mut self.image, Rect::at(0, 0).of_size(w, h), color.into());
    }

    fn measure_text(&self, text: &str, size_px: f32) -> TextMetrics {
        let scale = Scale::uniform(size_px);
        let glyphs: Vec<_> = self.font.layout(text, scale, point(0.0, 0.0)).collect();

        let width = glyphs
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);
        let ascent = glyphs
            .iter()
            .filter_map(|g| g.unpositioned().exact_bounding_box())
            .map(|bb| -bb.min.y)
            .fold(0.0_f32, f32::max);

        TextMetrics { width, ascent }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, size_px: f32, color: Color) {
        let scale = Scale::uniform(size_px);
        // imageproc places the top of the line box at `y`.
        let top = y - self.font.v_metrics(scale).ascent;
        draw_text_mut(
            &mut self.image,
            color.into(),
            x.round() as i32,
            top.round() as i32,
            scale,
            &self.font,
            text,
        );
    }

    fn draw_image(
        &mut self,
        image: &RgbaImage,
        x: f32,
        y: f32,
        size: Option<(u32, u32)>,
        shadow: Option<&Shadow>,
    ) {
        let resized;
        let image = match size {
            Some((w, h)) if (w, h) != image.dimensions() => {
                resized = imageops::resize(image, w, h, FilterType::Triangle);
                &resized
            }
            _ => image,
        };
        let (x, y) = (x.round() as i64, y.round() as i64);

        if let Some(shadow) = shadow {
            let (layer, margin) = shadow.cast_by(image);
            let margin = i64::from(margin);
            imageops::overlay(
                &mut self.image,
                &layer,
                x + i64::from(shadow.offset_x) - margin,
                y + i64::from(shadow.offset_y) - margin,
            );
        }
        imageops::overlay(&mut self.image, image, x, y);
    }
}
