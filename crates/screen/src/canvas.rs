//! In-memory RGB565 canvas.
//!
//! # Pixel format
//!
//! The framebuffer expects one little-endian 16-bit word per pixel, rows top
//! to bottom:
//!
//! ```text
//! bit  15 ........ 11 10 .......... 5 4 ......... 0
//!      R4 R3 R2 R1 R0 G5 G4 G3 G2 G1 G0 B4 B3 B2 B1 B0
//! ```
//!
//! 8-bit channels are packed by truncation, see [`rgb565`].

use core::convert::Infallible;

use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Point, RgbColor, Size};
use platform::DisplayInfo;

/// Pack 8-bit channels into an RGB565 word by dropping the low bits.
#[allow(clippy::cast_lossless)] // u16::from is not const
pub const fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
}

/// Convert 8-bit channels to an embedded-graphics colour, truncating like
/// [`rgb565`].
pub const fn color(r: u8, g: u8, b: u8) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

/// Frame-sized RGB565 draw target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    info: DisplayInfo,
    pixels: Vec<Rgb565>,
}

impl Canvas {
    /// Black canvas of the display's size. `None` if the frame cannot be
    /// addressed in memory.
    pub fn new(info: DisplayInfo) -> Option<Self> {
        let count = info.pixel_count()?;
        Some(Self {
            info,
            pixels: vec![Rgb565::BLACK; count],
        })
    }

    /// Display geometry
    pub fn info(&self) -> DisplayInfo {
        self.info
    }

    /// Centre point, rounded towards the top-left.
    pub fn center(&self) -> Point {
        Point::new(
            i32::try_from(self.info.width / 2).unwrap_or(i32::MAX),
            i32::try_from(self.info.height / 2).unwrap_or(i32::MAX),
        )
    }

    /// Colour at `(x, y)`, `None` outside the canvas.
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        self.index(point).and_then(|i| self.pixels.get(i)).copied()
    }

    /// Pack the canvas into framebuffer bytes (`width * height * 2`).
    pub fn to_raw(&self) -> Vec<u8> {
        let mut raw = Vec::with_capacity(self.pixels.len() * 2);
        for &pixel in &self.pixels {
            raw.extend_from_slice(&RawU16::from(pixel).into_inner().to_le_bytes());
        }
        raw
    }

    fn index(&self, point: Point) -> Option<usize> {
        let x = u32::try_from(point.x).ok()?;
        let y = u32::try_from(point.y).ok()?;
        if x >= self.info.width || y >= self.info.height {
            return None;
        }
        let row = usize::try_from(y).ok()?.checked_mul(usize::try_from(self.info.width).ok()?)?;
        row.checked_add(usize::try_from(x).ok()?)
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(slot) = self.index(point).and_then(|i| self.pixels.get_mut(i)) {
                *slot = color;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.info.width, self.info.height)
    }
}
