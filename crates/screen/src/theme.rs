//! Colours, fonts and messages for the screen.

use core::fmt;
use core::str::FromStr;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_9X18};
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::Rgb565;
use serde::{Deserialize, Serialize};

use crate::canvas::color;

/// `#RRGGBB` colour from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

/// Colour string is not `#RRGGBB`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid colour '{0}', expected #RRGGBB")]
pub struct InvalidColor(pub String);

impl HexColor {
    /// Colour from 8-bit channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Truncate to RGB565
    pub const fn to_rgb565(self) -> Rgb565 {
        color(self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidColor(s.to_owned());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for HexColor {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Background and text colour of one scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Fill colour
    pub background: HexColor,
    /// Text colour
    pub foreground: HexColor,
}

/// Everything the composer needs besides the scene itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Dashboard colours
    pub dashboard: Palette,
    /// Dashboard font height in pixels
    pub dashboard_font_size: u32,
    /// Popup shown for a GOOD tap
    pub tap_event: Palette,
    /// Popup shown for a BAD tap
    pub error: Palette,
    /// Popup font height in pixels
    pub popup_font_size: u32,
    /// Text of the GOOD popup
    pub tap_event_message: String,
    /// Text of the BAD popup
    pub error_message: String,
}

impl Default for Theme {
    fn default() -> Self {
        const WHITE: HexColor = HexColor::new(0xFF, 0xFF, 0xFF);
        Self {
            dashboard: Palette {
                background: HexColor::new(0x00, 0x00, 0x00),
                foreground: WHITE,
            },
            dashboard_font_size: 18,
            tap_event: Palette {
                background: HexColor::new(0x00, 0x80, 0x00),
                foreground: WHITE,
            },
            error: Palette {
                background: HexColor::new(0xC0, 0x00, 0x00),
                foreground: WHITE,
            },
            popup_font_size: 20,
            tap_event_message: "Tap accepted".to_owned(),
            error_message: "Tap failed".to_owned(),
        }
    }
}

/// Largest built-in monospace font no taller than `size` pixels, falling
/// back to the smallest.
pub fn font_for_size(size: u32) -> &'static MonoFont<'static> {
    [&FONT_10X20, &FONT_9X18, &FONT_6X10]
        .into_iter()
        .find(|font| font.character_size.height <= size)
        .unwrap_or(&FONT_6X10)
}
