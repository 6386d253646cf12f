//! Display abstraction layer

/// Frame sink trait for raw RGB565 framebuffers
pub trait FrameSink {
    /// Error type for frame writes
    type Error: std::error::Error + Send + Sync + 'static;

    /// Display geometry
    fn info(&self) -> DisplayInfo;

    /// Write one complete frame of little-endian RGB565 pixels.
    ///
    /// `raw.len()` must equal [`DisplayInfo::frame_len`]; implementations
    /// reject anything else before touching the device.
    fn write_frame(&mut self, raw: &[u8]) -> Result<(), Self::Error>;
}

/// Display geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Bytes per RGB565 pixel
pub const BYTES_PER_PIXEL: usize = 2;

impl DisplayInfo {
    /// Create display geometry
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixels in one frame, `None` if it overflows `usize`
    pub fn pixel_count(&self) -> Option<usize> {
        let width = usize::try_from(self.width).ok()?;
        let height = usize::try_from(self.height).ok()?;
        width.checked_mul(height)
    }

    /// Bytes in one RGB565 frame (`width * height * 2`)
    pub fn frame_len(&self) -> Option<usize> {
        self.pixel_count()?.checked_mul(BYTES_PER_PIXEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_len_is_two_bytes_per_pixel() {
        assert_eq!(DisplayInfo::new(480, 320).frame_len(), Some(480 * 320 * 2));
    }

    #[test]
    fn zero_sized_display_has_empty_frame() {
        assert_eq!(DisplayInfo::new(0, 320).frame_len(), Some(0));
    }
}
