use crate::error::{display_error, AppResult};
use crate::render::PanelColor;
use image::{imageops, RgbImage};

/// Native panel width in pixels
pub const PANEL_WIDTH: u32 = 800;
/// Native panel height in pixels
pub const PANEL_HEIGHT: u32 = 480;

/// A frame in the panel's wire format: 4 bits per pixel, two pixels per
/// byte with the left pixel in the high nibble, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelFrame {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl PanelFrame {
    /// Frame where every pixel is `color`
    pub fn filled(width: u32, height: u32, color: PanelColor) -> Self {
        let index = color.index();
        Self {
            width,
            height,
            buffer: vec![(index << 4) | index; Self::buffer_len(width, height)],
        }
    }

    /// Quantize an image to the panel palette.
    ///
    /// A portrait image with the panel's dimensions swapped is rotated 90°
    /// counter-clockwise first. Any other size mismatch is an error.
    pub fn from_image(image: &RgbImage, width: u32, height: u32) -> AppResult<Self> {
        let rotated;
        let image = if image.dimensions() == (width, height) {
            image
        } else if image.dimensions() == (height, width) {
            rotated = imageops::rotate270(image);
            &rotated
        } else {
            return Err(display_error(&format!(
                "Image is {}x{}, panel needs {}x{}",
                image.width(),
                image.height(),
                width,
                height
            )));
        };

        let mut frame = Self::filled(width, height, PanelColor::White);
        for (x, y, pixel) in image.enumerate_pixels() {
            frame.set_pixel(x, y, PanelColor::nearest(*pixel));
        }

        Ok(frame)
    }

    /// Decode back into an RGB image in panel orientation
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            self.pixel(x, y).unwrap_or(PanelColor::White).rgb()
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<PanelColor> {
        let (byte, high) = self.position(x, y)?;
        let value = self.buffer[byte];
        let index = if high { value >> 4 } else { value & 0x0f };
        PanelColor::from_index(index)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: PanelColor) {
        if let Some((byte, high)) = self.position(x, y) {
            let value = &mut self.buffer[byte];
            *value = if high {
                (*value & 0x0f) | (color.index() << 4)
            } else {
                (*value & 0xf0) | color.index()
            };
        }
    }

    fn position(&self, x: u32, y: u32) -> Option<(usize, bool)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let row_bytes = self.width.div_ceil(2) as usize;
        Some((y as usize * row_bytes + (x / 2) as usize, x % 2 == 0))
    }

    fn buffer_len(width: u32, height: u32) -> usize {
        width.div_ceil(2) as usize * height as usize
    }
}
