// Packed 1-bit framebuffer in the e-paper wire format

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use serde::Deserialize;

/// Native width of the 2.13" panel, in pixels.
pub const EPD_2IN13_WIDTH: u32 = 122;
/// Native height of the 2.13" panel.
pub const EPD_2IN13_HEIGHT: u32 = 250;

/// Canvas rotation relative to the panel's native portrait orientation.
/// Rotate90/Rotate270 give a landscape canvas; which one is "right side up"
/// depends on how the panel is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    Rotate0,
    Rotate90,
    Rotate180,
    Rotate270,
}

/// 1-bit framebuffer, packed MSB-first per row with 1 = white, the format
/// the Waveshare controllers take on the wire. Rows are padded to whole
/// bytes. Drawing goes through `embedded-graphics` with `BinaryColor::On`
/// as black ink on a white background.
pub struct Framebuffer {
    width: u32,
    height: u32,
    rotation: Rotation,
    buf: Vec<u8>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let bytes_per_row = width.div_ceil(8) as usize;
        Self {
            width,
            height,
            rotation: Rotation::Rotate0,
            buf: vec![0xFF; bytes_per_row * height as usize],
        }
    }

    /// Framebuffer for the 2.13" panel (122x250 native).
    pub fn epd2in13() -> Self {
        Self::new(EPD_2IN13_WIDTH, EPD_2IN13_HEIGHT)
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Resets every pixel to white.
    pub fn clear(&mut self) {
        self.buf.fill(0xFF);
    }

    /// Packed frame in native orientation, ready for the panel.
    pub fn data(&self) -> &[u8] {
        &self.buf
    }

    /// Reads back a pixel at canvas (rotated) coordinates; None outside the
    /// canvas.
    pub fn pixel(&self, point: Point) -> Option<BinaryColor> {
        let (x, y) = self.map(point)?;
        let idx = (y * self.width.div_ceil(8) + x / 8) as usize;
        let mask = 0x80 >> (x % 8);
        if self.buf[idx] & mask == 0 {
            Some(BinaryColor::On)
        } else {
            Some(BinaryColor::Off)
        }
    }

    /// Canvas coordinates -> native coordinates, per the rotation mode.
    fn map(&self, point: Point) -> Option<(u32, u32)> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as u32, point.y as u32);
        let (nx, ny) = match self.rotation {
            Rotation::Rotate0 => (x, y),
            Rotation::Rotate90 => (self.width.checked_sub(y + 1)?, x),
            Rotation::Rotate180 => (
                self.width.checked_sub(x + 1)?,
                self.height.checked_sub(y + 1)?,
            ),
            Rotation::Rotate270 => (y, self.height.checked_sub(x + 1)?),
        };
        if nx < self.width && ny < self.height {
            Some((nx, ny))
        } else {
            None
        }
    }

    fn set(&mut self, point: Point, color: BinaryColor) {
        if let Some((x, y)) = self.map(point) {
            let idx = (y * self.width.div_ceil(8) + x / 8) as usize;
            let mask = 0x80 >> (x % 8);
            if color.is_on() {
                self.buf[idx] &= !mask;
            } else {
                self.buf[idx] |= mask;
            }
        }
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        match self.rotation {
            Rotation::Rotate0 | Rotation::Rotate180 => Size::new(self.width, self.height),
            Rotation::Rotate90 | Rotation::Rotate270 => Size::new(self.height, self.width),
        }
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set(point, color);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_all_white_with_padded_rows() {
        let fb = Framebuffer::epd2in13();
        // 122 px -> 16 bytes per row
        assert_eq!(fb.data().len(), 16 * 250);
        assert!(fb.data().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn set_pixel_clears_msb_first_bit() {
        let mut fb = Framebuffer::new(16, 2);
        fb.set(Point::new(0, 1), BinaryColor::On);
        assert_eq!(fb.data()[2], 0x7F);
        assert_eq!(fb.pixel(Point::new(0, 1)), Some(BinaryColor::On));
        fb.set(Point::new(0, 1), BinaryColor::Off);
        assert_eq!(fb.data()[2], 0xFF);
    }

    #[test]
    fn rotations_map_to_expected_native_corners() {
        for (rotation, native) in [
            (Rotation::Rotate0, Point::new(0, 0)),
            (Rotation::Rotate90, Point::new(121, 0)),
            (Rotation::Rotate180, Point::new(121, 249)),
            (Rotation::Rotate270, Point::new(0, 249)),
        ] {
            let mut fb = Framebuffer::epd2in13();
            fb.set_rotation(rotation);
            fb.set(Point::zero(), BinaryColor::On);
            fb.set_rotation(Rotation::Rotate0);
            assert_eq!(fb.pixel(native), Some(BinaryColor::On), "{rotation:?}");
        }
    }

    #[test]
    fn landscape_canvas_swaps_dimensions() {
        let mut fb = Framebuffer::epd2in13();
        fb.set_rotation(Rotation::Rotate270);
        assert_eq!(fb.size(), Size::new(250, 122));
    }

    #[test]
    fn out_of_bounds_pixels_are_discarded() {
        let mut fb = Framebuffer::new(8, 8);
        fb.set(Point::new(-1, 0), BinaryColor::On);
        fb.set(Point::new(8, 0), BinaryColor::On);
        fb.set(Point::new(0, 8), BinaryColor::On);
        assert!(fb.data().iter().all(|&b| b == 0xFF));
    }
}
