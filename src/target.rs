//! Render targets for the pick buffer.

use crate::color::PickColor;
use crate::error::Error;
use crate::rect::Rect;

/// A pixel-addressable off-screen surface the pick buffer is drawn into.
///
/// Screen coordinates have their origin at the top left with y pointing down. The fast readback
/// path uses the graphics convention instead: origin at the bottom left, y pointing up.
pub trait RenderTarget: Send {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Fills the whole surface with one color.
    fn clear(&mut self, color: PickColor);

    /// Fills a rectangle, in screen coordinates, with a flat opaque color.
    fn fill_rect(&mut self, rect: Rect, color: PickColor);

    /// Pushes pending draw calls through the pipeline.
    fn flush(&mut self) {}

    /// If true, [`read_pixel`](RenderTarget::read_pixel) may be used.
    fn supports_fast_readback(&self) -> bool;

    /// Copies the entire surface into memory as `0xAARRGGBB` pixels, row-major from the top left.
    fn load_pixels(&mut self) -> Vec<u32>;

    /// Reads a single pixel as RGBA bytes. `y` counts rows from the bottom.
    ///
    /// Returns `None` if the read could not be performed.
    fn read_pixel(&mut self, x: u32, y: u32) -> Option<[u8; 4]>;
}

/// A software render target backed by a plain pixel vector.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    fast_readback: bool,
}

impl PixelBuffer {
    /// Creates a buffer cleared to the pick background.
    pub fn new(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer {
            width,
            height,
            pixels: vec![PickColor::BACKGROUND.to_argb(); width as usize * height as usize],
            fast_readback: true,
        }
    }

    /// Wraps existing `0xAARRGGBB` pixels.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Result<PixelBuffer, Error> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(PixelBuffer {
            width,
            height,
            pixels,
            fast_readback: true,
        })
    }

    /// Enables or disables single-pixel readback.
    pub fn with_fast_readback(mut self, enabled: bool) -> PixelBuffer {
        self.fast_readback = enabled;
        self
    }

    /// Returns the pixel at screen coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((x + y * self.width) as usize).copied()
    }
}

impl RenderTarget for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: PickColor) {
        let argb = color.to_argb();
        for pixel in &mut self.pixels {
            *pixel = argb;
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: PickColor) {
        let argb = color.to_argb();
        let (xs, ys) = rect.pixel_spans(self.width, self.height);
        for y in ys {
            let row = (y * self.width) as usize;
            for x in xs.clone() {
                self.pixels[row + x as usize] = argb;
            }
        }
    }

    fn supports_fast_readback(&self) -> bool {
        self.fast_readback
    }

    fn load_pixels(&mut self) -> Vec<u32> {
        self.pixels.clone()
    }

    fn read_pixel(&mut self, x: u32, y: u32) -> Option<[u8; 4]> {
        if !self.fast_readback || y >= self.height {
            return None;
        }
        let argb = self.pixel(x, self.height - 1 - y)?;
        let [a, r, g, b] = argb.to_be_bytes();
        Some([r, g, b, a])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_background() {
        let buf = PixelBuffer::new(4, 3);
        assert_eq!(buf.pixel(3, 2), Some(PickColor::BACKGROUND.to_argb()));
        assert_eq!(buf.pixel(4, 0), None);
    }

    #[test]
    fn fast_read_uses_bottom_origin() {
        let mut buf = PixelBuffer::new(4, 3);
        buf.fill_rect(Rect::from_xywh(0., 0., 1., 1.), PickColor::from_rgb(1, 2, 3));
        // top left pixel is the last row counted from the bottom
        assert_eq!(buf.read_pixel(0, 2), Some([1, 2, 3, 255]));
        assert_eq!(buf.read_pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(buf.read_pixel(0, 3), None);
    }

    #[test]
    fn disabled_fast_readback_refuses_reads() {
        let mut buf = PixelBuffer::new(2, 2).with_fast_readback(false);
        assert!(!buf.supports_fast_readback());
        assert_eq!(buf.read_pixel(0, 0), None);
    }

    #[test]
    fn from_pixels_checks_size() {
        match PixelBuffer::from_pixels(2, 2, vec![0; 3]) {
            Err(Error::BufferSize { expected, actual }) => {
                assert_eq!(expected, 4);
                assert_eq!(actual, 3);
            }
            other => panic!("expected a size error, got {:?}", other),
        }
    }
}
