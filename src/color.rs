//! Colors.

use core::fmt;

/// An RGBA color with channels between 0 and 1.
///
/// Used for touch and trail tints; picking never looks at these.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Color {
        Color { r, g, b, a }
    }

    /// Creates a color from 0–255 channel values, clamping anything outside that range.
    pub fn from_rgba8(r: f64, g: f64, b: f64, a: f64) -> Color {
        let c = |v: f64| v.max(0.).min(255.) / 255.;
        Color {
            r: c(r),
            g: c(g),
            b: c(b),
            a: c(a),
        }
    }
}

/// A 24-bit color key identifying a zone in the pick buffer.
///
/// Stored as `0x00RRGGBB`. The alpha channel is never part of the key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PickColor(u32);

impl PickColor {
    /// The reserved clear color of the pick buffer; never maps to a zone.
    pub const BACKGROUND: PickColor = PickColor(0x00ff_ffff);

    /// Creates a color key, discarding anything above the low 24 bits.
    pub const fn new(value: u32) -> PickColor {
        PickColor(value & 0x00ff_ffff)
    }

    /// Packs RGB bytes into a key.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> PickColor {
        PickColor((u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b))
    }

    /// Strips the alpha channel off a packed `0xAARRGGBB` pixel.
    pub fn from_argb(pixel: u32) -> PickColor {
        PickColor(pixel & 0x00ff_ffff)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns the (r, g, b) bytes.
    pub fn rgb(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }

    /// Returns an opaque `0xAARRGGBB` pixel.
    pub fn to_argb(self) -> u32 {
        0xff00_0000 | self.0
    }
}

impl fmt::Debug for PickColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PickColor({:#08x})", self.0)
    }
}

impl fmt::LowerHex for PickColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_packing_matches_pixel_layout() {
        let color = PickColor::from_rgb(0x12, 0x34, 0x56);
        assert_eq!(color.value(), 0x123456);
        assert_eq!(color.rgb(), (0x12, 0x34, 0x56));
        assert_eq!(PickColor::from_argb(0x80_12_34_56), color);
        assert_eq!(PickColor::from_argb(color.to_argb()), color);
    }

    #[test]
    fn new_truncates_to_24_bits() {
        assert_eq!(PickColor::new(0xff_ff_ff_ff), PickColor::BACKGROUND);
    }

    #[test]
    fn tint_channels_are_clamped() {
        let c = Color::from_rgba8(255., 0., 510., -3.);
        assert_eq!(c, Color::new(1., 0., 1., 0.));
    }
}
