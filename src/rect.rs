//! Rectangles.

use cgmath::{Point2, Vector2};
use std::ops::Range;

/// A rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top left corner.
    pub origin: Point2<f64>,

    /// Rectangle size.
    pub size: Vector2<f64>,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(origin: Point2<f64>, size: Vector2<f64>) -> Rect {
        Rect { origin, size }
    }

    /// Creates a rectangle from x, y, width and height.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect {
            origin: Point2::new(x, y),
            size: Vector2::new(width, height),
        }
    }

    /// Returns true if the point is inside the rectangle.
    pub fn contains(&self, point: Point2<f64>) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x < self.origin.x + self.size.x
            && point.y < self.origin.y + self.size.y
    }

    /// Returns the pixel columns and rows covered by this rectangle, clipped to a buffer of the
    /// given size.
    ///
    /// A pixel is covered if its top left corner lies inside the rectangle.
    pub fn pixel_spans(&self, width: u32, height: u32) -> (Range<u32>, Range<u32>) {
        fn span(start: f64, len: f64, limit: u32) -> Range<u32> {
            let lo = start.ceil().max(0.).min(f64::from(limit));
            let hi = (start + len).ceil().max(lo).min(f64::from(limit));
            lo as u32..hi as u32
        }

        (
            span(self.origin.x, self.size.x, width),
            span(self.origin.y, self.size.y, height),
        )
    }
}
