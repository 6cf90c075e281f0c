//! Resolving screen points to zones.

use crate::color::PickColor;
use crate::context::PickContext;
use crate::palette::{Lookup, PickColorAllocator};
use crate::zone::{ancestors, ZoneRef};
use cgmath::Point2;
use std::sync::Arc;
use tracing::{trace, warn};

/// Clamps a coordinate into `0..extent`. `extent` must not be zero.
fn clamp_axis(value: i32, extent: u32) -> u32 {
    if value < 0 {
        0
    } else if value as u32 >= extent {
        extent - 1
    } else {
        value as u32
    }
}

/// Looks up which zone is under a point by sampling the pick buffer.
#[derive(Debug, Clone)]
pub struct Picker {
    context: Arc<PickContext>,
    palette: Arc<PickColorAllocator>,
}

impl Picker {
    pub fn new(context: Arc<PickContext>, palette: Arc<PickColorAllocator>) -> Picker {
        Picker { context, palette }
    }

    /// Returns the zone under a screen point.
    ///
    /// If the zone or one of its ancestors steals its children’s touches, the innermost such
    /// ancestor is returned instead. Points outside the buffer are clamped to its edge.
    pub fn pick(&self, point: Point2<i32>) -> Option<ZoneRef> {
        let color = self.sample(point)?;

        match self.palette.lookup(color) {
            Lookup::Background => None,
            Lookup::Zone(picked) => {
                trace!(?color, zone = ?picked.id(), "picked zone");
                let thief = ancestors(ZoneRef::clone(&picked)).find(|z| z.steals_childrens_touch());
                Some(thief.unwrap_or(picked))
            }
            Lookup::Unmapped => {
                // zones being added or removed can leave stale colors in the buffer for a frame
                if self.context.debug() {
                    warn!(
                        "pick color {:06x} doesn't match any known zone or the background",
                        color
                    );
                }
                None
            }
        }
    }

    /// Reads the color key under a screen point.
    ///
    /// Returns `None` for an empty buffer, or if no pick pass has run yet on the slow path.
    pub fn sample(&self, point: Point2<i32>) -> Option<PickColor> {
        let mut target = self.context.target();
        let (width, height) = (target.width(), target.height());
        if width == 0 || height == 0 {
            return None;
        }

        let x = clamp_axis(point.x, width);
        let y = clamp_axis(point.y, height);

        if self.context.uses_fast_path(&**target) {
            // the target’s rows count from the bottom
            let [r, g, b, _] = target.read_pixel(x, height - 1 - y)?;
            Some(PickColor::from_rgb(r, g, b))
        } else {
            drop(target);
            let pixels = self.context.pixels()?;
            let index = x as usize + y as usize * width as usize;
            pixels.get(index).map(|p| PickColor::from_argb(*p))
        }
    }
}
