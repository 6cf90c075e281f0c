//! Pick buffer rendering.

use crate::color::PickColor;
use crate::context::PickContext;
use crate::target::RenderTarget;
use std::sync::Arc;
use tracing::trace;

/// Paints the pick buffer: every zone flat-filled in its pick color on the background color.
#[derive(Debug, Clone)]
pub struct PickBufferRenderer {
    context: Arc<PickContext>,
}

impl PickBufferRenderer {
    pub fn new(context: Arc<PickContext>) -> PickBufferRenderer {
        PickBufferRenderer { context }
    }

    /// Runs one pick pass.
    ///
    /// `draw` is handed the cleared target and must paint every pickable zone in its pick color,
    /// e.g. with [`draw_pick_tree`](crate::zone::draw_pick_tree). If the fast readback path is not
    /// available, the finished buffer is copied into memory for the picker.
    pub fn render<F: FnOnce(&mut dyn RenderTarget)>(&self, draw: F) {
        let mut target = self.context.target();
        target.clear(PickColor::BACKGROUND);
        draw(&mut **target);
        target.flush();

        if self.context.uses_fast_path(&**target) {
            self.context.store_pixels(None);
        } else {
            trace!(
                width = target.width(),
                height = target.height(),
                "loading pick buffer pixels"
            );
            self.context.store_pixels(Some(target.load_pixels()));
        }
    }
}
