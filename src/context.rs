//! Shared picking context.

use crate::config::PickConfig;
use crate::target::RenderTarget;
use core::fmt;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Everything the pick buffer renderer and the picker share: the render target, its capabilities
/// and the debug switch.
///
/// Cheap to share through an `Arc`; the renderer and the picker each hold one.
pub struct PickContext {
    target: Mutex<Box<dyn RenderTarget>>,
    /// Full-frame copy of the pick buffer for the slow path. Only filled when the fast path is off.
    pixels: Mutex<Option<Arc<Vec<u32>>>>,
    fast_picking: bool,
    debug: bool,
}

impl PickContext {
    pub fn new(target: Box<dyn RenderTarget>, config: &PickConfig) -> PickContext {
        PickContext {
            target: Mutex::new(target),
            pixels: Mutex::new(None),
            fast_picking: config.fast_picking,
            debug: config.debug,
        }
    }

    /// Locks the render target. Blocks while a pick pass or a readback is in progress.
    pub fn target(&self) -> MutexGuard<'_, Box<dyn RenderTarget>> {
        self.target.lock()
    }

    /// Whether single-pixel readback should be used for this target.
    pub fn uses_fast_path(&self, target: &dyn RenderTarget) -> bool {
        self.fast_picking && target.supports_fast_readback()
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub(crate) fn store_pixels(&self, pixels: Option<Vec<u32>>) {
        *self.pixels.lock() = pixels.map(Arc::new);
    }

    pub(crate) fn pixels(&self) -> Option<Arc<Vec<u32>>> {
        self.pixels.lock().clone()
    }
}

impl fmt::Debug for PickContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PickContext")
            .field("fast_picking", &self.fast_picking)
            .field("debug", &self.debug)
            .field("has_pixels", &self.pixels.lock().is_some())
            .finish()
    }
}
