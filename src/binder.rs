//! Mapping raw cursor coordinates to the screen.

use crate::config::DEFAULT_LISTENER_PORT;
use crate::cursor::SessionId;
use cgmath::Point2;
use core::fmt;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Transforms raw source coordinates into screen pixels.
///
/// The binding policy (calibration, multi-device layouts) is up to the application.
pub trait TouchBinder: fmt::Debug + Send + Sync {
    fn bind(&self, raw: Point2<f32>) -> Point2<f32>;
}

/// Scales normalized 0..1 coordinates to a screen of the given size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBinder {
    pub width: f32,
    pub height: f32,
}

impl ScreenBinder {
    pub fn new(width: f32, height: f32) -> ScreenBinder {
        ScreenBinder { width, height }
    }
}

impl TouchBinder for ScreenBinder {
    fn bind(&self, raw: Point2<f32>) -> Point2<f32> {
        Point2::new(raw.x * self.width, raw.y * self.height)
    }
}

/// Per-device binders, keyed by the port a session arrived on.
#[derive(Debug)]
pub struct Bindings {
    main_port: u16,
    fallback: Arc<dyn TouchBinder>,
    by_port: RwLock<HashMap<u16, Arc<dyn TouchBinder>>>,
}

impl Bindings {
    /// Creates bindings where every port uses `fallback` until told otherwise.
    pub fn new(fallback: Arc<dyn TouchBinder>, main_port: u16) -> Bindings {
        Bindings {
            main_port,
            fallback,
            by_port: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, port: u16, binder: Arc<dyn TouchBinder>) {
        self.by_port.write().insert(port, binder);
    }

    /// The port a session came in on. Partition zero is the main listener.
    pub fn port_for(&self, session_id: SessionId) -> u16 {
        match session_id.port_partition() {
            0 => self.main_port,
            port => port,
        }
    }

    pub fn binder_for(&self, session_id: SessionId) -> Arc<dyn TouchBinder> {
        let port = self.port_for(session_id);
        self.by_port
            .read()
            .get(&port)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Bindings::new(Arc::new(ScreenBinder::new(1., 1.)), DEFAULT_LISTENER_PORT)
    }
}
