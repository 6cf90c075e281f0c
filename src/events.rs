//! Touch events.

use crate::touch::Touch;
use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;

/// List of touch event types.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TouchEventType {
    /// The touch was put down.
    Down = 0,
    /// The touch moved or otherwise changed.
    Moved = 1,
    /// The touch was lifted.
    Up = 2,
}

/// A touch event.
#[derive(Clone)]
pub struct TouchEvent {
    kind: TouchEventType,
    touch: Arc<Touch>,
}

impl TouchEvent {
    pub(crate) fn new(kind: TouchEventType, touch: Arc<Touch>) -> TouchEvent {
        TouchEvent { kind, touch }
    }

    pub fn kind(&self) -> TouchEventType {
        self.kind
    }

    /// The touch that emitted this event.
    pub fn touch(&self) -> &Arc<Touch> {
        &self.touch
    }
}

impl fmt::Debug for TouchEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TouchEvent")
            .field("kind", &self.kind)
            .field("session_id", &self.touch.session_id())
            .finish()
    }
}

/// Observes a touch’s down/moved/up transitions.
pub trait TouchListener: Send + Sync {
    fn handle_touch_down(&self, event: &TouchEvent) {
        let _ = event;
    }

    fn handle_touch_moved(&self, event: &TouchEvent) {
        let _ = event;
    }

    fn handle_touch_up(&self, event: &TouchEvent) {
        let _ = event;
    }
}

/// A listener made from a closure that receives every event.
pub struct EventHandler(Arc<Mutex<dyn FnMut(&TouchEvent) + Send>>);

impl Clone for EventHandler {
    fn clone(&self) -> Self {
        EventHandler(Arc::clone(&self.0))
    }
}

impl EventHandler {
    pub fn new<F: 'static + FnMut(&TouchEvent) + Send>(handler: F) -> Self {
        EventHandler(Arc::new(Mutex::new(handler)))
    }

    fn call(&self, event: &TouchEvent) {
        let mut handler = self.0.lock();
        (&mut *handler)(event)
    }
}

impl TouchListener for EventHandler {
    fn handle_touch_down(&self, event: &TouchEvent) {
        self.call(event)
    }

    fn handle_touch_moved(&self, event: &TouchEvent) {
        self.call(event)
    }

    fn handle_touch_up(&self, event: &TouchEvent) {
        self.call(event)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EventHandler")
    }
}
