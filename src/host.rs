use crate::binder::{Bindings, TouchBinder};
use crate::color::PickColor;
use crate::config::PickConfig;
use crate::context::PickContext;
use crate::cursor::{CursorSnapshot, CursorState, SessionId};
use crate::error::Error;
use crate::events::TouchListener;
use crate::palette::PickColorAllocator;
use crate::picker::Picker;
use crate::render::PickBufferRenderer;
use crate::target::RenderTarget;
use crate::touch::Touch;
use crate::zone::{draw_pick_tree, walk_subtree, ZoneId, ZoneRef};
use cgmath::Point2;
use crossbeam::channel::{Receiver, TryRecvError};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, trace};

/// Connects the cursor transport to the zones.
///
/// The transport thread sends [`CursorSnapshot`]s down a channel; the render thread calls
/// [`frame`](Host::frame) once per frame, which renders the pick buffer and then turns the
/// received snapshots into touches, zone assignments and touch events.
pub struct Host {
    context: Arc<PickContext>,
    palette: Arc<PickColorAllocator>,
    renderer: PickBufferRenderer,
    picker: Picker,
    bindings: Bindings,
    roots: Vec<ZoneRef>,
    touches: HashMap<SessionId, Arc<Touch>>,
    listeners: Vec<Arc<dyn TouchListener>>,
    cursor_recv: Receiver<CursorSnapshot>,
    pending: Vec<CursorSnapshot>,
}

impl Host {
    /// Creates a new Host.
    ///
    /// - `cursor_recv`: the receiving end of the transport’s channel
    /// - `binder`: maps raw cursor positions to screen pixels for every device without its own
    ///   binder (see [`bindings`](Host::bindings))
    pub fn new(
        cursor_recv: Receiver<CursorSnapshot>,
        target: Box<dyn RenderTarget>,
        binder: Arc<dyn TouchBinder>,
        config: &PickConfig,
    ) -> Host {
        let context = Arc::new(PickContext::new(target, config));
        let palette = Arc::new(PickColorAllocator::new());

        Host {
            renderer: PickBufferRenderer::new(Arc::clone(&context)),
            picker: Picker::new(Arc::clone(&context), Arc::clone(&palette)),
            bindings: Bindings::new(binder, config.main_listener_port),
            context,
            palette,
            roots: Vec::new(),
            touches: HashMap::new(),
            listeners: Vec::new(),
            cursor_recv,
            pending: Vec::new(),
        }
    }

    pub fn context(&self) -> &Arc<PickContext> {
        &self.context
    }

    pub fn palette(&self) -> &Arc<PickColorAllocator> {
        &self.palette
    }

    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    /// Per-device coordinate binders.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Registers a zone subtree as pickable. Returns the zone’s pick color.
    pub fn add_zone(&mut self, zone: ZoneRef) -> Option<PickColor> {
        let color = self.palette.allocate(&zone);
        if !self.roots.iter().any(|r| r.id() == zone.id()) {
            self.roots.push(zone);
        }
        color
    }

    /// Removes a zone subtree: frees its colors and takes every touch away from it.
    pub fn remove_zone(&mut self, zone: &ZoneRef) {
        let mut removed = HashSet::<ZoneId>::new();
        walk_subtree(zone, &mut |z: &ZoneRef| {
            self.palette.release(&**z);
            removed.insert(z.id());
        });

        for touch in self.touches.values() {
            for assigned in touch.assigned_zones().iter() {
                if removed.contains(&assigned.id()) {
                    touch.unassign_zone(&**assigned);
                }
            }
        }

        self.roots.retain(|r| !removed.contains(&r.id()));
        debug!(zone = ?zone.id(), count = removed.len(), "removed zones");
    }

    /// Adds a listener to every current and future touch.
    pub fn add_touch_listener(&mut self, listener: Arc<dyn TouchListener>) {
        for touch in self.touches.values() {
            touch.add_touch_listener(Arc::clone(&listener));
        }
        self.listeners.push(listener);
    }

    pub fn touch(&self, session_id: SessionId) -> Option<&Arc<Touch>> {
        self.touches.get(&session_id)
    }

    /// Touches that are currently down.
    pub fn touches(&self) -> Vec<Arc<Touch>> {
        self.touches.values().cloned().collect()
    }

    /// Receives all snapshots from the channel without processing them.
    ///
    /// Returns the number of snapshots received, or [`Error::Disconnected`] if the transport side
    /// hung up (snapshots received before that are kept).
    pub fn poll(&mut self) -> Result<usize, Error> {
        let mut received = 0;
        loop {
            match self.cursor_recv.try_recv() {
                Ok(snapshot) => {
                    self.pending.push(snapshot);
                    received += 1;
                }
                Err(TryRecvError::Empty) => return Ok(received),
                Err(TryRecvError::Disconnected) => return Err(Error::Disconnected),
            }
        }
    }

    /// Runs one frame: renders the pick buffer, then resolves every pending snapshot.
    ///
    /// All snapshots received so far are processed even if the transport has disconnected; the
    /// disconnect is reported afterwards.
    pub fn frame(&mut self) -> Result<(), Error> {
        let polled = self.poll();

        let roots = &self.roots;
        self.renderer.render(|target| {
            for root in roots {
                draw_pick_tree(root, target);
            }
        });

        for snapshot in std::mem::take(&mut self.pending) {
            self.process(snapshot);
        }

        polled.map(|_| ())
    }

    fn process(&mut self, snapshot: CursorSnapshot) {
        let session_id = snapshot.session_id;
        match (snapshot.state, self.touches.get(&session_id).cloned()) {
            (CursorState::Removed, Some(touch)) => {
                self.touches.remove(&session_id);
                touch.update(snapshot);
                touch.invoke_touch_up();
                for zone in touch.assigned_zones().iter() {
                    touch.unassign_zone(&**zone);
                }
                debug!(?session_id, "touch removed");
            }
            (CursorState::Removed, None) => {
                trace!(?session_id, "removal of an unknown touch");
            }
            (_, Some(touch)) => {
                touch.update(snapshot);
                if !touch.is_assigned() {
                    self.resolve(&touch);
                }
                touch.invoke_touch_moved();
            }
            (_, None) => {
                // the transport may skip straight to updates; treat the first report as the add
                let touch = Arc::new(Touch::new(snapshot, self.bindings.binder_for(session_id)));
                for listener in &self.listeners {
                    touch.add_touch_listener(Arc::clone(listener));
                }
                self.touches.insert(session_id, Arc::clone(&touch));
                self.resolve(&touch);
                debug!(?session_id, x = touch.x(), y = touch.y(), "touch added");
                touch.invoke_touch_down();
            }
        }
    }

    /// Picks the zone under a touch and assigns the touch to it.
    fn resolve(&self, touch: &Arc<Touch>) {
        let point = Point2::new(touch.x(), touch.y());
        if let Some(zone) = self.picker.pick(point) {
            touch.assign_zone(&zone);
        }
    }
}
