use crate::color::PickColor;
use crate::cursor::SessionId;
use crate::rect::Rect;
use crate::target::RenderTarget;
use crate::touch::Touch;
use crate::zone::{Zone, ZoneId, ZoneRef};
use cgmath::Point2;
use core::any::Any;
use core::fmt;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// A rectangular zone that may have child zones.
///
/// Bounds are in screen coordinates, so children are not offset by their parent.
pub struct Layer {
    id: ZoneId,

    /// Layer bounds.
    bounds: RwLock<Rect>,

    /// Whether touches on descendants are redirected to this layer.
    steal_childrens_touch: AtomicBool,

    pick_color: Mutex<Option<PickColor>>,
    parent: RwLock<Option<Weak<dyn Zone>>>,
    children: RwLock<Vec<ZoneRef>>,
    touches: RwLock<BTreeMap<SessionId, Arc<Touch>>>,
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Layer")
            .field("id", &self.id)
            .field("bounds", &*self.bounds.read())
            .field("steal_childrens_touch", &self.steals_childrens_touch())
            .field("pick_color", &*self.pick_color.lock())
            .field("children", &self.children.read().len())
            .field("touches", &self.touches.read().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Layer {
    pub fn new(bounds: Rect) -> Arc<Layer> {
        Arc::new(Layer {
            id: ZoneId::new(),
            bounds: RwLock::new(bounds),
            steal_childrens_touch: AtomicBool::new(false),
            pick_color: Mutex::new(None),
            parent: RwLock::new(None),
            children: RwLock::new(Vec::new()),
            touches: RwLock::new(BTreeMap::new()),
        })
    }

    /// Appends a child layer and makes this layer its parent.
    ///
    /// A child that already has a parent is detached from it first. Children added after the
    /// subtree was registered with an allocator need to be registered themselves.
    pub fn add_child(self: &Arc<Self>, child: Arc<Layer>) {
        if let Some(previous) = child.parent() {
            if let Some(previous) = previous.as_any().downcast_ref::<Layer>() {
                previous.remove_child(child.id());
            }
        }

        let parent: Weak<dyn Zone> = Arc::downgrade(self) as Weak<dyn Zone>;
        *child.parent.write() = Some(parent);
        self.children.write().push(child);
    }

    /// Detaches a child. Returns it if it was found.
    pub fn remove_child(&self, id: ZoneId) -> Option<ZoneRef> {
        let mut children = self.children.write();
        let pos = children.iter().position(|c| c.id() == id)?;
        let child = children.remove(pos);
        drop(children);
        if let Some(layer) = child.as_any().downcast_ref::<Layer>() {
            *layer.parent.write() = None;
        }
        Some(child)
    }

    pub fn bounds(&self) -> Rect {
        *self.bounds.read()
    }

    pub fn set_bounds(&self, bounds: Rect) {
        *self.bounds.write() = bounds;
    }

    pub fn set_steals_childrens_touch(&self, steal: bool) {
        self.steal_childrens_touch.store(steal, Ordering::SeqCst);
    }

    /// Touches currently assigned to this layer, by session.
    pub fn assigned_touches(&self) -> Vec<Arc<Touch>> {
        self.touches.read().values().cloned().collect()
    }
}

impl Zone for Layer {
    fn id(&self) -> ZoneId {
        self.id
    }

    fn pick_color(&self) -> Option<PickColor> {
        *self.pick_color.lock()
    }

    fn set_pick_color(&self, color: Option<PickColor>) {
        *self.pick_color.lock() = color;
    }

    fn parent(&self) -> Option<ZoneRef> {
        self.parent.read().as_ref().and_then(Weak::upgrade)
    }

    fn children(&self) -> Vec<ZoneRef> {
        self.children.read().clone()
    }

    fn steals_childrens_touch(&self) -> bool {
        self.steal_childrens_touch.load(Ordering::SeqCst)
    }

    fn is_assigned(&self, touch: &Touch) -> bool {
        self.touches.read().contains_key(&touch.session_id())
    }

    fn assign(&self, touch: &Arc<Touch>) {
        self.touches
            .write()
            .insert(touch.session_id(), Arc::clone(touch));
    }

    fn unassign(&self, session_id: SessionId) {
        self.touches.write().remove(&session_id);
    }

    fn draw_for_pick_buffer(&self, color: PickColor, target: &mut dyn RenderTarget) {
        target.fill_rect(self.bounds(), color);
    }

    fn to_local(&self, point: Point2<f32>) -> Point2<f32> {
        let origin = self.bounds.read().origin;
        Point2::new(point.x - origin.x as f32, point.y - origin.y as f32)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
