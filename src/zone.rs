//! The zone contract.
//!
//! Zones are owned by the application. This crate only holds references to them, hands them pick
//! colors, and tells them which touches they own.

use crate::color::PickColor;
use crate::cursor::SessionId;
use crate::target::RenderTarget;
use crate::touch::Touch;
use cgmath::Point2;
use core::any::Any;
use core::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A unique identifier for a zone.
///
/// (this is just a UUID)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneId(u32, u16, u16, [u8; 8]);

impl ZoneId {
    pub fn new() -> ZoneId {
        let uuid = Uuid::new_v4();
        let (a, b, c, d) = uuid.as_fields();
        ZoneId(a, b, c, *d)
    }
}

impl Default for ZoneId {
    fn default() -> Self {
        ZoneId::new()
    }
}

/// A shared reference to a zone.
pub type ZoneRef = Arc<dyn Zone>;

/// An interactive screen region that touches can be assigned to.
///
/// Implementations must use interior mutability; zones are shared between the application, the
/// picker and every touch assigned to them.
pub trait Zone: fmt::Debug + Send + Sync {
    /// Identity of this zone. Must never change.
    fn id(&self) -> ZoneId;

    /// The pick color currently allocated to this zone, if any.
    fn pick_color(&self) -> Option<PickColor>;

    /// Stores the allocated pick color. `None` means unassigned.
    fn set_pick_color(&self, color: Option<PickColor>);

    fn parent(&self) -> Option<ZoneRef>;

    fn children(&self) -> Vec<ZoneRef>;

    /// If true, touches landing on this zone or any descendant are given to this zone.
    fn steals_childrens_touch(&self) -> bool;

    fn is_assigned(&self, touch: &Touch) -> bool;

    /// Called when a touch is assigned to this zone.
    fn assign(&self, touch: &Arc<Touch>);

    /// Called when the touch with the given session is taken away from this zone.
    fn unassign(&self, session_id: SessionId);

    /// Paints this zone’s own shape (not its children) flat in `color`.
    fn draw_for_pick_buffer(&self, color: PickColor, target: &mut dyn RenderTarget);

    /// For downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Converts a screen point to this zone’s local coordinates.
    fn to_local(&self, point: Point2<f32>) -> Point2<f32> {
        point
    }
}

/// Returns true if both references point at the same zone.
pub fn same_zone(a: &dyn Zone, b: &dyn Zone) -> bool {
    a.id() == b.id()
}

/// Iterates over a zone and its ancestors, innermost first.
pub fn ancestors(zone: ZoneRef) -> Ancestors {
    Ancestors { next: Some(zone) }
}

pub struct Ancestors {
    next: Option<ZoneRef>,
}

impl Iterator for Ancestors {
    type Item = ZoneRef;

    fn next(&mut self) -> Option<ZoneRef> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}

/// Calls `f` on a zone and all of its descendants, parents before children.
pub fn walk_subtree(zone: &ZoneRef, f: &mut dyn FnMut(&ZoneRef)) {
    f(zone);
    for child in zone.children() {
        walk_subtree(&child, f);
    }
}

/// Paints a zone subtree into the pick buffer, parents first so children end up on top.
///
/// Zones without a pick color are skipped, but their children are still visited.
pub fn draw_pick_tree(zone: &ZoneRef, target: &mut dyn RenderTarget) {
    walk_subtree(zone, &mut |zone: &ZoneRef| {
        if let Some(color) = zone.pick_color() {
            zone.draw_for_pick_buffer(color, target);
        }
    });
}
