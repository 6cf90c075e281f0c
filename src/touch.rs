//! Touches.
//!
//! A [`Touch`] is the persistent identity of one cursor from the moment it is added until it is
//! removed. It is built from the transport’s [`CursorSnapshot`]s and keeps the latest one around,
//! including the shared path history.

use crate::binder::TouchBinder;
use crate::color::Color;
use crate::cow::CowList;
use crate::cursor::{CursorSnapshot, CursorState, PathPoint, SessionId, TouchTime};
use crate::events::{TouchEvent, TouchEventType, TouchListener};
use crate::zone::{same_zone, Zone, ZoneRef};
use cgmath::{MetricSpace, Point2, Vector2};
use core::fmt;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

#[derive(Debug)]
struct TouchState {
    cursor: CursorSnapshot,
    /// Bound (screen) position of `cursor`.
    position: Point2<f32>,
    /// Transport time of the update before the current one.
    prev_update_time: Option<TouchTime>,
    assign_time: Option<TouchTime>,
    unassign_time: Option<TouchTime>,
    death_time: Option<TouchTime>,
    /// Wall clock start of the current assignment state.
    state_started: Instant,
}

/// State of one touch.
pub struct Touch {
    session_id: SessionId,
    binder: Arc<dyn TouchBinder>,
    created: Instant,
    state: RwLock<TouchState>,
    assigned_zones: CowList<ZoneRef>,
    listeners: CowList<Arc<dyn TouchListener>>,
    tint: Mutex<Option<Color>>,
    trail_tint: Mutex<Option<Color>>,
}

fn same_listener(a: &Arc<dyn TouchListener>, b: &Arc<dyn TouchListener>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

fn round(point: Point2<f32>) -> Point2<i32> {
    Point2::new(point.x.round() as i32, point.y.round() as i32)
}

impl Touch {
    /// Creates a touch from the first snapshot of its cursor.
    pub fn new(cursor: CursorSnapshot, binder: Arc<dyn TouchBinder>) -> Touch {
        let now = Instant::now();
        let position = binder.bind(cursor.position);
        Touch {
            session_id: cursor.session_id,
            binder,
            created: now,
            state: RwLock::new(TouchState {
                cursor,
                position,
                prev_update_time: None,
                assign_time: None,
                unassign_time: None,
                death_time: None,
                state_started: now,
            }),
            assigned_zones: CowList::new(),
            listeners: CowList::new(),
            tint: Mutex::new(None),
            trail_tint: Mutex::new(None),
        }
    }

    /// Takes over the latest report of this touch’s cursor.
    ///
    /// The previous report’s time is kept so [`new_path_points`](Touch::new_path_points) knows
    /// what has already been seen. Snapshots of a different session are ignored.
    pub fn update(&self, cursor: CursorSnapshot) {
        if cursor.session_id != self.session_id {
            warn!(
                touch = ?self.session_id,
                cursor = ?cursor.session_id,
                "ignoring cursor update for a different session"
            );
            return;
        }

        let position = self.binder.bind(cursor.position);
        let mut state = self.state.write();
        state.prev_update_time = Some(state.cursor.time);
        state.cursor = cursor;
        state.position = position;
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn cursor_id(&self) -> i32 {
        self.state.read().cursor.cursor_id
    }

    pub fn state(&self) -> CursorState {
        self.state.read().cursor.state
    }

    /// True until the cursor reports that it was removed.
    pub fn is_down(&self) -> bool {
        self.state() != CursorState::Removed
    }

    /// Position in raw source coordinates.
    pub fn raw_position(&self) -> Point2<f32> {
        self.state.read().cursor.position
    }

    /// Position in screen coordinates.
    pub fn bound_position(&self) -> Point2<f32> {
        self.state.read().position
    }

    /// Screen x, rounded to the nearest pixel.
    pub fn x(&self) -> i32 {
        self.bound_position().x.round() as i32
    }

    /// Screen y, rounded to the nearest pixel.
    pub fn y(&self) -> i32 {
        self.bound_position().y.round() as i32
    }

    pub fn velocity(&self) -> Vector2<f32> {
        self.state.read().cursor.velocity
    }

    pub fn motion_speed(&self) -> f32 {
        self.state.read().cursor.motion_speed
    }

    pub fn motion_accel(&self) -> f32 {
        self.state.read().cursor.motion_accel
    }

    pub fn start_time(&self) -> TouchTime {
        self.state.read().cursor.start_time
    }

    pub fn current_time(&self) -> TouchTime {
        self.state.read().cursor.time
    }

    /// Transport time of the previous update, or `None` before the first one.
    pub fn prev_update_time(&self) -> Option<TouchTime> {
        self.state.read().prev_update_time
    }

    pub fn assign_time(&self) -> Option<TouchTime> {
        self.state.read().assign_time
    }

    pub fn unassign_time(&self) -> Option<TouchTime> {
        self.state.read().unassign_time
    }

    /// When the up event was dispatched.
    pub fn death_time(&self) -> Option<TouchTime> {
        self.state.read().death_time
    }

    /// How long this touch has been in its current assignment state.
    ///
    /// Assigning restarts the clock; unassigning rewinds it to when the touch was created.
    pub fn time_in_state(&self) -> Duration {
        self.state.read().state_started.elapsed()
    }

    /// The raw path history, oldest first.
    pub fn path(&self) -> Arc<Vec<PathPoint>> {
        Arc::clone(&self.state.read().cursor.path)
    }

    fn bind_point(&self, point: &PathPoint) -> Point2<i32> {
        round(self.binder.bind(point.position))
    }

    /// Returns the screen point at an index of the path (0 is the oldest point).
    ///
    /// Returns `None` for indices outside the path, including negative ones.
    pub fn point_on_path(&self, index: isize) -> Option<Point2<i32>> {
        if index < 0 {
            return None;
        }
        let path = self.path();
        path.get(index as usize).map(|p| self.bind_point(p))
    }

    /// The second to last point on the path.
    pub fn last_point(&self) -> Option<Point2<i32>> {
        self.point_on_path(self.path().len() as isize - 2)
    }

    /// The newest point on the path.
    pub fn current_point(&self) -> Option<Point2<i32>> {
        self.point_on_path(self.path().len() as isize - 1)
    }

    /// All points on the path, oldest first.
    pub fn path_points(&self) -> Vec<Point2<i32>> {
        self.path().iter().map(|p| self.bind_point(p)).collect()
    }

    /// Points added to the path since the previous update, **newest first**.
    ///
    /// With `join`, the newest point that was already there at the previous update is appended as
    /// well, so consecutive calls can be drawn as one continuous line. Before the first update the
    /// whole path is new.
    pub fn new_path_points(&self, join: bool) -> Vec<Point2<i32>> {
        let (path, prev) = {
            let state = self.state.read();
            (Arc::clone(&state.cursor.path), state.prev_update_time)
        };

        let mut points = Vec::new();
        for point in path.iter().rev() {
            if let Some(prev) = prev {
                if point.time.total_millis() <= prev.total_millis() {
                    if join {
                        points.push(self.bind_point(point));
                    }
                    break;
                }
            }
            points.push(self.bind_point(point));
        }
        points
    }

    /// Distance between the current points of two touches.
    pub fn distance(&self, other: &Touch) -> Option<f32> {
        let a = self.current_point()?;
        let b = other.current_point()?;
        let a = Point2::new(a.x as f32, a.y as f32);
        let b = Point2::new(b.x as f32, b.y as f32);
        Some(a.distance(b))
    }

    /// The bound position in a zone’s local coordinates.
    pub fn local_point(&self, zone: &dyn Zone) -> Point2<f32> {
        zone.to_local(self.bound_position())
    }

    /// Zones currently claiming this touch.
    ///
    /// This is a snapshot; it will not change if the touch is assigned or unassigned meanwhile.
    pub fn assigned_zones(&self) -> Arc<Vec<ZoneRef>> {
        self.assigned_zones.snapshot()
    }

    pub fn is_assigned(&self) -> bool {
        !self.assigned_zones.is_empty()
    }

    pub fn is_assigned_to(&self, zone: &dyn Zone) -> bool {
        self.assigned_zones.contains(|z| same_zone(&**z, zone))
    }

    /// Assigns this touch to a zone.
    ///
    /// Assigning twice does not add the zone twice, and the zone is only told about the touch if
    /// it doesn’t already have it. Restarts the assignment clock either way.
    pub fn assign_zone(self: &Arc<Self>, zone: &ZoneRef) {
        self.assigned_zones
            .push_unless(ZoneRef::clone(zone), |z| same_zone(&**z, &**zone));
        if !zone.is_assigned(self) {
            zone.assign(self);
        }

        let mut state = self.state.write();
        state.state_started = Instant::now();
        state.assign_time = Some(state.cursor.time);
    }

    /// Takes this touch away from a zone. Does nothing if neither side knows about the other.
    pub fn unassign_zone(&self, zone: &dyn Zone) {
        let removed = self.assigned_zones.remove_where(|z| same_zone(&**z, zone));
        if !removed && !zone.is_assigned(self) {
            return;
        }
        zone.unassign(self.session_id);

        let mut state = self.state.write();
        state.state_started = self.created;
        state.unassign_time = Some(state.cursor.time);
    }

    /// Registers a listener. Adding the same listener twice has no effect.
    pub fn add_touch_listener(&self, listener: Arc<dyn TouchListener>) {
        let candidate = Arc::clone(&listener);
        self.listeners
            .push_unless(listener, |l| same_listener(l, &candidate));
    }

    pub fn remove_touch_listener(&self, listener: &Arc<dyn TouchListener>) {
        self.listeners.remove_where(|l| same_listener(l, listener));
    }

    /// Dispatches a down event to all listeners in registration order.
    pub fn invoke_touch_down(self: &Arc<Self>) {
        let event = TouchEvent::new(TouchEventType::Down, Arc::clone(self));
        for listener in self.listeners.snapshot().iter() {
            listener.handle_touch_down(&event);
        }
    }

    /// Dispatches a moved event to all listeners in registration order.
    pub fn invoke_touch_moved(self: &Arc<Self>) {
        let event = TouchEvent::new(TouchEventType::Moved, Arc::clone(self));
        for listener in self.listeners.snapshot().iter() {
            listener.handle_touch_moved(&event);
        }
    }

    /// Dispatches an up event to all listeners in registration order, then records the death
    /// time.
    pub fn invoke_touch_up(self: &Arc<Self>) {
        let event = TouchEvent::new(TouchEventType::Up, Arc::clone(self));
        for listener in self.listeners.snapshot().iter() {
            listener.handle_touch_up(&event);
        }
        let mut state = self.state.write();
        state.death_time = Some(state.cursor.time);
    }

    /// Sets the tint of drawn touches, from 0–255 channel values.
    pub fn set_tint(&self, red: f64, green: f64, blue: f64, alpha: f64) {
        *self.tint.lock() = Some(Color::from_rgba8(red, green, blue, alpha));
    }

    pub fn tint(&self) -> Option<Color> {
        *self.tint.lock()
    }

    /// Sets the tint of drawn trails, from 0–255 channel values.
    pub fn set_trail_tint(&self, red: f64, green: f64, blue: f64, alpha: f64) {
        *self.trail_tint.lock() = Some(Color::from_rgba8(red, green, blue, alpha));
    }

    pub fn trail_tint(&self) -> Option<Color> {
        *self.trail_tint.lock()
    }
}

impl fmt::Debug for Touch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Touch")
            .field("session_id", &self.session_id)
            .field("cursor_id", &state.cursor.cursor_id)
            .field("state", &state.cursor.state)
            .field("position", &state.position)
            .field("path_len", &state.cursor.path.len())
            .field("assigned_zones", &self.assigned_zones.len())
            .finish()
    }
}
