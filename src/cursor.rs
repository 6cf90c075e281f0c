//! Raw cursor reports from the input transport.
//!
//! These are plain values; a [`Touch`](crate::touch::Touch) copies what it needs out of them.

use cgmath::{Point2, Vector2};
use core::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Session identifier of a cursor.
///
/// The top 16 bits partition sessions by the port (and thus device) they arrived on; the low 48
/// bits are the transport’s own session id. Partition zero belongs to the main listener.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u64);

impl SessionId {
    const PARTITION_SHIFT: u32 = 48;
    const LOCAL_MASK: u64 = (1 << Self::PARTITION_SHIFT) - 1;

    /// Composes a session id from a port partition and a transport-local id.
    pub fn new(partition: u16, local_id: u64) -> SessionId {
        SessionId((u64::from(partition) << Self::PARTITION_SHIFT) | (local_id & Self::LOCAL_MASK))
    }

    /// The port partition, or zero if this session came from the main listener.
    pub fn port_partition(self) -> u16 {
        (self.0 >> Self::PARTITION_SHIFT) as u16
    }

    /// The transport-local part of the id.
    pub fn local_id(self) -> u64 {
        self.0 & Self::LOCAL_MASK
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SessionId({}:{})", self.port_partition(), self.local_id())
    }
}

/// A point in time relative to the start of the transport session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TouchTime(Duration);

impl TouchTime {
    pub fn from_millis(millis: u64) -> TouchTime {
        TouchTime(Duration::from_millis(millis))
    }

    pub fn from_duration(duration: Duration) -> TouchTime {
        TouchTime(duration)
    }

    /// Whole milliseconds since the session started.
    pub fn total_millis(self) -> u128 {
        self.0.as_millis()
    }

    pub fn as_duration(self) -> Duration {
        self.0
    }
}

/// Lifecycle state reported by the transport.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorState {
    /// The cursor just appeared.
    Added = 0,
    /// The cursor moved or otherwise changed.
    Updated = 1,
    /// The cursor was lifted.
    Removed = 2,
}

/// One historical cursor position in raw source coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub position: Point2<f32>,
    pub time: TouchTime,
}

impl PathPoint {
    pub fn new(x: f32, y: f32, time: TouchTime) -> PathPoint {
        PathPoint {
            position: Point2::new(x, y),
            time,
        }
    }
}

/// A snapshot of a cursor as last reported by the transport.
#[derive(Debug, Clone)]
pub struct CursorSnapshot {
    pub session_id: SessionId,

    /// Short-lived id; may be reused by a later cursor once this one is removed.
    pub cursor_id: i32,

    /// Position in raw source coordinates (usually normalized to 0..1).
    pub position: Point2<f32>,

    pub velocity: Vector2<f32>,
    pub motion_speed: f32,
    pub motion_accel: f32,

    pub start_time: TouchTime,
    pub time: TouchTime,

    /// Position history, oldest first. Shared with the transport, which only ever appends by
    /// publishing a new snapshot.
    pub path: Arc<Vec<PathPoint>>,

    pub state: CursorState,
}

impl CursorSnapshot {
    /// Creates a freshly added cursor with a single-point path.
    pub fn added(session_id: SessionId, cursor_id: i32, x: f32, y: f32, time: TouchTime) -> Self {
        CursorSnapshot {
            session_id,
            cursor_id,
            position: Point2::new(x, y),
            velocity: Vector2::new(0., 0.),
            motion_speed: 0.,
            motion_accel: 0.,
            start_time: time,
            time,
            path: Arc::new(vec![PathPoint::new(x, y, time)]),
            state: CursorState::Added,
        }
    }

    /// Returns the next snapshot after the cursor moved to a new position.
    ///
    /// Velocity is derived from the previous position; acceleration from the change in speed.
    pub fn moved_to(&self, x: f32, y: f32, time: TouchTime) -> Self {
        let dt = (time.as_duration().as_secs_f32() - self.time.as_duration().as_secs_f32()).max(0.);
        let delta = Vector2::new(x - self.position.x, y - self.position.y);
        let velocity = if dt > 0. { delta / dt } else { self.velocity };
        let motion_speed = (velocity.x * velocity.x + velocity.y * velocity.y).sqrt();
        let motion_accel = if dt > 0. {
            (motion_speed - self.motion_speed) / dt
        } else {
            self.motion_accel
        };

        let mut path = Vec::clone(&self.path);
        path.push(PathPoint::new(x, y, time));

        CursorSnapshot {
            position: Point2::new(x, y),
            velocity,
            motion_speed,
            motion_accel,
            time,
            path: Arc::new(path),
            state: CursorState::Updated,
            ..self.clone()
        }
    }

    /// Returns the final snapshot of this cursor.
    pub fn removed(&self, time: TouchTime) -> Self {
        CursorSnapshot {
            time,
            state: CursorState::Removed,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_partitions() {
        let id = SessionId::new(3334, 17);
        assert_eq!(id.port_partition(), 3334);
        assert_eq!(id.local_id(), 17);
        assert_eq!(SessionId(42).port_partition(), 0);
    }

    #[test]
    fn moved_appends_to_path() {
        let a = CursorSnapshot::added(SessionId(1), 0, 0.1, 0.1, TouchTime::from_millis(0));
        let b = a.moved_to(0.2, 0.1, TouchTime::from_millis(100));
        assert_eq!(a.path.len(), 1);
        assert_eq!(b.path.len(), 2);
        assert_eq!(b.state, CursorState::Updated);
        assert!((b.velocity.x - 1.).abs() < 1e-4);
        assert_eq!(b.start_time, a.start_time);

        let c = b.removed(TouchTime::from_millis(150));
        assert_eq!(c.state, CursorState::Removed);
        assert_eq!(c.path.len(), 2);
    }
}
