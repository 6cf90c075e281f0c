//! Touch resolution for multi-touch interfaces.
//!
//! # Conceptual overview
//! Touchzone figures out which on-screen zone each touch belongs to, keeps track of every touch
//! from the moment it is put down until it is lifted, and maintains which touches belong to which
//! zones so gesture code can react to them.
//!
//! ## Zones
//! Zones are interactive screen regions owned by the application. They form a tree: a zone may
//! have a parent and any number of children. This crate only sees them through the [`Zone`]
//! trait; [`Layer`] is a ready-made rectangular zone.
//!
//! A zone may choose to *steal its children’s touches*: any touch landing on it or on one of its
//! descendants is then given to it rather than to the descendant.
//!
//! ## Picking
//! Hit testing is done with a pick buffer, an off-screen image in which every zone is painted
//! flat in a color that is unique to it. Finding the zone under a point is then a matter of
//! reading one pixel and looking its color up.
//!
//! - [`PickColorAllocator`] hands out the colors and maps them back to zones.
//! - [`PickBufferRenderer`] paints the buffer once per frame.
//! - [`Picker`] reads pixels back, either one pixel at a time straight from the render target
//!   (the fast path) or from a full-frame copy taken after rendering (the slow path, for targets
//!   that can’t do single-pixel reads).
//!
//! Colors and the registry don’t need a graphics context at all, so they can be tested on their
//! own; [`PixelBuffer`] is a software render target for everything else.
//!
//! ## Touches
//! The input transport reports cursors as [`CursorSnapshot`]s. A [`Touch`] is created from the
//! first snapshot of a session and updated from every later one. It keeps the path history, the
//! screen position (via a [`TouchBinder`]), timing, the zones it is assigned to and its
//! listeners.
//!
//! ## Frames
//! [`Host`] ties it together. The transport thread sends snapshots down a channel; every frame,
//! the host renders the pick buffer, then for each snapshot picks the zone under the touch,
//! assigns or unassigns it, and dispatches down, moved and up events.
//!
//! ## Coordinate System
//! Screen coordinates have their origin at the top left corner with positive y pointing down.
//! Render targets read single pixels with the origin at the bottom left.

pub mod binder;
pub mod color;
pub mod config;
mod context;
mod cow;
pub mod cursor;
mod error;
pub mod events;
mod host;
mod layer;
pub mod palette;
mod picker;
mod rect;
mod render;
pub mod target;
mod touch;
pub mod zone;

pub use binder::{Bindings, ScreenBinder, TouchBinder};
pub use color::{Color, PickColor};
pub use crate::config::PickConfig;
pub use context::PickContext;
pub use cow::CowList;
pub use cursor::{CursorSnapshot, CursorState, PathPoint, SessionId, TouchTime};
pub use error::Error;
pub use events::{EventHandler, TouchEvent, TouchEventType, TouchListener};
pub use host::Host;
pub use layer::Layer;
pub use palette::{Lookup, PickColorAllocator};
pub use picker::Picker;
pub use rect::Rect;
pub use render::PickBufferRenderer;
pub use target::{PixelBuffer, RenderTarget};
pub use touch::Touch;
pub use zone::{Zone, ZoneId, ZoneRef};
