//! Pick color allocation.
//!
//! Every pickable zone gets a unique color key. Keys are handed out by stepping a cursor through
//! the namespace `[0, N)` with a fixed increment that shares no factor with `N`, so the cursor
//! visits every key exactly once per cycle and consecutive zones get visually distinct colors.

use crate::color::PickColor;
use crate::zone::{Zone, ZoneId, ZoneRef};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Cursor step between consecutive allocations.
///
/// 74 = 2 × 37 is coprime with 2^8 − 1, 2^16 − 1 and 2^24 − 1.
pub const PICK_COLOR_INCREMENT: u32 = 74;

/// Number of allocatable colors: every 24-bit key except the background.
pub const PICK_COLOR_COUNT: u32 = 0x00ff_ffff;

const START_PICK_COLOR: u32 = 0;

/// What a color key in the pick buffer refers to.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// The background, or a key explicitly mapped to no zone.
    Background,
    Zone(ZoneRef),
    /// Not known to the registry at all.
    Unmapped,
}

#[derive(Debug)]
struct Registry {
    /// Color → zone; `None` marks the background.
    zones_by_color: HashMap<PickColor, Option<ZoneRef>>,
    colors_by_zone: HashMap<ZoneId, PickColor>,
    active: BTreeSet<PickColor>,
    cursor: u32,
}

/// Allocates pick colors to zones and maps sampled colors back to them.
///
/// All state sits behind one lock so the picker can look colors up while the application adds and
/// removes zones.
#[derive(Debug)]
pub struct PickColorAllocator {
    namespace: u32,
    registry: Mutex<Registry>,
}

impl Default for PickColorAllocator {
    fn default() -> Self {
        PickColorAllocator::with_namespace(PICK_COLOR_COUNT)
    }
}

impl PickColorAllocator {
    pub fn new() -> PickColorAllocator {
        PickColorAllocator::default()
    }

    /// Creates an allocator that only hands out keys in `[0, size)`.
    ///
    /// # Panics
    /// - if `size` is zero or larger than [`PICK_COLOR_COUNT`]
    pub fn with_namespace(size: u32) -> PickColorAllocator {
        assert!(
            size > 0 && size <= PICK_COLOR_COUNT,
            "pick color namespace must be in 1..={}",
            PICK_COLOR_COUNT
        );

        let mut zones_by_color = HashMap::new();
        zones_by_color.insert(PickColor::BACKGROUND, None);

        PickColorAllocator {
            namespace: size,
            registry: Mutex::new(Registry {
                zones_by_color,
                colors_by_zone: HashMap::new(),
                active: BTreeSet::new(),
                cursor: START_PICK_COLOR % size,
            }),
        }
    }

    /// Number of keys this allocator can hand out.
    pub fn namespace_size(&self) -> u32 {
        self.namespace
    }

    /// Number of keys currently in use.
    pub fn active_count(&self) -> usize {
        self.registry.lock().active.len()
    }

    /// Allocates a color for the zone and, recursively, all of its children.
    ///
    /// A zone that is already registered keeps its color and its subtree is left alone. Returns
    /// `None` if every color is taken; the zone then stays unpickable.
    pub fn allocate(&self, zone: &ZoneRef) -> Option<PickColor> {
        let mut registry = self.registry.lock();
        self.allocate_in(&mut registry, zone)
    }

    fn allocate_in(&self, registry: &mut Registry, zone: &ZoneRef) -> Option<PickColor> {
        if let Some(color) = registry.colors_by_zone.get(&zone.id()) {
            return Some(*color);
        }

        // the cursor may sit on a used key if the palette filled up and something else was freed
        if !self.seek_free(registry) {
            warn!(
                max = self.namespace,
                "added zone is unpickable, all pick colors are in use"
            );
            return None;
        }

        let color = PickColor::new(registry.cursor);
        zone.set_pick_color(Some(color));
        registry.zones_by_color.insert(color, Some(ZoneRef::clone(zone)));
        registry.colors_by_zone.insert(zone.id(), color);
        registry.active.insert(color);
        debug!(?color, zone = ?zone.id(), "allocated pick color");

        self.step(registry);
        self.seek_free(registry);

        for child in zone.children() {
            self.allocate_in(registry, &child);
        }

        Some(color)
    }

    fn step(&self, registry: &mut Registry) {
        registry.cursor = (registry.cursor + PICK_COLOR_INCREMENT) % self.namespace;
    }

    /// Moves the cursor to the next unused key. Returns false if every key is in use.
    ///
    /// Stepping visits every key only when the increment is coprime with the namespace size;
    /// for other sizes the step cycle is shorter, and once it is used up the first free key is
    /// taken instead.
    fn seek_free(&self, registry: &mut Registry) -> bool {
        if registry.active.len() >= self.namespace as usize {
            return false;
        }

        let mut probes = 0;
        while registry.active.contains(&PickColor::new(registry.cursor)) {
            if probes >= self.namespace {
                let active = &registry.active;
                let free = (0..self.namespace).find(|key| !active.contains(&PickColor::new(*key)));
                return match free {
                    Some(key) => {
                        registry.cursor = key;
                        true
                    }
                    None => false,
                };
            }
            self.step(registry);
            probes += 1;
        }
        true
    }

    /// Frees the zone’s color. Returns the zone the color was mapped to, if any.
    ///
    /// The zone’s stored color is reset to unassigned either way.
    pub fn release(&self, zone: &dyn Zone) -> Option<ZoneRef> {
        let mut registry = self.registry.lock();
        zone.set_pick_color(None);

        let color = registry.colors_by_zone.remove(&zone.id())?;
        registry.active.remove(&color);
        debug!(?color, zone = ?zone.id(), "released pick color");
        registry.zones_by_color.remove(&color).flatten()
    }

    /// Returns true if the zone holds a color from this allocator.
    pub fn contains(&self, zone: &dyn Zone) -> bool {
        self.registry.lock().colors_by_zone.contains_key(&zone.id())
    }

    /// Returns the color allocated to the zone.
    pub fn color_of(&self, zone: &dyn Zone) -> Option<PickColor> {
        self.registry.lock().colors_by_zone.get(&zone.id()).copied()
    }

    /// Resolves a sampled color key.
    pub fn lookup(&self, color: PickColor) -> Lookup {
        match self.registry.lock().zones_by_color.get(&color) {
            Some(Some(zone)) => Lookup::Zone(ZoneRef::clone(zone)),
            Some(None) => Lookup::Background,
            None => Lookup::Unmapped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;
    use crate::rect::Rect;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn zone() -> ZoneRef {
        Layer::new(Rect::from_xywh(0., 0., 1., 1.))
    }

    fn gcd(mut a: u32, mut b: u32) -> u32 {
        while b != 0 {
            let t = a % b;
            a = b;
            b = t;
        }
        a
    }

    /// Steps from `start` until the cursor returns, checking every key is visited once.
    fn assert_full_period(n: u32, start: u32) {
        let mut seen = vec![false; n as usize];
        let mut cursor = start;
        for i in 0..n {
            assert!(
                !seen[cursor as usize],
                "key {} revisited after {} steps (n = {})",
                cursor,
                i,
                n
            );
            seen[cursor as usize] = true;
            cursor = (cursor + PICK_COLOR_INCREMENT) % n;
        }
        assert_eq!(cursor, start);
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn increment_has_full_period() {
        for &n in &[(1 << 8) - 1, (1 << 16) - 1, (1 << 24) - 1] {
            assert_eq!(gcd(PICK_COLOR_INCREMENT, n), 1, "n = {}", n);
        }
        assert_full_period((1 << 8) - 1, 0);
        assert_full_period((1 << 8) - 1, 200);
        assert_full_period((1 << 16) - 1, 12345);
        assert_full_period((1 << 24) - 1, 0);
    }

    #[test]
    fn active_colors_are_distinct() {
        let palette = PickColorAllocator::with_namespace(255);
        let zones: Vec<_> = (0..255).map(|_| zone()).collect();
        let mut colors = HashSet::new();
        for z in &zones {
            let color = palette.allocate(z).expect("namespace not exhausted yet");
            assert!(colors.insert(color), "{:?} handed out twice", color);
            assert_eq!(z.pick_color(), Some(color));
        }
        assert_eq!(palette.active_count(), 255);
    }

    #[test]
    fn allocation_follows_the_step_sequence() {
        let palette = PickColorAllocator::with_namespace(5);
        let colors: Vec<_> = (0..5)
            .map(|_| palette.allocate(&zone()).unwrap().value())
            .collect();
        // 74 ≡ 4 (mod 5)
        assert_eq!(colors, vec![0, 4, 3, 2, 1]);
    }

    #[test]
    fn exhaustion_is_not_fatal() {
        let palette = PickColorAllocator::with_namespace(3);
        let zones: Vec<_> = (0..3).map(|_| zone()).collect();
        for z in &zones {
            assert!(palette.allocate(z).is_some());
        }

        let extra = zone();
        assert_eq!(palette.allocate(&extra), None);
        assert_eq!(extra.pick_color(), None);
        assert!(!palette.contains(&*extra));

        // freeing a color makes the extra zone pickable, with exactly the freed color
        let freed = zones[1].pick_color().unwrap();
        palette.release(&*zones[1]);
        assert_eq!(palette.allocate(&extra), Some(freed));
    }

    #[test]
    fn short_step_cycles_still_hand_out_distinct_colors() {
        // 74 shares a factor with all of these, so stepping alone never reaches every key
        for &n in &[4, 37, 256] {
            let palette = PickColorAllocator::with_namespace(n);
            let zones: Vec<_> = (0..n).map(|_| zone()).collect();
            let mut colors = HashSet::new();
            for z in &zones {
                let color = palette.allocate(z).expect("namespace not exhausted yet");
                assert!(colors.insert(color), "{:?} handed out twice (n = {})", color, n);
            }
            assert_eq!(palette.active_count(), n as usize);
            assert_eq!(palette.allocate(&zone()), None);

            for z in &zones {
                match palette.lookup(z.pick_color().unwrap()) {
                    Lookup::Zone(found) => assert_eq!(found.id(), z.id(), "n = {}", n),
                    other => panic!("zone color should map to it, got {:?}", other),
                }
            }

            // a freed key is found again even though the cursor cannot step onto it
            let freed = zones[1].pick_color().unwrap();
            palette.release(&*zones[1]);
            assert_eq!(palette.allocate(&zone()), Some(freed), "n = {}", n);
        }
    }

    #[test]
    fn release_clears_both_sides() {
        let palette = PickColorAllocator::new();
        let z = zone();
        let color = palette.allocate(&z).unwrap();

        let released = palette.release(&*z).expect("zone was registered");
        assert!(Arc::ptr_eq(&released, &z));
        assert_eq!(z.pick_color(), None);
        assert!(!palette.contains(&*z));
        assert!(matches!(palette.lookup(color), Lookup::Unmapped));
        assert_eq!(palette.active_count(), 0);

        // a second release is a no-op
        assert!(palette.release(&*z).is_none());
    }

    #[test]
    fn released_color_is_not_reused_while_others_are_active() {
        let palette = PickColorAllocator::new();
        let zones: Vec<_> = (0..3).map(|_| zone()).collect();
        let colors: Vec<_> = zones.iter().map(|z| palette.allocate(z).unwrap()).collect();

        palette.release(&*zones[1]);
        let newcomer = zone();
        let color = palette.allocate(&newcomer).unwrap();
        assert_ne!(color, colors[0]);
        assert_ne!(color, colors[2]);

        for (z, c) in [&zones[0], &zones[2], &newcomer].iter().zip(&[colors[0], colors[2], color]) {
            match palette.lookup(*c) {
                Lookup::Zone(found) => assert_eq!(found.id(), z.id()),
                other => panic!("{:?} should map to a zone, got {:?}", c, other),
            }
        }
        assert_eq!(palette.active_count(), 3);
    }

    #[test]
    fn interleaved_allocate_and_release_stay_consistent() {
        let palette = PickColorAllocator::with_namespace(7);
        let mut live: Vec<ZoneRef> = Vec::new();
        for round in 0..50 {
            if round % 3 == 2 && !live.is_empty() {
                let z = live.remove(round % live.len());
                palette.release(&*z);
            } else {
                let z = zone();
                if palette.allocate(&z).is_some() {
                    live.push(z);
                }
            }

            let mut mapped = 0;
            for key in 0..7 {
                if let Lookup::Zone(z) = palette.lookup(PickColor::new(key)) {
                    assert_eq!(z.pick_color(), Some(PickColor::new(key)));
                    assert!(live.iter().any(|l| l.id() == z.id()), "dangling entry");
                    mapped += 1;
                }
            }
            assert_eq!(mapped, live.len());
            assert_eq!(palette.active_count(), live.len());
            for z in &live {
                assert!(palette.contains(&**z));
            }
        }
    }

    #[test]
    fn children_are_allocated_once() {
        let palette = PickColorAllocator::new();
        let parent = Layer::new(Rect::from_xywh(0., 0., 10., 10.));
        let child = Layer::new(Rect::from_xywh(0., 0., 5., 5.));
        let grandchild = Layer::new(Rect::from_xywh(0., 0., 2., 2.));
        child.add_child(grandchild.clone());
        parent.add_child(child.clone());

        let parent: ZoneRef = parent;
        palette.allocate(&parent);
        assert_eq!(palette.active_count(), 3);
        assert!(child.pick_color().is_some());
        assert!(grandchild.pick_color().is_some());

        // adding the subtree again must not hand out new colors
        let before = child.pick_color();
        let child: ZoneRef = child;
        palette.allocate(&child);
        palette.allocate(&parent);
        assert_eq!(palette.active_count(), 3);
        assert_eq!(child.pick_color(), before);
    }

    #[test]
    fn background_maps_to_no_zone() {
        let palette = PickColorAllocator::new();
        assert!(matches!(
            palette.lookup(PickColor::BACKGROUND),
            Lookup::Background
        ));
    }
}
