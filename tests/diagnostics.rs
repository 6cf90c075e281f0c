//! Warnings for recoverable picking conditions.

use cgmath::Point2;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use touchzone::{
    Layer, PickColor, PickColorAllocator, PickConfig, PickContext, Picker, PixelBuffer, Rect,
    RenderTarget, ZoneRef,
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{self, Context, SubscriberExt};

/// Counts events logged at warning level.
#[derive(Clone, Default)]
struct WarningCount(Arc<AtomicUsize>);

impl<S: Subscriber> layer::Layer<S> for WarningCount {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn count_warnings<F: FnOnce()>(f: F) -> usize {
    let count = WarningCount::default();
    let subscriber = tracing_subscriber::registry().with(count.clone());
    tracing::subscriber::with_default(subscriber, f);
    count.0.load(Ordering::SeqCst)
}

/// A picker over a buffer painted entirely in a color no zone owns.
fn stale_picker(debug: bool) -> Picker {
    let config = PickConfig {
        debug,
        ..PickConfig::default()
    };
    let mut buffer = PixelBuffer::new(4, 4);
    buffer.fill_rect(Rect::from_xywh(0., 0., 4., 4.), PickColor::new(0x123456));
    let context = Arc::new(PickContext::new(Box::new(buffer), &config));
    Picker::new(context, Arc::new(PickColorAllocator::new()))
}

#[test]
fn unmapped_color_warns_only_in_debug_mode() {
    let picker = stale_picker(true);
    let warnings = count_warnings(|| assert!(picker.pick(Point2::new(1, 1)).is_none()));
    assert_eq!(warnings, 1);

    let picker = stale_picker(false);
    let warnings = count_warnings(|| assert!(picker.pick(Point2::new(1, 1)).is_none()));
    assert_eq!(warnings, 0);
}

#[test]
fn background_never_warns() {
    let config = PickConfig {
        debug: true,
        ..PickConfig::default()
    };
    let context = Arc::new(PickContext::new(Box::new(PixelBuffer::new(4, 4)), &config));
    let picker = Picker::new(context, Arc::new(PickColorAllocator::new()));
    let warnings = count_warnings(|| assert!(picker.pick(Point2::new(1, 1)).is_none()));
    assert_eq!(warnings, 0);
}

#[test]
fn exhausted_palette_warns_once_per_refused_zone() {
    let palette = PickColorAllocator::with_namespace(2);
    let zone = || -> ZoneRef { Layer::new(Rect::from_xywh(0., 0., 1., 1.)) };

    let warnings = count_warnings(|| {
        assert!(palette.allocate(&zone()).is_some());
        assert!(palette.allocate(&zone()).is_some());
    });
    assert_eq!(warnings, 0);

    let warnings = count_warnings(|| assert_eq!(palette.allocate(&zone()), None));
    assert_eq!(warnings, 1);
}
