use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::tracking::{with_tracking, Tracking};

/// Host-side tracking for declarative views.
///
/// Each [`WithTracking::render`] re-tracks the body it builds; a write to
/// anything the body read marks the view as needing display. The view
/// never re-subscribes by hand: the next draw does it.
pub struct WithTracking {
    needs_display: Arc<AtomicBool>,
    tracking: Option<Tracking>,
}

impl Default for WithTracking {
    fn default() -> Self {
        Self::new()
    }
}

impl WithTracking {
    pub fn new() -> Self {
        Self {
            needs_display: Arc::new(AtomicBool::new(true)),
            tracking: None,
        }
    }

    pub fn needs_display(&self) -> bool {
        self.needs_display.load(Ordering::SeqCst)
    }

    /// Force the next draw.
    pub fn set_needs_display(&self) {
        self.needs_display.store(true, Ordering::SeqCst);
    }

    pub fn render<R>(&mut self, body: impl FnOnce() -> R) -> R {
        // Release the previous subscription before the body runs.
        self.tracking = None;
        self.needs_display.store(false, Ordering::SeqCst);
        let flag = Arc::clone(&self.needs_display);
        let (result, tracking) = with_tracking(body, move |_| {
            flag.store(true, Ordering::SeqCst);
        });
        self.tracking = Some(tracking);
        result
    }
}
