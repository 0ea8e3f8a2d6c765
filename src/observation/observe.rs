//! The re-run-on-change loop behind imperative screens.
//!
//! [`observe`] runs a render closure, tracks what it read, and re-runs it
//! after every committed batch that touched one of those reads. Each run
//! re-tracks from scratch. Batches carrying an [`Animation`] are re-rendered
//! on the next scheduler turn with the animation passed in; the rest are
//! re-rendered synchronously at commit.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::registrar::{Animation, Change};
use super::scheduler::{Job, Scheduler};
use super::tracking::{with_tracking, Tracking};

type Apply = Box<dyn FnMut(Option<Animation>) + Send + 'static>;

struct ObserveShared {
    apply: Mutex<Apply>,
    scheduler: Arc<dyn Scheduler>,
    tracking: Mutex<Option<Tracking>>,
    cancelled: AtomicBool,
    runs: AtomicU64,
}

/// Owns a running observation. Dropping it stops the loop.
pub struct ObservationHandle {
    shared: Arc<ObserveShared>,
}

impl ObservationHandle {
    /// Number of times the render closure has run, including the first.
    pub fn runs(&self) -> u64 {
        self.shared.runs.load(Ordering::SeqCst)
    }

    /// Number of properties the latest run depends on.
    pub fn dependency_count(&self) -> usize {
        self.shared
            .tracking
            .lock()
            .as_ref()
            .map_or(0, Tracking::key_count)
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::SeqCst)
    }

    /// Stop re-rendering and release the current subscription.
    pub fn cancel(&self) {
        if self.shared.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        let tracking = self.shared.tracking.lock().take();
        if let Some(tracking) = tracking {
            tracking.cancel();
        }
    }
}

impl Drop for ObservationHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for ObservationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservationHandle")
            .field("runs", &self.runs())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Observe with a render closure that takes no context.
pub fn observe(
    scheduler: Arc<dyn Scheduler>,
    mut apply: impl FnMut() + Send + 'static,
) -> ObservationHandle {
    observe_animated(scheduler, move |_| apply())
}

/// Observe with a render closure that receives the animation, if any, the
/// triggering batch was committed with. The first run receives `None`.
pub fn observe_animated(
    scheduler: Arc<dyn Scheduler>,
    apply: impl FnMut(Option<Animation>) + Send + 'static,
) -> ObservationHandle {
    let shared = Arc::new(ObserveShared {
        apply: Mutex::new(Box::new(apply)),
        scheduler,
        tracking: Mutex::new(None),
        cancelled: AtomicBool::new(false),
        runs: AtomicU64::new(0),
    });
    run(&shared, None);
    ObservationHandle { shared }
}

fn run(shared: &Arc<ObserveShared>, animation: Option<Animation>) {
    if shared.cancelled.load(Ordering::SeqCst) {
        return;
    }
    let weak = Arc::downgrade(shared);
    let ((), tracking) = with_tracking(
        || {
            let mut apply = shared.apply.lock();
            (*apply)(animation);
        },
        move |change| on_change(&weak, change),
    );
    let runs = shared.runs.fetch_add(1, Ordering::SeqCst) + 1;
    tracing::trace!(runs, dependencies = tracking.key_count(), "Observation ran");

    let previous = shared.tracking.lock().replace(tracking);
    drop(previous);
    // Cancelled from inside the render closure.
    if shared.cancelled.load(Ordering::SeqCst) {
        let tracking = shared.tracking.lock().take();
        if let Some(tracking) = tracking {
            tracking.cancel();
        }
    }
}

fn on_change(weak: &Weak<ObserveShared>, change: Change) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    match change.animation {
        None => run(&shared, None),
        Some(animation) => {
            tracing::debug!(
                duration_ms = animation.duration.as_millis() as u64,
                keys = ?change.keys,
                "Deferring animated re-render"
            );
            let weak = Arc::downgrade(&shared);
            shared.scheduler.schedule(Job::new(Some(animation), move || {
                if let Some(shared) = weak.upgrade() {
                    run(&shared, Some(animation));
                }
            }));
        }
    }
}
