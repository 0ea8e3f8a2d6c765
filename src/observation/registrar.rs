//! Property registrar: read-tracking and batched change notification.
//!
//! A [`Registrar`] belongs to one observable model. Tracked properties
//! report reads through [`Registrar::access`] and writes through
//! [`Registrar::did_set`]. Observers registered on a set of keys fire at
//! most once: the first committed batch that touches any of their keys
//! removes them and invokes their callback.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::tracking;

/// Default duration of an animated transition.
pub const DEFAULT_ANIMATION: Duration = Duration::from_millis(300);

/// Name of a tracked property, unique within its model.
pub type PropertyKey = &'static str;

/// Identifies an observer within one registrar.
pub type ObserverId = u64;

static NEXT_REGISTRAR_ID: AtomicU64 = AtomicU64::new(1);

/// A timed visual transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub duration: Duration,
}

impl Animation {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(DEFAULT_ANIMATION)
    }
}

/// Context passed into a mutation batch.
///
/// The animation travels with the change notification to whoever
/// re-renders, instead of living in an ambient scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transaction {
    animation: Option<Animation>,
}

impl Transaction {
    /// A batch whose changes are applied without animation.
    pub fn immediate() -> Self {
        Self::default()
    }

    /// A batch whose changes should be rendered inside `animation`.
    pub fn animated(animation: Animation) -> Self {
        Self {
            animation: Some(animation),
        }
    }

    pub fn with_animation(animation: Option<Animation>) -> Self {
        Self { animation }
    }

    pub fn animation(&self) -> Option<Animation> {
        self.animation
    }
}

/// Notification delivered to an observer when a batch commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Animation of the batch that triggered the notification.
    pub animation: Option<Animation>,
    /// Observed keys written by that batch.
    pub keys: Vec<PropertyKey>,
}

type ChangeCallback = Box<dyn FnOnce(Change) + Send + 'static>;

struct Observer {
    keys: HashSet<PropertyKey>,
    on_change: ChangeCallback,
}

#[derive(Default)]
struct PendingBatch {
    depth: usize,
    changed: Vec<PropertyKey>,
    animation: Option<Animation>,
}

#[derive(Default)]
struct RegistrarState {
    next_observer: ObserverId,
    // BTreeMap keeps notification in registration order.
    observers: BTreeMap<ObserverId, Observer>,
    batch: PendingBatch,
}

struct RegistrarInner {
    id: u64,
    state: Mutex<RegistrarState>,
}

/// Shared handle to a model's observation registrar.
#[derive(Clone)]
pub struct Registrar {
    inner: Arc<RegistrarInner>,
}

impl std::fmt::Debug for Registrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Registrar")
            .field("id", &self.inner.id)
            .field("observers", &state.observers.len())
            .field("batch_depth", &state.batch.depth)
            .finish()
    }
}

impl Default for Registrar {
    fn default() -> Self {
        Self::new()
    }
}

impl Registrar {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistrarInner {
                id: NEXT_REGISTRAR_ID.fetch_add(1, Ordering::Relaxed),
                state: Mutex::new(RegistrarState::default()),
            }),
        }
    }

    /// Process-unique id of this registrar.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Record a read of `key` in the innermost active tracking scope.
    pub fn access(&self, key: PropertyKey) {
        tracking::record_access(self, key);
    }

    /// Report a write of `key`.
    ///
    /// Inside [`Registrar::mutate`] the write joins the open batch; outside
    /// it forms a batch of its own and is delivered immediately.
    pub fn did_set(&self, key: PropertyKey) {
        let standalone = {
            let mut state = self.inner.state.lock();
            if state.batch.depth > 0 {
                if !state.batch.changed.contains(&key) {
                    state.batch.changed.push(key);
                }
                false
            } else {
                true
            }
        };
        if standalone {
            self.deliver(vec![key], None);
        }
    }

    /// Run `body` as one mutation batch.
    ///
    /// Observers are notified once, after the outermost batch closes, with
    /// the animation of the first transaction that supplied one.
    pub fn mutate<R>(&self, transaction: Transaction, body: impl FnOnce() -> R) -> R {
        {
            let mut state = self.inner.state.lock();
            state.batch.depth += 1;
            if state.batch.animation.is_none() {
                state.batch.animation = transaction.animation();
            }
        }
        let _commit = scopeguard::guard((), |_| self.end_batch());
        body()
    }

    /// Register a one-shot observer on `keys`.
    pub fn register(
        &self,
        keys: HashSet<PropertyKey>,
        on_change: impl FnOnce(Change) + Send + 'static,
    ) -> ObserverId {
        let mut state = self.inner.state.lock();
        let id = state.next_observer;
        state.next_observer += 1;
        state.observers.insert(
            id,
            Observer {
                keys,
                on_change: Box::new(on_change),
            },
        );
        id
    }

    /// Remove an observer. Unknown ids are ignored.
    pub fn cancel(&self, id: ObserverId) {
        let removed = self.inner.state.lock().observers.remove(&id);
        // Drop the callback outside the lock; it may own other registrars.
        drop(removed);
    }

    /// Number of observers still waiting for a change.
    pub fn observer_count(&self) -> usize {
        self.inner.state.lock().observers.len()
    }

    fn end_batch(&self) {
        let committed = {
            let mut state = self.inner.state.lock();
            state.batch.depth = state.batch.depth.saturating_sub(1);
            if state.batch.depth == 0 {
                Some(std::mem::take(&mut state.batch))
            } else {
                None
            }
        };
        if let Some(batch) = committed {
            if !batch.changed.is_empty() {
                self.deliver(batch.changed, batch.animation);
            }
        }
    }

    fn deliver(&self, changed: Vec<PropertyKey>, animation: Option<Animation>) {
        let fired: Vec<(Vec<PropertyKey>, ChangeCallback)> = {
            let mut state = self.inner.state.lock();
            let ids: Vec<ObserverId> = state
                .observers
                .iter()
                .filter(|(_, observer)| changed.iter().any(|key| observer.keys.contains(key)))
                .map(|(id, _)| *id)
                .collect();
            ids.into_iter()
                .filter_map(|id| state.observers.remove(&id))
                .map(|observer| {
                    let keys = changed
                        .iter()
                        .copied()
                        .filter(|key| observer.keys.contains(key))
                        .collect();
                    (keys, observer.on_change)
                })
                .collect()
        };

        if !fired.is_empty() {
            tracing::trace!(
                registrar = self.inner.id,
                observers = fired.len(),
                animated = animation.is_some(),
                "Delivering change batch"
            );
        }

        for (keys, on_change) in fired {
            on_change(Change { animation, keys });
        }
    }
}
