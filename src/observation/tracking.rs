//! Access tracking scopes.
//!
//! [`with_tracking`] runs a closure while recording every tracked property
//! it reads, then installs one-shot observers on exactly those properties.
//! The change callback runs at most once, no matter how many registrars
//! the closure read from.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use super::registrar::{Change, ObserverId, PropertyKey, Registrar};

#[derive(Default)]
struct AccessList {
    // Keyed by registrar id so two handles to one registrar merge.
    entries: HashMap<u64, (Registrar, HashSet<PropertyKey>)>,
}

impl AccessList {
    fn insert(&mut self, registrar: &Registrar, key: PropertyKey) {
        self.entries
            .entry(registrar.id())
            .or_insert_with(|| (registrar.clone(), HashSet::new()))
            .1
            .insert(key);
    }

    fn merge(&mut self, other: AccessList) {
        for (id, (registrar, keys)) in other.entries {
            self.entries
                .entry(id)
                .or_insert_with(|| (registrar, HashSet::new()))
                .1
                .extend(keys);
        }
    }

    fn key_count(&self) -> usize {
        self.entries.values().map(|(_, keys)| keys.len()).sum()
    }
}

thread_local! {
    static SCOPES: RefCell<Vec<AccessList>> = const { RefCell::new(Vec::new()) };
}

pub(crate) fn record_access(registrar: &Registrar, key: PropertyKey) {
    SCOPES.with(|scopes| {
        if let Some(scope) = scopes.borrow_mut().last_mut() {
            scope.insert(registrar, key);
        }
    });
}

/// True while a tracking scope is active on this thread.
pub fn is_tracking() -> bool {
    SCOPES.with(|scopes| !scopes.borrow().is_empty())
}

type SharedCallback = Box<dyn FnOnce(Change) + Send + 'static>;

struct TrackingShared {
    on_change: Mutex<Option<SharedCallback>>,
    observers: Mutex<Vec<(Registrar, ObserverId)>>,
}

impl TrackingShared {
    fn fire(&self, change: Change) {
        let Some(on_change) = self.on_change.lock().take() else {
            return;
        };
        self.release();
        on_change(change);
    }

    fn release(&self) {
        let observers = std::mem::take(&mut *self.observers.lock());
        for (registrar, id) in observers {
            registrar.cancel(id);
        }
    }
}

/// The subscription installed by one [`with_tracking`] call.
///
/// Registered observers only hold a weak reference to the callback, so
/// the subscription lives exactly as long as this value. Dropping it
/// cancels, same as [`Tracking::cancel`].
pub struct Tracking {
    shared: Arc<TrackingShared>,
    keys: usize,
}

impl Tracking {
    /// Number of distinct properties read by the tracked closure.
    pub fn key_count(&self) -> usize {
        self.keys
    }

    /// True if the change callback has neither fired nor been cancelled.
    pub fn is_armed(&self) -> bool {
        self.shared.on_change.lock().is_some()
    }

    /// Remove every installed observer and discard the change callback.
    pub fn cancel(&self) {
        let callback = self.shared.on_change.lock().take();
        self.shared.release();
        drop(callback);
    }
}

impl Drop for Tracking {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Tracking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracking")
            .field("keys", &self.keys)
            .field("armed", &self.is_armed())
            .finish()
    }
}

/// Run `apply` while tracking property reads, then call `on_change` once
/// when any of those properties is next written. The returned [`Tracking`]
/// must be kept alive for that to happen.
///
/// Reads made by a nested `with_tracking` also count for the enclosing
/// scope.
pub fn with_tracking<R>(
    apply: impl FnOnce() -> R,
    on_change: impl FnOnce(Change) + Send + 'static,
) -> (R, Tracking) {
    SCOPES.with(|scopes| scopes.borrow_mut().push(AccessList::default()));
    let scope = scopeguard::guard((), |_| {
        SCOPES.with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            if let Some(finished) = scopes.pop() {
                if let Some(parent) = scopes.last_mut() {
                    parent.merge(finished);
                }
            }
        });
    });

    let result = apply();

    let accessed = SCOPES.with(|scopes| {
        scopes
            .borrow()
            .last()
            .map(|scope| AccessList {
                entries: scope
                    .entries
                    .iter()
                    .map(|(id, (registrar, keys))| (*id, (registrar.clone(), keys.clone())))
                    .collect(),
            })
            .unwrap_or_default()
    });
    drop(scope);

    let shared = Arc::new(TrackingShared {
        on_change: Mutex::new(Some(Box::new(on_change))),
        observers: Mutex::new(Vec::new()),
    });
    let keys = accessed.key_count();

    for (_, (registrar, keys)) in accessed.entries {
        let weak = Arc::downgrade(&shared);
        let id = registrar.register(keys, move |change| {
            if let Some(shared) = weak.upgrade() {
                shared.fire(change);
            }
        });
        shared.observers.lock().push((registrar, id));
    }

    (result, Tracking { shared, keys })
}
