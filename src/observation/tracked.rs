use parking_lot::Mutex;

use super::registrar::{PropertyKey, Registrar};

/// A model property whose reads are tracked and whose writes notify.
///
/// Every `set` counts as a change, even when the new value equals the old
/// one.
pub struct Tracked<T> {
    key: PropertyKey,
    registrar: Registrar,
    value: Mutex<T>,
}

impl<T> Tracked<T> {
    pub fn new(registrar: &Registrar, key: PropertyKey, value: T) -> Self {
        Self {
            key,
            registrar: registrar.clone(),
            value: Mutex::new(value),
        }
    }

    pub fn key(&self) -> PropertyKey {
        self.key
    }

    /// Borrow the value, recording the read.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.registrar.access(self.key);
        f(&self.value.lock())
    }

    /// Borrow the value without recording the read.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.lock())
    }

    pub fn set(&self, value: T) {
        *self.value.lock() = value;
        self.registrar.did_set(self.key);
    }

    /// Mutate the value in place; always notifies.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.value.lock());
        self.registrar.did_set(self.key);
        result
    }
}

impl<T: Clone> Tracked<T> {
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    pub fn get_untracked(&self) -> T {
        self.with_untracked(T::clone)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Tracked<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracked")
            .field("key", &self.key)
            .field("value", &*self.value.lock())
            .finish()
    }
}
