//! Fine-grained observation for UI updates.
//!
//! # Architecture
//!
//! ```text
//! Tracked<T> ──read──→ tracking scope ──keys──→ Registrar observers
//!     │                                               │
//!     └──write──→ Registrar::mutate (batch) ──commit──┘──→ Change
//! ```
//!
//! - [`Registrar`]: per-model read/write bookkeeping with batched,
//!   one-shot change notification.
//! - [`with_tracking`]: records reads made by a closure and arms a
//!   single change callback on them.
//! - [`observe`] / [`observe_animated`]: the re-render loop for imperative
//!   screens, owned through an [`ObservationHandle`].
//! - [`WithTracking`]: the declarative counterpart, re-tracked on every
//!   draw.
//!
//! Animations are explicit: a [`Transaction`] carries an optional
//! [`Animation`] into a batch, and the resulting [`Change`] carries it out
//! to the re-render.

mod observe;
mod registrar;
mod scheduler;
mod tracked;
mod tracking;
mod view_tracking;

pub use observe::{observe, observe_animated, ObservationHandle};
pub use registrar::{
    Animation, Change, ObserverId, PropertyKey, Registrar, Transaction, DEFAULT_ANIMATION,
};
pub use scheduler::{ChannelScheduler, Job, QueueScheduler, Scheduler};
pub use tracked::Tracked;
pub use tracking::{is_tracking, with_tracking, Tracking};
pub use view_tracking::WithTracking;
