use std::sync::{Mutex, PoisonError};

use tracing::trace;

use crate::{
    callback::IntoCallback,
    cell::CallbackCell,
    handle::{Handle, HandleId},
};

/// One logical instance of a stable callback.
///
/// The owner calls [`construct`](Self::construct) every time it re-evaluates (re-renders) with
/// whatever closure it has at hand. The first call creates the [`Handle`]; every later call
/// returns that same handle, and every call (including the first) makes the supplied closure the
/// one the handle will invoke.
///
/// ```rust
/// use stable_event::StableEvent;
///
/// let event = StableEvent::<(), &str>::new();
/// let first = event.construct(|_| "A");
/// let second = event.construct(|_| "B");
///
/// assert_eq!(first, second);
/// assert_eq!(first.call(()), "B");
/// ```
pub struct StableEvent<A, R> {
    slot: Mutex<Option<Handle<A, R>>>,
}

impl<A, R> Default for StableEvent<A, R> {
    fn default() -> Self { Self::new() }
}

impl<A, R> StableEvent<A, R> {
    /// Create a new, not yet constructed, logical instance
    pub fn new() -> Self { Self { slot: Mutex::new(None) } }

    /// Supply the latest closure and get the stable handle.
    ///
    /// The write into the cell happens before this returns. Nothing is deferred.
    pub fn construct<F>(&self, f: F) -> Handle<A, R>
    where F: Fn(A) -> R + Send + Sync + 'static {
        self.construct_with(f)
    }

    /// Like [`construct`](Self::construct), for anything convertible into a callback
    /// (a shared `Arc<dyn Fn>`, or a channel sender when `R = ()`).
    pub fn construct_with(&self, callback: impl IntoCallback<A, R>) -> Handle<A, R> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(handle) => {
                // unconditional overwrite, even when the closure is the very same one
                handle.cell().set(callback);
                handle.clone()
            }
            None => {
                let handle = Handle::new(CallbackCell::new(callback));
                trace!("StableEvent: created handle {}", handle.id());
                *slot = Some(handle.clone());
                handle
            }
        }
    }

    /// The handle, if this instance has been constructed at least once
    pub fn handle(&self) -> Option<Handle<A, R>> { self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone() }

    pub fn handle_id(&self) -> Option<HandleId> { self.handle().map(|handle| handle.id()) }

    pub fn is_constructed(&self) -> bool { self.slot.lock().unwrap_or_else(PoisonError::into_inner).is_some() }

    /// End this logical instance.
    ///
    /// Handles that were already given out stay callable and keep resolving to the last
    /// supplied closure; in-flight timers may still fire during teardown.
    pub fn dispose(self) {
        if let Some(id) = self.handle_id() {
            trace!("StableEvent: disposed handle {id}");
        }
    }
}
