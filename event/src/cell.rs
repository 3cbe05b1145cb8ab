use std::sync::{Arc, PoisonError, RwLock};

use crate::callback::{Callback, IntoCallback};

/// The single mutable slot holding the currently active callable of an event.
///
/// There is no empty state: a cell is always created with its first callable.
pub struct CallbackCell<A, R>(Arc<RwLock<Callback<A, R>>>);

impl<A, R> Clone for CallbackCell<A, R> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<A, R> CallbackCell<A, R> {
    pub fn new(callback: impl IntoCallback<A, R>) -> Self { Self(Arc::new(RwLock::new(callback.into_callback()))) }

    /// Overwrite the current callable. No comparison with the previous value is made.
    pub fn set(&self, callback: impl IntoCallback<A, R>) {
        let callback = callback.into_callback();
        // a poisoned lock still holds a complete callable, so recover it rather than fail
        let mut current = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *current = callback;
    }

    /// A clone of the current callable
    pub fn current(&self) -> Callback<A, R> { self.0.read().unwrap_or_else(PoisonError::into_inner).clone() }

    /// Invoke whatever callable is current right now.
    ///
    /// The lock is released before the callable runs, so the callable may call [`set`](Self::set) on this cell.
    pub fn call(&self, args: A) -> R {
        let callback = self.current();
        callback(args)
    }

    pub(crate) fn ptr(&self) -> usize { Arc::as_ptr(&self.0) as *const () as usize }
}
