use std::hash::{Hash, Hasher};

use crate::cell::CallbackCell;

/// An identifier for a handle that can only be obtained from the handle itself.
/// Used by consumers that track dependencies by identity.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct HandleId(usize);

impl std::fmt::Display for HandleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{:#x}", self.0) }
}

/// A stable invocation handle.
///
/// Every clone shares the same cell, and therefore the same identity. Calling the handle
/// resolves the cell's current callable at the moment of the call, never at the moment
/// the handle was obtained.
pub struct Handle<A, R> {
    cell: CallbackCell<A, R>,
}

impl<A, R> Handle<A, R> {
    pub(crate) fn new(cell: CallbackCell<A, R>) -> Self { Self { cell } }

    pub(crate) fn cell(&self) -> &CallbackCell<A, R> { &self.cell }

    /// Invoke the most recently supplied callable
    pub fn call(&self, args: A) -> R { self.cell.call(args) }

    /// Identity of this handle. Equal for every clone, distinct between events.
    pub fn id(&self) -> HandleId {
        // The cell allocation outlives every handle clone, so its address is unique while
        // any of them can be compared.
        HandleId(self.cell.ptr())
    }

    pub fn ptr_eq(&self, other: &Self) -> bool { self.id() == other.id() }
}

impl<A: 'static, R: 'static> Handle<A, R> {
    /// Turn this handle into a plain closure, e.g. to hand it to a timer or a channel listener
    pub fn into_fn(self) -> impl Fn(A) -> R + Send + Sync + 'static { move |args| self.call(args) }
}

impl<R> Handle<(), R> {
    /// Shorthand for `call(())`
    pub fn fire(&self) -> R { self.call(()) }
}

impl<A, R> Clone for Handle<A, R> {
    fn clone(&self) -> Self { Self { cell: self.cell.clone() } }
}

impl<A, R> PartialEq for Handle<A, R> {
    fn eq(&self, other: &Self) -> bool { self.ptr_eq(other) }
}

impl<A, R> Eq for Handle<A, R> {}

impl<A, R> Hash for Handle<A, R> {
    fn hash<H: Hasher>(&self, state: &mut H) { self.id().hash(state) }
}

impl<A, R> std::fmt::Debug for Handle<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.debug_tuple("Handle").field(&self.id()).finish() }
}
