//! An explicit owning scope for stable events.
//!
//! A [`Scope`] stands in for a mounted component: it is created explicitly, re-evaluated with
//! [`Scope::render`] as many times as its owner decides, and torn down explicitly with
//! [`Scope::dispose`] (or on drop). Hooks are matched to slots by call order, the same way
//! hook-based UI frameworks do it.
//!
//! Each render pass has two phases:
//! 1. the render phase, where the body runs synchronously and every [`RenderContext::use_event`]
//!    writes its closure into the event's cell before returning
//! 2. the commit phase, after the body returns, where effects whose dependencies changed run
//!
//! Because all cell writes happen in phase 1, anything invoked in phase 2 (or later, from a
//! timer) sees the closures supplied by the latest pass.

use std::{
    any::Any,
    hash::{Hash, Hasher},
    sync::{Arc, Mutex},
};

use tracing::{debug, trace, warn};

use crate::{event::StableEvent, handle::Handle};

/// Work to run when an effect is re-run or its scope is disposed
#[must_use]
pub struct Cleanup(Option<Box<dyn FnOnce()>>);

impl Cleanup {
    /// An effect with nothing to clean up
    pub fn none() -> Self { Self(None) }

    pub fn new(f: impl FnOnce() + 'static) -> Self { Self(Some(Box::new(f))) }

    fn run(&mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

impl Default for Cleanup {
    fn default() -> Self { Self::none() }
}

struct EffectSlot {
    /// None until the first commit, so the first pass always runs the effect
    deps: Option<u64>,
    cleanup: Cleanup,
}

enum Slot {
    Value(Box<dyn Any>),
    Effect(EffectSlot),
}

impl Slot {
    fn retire(&mut self) {
        if let Slot::Effect(effect) = self {
            effect.cleanup.run();
        }
    }
}

struct PendingEffect {
    index: usize,
    deps: u64,
    setup: Box<dyn FnOnce() -> Cleanup>,
}

/// A lifetime scope owning hook slots, analogous to one mounted component
pub struct Scope {
    name: String,
    slots: Vec<Slot>,
    renders: usize,
    disposed: bool,
}

impl Scope {
    /// Create (mount) a new scope
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug!("Scope({name}): created");
        Self { name, slots: Vec::new(), renders: 0, disposed: false }
    }

    pub fn name(&self) -> &str { &self.name }

    /// Number of completed render passes
    pub fn render_count(&self) -> usize { self.renders }

    /// Number of hook slots currently held
    pub fn hook_count(&self) -> usize { self.slots.len() }

    /// Run one reconstruction pass: the body first, then the commit phase.
    pub fn render<T>(&mut self, body: impl FnOnce(&mut RenderContext<'_>) -> T) -> T {
        let pass = self.renders + 1;
        trace!("Scope({}): render pass {pass}", self.name);

        let (output, cursor, pending) = {
            let mut cx = RenderContext { scope: &self.name, slots: &mut self.slots, cursor: 0, pending: Vec::new() };
            let output = body(&mut cx);
            (output, cx.cursor, cx.pending)
        };

        if cursor < self.slots.len() {
            warn!("Scope({}): pass {pass} used {cursor} hooks, previous pass used {}", self.name, self.slots.len());
            for slot in self.slots.iter_mut().skip(cursor) {
                slot.retire();
            }
            self.slots.truncate(cursor);
        }

        self.commit(pending);
        self.renders = pass;
        output
    }

    /// Dependencies are recorded only once setup has returned, so a panicking body or setup
    /// leaves the effect due on the next pass.
    fn commit(&mut self, pending: Vec<PendingEffect>) {
        for effect in pending {
            if let Some(Slot::Effect(slot)) = self.slots.get_mut(effect.index) {
                slot.cleanup.run();
                slot.cleanup = (effect.setup)();
                slot.deps = Some(effect.deps);
            }
        }
    }

    /// Tear the scope down (unmount): every outstanding effect cleanup runs, in slot order.
    ///
    /// Handles obtained from this scope stay callable and resolve to their last closure.
    pub fn dispose(mut self) { self.teardown() }

    fn teardown(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for slot in self.slots.iter_mut() {
            slot.retire();
        }
        self.slots.clear();
        debug!("Scope({}): disposed after {} renders", self.name, self.renders);
    }
}

impl Drop for Scope {
    fn drop(&mut self) { self.teardown() }
}

/// Hook access during one render pass of a [`Scope`]
pub struct RenderContext<'a> {
    scope: &'a str,
    slots: &'a mut Vec<Slot>,
    cursor: usize,
    pending: Vec<PendingEffect>,
}

impl RenderContext<'_> {
    /// Stable handle to the latest `f`. See [`StableEvent::construct`].
    pub fn use_event<A, R, F>(&mut self, f: F) -> Handle<A, R>
    where
        A: 'static,
        R: 'static,
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        let event = self.value_slot("use_event", || Arc::new(StableEvent::<A, R>::new()));
        event.construct(f)
    }

    /// A value that persists across passes, initialized on the first one
    pub fn use_ref<T: 'static>(&mut self, init: impl FnOnce() -> T) -> Arc<Mutex<T>> {
        self.value_slot("use_ref", || Arc::new(Mutex::new(init())))
    }

    /// Schedule `setup` for the commit phase if `deps` differ from the previous pass.
    ///
    /// Dependencies are compared by hash; handles hash by identity, so an effect that depends only
    /// on handles runs once per scope lifetime. Use `()` to run only on the first pass.
    pub fn use_effect<D, S>(&mut self, deps: D, setup: S)
    where
        D: Hash,
        S: FnOnce() -> Cleanup + 'static,
    {
        let key = deps_key(&deps);
        let index = self.advance();
        if !matches!(self.slots.get(index), Some(Slot::Effect(_))) {
            self.install(index, "use_effect", Slot::Effect(EffectSlot { deps: None, cleanup: Cleanup::none() }));
        }

        if let Some(Slot::Effect(effect)) = self.slots.get(index) {
            if effect.deps == Some(key) {
                return;
            }
            self.pending.push(PendingEffect { index, deps: key, setup: Box::new(setup) });
        }
    }

    fn advance(&mut self) -> usize {
        let index = self.cursor;
        self.cursor += 1;
        index
    }

    fn value_slot<T: Clone + 'static>(&mut self, hook: &'static str, init: impl FnOnce() -> T) -> T {
        let index = self.advance();
        if let Some(Slot::Value(existing)) = self.slots.get(index) {
            if let Some(value) = existing.downcast_ref::<T>() {
                return value.clone();
            }
        }

        let value = init();
        self.install(index, hook, Slot::Value(Box::new(value.clone())));
        value
    }

    fn install(&mut self, index: usize, hook: &'static str, slot: Slot) {
        match self.slots.get_mut(index) {
            Some(previous) => {
                warn!("Scope({}): hook {index} changed kind, resetting slot for {hook}", self.scope);
                previous.retire();
                *previous = slot;
            }
            None => self.slots.push(slot),
        }
    }
}

fn deps_key<D: Hash>(deps: &D) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    deps.hash(&mut hasher);
    hasher.finish()
}
