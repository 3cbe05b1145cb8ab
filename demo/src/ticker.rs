//! The two side-by-side components.
//!
//! Both start one interval on mount and never restart it. On each tick they set
//! `count = <count seen at render> + <step seen at render>` and ask to be re-rendered.
//! The difference is which closure the interval ends up calling:
//! - [`TickerKind::Stale`] hands the interval the tick closure from the mount render, so it keeps
//!   computing `0 + <initial step>` forever
//! - [`TickerKind::Stable`] hands the interval a stable handle, which always resolves the closure
//!   from the latest render

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use stable_event::{Cleanup, Scope};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::{log::LogSink, timer::set_interval};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum TickerKind {
    Stale,
    Stable,
}

impl std::fmt::Display for TickerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TickerKind::Stale => write!(f, "stale"),
            TickerKind::Stable => write!(f, "stable"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TickerState {
    count: i64,
    ticks: u64,
    intervals_started: u32,
}

/// Point-in-time view of a ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickerSnapshot {
    pub kind: TickerKind,
    pub count: i64,
    pub step: i64,
    pub ticks: u64,
    pub renders: usize,
    pub intervals_started: u32,
}

/// One mounted ticker component
pub struct Ticker {
    kind: TickerKind,
    scope: Scope,
    state: Arc<Mutex<TickerState>>,
    step: i64,
    period: Duration,
    log: LogSink,
    rerender: UnboundedSender<TickerKind>,
}

impl Ticker {
    /// Mount the component and run its first render. Requires a tokio runtime.
    pub fn mount(kind: TickerKind, step: i64, period: Duration, log: LogSink, rerender: UnboundedSender<TickerKind>) -> Self {
        log.push(format!("[{kind}] mounted with step {step}"));
        let mut ticker =
            Self { kind, scope: Scope::new(kind.to_string()), state: Arc::new(Mutex::new(TickerState::default())), step, period, log, rerender };
        ticker.render();
        ticker
    }

    pub fn kind(&self) -> TickerKind { self.kind }

    /// Re-render with a new step prop
    pub fn set_step(&mut self, step: i64) {
        self.step = step;
        self.render();
    }

    /// One render pass with the current props and state
    pub fn render(&mut self) {
        let kind = self.kind;
        let step = self.step;
        let count = lock(&self.state).count;
        let period = self.period;
        let log = self.log.clone();
        debug!("[{kind}] render: count {count}, step {step}");

        let tick = {
            let state = self.state.clone();
            let log = self.log.clone();
            let rerender = self.rerender.clone();
            move || {
                let next = count + step;
                {
                    let mut state = lock(&state);
                    state.count = next;
                    state.ticks += 1;
                }
                log.push(format!("[{kind}] tick: {count} + {step} = {next}"));
                let _ = rerender.send(kind); // app gone
            }
        };
        let state = self.state.clone();

        self.scope.render(move |cx| match kind {
            TickerKind::Stale => {
                cx.use_effect((), move || start_interval(kind, period, &state, log, tick));
            }
            TickerKind::Stable => {
                let on_tick = cx.use_event(move |_: ()| tick());
                cx.use_effect(on_tick.clone(), move || start_interval(kind, period, &state, log, move || on_tick.fire()));
            }
        });
    }

    pub fn snapshot(&self) -> TickerSnapshot {
        let state = *lock(&self.state);
        TickerSnapshot {
            kind: self.kind,
            count: state.count,
            step: self.step,
            ticks: state.ticks,
            renders: self.scope.render_count(),
            intervals_started: state.intervals_started,
        }
    }

    /// Tear down: the interval is cleared by the effect cleanup
    pub fn unmount(self) {
        let Self { kind, scope, log, .. } = self;
        scope.dispose();
        log.push(format!("[{kind}] unmounted"));
    }
}

fn start_interval<F>(kind: TickerKind, period: Duration, state: &Arc<Mutex<TickerState>>, log: LogSink, thunk: F) -> Cleanup
where F: Fn() + Send + 'static {
    lock(state).intervals_started += 1;
    let guard = set_interval(period, thunk);
    log.push(format!("[{kind}] interval {} started, every {}ms", guard.id(), period.as_millis()));
    Cleanup::new(move || {
        let id = guard.id();
        drop(guard);
        log.push(format!("[{kind}] interval {id} cleared"));
    })
}

fn lock(state: &Mutex<TickerState>) -> MutexGuard<'_, TickerState> { state.lock().unwrap_or_else(PoisonError::into_inner) }
