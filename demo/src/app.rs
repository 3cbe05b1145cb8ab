use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tracing::{debug, info};

use crate::{
    config::DemoConfig,
    log::LogSink,
    ticker::{Ticker, TickerKind, TickerSnapshot},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppSnapshot {
    pub stale: TickerSnapshot,
    pub stable: TickerSnapshot,
}

/// Drives the two tickers side by side. Owns re-render timing: ticks only request a render,
/// and the app performs it from [`App::run_for`].
pub struct App {
    log: LogSink,
    stale: Ticker,
    stable: Ticker,
    requests: UnboundedReceiver<TickerKind>,
}

impl App {
    /// Mount both tickers. Requires a tokio runtime.
    pub fn mount(config: &DemoConfig, step: i64) -> Self {
        let log = LogSink::new(config.log_capacity, config.log_display);
        let (tx, requests) = unbounded_channel();
        let stale = Ticker::mount(TickerKind::Stale, step, config.tick_period, log.clone(), tx.clone());
        let stable = Ticker::mount(TickerKind::Stable, step, config.tick_period, log.clone(), tx);
        info!("App: mounted with step {step}, period {:?}", config.tick_period);
        Self { log, stale, stable, requests }
    }

    pub fn log(&self) -> &LogSink { &self.log }

    /// Change the step prop of both tickers
    pub fn set_step(&mut self, step: i64) {
        self.log.push(format!("step changed to {step}"));
        self.stale.set_step(step);
        self.stable.set_step(step);
    }

    /// Let the timers run for `duration`, performing requested re-renders as they arrive
    pub async fn run_for(&mut self, duration: Duration) {
        let deadline = tokio::time::Instant::now() + duration;
        loop {
            tokio::select! {
                request = self.requests.recv() => match request {
                    Some(kind) => self.rerender(kind),
                    None => break,
                },
                _ = tokio::time::sleep_until(deadline) => break,
            }
        }
    }

    fn rerender(&mut self, kind: TickerKind) {
        debug!("App: re-render {kind}");
        for ticker in [&mut self.stale, &mut self.stable] {
            if ticker.kind() == kind {
                ticker.render();
            }
        }
    }

    pub fn snapshot(&self) -> AppSnapshot { AppSnapshot { stale: self.stale.snapshot(), stable: self.stable.snapshot() } }

    /// Unmount both tickers and hand back the log
    pub fn shutdown(self) -> LogSink {
        let Self { log, stale, stable, .. } = self;
        stale.unmount();
        stable.unmount();
        info!("App: shut down");
        log
    }
}
