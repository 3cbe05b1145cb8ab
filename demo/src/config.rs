use std::{path::PathBuf, str::FromStr, time::Duration};

use tracing::Level;

/// Settings for the demo shell
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Interval between ticker ticks
    pub tick_period: Duration,
    /// Entries retained by the log sink
    pub log_capacity: usize,
    /// Entries shown by `LogSink::recent`
    pub log_display: usize,
    /// JSON file backing the local key-value store
    pub scores_path: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
            log_capacity: 20,
            log_display: 15,
            scores_path: PathBuf::from(".stable_event_demo").join("scores.json"),
        }
    }
}

impl DemoConfig {
    /// Keep scores under `~/<folder_name>/scores.json`
    pub fn with_homedir_folder(folder_name: &str) -> anyhow::Result<Self> {
        let dir = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Failed to get home directory"))?.join(folder_name);
        Ok(Self::with_path(dir))
    }

    /// Keep scores under `<dir>/scores.json`
    pub fn with_path(dir: PathBuf) -> Self { Self { scores_path: dir.join("scores.json"), ..Self::default() } }

    pub fn tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Lines retained and shown by the log, clamped the same way [`LogSink::new`] clamps them
    ///
    /// [`LogSink::new`]: crate::log::LogSink::new
    pub fn log_capacity(mut self, capacity: usize, display: usize) -> Self {
        (self.log_capacity, self.log_display) = crate::log::bounds(capacity, display);
        self
    }
}

/// Log level from the `LOG_LEVEL` environment variable, INFO if unset or unparsable
pub fn log_level() -> Level { std::env::var("LOG_LEVEL").ok().and_then(|level| Level::from_str(&level).ok()).unwrap_or(Level::INFO) }
