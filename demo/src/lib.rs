//! Demo shell for `stable-event`: two tickers side by side, one that captures its tick closure
//! once and one that goes through a stable handle, plus a short quiz on the concept with
//! scores kept in a local key-value store.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod log;
pub mod quiz;
pub mod scores;
pub mod store;
pub mod ticker;
pub mod timer;

pub use app::{App, AppSnapshot};
pub use config::DemoConfig;
pub use error::{QuizError, StoreError};
pub use log::{LogEntry, LogSink};
pub use quiz::{AnswerOutcome, QUESTIONS, Question, QuizSession};
pub use scores::{LastActivity, ParticipantScore, SCORES_KEY, ScoreBoard};
pub use store::LocalStore;
pub use ticker::{Ticker, TickerKind, TickerSnapshot};
pub use timer::{TimerGuard, TimerId, set_interval, set_timeout};
