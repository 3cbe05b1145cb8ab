//! Command-line surface of the demo binary.
//!
//! Each command takes the config plus the streams it talks to, so the binary only wires up
//! stdin/stdout.

use std::{io::Write, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{
    app::{App, AppSnapshot},
    config::DemoConfig,
    error::QuizError,
    quiz::QuizSession,
    scores::ScoreBoard,
    store::LocalStore,
};

/// Longest accepted `run` duration
pub const MAX_RUN_SECONDS: u64 = 3600;

/// Stale vs. stable callbacks, side by side
#[derive(Parser, Debug)]
#[command(name = "stable-event-demo", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run both tickers, switching the step from 1 to 5 halfway through
    Run {
        /// How long to run, in seconds
        #[arg(default_value_t = 6, value_parser = clap::value_parser!(u64).range(1..=MAX_RUN_SECONDS))]
        seconds: u64,
    },
    /// Answer the quiz questions on stdin, one choice number per line
    Quiz {
        /// Name to record the answers under, added if new
        participant: String,
    },
    /// Print the leaderboard
    Scores,
    /// Clear every stored score
    Reset,
}

impl Cli {
    /// The chosen command, `run` with its defaults when none was given
    pub fn into_command(self) -> Command { self.command.unwrap_or(Command::Run { seconds: 6 }) }
}

/// Run the tickers for `seconds`, then print the log tail and the final counts
pub async fn run(config: &DemoConfig, seconds: u64, out: &mut impl Write) -> Result<AppSnapshot> {
    let seconds = seconds.min(MAX_RUN_SECONDS);
    let mut app = App::mount(config, 1);
    let first_half = Duration::from_secs(seconds / 2);
    app.run_for(first_half).await;
    app.set_step(5);
    app.run_for(Duration::from_secs(seconds) - first_half).await;

    let snapshot = app.snapshot();
    let log = app.shutdown();
    for entry in log.recent() {
        writeln!(out, "{entry}")?;
    }
    writeln!(out)?;
    for ticker in [snapshot.stale, snapshot.stable] {
        writeln!(out, "{:>6}: count {:>3} after {} ticks (step {})", ticker.kind.to_string(), ticker.count, ticker.ticks, ticker.step)?;
    }
    Ok(snapshot)
}

/// Ask every question, reading one choice per line from `input`. Stops quietly at end of input.
pub async fn quiz<R>(config: &DemoConfig, participant: &str, input: R, out: &mut impl Write) -> Result<()>
where R: AsyncBufRead + Unpin {
    let mut session = QuizSession::new(ScoreBoard::load(LocalStore::open(&config.scores_path)?));
    session.join(participant)?;
    let mut lines = input.lines();

    for (index, question) in session.questions().iter().enumerate() {
        writeln!(out, "\nQ{}: {}", index + 1, question.prompt)?;
        for (choice, text) in question.choices.iter().enumerate() {
            writeln!(out, "  {}) {text}", choice + 1)?;
        }

        let outcome = loop {
            let Some(line) = lines.next_line().await? else { return Ok(()) };
            let choice = match line.trim().parse::<usize>() {
                Ok(choice) if choice > 0 => choice - 1,
                _ => {
                    writeln!(out, "Enter a number between 1 and {}", question.choices.len())?;
                    continue;
                }
            };
            match session.answer(index, choice) {
                Ok(outcome) => break outcome,
                Err(QuizError::InvalidChoice { .. }) => writeln!(out, "Enter a number between 1 and {}", question.choices.len())?,
                Err(e) => return Err(e.into()),
            }
        };

        if outcome.correct {
            writeln!(out, "Correct! +{} (total {})", outcome.bonus, outcome.total_bonus)?;
        } else {
            writeln!(out, "Not quite. {}", outcome.explanation)?;
        }
    }
    Ok(())
}

pub fn scores(config: &DemoConfig, out: &mut impl Write) -> Result<()> {
    let board = ScoreBoard::load(LocalStore::open(&config.scores_path)?);
    writeln!(out, "{:<16} {:>6} {:>9} {:>8}  last activity", "participant", "bonus", "answered", "correct")?;
    for (name, score) in board.leaderboard() {
        writeln!(
            out,
            "{name:<16} {:>6} {:>9} {:>7}%  {}",
            score.total_bonus,
            score.questions_answered,
            score.accuracy(),
            score.last_activity
        )?;
    }
    Ok(())
}

pub fn reset(config: &DemoConfig, out: &mut impl Write) -> Result<()> {
    ScoreBoard::load(LocalStore::open(&config.scores_path)?).reset_all()?;
    writeln!(out, "All scores cleared.")?;
    Ok(())
}
