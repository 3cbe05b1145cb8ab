mod common;
use clap::Parser;
use stable_event_demo::{
    cli::{self, Cli, Command, MAX_RUN_SECONDS},
    *,
};
use std::time::Duration;

fn config(dir: &tempfile::TempDir) -> DemoConfig { DemoConfig::with_path(dir.path().to_path_buf()).tick_period(Duration::from_millis(100)) }

fn parse(args: &[&str]) -> Result<Command, clap::Error> {
    Cli::try_parse_from(std::iter::once("stable-event-demo").chain(args.iter().copied())).map(Cli::into_command)
}

#[test]
fn test_command_line_parsing() {
    assert_eq!(parse(&[]).unwrap(), Command::Run { seconds: 6 });
    assert_eq!(parse(&["run"]).unwrap(), Command::Run { seconds: 6 });
    assert_eq!(parse(&["run", "3"]).unwrap(), Command::Run { seconds: 3 });
    assert_eq!(parse(&["quiz", "ana"]).unwrap(), Command::Quiz { participant: "ana".into() });
    assert_eq!(parse(&["scores"]).unwrap(), Command::Scores);
    assert_eq!(parse(&["reset"]).unwrap(), Command::Reset);

    assert!(parse(&["run", "1.5"]).is_err());
    assert!(parse(&["run", "0"]).is_err());
    assert!(parse(&["run", &(MAX_RUN_SECONDS + 1).to_string()]).is_err());
    assert!(parse(&["run", "18446744073709551615"]).is_err());
    assert!(parse(&["quiz"]).is_err());
    assert_eq!(parse(&["--help"]).unwrap_err().kind(), clap::error::ErrorKind::DisplayHelp);
}

#[tokio::test(start_paused = true)]
async fn test_run_prints_log_and_counts() {
    let dir = tempfile::tempdir().unwrap();
    let mut out = Vec::new();
    let snapshot = cli::run(&config(&dir), 1, &mut out).await.unwrap();
    let out = String::from_utf8(out).unwrap();

    // the step switches to 5 right away; only the stable ticker picks it up
    assert_eq!(snapshot.stale.count, 1);
    assert_eq!(snapshot.stable.step, 5);
    assert!(snapshot.stable.count > 5);
    assert_eq!(snapshot.stable.count % 5, 0);

    assert!(out.contains("step changed to 5"), "{out}");
    assert!(out.contains(" stale: count   1 after"), "{out}");
    assert!(out.contains("stable: count"), "{out}");
}

#[tokio::test(start_paused = true)]
async fn test_run_caps_duration() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir).tick_period(Duration::from_secs(3600));
    let snapshot = cli::run(&config, u64::MAX, &mut std::io::sink()).await.unwrap();
    assert!(snapshot.stable.ticks <= 1);
}

#[tokio::test]
async fn test_quiz_then_scores_then_reset() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let answers: String = QUESTIONS.iter().map(|q| format!("{}\n", q.correct + 1)).collect();
    let input = format!("maybe\n9\n{answers}");

    let mut out = Vec::new();
    cli::quiz(&config, "ana", input.as_bytes(), &mut out).await.unwrap();
    let out = String::from_utf8(out).unwrap();
    assert_eq!(out.matches("Enter a number between 1 and 4").count(), 2, "{out}");
    assert_eq!(out.matches("Correct!").count(), QUESTIONS.len(), "{out}");

    let total: i64 = QUESTIONS.iter().map(|q| q.bonus).sum();
    let mut out = Vec::new();
    cli::scores(&config, &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    let row = out.lines().find(|line| line.starts_with("ana")).unwrap();
    assert!(row.contains(&format!(" {total} ")), "{row}");
    assert!(row.contains("100%"), "{row}");

    let mut out = Vec::new();
    cli::reset(&config, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "All scores cleared.\n");

    let mut out = Vec::new();
    cli::scores(&config, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
}

#[tokio::test]
async fn test_quiz_stops_at_end_of_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let wrong = (QUESTIONS[0].correct + 1) % QUESTIONS[0].choices.len();

    let mut out = Vec::new();
    cli::quiz(&config, "bo", format!("{}\n", wrong + 1).as_bytes(), &mut out).await.unwrap();
    assert!(String::from_utf8(out).unwrap().contains("Not quite."));

    let board = ScoreBoard::load(LocalStore::open(&config.scores_path).unwrap());
    let score = board.get("bo").unwrap();
    assert_eq!((score.questions_answered, score.correct_answers, score.total_bonus), (1, 0, 0));
}
