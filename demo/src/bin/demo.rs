use anyhow::Result;
use clap::Parser;
use stable_event_demo::{
    DemoConfig,
    cli::{self, Cli, Command},
    config::log_level,
};
use tokio::io::BufReader;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let command = Cli::parse().into_command();

    // initialize tracing
    tracing_subscriber::fmt().with_max_level(log_level()).init();

    let config = DemoConfig::with_homedir_folder(".stable_event_demo")?;
    let mut out = std::io::stdout();
    match command {
        Command::Run { seconds } => cli::run(&config, seconds, &mut out).await.map(drop),
        Command::Quiz { participant } => cli::quiz(&config, &participant, BufReader::new(tokio::io::stdin()), &mut out).await,
        Command::Scores => cli::scores(&config, &mut out),
        Command::Reset => cli::reset(&config, &mut out),
    }
}
