use crate::pipeline::{run_score, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use early_risk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Early Risk",
    about = "Score credit-card customers for early delinquency risk",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP upload service (default command)
    Serve(ServeArgs),
    /// Score a CSV export and write the results next to a console preview
    Score(ScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
    }
}
