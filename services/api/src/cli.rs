use crate::score::{run_score, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use receipt_points::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Receipt Points",
    about = "Score shopping receipts and serve loyalty points over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score receipt JSON files without starting the server
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["receipt-points"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_score_files_and_breakdown_flag() {
        let cli = Cli::try_parse_from([
            "receipt-points",
            "score",
            "a.json",
            "b.json",
            "--breakdown",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.files.len(), 2);
                assert!(args.breakdown);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn score_requires_at_least_one_file() {
        assert!(Cli::try_parse_from(["receipt-points", "score"]).is_err());
    }
}
