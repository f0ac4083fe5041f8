use crate::commands::{run_delete, run_evaluate, run_list, run_show, EvaluateArgs, RecordArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scorecard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "scorecard",
    about = "Score weighted evaluations and manage them on the evaluations server",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the development evaluations server (default command)
    Serve(ServeArgs),
    /// Score the standard criteria, optionally saving the result
    Evaluate(EvaluateArgs),
    /// List saved evaluations
    List(RemoteArgs),
    /// Show one saved evaluation
    Show(RecordArgs),
    /// Delete a saved evaluation
    Delete(RecordArgs),
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

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct RemoteArgs {
    /// Override the evaluations server base URL (SCORECARD_API_URL)
    #[arg(long)]
    pub(crate) api_url: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args).await,
        Command::List(args) => run_list(args).await,
        Command::Show(args) => run_show(args).await,
        Command::Delete(args) => run_delete(args).await,
    }
}
