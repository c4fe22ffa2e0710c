use crate::demo::{run_demo, run_plan_score, DemoArgs, PlanScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use signal_core::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "SignalCore",
    about = "Run and demo the SignalCore regime advisor from the command line",
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
    /// Score a savings plan against the current weekly regime
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },
    /// Run an end-to-end CLI demo covering the portfolio and planning views
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum PlanCommand {
    /// Compute the goal coherence score and its breakdown
    Score(PlanScoreArgs),
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
        Command::Plan {
            command: PlanCommand::Score(args),
        } => run_plan_score(args),
        Command::Demo(args) => run_demo(args),
    }
}
