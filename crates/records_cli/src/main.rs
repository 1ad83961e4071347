// records_cli/src/main.rs
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use records_cli::commands::{self, Desk};
use records_cli::config::Config;

#[derive(Parser)]
#[command(name = "records")]
#[command(about = "Document request queue for registrar, accounting and admin staff", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the request queue, optionally filtered
    List(commands::list::ListArgs),

    /// Show which actions the current role can take on a request
    Actions(commands::actions::ActionsArgs),

    /// Open a new document request
    Create(commands::create::CreateArgs),

    /// Move a request along its lifecycle
    Apply(commands::apply::ApplyArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is for the queue itself.
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // 1. Load Config (Fails fast if invalid)
    let config = Config::from_env()?;

    // 2. Parse arguments and route to the correct command
    let cli = Cli::parse();
    let desk = Desk::open(config).await?;

    match cli.command {
        Commands::List(args) => commands::list::execute(desk, args).await?,
        Commands::Actions(args) => commands::actions::execute(desk, args).await?,
        Commands::Create(args) => commands::create::execute(desk, args).await?,
        Commands::Apply(args) => commands::apply::execute(desk, args).await?,
    }

    Ok(())
}
