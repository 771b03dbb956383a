use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "errandflow", version, about = "Plan errands into a timed itinerary")]
struct Cli {
    /// Config file to use instead of ~/.config/errandflow/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Order errands and compute arrival/departure times
    Plan(commands::plan::PlanArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Plan(args) => commands::plan::run(args, config_path).await,
        Commands::Config { action } => commands::config::run(action, config_path),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
