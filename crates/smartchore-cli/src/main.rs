use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "smartchore", version, about = "SmartChore household chore assignment")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Household member management
    Member {
        #[command(subcommand)]
        action: commands::member::MemberAction,
    },
    /// Out-of-home events
    Away {
        #[command(subcommand)]
        action: commands::away::AwayAction,
    },
    /// Chore catalog
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Assign a day's chores
    Assign(commands::assign::AssignArgs),
    /// Mark a chore instance completed
    Complete {
        /// Instance id (e.g. "dishes@2026-10-16")
        instance_id: String,
    },
    /// Past assignment runs
    History(commands::history::HistoryArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Member { action } => commands::member::run(action),
        Commands::Away { action } => commands::away::run(action),
        Commands::Catalog { action } => commands::catalog::run(action),
        Commands::Assign(args) => commands::assign::run(args),
        Commands::Complete { instance_id } => commands::assign::complete(&instance_id),
        Commands::History(args) => commands::history::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
