use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mindscape", version, about = "Mindscape CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rate a day (0-6, or "best" / "worst")
    Rate(commands::rate::RateArgs),
    /// Mood calendar views and reset
    Calendar {
        #[command(subcommand)]
        action: commands::calendar::CalendarAction,
    },
    /// Todo list and goal
    Todo {
        #[command(subcommand)]
        action: commands::todo::TodoAction,
    },
    /// Display name and greeting
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Flow/break interval timer
    Flow {
        #[command(subcommand)]
        action: commands::flow::FlowAction,
    },
    /// AI coach: motivation and chat
    Coach {
        #[command(subcommand)]
        action: commands::coach::CoachAction,
    },
    /// Current weather
    Weather {
        #[command(subcommand)]
        action: commands::weather::WeatherAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Log to stderr, filtered by MINDSCAPE_LOG (default "warn").
fn init_logging() {
    let filter = EnvFilter::try_from_env("MINDSCAPE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Rate(args) => commands::rate::run(args),
        Commands::Calendar { action } => commands::calendar::run(action),
        Commands::Todo { action } => commands::todo::run(action),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Flow { action } => commands::flow::run(action),
        Commands::Coach { action } => commands::coach::run(action),
        Commands::Weather { action } => commands::weather::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
