use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "breathloop-cli",
    version,
    about = "Breathloop guided breathing timer"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a session in real time
    Run {
        #[command(flatten)]
        session: commands::session::SessionArgs,
        /// Suppress the terminal bell
        #[arg(long)]
        quiet: bool,
    },
    /// Fast-forward a session and print what happened
    Simulate {
        /// Number of one-second ticks to deliver
        #[arg(long)]
        ticks: u64,
        #[command(flatten)]
        session: commands::session::SessionArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List built-in breath patterns
    Presets {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("BREATHLOOP_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run { session, quiet } => commands::session::run(session, quiet),
        Commands::Simulate {
            ticks,
            session,
            json,
        } => commands::session::simulate(session, ticks, json),
        Commands::Presets { json } => commands::presets::run(json),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
