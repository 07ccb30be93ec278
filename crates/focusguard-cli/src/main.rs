use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "focusguard-cli", version, about = "Focusguard CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a presence trace through a tracking session
    Simulate(commands::simulate::SimulateArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Challenge wheel
    Wheel {
        #[command(subcommand)]
        action: commands::wheel::WheelAction,
    },
    /// Classify a face-width sample against the proximity cutoff
    Proximity(commands::proximity::ProximityArgs),
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Wheel { action } => commands::wheel::run(action),
        Commands::Proximity(args) => commands::proximity::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
