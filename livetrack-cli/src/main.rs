//! LiveTrack CLI - command-line interface for the tracking service.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::serve::ServeArgs;

#[derive(Parser)]
#[command(name = "livetrack")]
#[command(version = livetrack::VERSION)]
#[command(about = "Live driver location tracking for delivery orders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tracking API
    Serve {
        /// Config file (default: ~/.livetrack/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override [server] port
        #[arg(long)]
        port: Option<u16>,

        /// Use built-in sample orders instead of the order service
        #[arg(long)]
        demo: bool,
    },

    /// Write a commented default config file
    InitConfig {
        /// Where to write (default: ~/.livetrack/config.ini)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { config, port, demo } => {
            commands::serve::run(ServeArgs { config, port, demo }).await
        }
        Commands::InitConfig { path, force } => commands::init_config::run(path, force).map(|_| ()),
    };

    if let Err(e) = result {
        e.exit();
    }
}
