use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "stockboard")]
#[command(about = "Equity price cache and analytics backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the server
    Serve {
        /// Listen port (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Fetch a symbol once and print its statistics
    Fetch {
        /// Stock symbol, e.g. AAPL
        symbol: String,
        /// Interval: 1min, 5min, 15min, 30min, 45min, 1h, 2h, 4h, 1day, 1week, 1month
        #[arg(short, long, default_value = "1day")]
        interval: String,
    },
    /// Show current market sessions
    Sessions,
}

pub async fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            commands::serve::run(port).await;
        }
        Commands::Fetch { symbol, interval } => {
            commands::fetch::run(symbol, interval).await;
        }
        Commands::Sessions => {
            commands::sessions::run().await;
        }
    }
}
