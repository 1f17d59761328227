use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch historical bars from Alpaca
    Bars {
        /// Comma-separated list of symbols (e.g. "AAPL,MSFT")
        #[arg(long)]
        symbols: String,

        /// Timeframe amount (numeric value)
        #[arg(long, default_value = "1")]
        amount: u32,

        /// Timeframe unit: m (minute), h (hour), d (day), w (week), M (month)
        #[arg(long, default_value = "d")]
        unit: String,

        /// Start datetime in ISO8601 format (e.g. "2025-01-01T09:30:00Z")
        #[arg(long)]
        start: String,

        /// End datetime in ISO8601 format (e.g. "2025-01-30T16:00:00Z")
        #[arg(short, long)]
        end: String,

        /// Write one Feather file per symbol into this directory instead of printing JSON
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the news table for a ticker
    News {
        #[arg(long, default_value = "MSFT")]
        symbol: String,
    },
}
