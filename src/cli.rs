use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;

pub const DEFAULT_LOG_FILE: &str = "coin-dashboard.log";

#[derive(Debug, Parser)]
#[command(name = "coin-dashboard")]
#[command(about = "Terminal dashboard for crypto market data from Binance and CoinGecko")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (JSON); defaults apply when it does not exist
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Where logs go while the dashboard owns the terminal
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Interactive dashboard (default)
    Dashboard,

    /// Print one coin-list cycle
    Coins {
        /// Top coins by market cap instead of top USDT pairs by volume
        #[arg(short, long)]
        all: bool,
    },

    /// Print the global market banner
    Global,

    /// Print a price summary for one coin
    History {
        /// Base asset, e.g. BTC
        symbol: String,

        /// Day count; unknown values fall back to a 1-day interval
        #[arg(short, long, default_value = "1")]
        days: String,
    },
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Dashboard)
    }

    pub fn is_interactive(&self) -> bool {
        self.command() == Commands::Dashboard
    }
}
