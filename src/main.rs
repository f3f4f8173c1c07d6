use anyhow::Result;
use clap::Parser;

use coin_dashboard::cli::Cli;
use coin_dashboard::utils::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The dashboard owns the terminal, so its logs go to a file.
    let log_file = cli.is_interactive().then_some(cli.log_file.as_path());
    init_logging(log_file)?;

    coin_dashboard::app::run(&cli).await?;
    Ok(())
}
