use std::sync::Arc;

use crate::app::controller::AppController;
use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::MarketClient;

/// Entry point used by `main`: load configuration, build the market client, dispatch the command.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;
    let client = MarketClient::new(&config)?;
    let controller = AppController::new(config, Arc::new(client));
    controller.run(cli.command()).await
}
