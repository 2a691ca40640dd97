pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{Converter, RateResolver};
use crate::providers::{CoinGeckoProvider, ExchangeRateProvider, http};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    Units,
}

/// Wires the configured rate sources into a ready-to-use converter.
pub fn build_converter(config: &AppConfig) -> Result<Converter> {
    let client = http::build_client(config.http.timeout())?;

    let fiat = ExchangeRateProvider::new(config.providers.exchangerate_url(), client.clone());
    let crypto = CoinGeckoProvider::with_default_cache(config.providers.coingecko_url(), client);

    let resolver = RateResolver::new(Arc::new(fiat), Arc::new(crypto));
    Ok(Converter::new(resolver))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("rateconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Convert { amount, from, to } => {
            let converter = build_converter(&config)?;
            cli::convert::run(&converter, &amount, &from, &to).await
        }
        AppCommand::Units => {
            cli::units::run();
            Ok(())
        }
    }
}
