//! Rate source abstractions

use crate::core::error::SourceError;
use crate::core::unit::{CryptoId, FiatCode};
use async_trait::async_trait;
use std::collections::HashMap;

/// Fiat exchange rates keyed by upper-case currency code.
pub type RateTable = HashMap<String, f64>;

#[async_trait]
pub trait FiatRateProvider: Send + Sync {
    /// Full table of rates for one unit of `base`.
    async fn fetch_rates(&self, base: &FiatCode) -> Result<RateTable, SourceError>;

    async fn get_rate(&self, base: &FiatCode, to: &FiatCode) -> Result<f64, SourceError> {
        let rates = self.fetch_rates(base).await?;
        rates
            .get(to.as_str())
            .copied()
            .ok_or_else(|| SourceError::MissingRate(format!("{base} to {to}")))
    }
}

#[async_trait]
pub trait CryptoPriceProvider: Send + Sync {
    /// Price of one `coin` denominated in `fiat`.
    async fn get_price(&self, coin: CryptoId, fiat: &FiatCode) -> Result<f64, SourceError>;
}
