//! Picks the rate source(s) for a pair of units and composes their answers.

use crate::core::error::ConvertError;
use crate::core::rate::{CryptoPriceProvider, FiatRateProvider};
use crate::core::unit::{BasketItem, CryptoId, FiatCode, Unit};
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct RateResolver {
    fiat: Arc<dyn FiatRateProvider>,
    crypto: Arc<dyn CryptoPriceProvider>,
}

impl RateResolver {
    pub fn new(fiat: Arc<dyn FiatRateProvider>, crypto: Arc<dyn CryptoPriceProvider>) -> Self {
        Self { fiat, crypto }
    }

    /// Number of `to` units one `from` unit is worth.
    #[instrument(name = "Resolve", skip_all, fields(from = %from, to = %to))]
    pub async fn resolve(&self, from: &Unit, to: &Unit) -> Result<f64, ConvertError> {
        debug!(from_class = %from.class(), to_class = %to.class(), "Dispatching");
        match (from, to) {
            (Unit::Basket(_), Unit::Basket(_)) => Err(ConvertError::UnsupportedPair {
                from: from.to_string(),
                to: to.to_string(),
            }),
            // Basket targets return the reference price regardless of the source
            (_, Unit::Basket(item)) => Ok(item.usd_price()),
            (Unit::Basket(item), Unit::Fiat(fiat)) => {
                let rate = self.fiat_rate(&FiatCode::usd(), fiat).await?;
                Ok(item.usd_price() * rate)
            }
            (Unit::Basket(item), Unit::Crypto(coin)) => self.basket_to_crypto(*item, *coin).await,
            (from, to) if from == to => Ok(1.0),
            (Unit::Crypto(from), Unit::Crypto(to)) => self.crypto_to_crypto(*from, *to).await,
            (Unit::Crypto(coin), Unit::Fiat(fiat)) => {
                let price = self.crypto.get_price(*coin, fiat).await?;
                nonzero(price, || format!("{coin} has a zero {fiat} price"))
            }
            (Unit::Fiat(_), Unit::Crypto(coin)) => {
                let price = self.usd_price(*coin).await?;
                Ok(1.0 / price)
            }
            (Unit::Fiat(from), Unit::Fiat(to)) => self.fiat_rate(from, to).await,
        }
    }

    async fn fiat_rate(&self, from: &FiatCode, to: &FiatCode) -> Result<f64, ConvertError> {
        if from == to {
            return Ok(1.0);
        }
        let rate = self.fiat.get_rate(from, to).await?;
        nonzero(rate, || format!("zero rate from {from} to {to}"))
    }

    /// USD price of `coin`, rejecting zero so callers can divide by it.
    async fn usd_price(&self, coin: CryptoId) -> Result<f64, ConvertError> {
        let price = self.crypto.get_price(coin, &FiatCode::usd()).await?;
        nonzero(price, || format!("{coin} has a zero USD price"))
    }

    async fn crypto_to_crypto(&self, from: CryptoId, to: CryptoId) -> Result<f64, ConvertError> {
        let from_price = self.usd_price(from).await?;
        let to_price = self.usd_price(to).await?;
        Ok(from_price / to_price)
    }

    async fn basket_to_crypto(&self, item: BasketItem, coin: CryptoId) -> Result<f64, ConvertError> {
        let price = self.usd_price(coin).await?;
        Ok(item.usd_price() / price)
    }
}

/// A zero rate means the source has no usable quote.
fn nonzero(rate: f64, describe: impl FnOnce() -> String) -> Result<f64, ConvertError> {
    if rate == 0.0 {
        return Err(ConvertError::RateUnavailable(describe()));
    }
    Ok(rate)
}
