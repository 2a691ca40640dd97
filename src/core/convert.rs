//! Caller-facing conversion: amount validation, rate lookup and formatting.

use crate::core::error::ConvertError;
use crate::core::resolver::RateResolver;
use crate::core::unit::Unit;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: Unit,
    pub to: Unit,
}

impl ConversionRequest {
    /// Validates the amount before the units so that a bad amount never
    /// reaches the network.
    pub fn parse(amount: &str, from: &str, to: &str) -> Result<Self, ConvertError> {
        Ok(Self {
            amount: parse_amount(amount)?,
            from: from.parse()?,
            to: to.parse()?,
        })
    }
}

pub fn parse_amount(input: &str) -> Result<f64, ConvertError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ConvertError::MissingAmount);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ConvertError::InvalidAmount(trimmed.to_string())),
    }
}

pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

pub struct Converter {
    resolver: RateResolver,
}

impl Converter {
    pub fn new(resolver: RateResolver) -> Self {
        Self { resolver }
    }

    pub async fn convert_request(&self, request: &ConversionRequest) -> Result<f64, ConvertError> {
        let rate = self.resolver.resolve(&request.from, &request.to).await?;
        let value = request.amount * rate;
        info!(
            amount = request.amount,
            from = %request.from,
            to = %request.to,
            rate,
            value,
            "Converted"
        );
        Ok(value)
    }

    pub async fn convert(&self, amount: &str, from: &str, to: &str) -> Result<f64, ConvertError> {
        let request = ConversionRequest::parse(amount, from, to)?;
        debug!(?request, "Parsed conversion request");
        self.convert_request(&request).await
    }

    /// `Result: <value> <to>` with the value rounded to two decimals.
    pub async fn convert_display(
        &self,
        amount: &str,
        from: &str,
        to: &str,
    ) -> Result<String, ConvertError> {
        let value = self.convert(amount, from, to).await?;
        Ok(format!("Result: {} {}", format_amount(value), to.trim()))
    }

    /// Result line for display, or the error message when the conversion fails.
    pub async fn convert_message(&self, amount: &str, from: &str, to: &str) -> String {
        self.convert_display(amount, from, to)
            .await
            .unwrap_or_else(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::tests::{StaticCrypto, StaticFiat};
    use crate::core::unit::CryptoId;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    fn converter(fiat: Arc<StaticFiat>, crypto: Arc<StaticCrypto>) -> Converter {
        Converter::new(RateResolver::new(fiat, crypto))
    }

    fn usd_table() -> Arc<StaticFiat> {
        Arc::new(StaticFiat::with_table(
            "USD",
            &[("USD", 1.0), ("EUR", 0.92), ("INR", 83.1)],
        ))
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 12.5 ").unwrap(), 12.5);
        assert_eq!(parse_amount("0").unwrap(), 0.0);
        assert_eq!(parse_amount(""), Err(ConvertError::MissingAmount));
        assert_eq!(parse_amount("   "), Err(ConvertError::MissingAmount));
        for bad in ["abc", "-1", "NaN", "inf", "1,5"] {
            assert!(
                matches!(parse_amount(bad), Err(ConvertError::InvalidAmount(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(5.0), "5.00");
        assert_eq!(format_amount(1.005_1), "1.01");
        assert_eq!(format_amount(1234.5678), "1234.57");
    }

    #[tokio::test]
    async fn test_fiat_conversion_multiplies_rate() {
        let c = converter(usd_table(), Arc::new(StaticCrypto::default()));
        let value = c.convert("10", "USD", "INR").await.unwrap();
        assert_eq!(format_amount(value), format_amount(10.0 * 83.1));
    }

    #[tokio::test]
    async fn test_invalid_amount_makes_no_call() {
        let fiat = usd_table();
        let crypto = Arc::new(StaticCrypto::default());
        let c = converter(fiat.clone(), crypto.clone());

        let err = c.convert("abc", "USD", "EUR").await.unwrap_err();
        assert!(matches!(err, ConvertError::InvalidAmount(_)));
        let err = c.convert("", "USD", "EUR").await.unwrap_err();
        assert_eq!(err, ConvertError::MissingAmount);

        assert_eq!(fiat.calls.load(Ordering::SeqCst), 0);
        assert_eq!(crypto.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_target_code() {
        let c = converter(usd_table(), Arc::new(StaticCrypto::default()));
        let err = c.convert("10", "USD", "ZZZ").await.unwrap_err();
        assert!(matches!(err, ConvertError::RateUnavailable(_)));
    }

    #[tokio::test]
    async fn test_basket_amounts() {
        let c = converter(usd_table(), Arc::new(StaticCrypto::default()));
        let value = c.convert("1", "BigMac", "USD").await.unwrap();
        assert_eq!(format_amount(value), "5.65");
        let value = c.convert("2", "Fries", "USD").await.unwrap();
        assert_eq!(format_amount(value), "5.00");
        let value = c.convert("3", "drink", "EUR").await.unwrap();
        assert_eq!(format_amount(value), format_amount(3.0 * 1.80 * 0.92));

        let err = c.convert("1", "BigMac", "Fries").await.unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedPair { .. }));
    }

    #[tokio::test]
    async fn test_crypto_pair() {
        let crypto = Arc::new(StaticCrypto::with_prices(&[
            (CryptoId::Ethereum, "USD", 3000.0),
            (CryptoId::Solana, "USD", 150.0),
        ]));
        let c = converter(usd_table(), crypto.clone());
        let value = c.convert("2", "ethereum", "solana").await.unwrap();
        assert_eq!(value, 2.0 * (3000.0 / 150.0));
        assert_eq!(crypto.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_convert_display() {
        let c = converter(usd_table(), Arc::new(StaticCrypto::default()));
        assert_eq!(
            c.convert_display("10", "usd", " EUR ").await.unwrap(),
            "Result: 9.20 EUR"
        );
        let err = c.convert_display("1", "Drink", "BigMac").await.unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedPair { .. }));
    }

    #[tokio::test]
    async fn test_convert_message() {
        let c = converter(usd_table(), Arc::new(StaticCrypto::default()));
        assert_eq!(
            c.convert_message("2", "Fries", "USD").await,
            "Result: 5.00 USD"
        );
        assert_eq!(
            c.convert_message("", "USD", "EUR").await,
            "Please enter an amount."
        );
        assert_eq!(
            c.convert_message("1", "USD", "dollars").await,
            "Unknown unit: dollars"
        );
    }
}
