use super::http::get_text;
use crate::core::error::SourceError;
use crate::core::rate::{FiatRateProvider, RateTable};
use crate::core::unit::FiatCode;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, instrument};

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: Option<RateTable>,
}

/// Fiat rates from the exchangerate-api "latest" endpoint. Not cached.
pub struct ExchangeRateProvider {
    base_url: String,
    client: reqwest::Client,
}

impl ExchangeRateProvider {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        ExchangeRateProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl FiatRateProvider for ExchangeRateProvider {
    #[instrument(name = "FiatRatesFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: &FiatCode) -> Result<RateTable, SourceError> {
        let url = format!("{}/v4/latest/{}", self.base_url, base.to_api());
        debug!("Requesting fiat rates from {}", url);

        let text = get_text(&self.client, &url, &[]).await?;

        let data: LatestRatesResponse = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                error!(error = ?e, response = %text, "Failed to parse rates response");
                return Err(SourceError::MalformedResponse(format!(
                    "Failed to parse JSON response for {base}: {e}"
                )));
            }
        };

        data.rates.ok_or_else(|| {
            SourceError::MalformedResponse(format!("No rates field in response for {base}"))
        })
    }
}
