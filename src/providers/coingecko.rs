use super::http::get_text;
use crate::core::cache::{Cache, Clock, SystemClock};
use crate::core::error::SourceError;
use crate::core::rate::CryptoPriceProvider;
use crate::core::unit::{CryptoId, FiatCode};
use async_trait::async_trait;
use chrono::Duration;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, instrument};

/// How long a fetched coin price is served from memory.
pub const PRICE_TTL_SECS: i64 = 60;

/// Cache key: prices are per coin *and* quote currency.
pub type PriceKey = (CryptoId, FiatCode);

pub type PriceCache = Cache<PriceKey, f64>;

pub fn new_price_cache(clock: Arc<dyn Clock>) -> PriceCache {
    Cache::with_clock(Duration::seconds(PRICE_TTL_SECS), clock)
}

/// Coin prices from the CoinGecko simple-price endpoint, cached for
/// [`PRICE_TTL_SECS`].
pub struct CoinGeckoProvider {
    base_url: String,
    client: reqwest::Client,
    cache: Arc<PriceCache>,
    in_flight: Mutex<HashMap<PriceKey, Arc<Mutex<()>>>>,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, client: reqwest::Client, cache: Arc<PriceCache>) -> Self {
        CoinGeckoProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            cache,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Provider with its own cache on the system clock.
    pub fn with_default_cache(base_url: &str, client: reqwest::Client) -> Self {
        Self::new(
            base_url,
            client,
            Arc::new(new_price_cache(Arc::new(SystemClock))),
        )
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    async fn key_lock(&self, key: &PriceKey) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().await;
        in_flight.entry(key.clone()).or_default().clone()
    }

    async fn fetch_price(&self, coin: CryptoId, fiat: &FiatCode) -> Result<f64, SourceError> {
        let url = format!("{}/api/v3/simple/price", self.base_url);
        let vs_currency = fiat.to_api();
        debug!("Requesting {} price in {} from {}", coin, vs_currency, url);

        let text = get_text(
            &self.client,
            &url,
            &[("ids", coin.api_id()), ("vs_currencies", vs_currency.as_str())],
        )
        .await?;

        let data: Value = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                error!(error = ?e, response = %text, "Failed to parse price response");
                return Err(SourceError::MalformedResponse(format!(
                    "Failed to parse JSON response for {coin}: {e}"
                )));
            }
        };

        data.get(coin.api_id())
            .and_then(|prices| prices.get(vs_currency.as_str()))
            .and_then(Value::as_f64)
            .ok_or_else(|| SourceError::MissingRate(format!("{coin} in {fiat}")))
    }
}

#[async_trait]
impl CryptoPriceProvider for CoinGeckoProvider {
    #[instrument(name = "CoinPriceFetch", skip(self), fields(coin = %coin, fiat = %fiat))]
    async fn get_price(&self, coin: CryptoId, fiat: &FiatCode) -> Result<f64, SourceError> {
        let key = (coin, fiat.clone());
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        // Concurrent misses for one key wait here and then find the cache warm
        let lock = self.key_lock(&key).await;
        let _guard = lock.lock().await;
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let price = self.fetch_price(coin, fiat).await?;
        self.cache.put(key, price).await;
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::ManualClock;
    use crate::providers::http::build_client;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PRICE_PATH: &str = "/api/v3/simple/price";

    async fn mount_price(server: &MockServer, coin: &str, fiat: &str, body: &str, hits: u64) {
        Mock::given(method("GET"))
            .and(path(PRICE_PATH))
            .and(query_param("ids", coin))
            .and(query_param("vs_currencies", fiat))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(hits)
            .mount(server)
            .await;
    }

    fn provider(server: &MockServer) -> (CoinGeckoProvider, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = Arc::new(new_price_cache(clock.clone()));
        let client = build_client(std::time::Duration::from_secs(5)).unwrap();
        (CoinGeckoProvider::new(&server.uri(), client, cache), clock)
    }

    #[tokio::test]
    async fn test_successful_price_fetch() {
        let server = MockServer::start().await;
        mount_price(&server, "bitcoin", "usd", r#"{"bitcoin":{"usd":65000.5}}"#, 1).await;
        let (provider, _) = provider(&server);

        let price = provider
            .get_price(CryptoId::Bitcoin, &FiatCode::usd())
            .await
            .unwrap();
        assert_eq!(price, 65000.5);

        let entry = provider
            .cache()
            .entry(&(CryptoId::Bitcoin, FiatCode::usd()))
            .await
            .unwrap();
        assert_eq!(entry.value, 65000.5);
    }

    #[tokio::test]
    async fn test_cache_hit_within_ttl() {
        let server = MockServer::start().await;
        mount_price(&server, "ethereum", "usd", r#"{"ethereum":{"usd":3000}}"#, 1).await;
        let (provider, clock) = provider(&server);

        provider
            .get_price(CryptoId::Ethereum, &FiatCode::usd())
            .await
            .unwrap();
        clock.advance(Duration::seconds(59));
        let price = provider
            .get_price(CryptoId::Ethereum, &FiatCode::usd())
            .await
            .unwrap();
        assert_eq!(price, 3000.0);
        // `expect(1)` is verified when the server drops
    }

    #[tokio::test]
    async fn test_refetch_after_ttl() {
        let server = MockServer::start().await;
        mount_price(&server, "solana", "usd", r#"{"solana":{"usd":150}}"#, 2).await;
        let (provider, clock) = provider(&server);

        provider
            .get_price(CryptoId::Solana, &FiatCode::usd())
            .await
            .unwrap();
        clock.advance(Duration::seconds(PRICE_TTL_SECS));
        provider
            .get_price(CryptoId::Solana, &FiatCode::usd())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cache_keyed_by_fiat() {
        let server = MockServer::start().await;
        mount_price(&server, "bitcoin", "usd", r#"{"bitcoin":{"usd":65000}}"#, 1).await;
        mount_price(&server, "bitcoin", "eur", r#"{"bitcoin":{"eur":60000}}"#, 1).await;
        let (provider, _) = provider(&server);

        let usd = provider
            .get_price(CryptoId::Bitcoin, &FiatCode::usd())
            .await
            .unwrap();
        let eur = provider
            .get_price(CryptoId::Bitcoin, &"EUR".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(usd, 65000.0);
        assert_eq!(eur, 60000.0);
        assert_eq!(provider.cache().len().await, 2);
    }

    #[tokio::test]
    async fn test_missing_key_leaves_cache_untouched() {
        let server = MockServer::start().await;
        mount_price(&server, "dogecoin", "usd", r#"{}"#, 2).await;
        let (provider, _) = provider(&server);

        for _ in 0..2 {
            let result = provider
                .get_price(CryptoId::Dogecoin, &FiatCode::usd())
                .await;
            assert_eq!(
                result.unwrap_err(),
                SourceError::MissingRate("dogecoin in USD".to_string())
            );
        }
        assert!(provider.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let server = MockServer::start().await;
        mount_price(&server, "xrp", "usd", "not json", 1).await;
        let (provider, _) = provider(&server);

        let result = provider.get_price(CryptoId::Xrp, &FiatCode::usd()).await;
        assert!(matches!(result, Err(SourceError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_rate_limited_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PRICE_PATH))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;
        let (provider, _) = provider(&server);

        let result = provider.get_price(CryptoId::Tether, &FiatCode::usd()).await;
        let err = result.unwrap_err();
        assert!(matches!(err, SourceError::Network(_)));
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_concurrent_requests_collapse() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PRICE_PATH))
            .and(query_param("ids", "cardano"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"cardano":{"usd":0.35}}"#)
                    .set_delay(std::time::Duration::from_millis(100)),
            )
            .expect(1)
            .mount(&server)
            .await;
        let (provider, _) = provider(&server);
        let usd = FiatCode::usd();

        let (a, b) = tokio::join!(
            provider.get_price(CryptoId::Cardano, &usd),
            provider.get_price(CryptoId::Cardano, &usd)
        );
        assert_eq!(a.unwrap(), 0.35);
        assert_eq!(b.unwrap(), 0.35);
    }
}
