pub mod coingecko;
pub mod exchangerate;
pub mod http;

pub use coingecko::CoinGeckoProvider;
pub use exchangerate::ExchangeRateProvider;
