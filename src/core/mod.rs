//! Core conversion logic and abstractions

pub mod basket;
pub mod cache;
pub mod config;
pub mod convert;
pub mod error;
pub mod log;
pub mod rate;
pub mod resolver;
pub mod unit;

// Re-export main types for cleaner imports
pub use convert::{ConversionRequest, Converter};
pub use error::{ConvertError, SourceError};
pub use rate::{CryptoPriceProvider, FiatRateProvider, RateTable};
pub use resolver::RateResolver;
pub use unit::{BasketItem, CryptoId, FiatCode, Unit, UnitClass};
