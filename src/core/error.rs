//! Error kinds surfaced by conversions and by the rate sources

use thiserror::Error;

/// Failures a caller of the converter can observe.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("Please enter an amount.")]
    MissingAmount,

    #[error("Invalid amount entered: {0}")]
    InvalidAmount(String),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Could not fetch conversion rate: {0}")]
    RateUnavailable(String),

    #[error("Unsupported conversion from {from} to {to}")]
    UnsupportedPair { from: String, to: String },

    #[error("Rate request timed out: {0}")]
    Timeout(String),
}

/// Failures inside a rate source, before they are normalised by the resolver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("Request error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No rate found for {0}")]
    MissingRate(String),
}

impl From<SourceError> for ConvertError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Timeout(msg) => ConvertError::Timeout(msg),
            other => ConvertError::RateUnavailable(other.to_string()),
        }
    }
}
