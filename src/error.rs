//! Error types for the BlockLens dashboard SDK

use thiserror::Error;

/// Errors that can occur when talking to the market-data API
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network request failed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Timeout waiting for response
    #[error("Request timeout")]
    Timeout,

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Body could not be decoded, or decoded to nothing useful
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl GatewayError {
    /// Creates an Http error
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Creates an InvalidResponse error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Maps a transport error, singling out timeouts
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }
}

/// Errors from the currency converter
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    /// No spot price known for the asset
    #[error("No rate available for {asset}")]
    MissingRate { asset: String },

    /// Spot price is zero or negative
    #[error("Rate for {asset} is not positive: {rate}")]
    NonPositiveRate { asset: String, rate: f64 },

    /// Amount is negative, NaN or infinite
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl ConversionError {
    /// Creates a MissingRate error
    pub fn missing_rate(asset: &str) -> Self {
        Self::MissingRate {
            asset: asset.to_string(),
        }
    }
}

/// An option string that is not a member of its fixed set
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown {kind}: {value}")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseOptionError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
