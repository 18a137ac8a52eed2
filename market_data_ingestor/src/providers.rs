//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, which serves as a unified interface
//! for fetching time-series bar data from any market data vendor (e.g., Yahoo Finance).
//!
//! Each concrete provider implementation should implement [`DataProvider`] to handle
//! vendor-specific API logic and validation.
//!
//! The trait is designed for async usage and supports dynamic dispatch (`dyn DataProvider`)
//! for runtime selection of providers.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_ingestor::models::{
//!     bar_series::BarSeries,
//!     request_params::BarsRequestParams,
//! };
//! use market_data_ingestor::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     async fn fetch_bars(
//!         &self,
//!         _params: BarsRequestParams,
//!     ) -> Result<Vec<BarSeries>, ProviderError> {
//!         Ok(vec![])
//!     }
//! }
//! ```
//!

pub mod yahoo;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{bar_series::BarSeries, request_params::BarsRequestParams};

/// Trait for fetching time-series bar data from a market data provider.
///
/// Implementations are shared across request handlers, hence `Send + Sync`.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches time-series bar data for the given request parameters.
    ///
    /// # Arguments
    ///
    /// * `params` - The parameters specifying symbols, timeframe, and date range.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<BarSeries>)` - A vector of bar series, one per symbol, bars oldest first.
    /// * `Err(ProviderError)` - If the request fails.
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// User agent contains invalid characters.
    #[snafu(display("Invalid user agent: {source}"))]
    InvalidUserAgent {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },

    /// Base URL cannot be used to build request URLs.
    #[snafu(display("Invalid base URL `{url}`"))]
    InvalidBaseUrl { url: String, backtrace: Backtrace },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned an error status or error payload.
    #[snafu(display("API error: {message}"))]
    Api {
        status: Option<u16>,
        message: String,
        backtrace: Backtrace,
    },

    /// The response body could not be decoded.
    #[snafu(display("Failed to decode provider response: {source}"))]
    Decode {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// An internal error occurred while processing data within the provider.
    #[snafu(display("Internal provider error: {message}"))]
    Internal {
        message: String,
        backtrace: Backtrace,
    },

    /// An error during provider configuration or initialization.
    #[snafu(display("Provider initialization error: {source}"))]
    Init {
        #[snafu(backtrace)]
        source: ProviderInitError,
    },
}

impl ProviderError {
    /// Whether retrying the same request could plausibly succeed.
    ///
    /// Transport failures, throttling (429) and server-side (5xx) statuses are
    /// transient; bad parameters and "no such symbol" answers are not.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Reqwest { .. } => true,
            ProviderError::Api {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::models::timeframe::TimeFrame;

    struct YahooLike;
    struct Empty;

    #[async_trait]
    impl DataProvider for YahooLike {
        async fn fetch_bars(
            &self,
            params: BarsRequestParams,
        ) -> Result<Vec<BarSeries>, ProviderError> {
            Ok(params
                .symbols
                .into_iter()
                .map(|s| BarSeries::new(s, params.timeframe.clone(), vec![]))
                .collect())
        }
    }

    #[async_trait]
    impl DataProvider for Empty {
        async fn fetch_bars(
            &self,
            _params: BarsRequestParams,
        ) -> Result<Vec<BarSeries>, ProviderError> {
            Ok(vec![])
        }
    }

    // Decides at runtime which provider to hand back.
    fn get_provider(name: &str) -> Box<dyn DataProvider> {
        if name == "yahoo" {
            Box::new(YahooLike)
        } else {
            Box::new(Empty)
        }
    }

    #[tokio::test]
    async fn test_dynamic_provider() {
        let provider = get_provider("yahoo");

        let params = BarsRequestParams {
            symbols: vec!["BBRI.JK".to_string()],
            timeframe: TimeFrame::day(),
            start: chrono::Utc::now(),
            end: chrono::Utc::now(),
            provider_specific: Default::default(),
        };

        let result = provider.fetch_bars(params).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].symbol, "BBRI.JK");
    }

    #[test]
    fn transient_classification() {
        let throttled = ApiSnafu {
            status: Some(429u16),
            message: "slow down",
        }
        .build();
        let missing = ApiSnafu {
            status: Some(404u16),
            message: "No data found",
        }
        .build();
        let invalid = ValidationSnafu { message: "bad" }.build();

        assert!(throttled.is_transient());
        assert!(!missing.is_transient());
        assert!(!invalid.is_transient());
    }
}
