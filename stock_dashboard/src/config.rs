//! Dashboard configuration: a TOML file plus a couple of environment overrides.
//!
//! Every field has a default, so running without `--config` serves the
//! `BBRI.JK` dashboard against the public Yahoo endpoint.

use std::{num::NonZeroU32, path::Path, time::Duration};

use market_data_ingestor::{
    providers::yahoo::{YahooConfig, provider::DEFAULT_BASE_URL},
    requests::historical::RetryPolicy,
};
use serde::Deserialize;
use shared_utils::{
    config::{ConfigError, load_toml_file},
    env::env_override,
};

use crate::indicators::IndicatorConfig;

pub const BIND_ENV: &str = "DASHBOARD_BIND";
pub const PROVIDER_URL_ENV: &str = "DASHBOARD_PROVIDER_URL";
/// A century of history.
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub indicators: IndicatorConfig,
}

/// What the page shows and which inputs it accepts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub title: String,
    pub description: String,
    /// Selectable tickers; the first one is the default.
    pub tickers: Vec<String>,
    /// Default start date is this many days before today.
    pub lookback_days: i64,
    pub preview_rows: usize,
    pub recent_rows: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Stock Prediction App".to_string(),
            description: "This app retrieves the stock value of the BRI (from Yahoo Finance) \
                          and its corresponding stock closing price (year-to-date)!"
                .to_string(),
            tickers: vec!["BBRI.JK".to_string()],
            lookback_days: 1460,
            preview_rows: 5,
            recent_rows: 10,
        }
    }
}

impl AppConfig {
    /// Configured tickers with blank entries skipped.
    pub fn selectable_tickers(&self) -> impl Iterator<Item = &str> {
        self.tickers.iter().map(|t| t.trim()).filter(|t| !t.is_empty())
    }

    pub fn default_ticker(&self) -> &str {
        self.selectable_tickers().next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub requests_per_second: u32,
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub user_agent: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            requests_per_second: 2,
            max_retries: 2,
            base_delay_ms: 500,
            user_agent: None,
        }
    }
}

impl DashboardConfig {
    /// Loads the file at `path` (or defaults), applies env overrides, validates.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config: Self = match path {
            Some(p) => load_toml_file(p)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(bind) = env_override(BIND_ENV) {
            self.server.bind = bind;
        }
        if let Some(url) = env_override(PROVIDER_URL_ENV) {
            self.provider.base_url = url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::Invalid {
            key: key.to_string(),
            message: message.to_string(),
        };

        if self.app.selectable_tickers().next().is_none() {
            return Err(invalid("app.tickers", "at least one non-empty ticker is required"));
        }
        if !(1..=MAX_LOOKBACK_DAYS).contains(&self.app.lookback_days) {
            return Err(invalid(
                "app.lookback_days",
                &format!("must be between 1 and {MAX_LOOKBACK_DAYS}"),
            ));
        }
        if self.provider.requests_per_second == 0 {
            return Err(invalid("provider.requests_per_second", "must be at least 1"));
        }
        let ind = &self.indicators;
        if ind.ma_short == 0 || ind.ma_long == 0 || ind.bollinger_window == 0 || ind.rsi_window == 0
        {
            return Err(invalid("indicators", "windows must be at least 1"));
        }
        if ind.macd.fast_period == 0 || ind.macd.slow_period == 0 || ind.macd.signal_period == 0 {
            return Err(invalid("indicators.macd", "periods must be at least 1"));
        }
        Ok(())
    }

    pub fn yahoo_config(&self) -> YahooConfig {
        let defaults = YahooConfig::default();
        YahooConfig {
            base_url: self.provider.base_url.clone(),
            timeout: Duration::from_secs(self.provider.timeout_secs),
            requests_per_second: NonZeroU32::new(self.provider.requests_per_second)
                .unwrap_or(defaults.requests_per_second),
            user_agent: self
                .provider
                .user_agent
                .clone()
                .unwrap_or(defaults.user_agent),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.provider.max_retries,
            base_delay: Duration::from_millis(self.provider.base_delay_ms),
        }
    }
}
