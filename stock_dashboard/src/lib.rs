pub mod charts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod html;
pub mod indicators;
pub mod input;
pub mod render;
pub mod server;
pub mod table;

use std::sync::Arc;

use market_data_ingestor::providers::{ProviderInitError, yahoo::YahooProvider};

use crate::{config::DashboardConfig, dashboard::Dashboard};

/// A dashboard backed by the Yahoo chart API as configured in `[provider]`.
pub fn build_dashboard(config: &DashboardConfig) -> Result<Dashboard, ProviderInitError> {
    let provider = YahooProvider::new(config.yahoo_config())?;
    Ok(Dashboard::new(Arc::new(provider), config))
}
