//! Yahoo Finance chart API (`/v8/finance/chart/{symbol}`).

pub mod params;
pub mod provider;
pub mod response;

pub use params::YahooBarsParams;
pub use provider::{YahooConfig, YahooProvider};
