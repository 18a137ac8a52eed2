//! Technical indicators derived from the closing-price column.
//!
//! Every function returns a `Vec<Option<f64>>` aligned index-for-index with the
//! input prices; `None` marks entries still inside an indicator's warm-up.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rolling;
pub mod rsi;

use serde::{Deserialize, Serialize};

pub use bollinger::{BollingerBands, bollinger};
pub use macd::{MacdConfig, MacdOutput, macd};
pub use rolling::{rolling_std, sma};
pub use rsi::rsi;

/// Indicator parameters, the `[indicators]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ma_short: usize,
    pub ma_long: usize,
    pub bollinger_window: usize,
    pub bollinger_dev: f64,
    pub macd: MacdConfig,
    pub rsi_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_short: 100,
            ma_long: 200,
            bollinger_window: 20,
            bollinger_dev: 2.0,
            macd: MacdConfig::default(),
            rsi_window: 14,
        }
    }
}

/// All indicator series the dashboard draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub ma_short: Vec<Option<f64>>,
    pub ma_long: Vec<Option<f64>>,
    pub bollinger: BollingerBands,
    pub macd: MacdOutput,
    pub rsi: Vec<Option<f64>>,
}

impl IndicatorSet {
    pub fn compute(closes: &[f64], config: &IndicatorConfig) -> Self {
        Self {
            ma_short: sma(closes, config.ma_short),
            ma_long: sma(closes, config.ma_long),
            bollinger: bollinger(closes, config.bollinger_window, config.bollinger_dev),
            macd: macd(closes, &config.macd),
            rsi: rsi(closes, config.rsi_window),
        }
    }
}
