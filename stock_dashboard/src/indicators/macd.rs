//! MACD (Moving Average Convergence Divergence) indicator.

use serde::{Deserialize, Serialize};

use super::ema::{ema, ema_gapped};

/// MACD periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdConfig {
    /// Fast EMA period (default: 12).
    pub fast_period: usize,
    /// Slow EMA period (default: 26).
    pub slow_period: usize,
    /// Signal line EMA period (default: 9).
    pub signal_period: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD indicator output, aligned with the input prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdOutput {
    /// MACD line values (fast EMA - slow EMA).
    pub macd_line: Vec<Option<f64>>,
    /// Signal line values (EMA of MACD line).
    pub signal_line: Vec<Option<f64>>,
    /// Histogram values (MACD - Signal).
    pub histogram: Vec<Option<f64>>,
}

pub fn macd(values: &[f64], config: &MacdConfig) -> MacdOutput {
    let fast = ema(values, config.fast_period);
    let slow = ema(values, config.slow_period);

    let macd_line: Vec<Option<f64>> = fast
        .iter()
        .zip(&slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal_line = ema_gapped(&macd_line, config.signal_period);
    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect();

    MacdOutput {
        macd_line,
        signal_line,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn line_starts_at_slow_period() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let out = macd(&closes, &MacdConfig::default());

        assert_eq!(out.macd_line.len(), 60);
        assert!(out.macd_line[..25].iter().all(Option::is_none));
        assert!(out.macd_line[25].is_some());
        // Signal needs 9 defined MACD values.
        assert!(out.signal_line[..33].iter().all(Option::is_none));
        assert!(out.signal_line[33].is_some());
        assert!(out.histogram[33].is_some());
    }

    #[test]
    fn rising_prices_give_positive_macd() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + 2.0 * i as f64).collect();
        let out = macd(&closes, &MacdConfig::default());
        assert!(out.macd_line[59].unwrap() > 0.0);
    }

    #[test]
    fn flat_prices_give_zero_macd() {
        let out = macd(&[50.0; 40], &MacdConfig::default());
        assert_relative_eq!(out.macd_line[39].unwrap(), 0.0);
        assert_relative_eq!(out.histogram[39].unwrap(), 0.0);
    }
}
