//! A collection of time-series bars for a specific symbol and timeframe.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{bar::Bar, date_range::DateRange, timeframe::TimeFrame};

/// Represents a complete set of time-series data for a single symbol.
///
/// This struct groups a vector of [`Bar`]s with their corresponding symbol
/// and [`TimeFrame`], making the data set self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    /// The symbol this data represents (e.g., "BBRI.JK", "AAPL").
    pub symbol: String,
    /// The time interval for each bar in the series.
    pub timeframe: TimeFrame,
    /// UTC offset of the listing exchange in seconds, used to derive session dates.
    pub utc_offset_secs: i32,
    /// The collection of OHLCV bars, oldest first.
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(symbol: impl Into<String>, timeframe: TimeFrame, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            utc_offset_secs: 0,
            bars,
        }
    }

    pub fn with_offset_secs(mut self, utc_offset_secs: i32) -> Self {
        self.utc_offset_secs = utc_offset_secs;
        self
    }

    /// The exchange offset, falling back to UTC when the stored value is out of range.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_secs).unwrap_or_else(|| Utc.fix())
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Session dates of every bar, in series order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars
            .iter()
            .map(|b| b.session_date(self.utc_offset()))
            .collect()
    }

    /// Closing prices, in series order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Sorts bars by timestamp and removes duplicate timestamps (first one wins).
    pub fn normalize(&mut self) {
        self.bars.sort_by_key(|b| b.timestamp);
        self.bars.dedup_by_key(|b| b.timestamp);
    }

    /// Keeps only bars whose session date lies in `[range.start, range.end)`.
    pub fn retain_within(&mut self, range: &DateRange) {
        let offset = self.utc_offset();
        self.bars.retain(|b| range.contains(b.session_date(offset)));
    }
}
