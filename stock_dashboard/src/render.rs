//! Serializable description of everything the dashboard page shows.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    export::DownloadLink,
    indicators::IndicatorSet,
    table::{CLOSE, PriceTable},
};

pub const RED: &str = "#d62728";
pub const GREEN: &str = "#2ca02c";
pub const BLUE: &str = "#1f77b4";
pub const ORANGE: &str = "#ff7f0e";
pub const PURPLE: &str = "#9467bd";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Area,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSpec {
    pub name: String,
    pub color: String,
    pub values: Vec<Option<f64>>,
}

impl SeriesSpec {
    pub fn new(name: impl Into<String>, color: &str, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            color: color.to_string(),
            values,
        }
    }
}

/// One chart over the shared date axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub dates: Vec<NaiveDate>,
    pub series: Vec<SeriesSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    pub title: String,
    pub description: String,
    pub ticker: String,
    pub tickers: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Sidebar confirmation lines, e.g. ``Start date: `2020-01-01` ``.
    pub sidebar: Vec<String>,
    pub head: PriceTable,
    pub tail: PriceTable,
    pub recent: PriceTable,
    pub charts: Vec<ChartSpec>,
    pub download: DownloadLink,
}

pub fn sidebar_lines(start: NaiveDate, end: NaiveDate) -> Vec<String> {
    vec![
        format!("Start date: `{start}`"),
        format!("End date: `{end}`"),
    ]
}

/// The six dashboard charts, in page order.
pub fn build_charts(dates: &[NaiveDate], closes: &[f64], ind: &IndicatorSet) -> Vec<ChartSpec> {
    let close: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();
    let chart = |title: &str, kind, series| ChartSpec {
        title: title.to_string(),
        kind,
        dates: dates.to_vec(),
        series,
    };

    vec![
        chart(
            "Closing Price vs Time Chart",
            ChartKind::Line,
            vec![SeriesSpec::new(CLOSE, BLUE, close.clone())],
        ),
        chart(
            "Closing Price vs Time Chart 100MA",
            ChartKind::Line,
            vec![
                SeriesSpec::new("MA100", BLUE, ind.ma_short.clone()),
                SeriesSpec::new(CLOSE, ORANGE, close.clone()),
            ],
        ),
        chart(
            "Closing Price vs Time Chart 100MA & 200MA",
            ChartKind::Line,
            vec![
                SeriesSpec::new("MA100", RED, ind.ma_short.clone()),
                SeriesSpec::new("MA200", GREEN, ind.ma_long.clone()),
                SeriesSpec::new(CLOSE, BLUE, close.clone()),
            ],
        ),
        chart(
            "Stock Bollinger Bands",
            ChartKind::Line,
            vec![
                SeriesSpec::new(CLOSE, BLUE, close),
                SeriesSpec::new("bb_h", ORANGE, ind.bollinger.upper.clone()),
                SeriesSpec::new("bb_l", GREEN, ind.bollinger.lower.clone()),
            ],
        ),
        chart(
            "Stock Moving Average Convergence Divergence (MACD)",
            ChartKind::Area,
            vec![SeriesSpec::new("macd", BLUE, ind.macd.macd_line.clone())],
        ),
        chart(
            "Stock Relative Strength Index (RSI)",
            ChartKind::Line,
            vec![SeriesSpec::new("rsi", PURPLE, ind.rsi.clone())],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorConfig;

    #[test]
    fn six_charts_in_page_order() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let dates: Vec<NaiveDate> = (0..30)
            .map(|i| NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Duration::days(i))
            .collect();
        let ind = IndicatorSet::compute(&closes, &IndicatorConfig::default());
        let charts = build_charts(&dates, &closes, &ind);

        let titles: Vec<&str> = charts.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Closing Price vs Time Chart",
                "Closing Price vs Time Chart 100MA",
                "Closing Price vs Time Chart 100MA & 200MA",
                "Stock Bollinger Bands",
                "Stock Moving Average Convergence Divergence (MACD)",
                "Stock Relative Strength Index (RSI)",
            ]
        );
        assert_eq!(charts[4].kind, ChartKind::Area);

        let colors: Vec<&str> = charts[2].series.iter().map(|s| s.color.as_str()).collect();
        assert_eq!(colors, vec![RED, GREEN, BLUE]);
        assert!(charts.iter().flat_map(|c| &c.series).all(|s| s.values.len() == 30));
    }

    #[test]
    fn sidebar_confirms_dates() {
        let s = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let e = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        assert_eq!(
            sidebar_lines(s, e),
            vec!["Start date: `2020-01-01`", "End date: `2020-12-31`"]
        );
    }
}
