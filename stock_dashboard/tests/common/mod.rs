#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use market_data_ingestor::{
    models::{
        bar::Bar, bar_series::BarSeries, request_params::BarsRequestParams, timeframe::TimeFrame,
    },
    providers::{ApiSnafu, DataProvider, ProviderError},
};
use stock_dashboard::{config::DashboardConfig, dashboard::Dashboard};

pub const JAKARTA_OFFSET: i32 = 7 * 3600;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Weekdays from mid-2019 to mid-2021.
pub fn trading_days() -> Vec<NaiveDate> {
    let mut day = d(2019, 6, 3);
    let mut out = Vec::new();
    while day < d(2021, 7, 1) {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            out.push(day);
        }
        day += Duration::days(1);
    }
    out
}

/// Serves the same synthetic BBRI.JK history for every request, ignoring the range.
#[derive(Default)]
pub struct StaticProvider {
    pub calls: AtomicU32,
}

impl StaticProvider {
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

fn bars() -> Vec<Bar> {
    trading_days()
        .into_iter()
        .enumerate()
        .map(|(i, day)| {
            // 09:00 in Jakarta.
            let timestamp = Utc
                .from_utc_datetime(&day.and_hms_opt(2, 0, 0).unwrap());
            let close = 4000.0 + 150.0 * (i as f64 / 9.0).sin() + i as f64;
            Bar {
                timestamp,
                open: close - 5.0,
                high: close + 20.0,
                low: close - 20.0,
                close,
                adj_close: Some(close * 0.97),
                volume: 100_000.0 + i as f64,
            }
        })
        .collect()
}

#[async_trait]
impl DataProvider for StaticProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(params
            .symbols
            .into_iter()
            .filter(|s| s == "BBRI.JK")
            .map(|s| BarSeries::new(s, TimeFrame::day(), bars()).with_offset_secs(JAKARTA_OFFSET))
            .collect())
    }
}

/// Answers every request with an upstream 503.
pub struct UpstreamDown;

#[async_trait]
impl DataProvider for UpstreamDown {
    async fn fetch_bars(&self, _params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
        Err(ApiSnafu {
            status: Some(503u16),
            message: "Service Unavailable",
        }
        .build())
    }
}

pub fn dashboard() -> (Dashboard, Arc<StaticProvider>) {
    let provider = Arc::new(StaticProvider::default());
    let dashboard = Dashboard::new(provider.clone(), &DashboardConfig::default());
    (dashboard, provider)
}
