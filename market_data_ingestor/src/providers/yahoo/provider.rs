use std::{num::NonZeroU32, time::Duration};

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::{Client, header};
use snafu::ResultExt;
use tracing::{debug, info};

use crate::{
    models::{
        bar_series::BarSeries, date_range::DateRange, request_params::BarsRequestParams,
        timeframe::TimeFrameUnit,
    },
    providers::{
        ApiSnafu, ClientBuildSnafu, DataProvider, DecodeSnafu, InvalidBaseUrlSnafu,
        InvalidUserAgentSnafu, ProviderError, ProviderInitError, ReqwestSnafu,
        yahoo::{
            params::{construct_params, validate_timeframe},
            response::{ChartBody, ChartEnvelope},
        },
    },
};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; stock-dashboard)";

/// Connection settings for [`YahooProvider`].
#[derive(Clone, Debug)]
pub struct YahooConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub requests_per_second: NonZeroU32,
    pub user_agent: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            requests_per_second: nonzero!(2u32),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

pub struct YahooProvider {
    client: Client,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
}

impl YahooProvider {
    /// Creates a new Yahoo provider.
    ///
    /// The chart endpoint is unauthenticated, but it rejects requests without a
    /// browser-like `User-Agent`, so one is always sent.
    pub fn new(config: YahooConfig) -> Result<Self, ProviderInitError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return InvalidBaseUrlSnafu { url: config.base_url }.fail();
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent).context(InvalidUserAgentSnafu)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url,
            limiter: RateLimiter::direct(Quota::per_second(config.requests_per_second)),
        })
    }

    async fn fetch_symbol(
        &self,
        symbol: &str,
        params: &BarsRequestParams,
        interval: &str,
    ) -> Result<BarSeries, ProviderError> {
        self.limiter.until_ready().await;

        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let query = construct_params(params, interval);
        debug!(%symbol, %url, ?query, "requesting chart");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .context(ReqwestSnafu)?;

        let status = response.status();
        let body = response.text().await.context(ReqwestSnafu)?;

        // Yahoo reports unknown symbols as 404 with a JSON error body.
        let envelope = serde_json::from_str::<ChartEnvelope>(&body);
        if !status.is_success() {
            let message = match envelope {
                Ok(ChartEnvelope {
                    chart: ChartBody {
                        error: Some(err), ..
                    },
                }) => format!("{}: {}", err.code, err.description),
                _ if body.is_empty() => "Unknown API error".to_string(),
                _ => body,
            };
            return ApiSnafu {
                status: Some(status.as_u16()),
                message,
            }
            .fail();
        }

        let chart = envelope.context(DecodeSnafu)?.chart;
        if let Some(err) = chart.error {
            return ApiSnafu {
                status: None,
                message: format!("{}: {}", err.code, err.description),
            }
            .fail();
        }

        let Some(result) = chart.result.and_then(|r| r.into_iter().next()) else {
            return ApiSnafu {
                status: None,
                message: format!("empty chart result for {symbol}"),
            }
            .fail();
        };

        debug!(
            symbol = %result.meta.symbol,
            currency = ?result.meta.currency,
            timezone = ?result.meta.exchange_timezone_name,
            "chart metadata"
        );
        let offset = result.meta.gmtoffset;
        let mut series = BarSeries::new(symbol, params.timeframe.clone(), result.into_bars())
            .with_offset_secs(offset);
        series.normalize();
        trim_to_request(&mut series, params);
        info!(%symbol, bars = series.len(), "fetched bars");
        Ok(series)
    }
}

/// Drops bars outside `[params.start, params.end)`.
///
/// Daily and longer bars are matched on their exchange session date, intraday
/// bars on their timestamp.
fn trim_to_request(series: &mut BarSeries, params: &BarsRequestParams) {
    match params.timeframe.unit {
        TimeFrameUnit::Day | TimeFrameUnit::Week | TimeFrameUnit::Month => {
            match DateRange::new(params.start.date_naive(), params.end.date_naive()) {
                Ok(range) => series.retain_within(&range),
                Err(_) => series.bars.clear(),
            }
        }
        TimeFrameUnit::Minute | TimeFrameUnit::Hour => series
            .bars
            .retain(|b| b.timestamp >= params.start && b.timestamp < params.end),
    }
}

#[async_trait]
impl DataProvider for YahooProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
        // Validate the timeframe before proceeding.
        let interval = validate_timeframe(&params.timeframe)?;

        let mut result = Vec::with_capacity(params.symbols.len());
        for symbol in &params.symbols {
            result.push(self.fetch_symbol(symbol, &params, interval).await?);
        }
        Ok(result)
    }
}
