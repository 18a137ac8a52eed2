//! The request pipeline: validated inputs in, render model out.

use std::sync::Arc;

use market_data_ingestor::{
    models::{bar_series::BarSeries, request_params::BarsRequestParams},
    providers::DataProvider,
    requests::historical::{RetryPolicy, fetch_with_retry},
};
use tracing::{debug, info};

use crate::{
    config::{AppConfig, DashboardConfig},
    error::DashboardError,
    export::{self, DownloadLink},
    indicators::{IndicatorConfig, IndicatorSet},
    input::ValidatedRequest,
    render::{RenderModel, build_charts, sidebar_lines},
    table::PriceTable,
};

/// Shared, immutable handler state. Cheap to clone.
#[derive(Clone)]
pub struct Dashboard {
    provider: Arc<dyn DataProvider>,
    retry: RetryPolicy,
    app: AppConfig,
    indicators: IndicatorConfig,
}

impl Dashboard {
    pub fn new(provider: Arc<dyn DataProvider>, config: &DashboardConfig) -> Self {
        Self {
            provider,
            retry: config.retry_policy(),
            app: config.app.clone(),
            indicators: config.indicators.clone(),
        }
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// Daily bars for the request, trimmed to its range. Empty results are `NoData`.
    pub async fn fetch_series(&self, req: &ValidatedRequest) -> Result<BarSeries, DashboardError> {
        let params = BarsRequestParams::daily(&req.ticker, &req.range);
        let fetched = fetch_with_retry(self.provider.as_ref(), params, &self.retry).await?;

        let mut series = fetched
            .into_iter()
            .find(|s| s.symbol == req.ticker)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| no_data(req))?;
        series.normalize();
        series.retain_within(&req.range);
        if series.is_empty() {
            return Err(no_data(req));
        }

        debug!(ticker = %req.ticker, bars = series.len(), "fetched series");
        Ok(series)
    }

    /// The fetched table with the Bollinger band columns appended.
    pub async fn fetch_table(&self, req: &ValidatedRequest) -> Result<PriceTable, DashboardError> {
        let series = self.fetch_series(req).await?;
        let indicators = IndicatorSet::compute(&series.closes(), &self.indicators);
        with_bands(PriceTable::from_bars(&series), &indicators)
    }

    pub async fn render(&self, req: &ValidatedRequest) -> Result<RenderModel, DashboardError> {
        let series = self.fetch_series(req).await?;
        let closes = series.closes();
        let indicators = IndicatorSet::compute(&closes, &self.indicators);

        let base = PriceTable::from_bars(&series);
        let head = base.head(self.app.preview_rows);
        let tail = base.tail(self.app.preview_rows);
        let charts = build_charts(base.dates(), &closes, &indicators);

        let table = with_bands(base, &indicators)?;
        let recent = table.tail(self.app.recent_rows);
        let download = export::download_link(&table)?;

        info!(
            ticker = %req.ticker,
            start = %req.range.start(),
            end = %req.range.end(),
            rows = table.len(),
            "rendered dashboard"
        );

        Ok(RenderModel {
            title: self.app.title.clone(),
            description: self.app.description.clone(),
            ticker: req.ticker.clone(),
            tickers: self.app.selectable_tickers().map(str::to_string).collect(),
            start: req.range.start(),
            end: req.range.end(),
            sidebar: sidebar_lines(req.range.start(), req.range.end()),
            head,
            tail,
            recent,
            charts,
            download,
        })
    }

    /// Encoded `.xlsx` bytes for the request.
    pub async fn export(&self, req: &ValidatedRequest) -> Result<Vec<u8>, DashboardError> {
        let table = self.fetch_table(req).await?;
        Ok(export::to_excel(&table)?)
    }

    pub async fn download_link(&self, req: &ValidatedRequest) -> Result<DownloadLink, DashboardError> {
        let table = self.fetch_table(req).await?;
        Ok(export::download_link(&table)?)
    }
}

fn with_bands(table: PriceTable, ind: &IndicatorSet) -> Result<PriceTable, DashboardError> {
    Ok(table
        .with_column("bb_h", ind.bollinger.upper.clone())?
        .with_column("bb_l", ind.bollinger.lower.clone())?)
}

fn no_data(req: &ValidatedRequest) -> DashboardError {
    DashboardError::NoData {
        ticker: req.ticker.clone(),
        start: req.range.start().to_string(),
        end: req.range.end().to_string(),
    }
}
