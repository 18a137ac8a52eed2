//! Arrow IPC (Feather) output via Polars.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use polars::prelude::*;
use polars_io::SerWriter;
use polars_io::ipc::IpcWriter;
use snafu::ResultExt;
use uuid::Uuid;

use crate::io::sink::{ConversionSnafu, DataSink, IoSnafu, SinkError, WriteSnafu};
use crate::models::bar_series::BarSeries;

/// Converts a series into a `DataFrame` with one row per bar.
///
/// Dates are written as ISO `YYYY-MM-DD` session dates.
pub fn bar_series_to_dataframe(series: &BarSeries) -> Result<DataFrame, SinkError> {
    let dates: Vec<String> = series
        .dates()
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();
    let open: Vec<f64> = series.bars.iter().map(|b| b.open).collect();
    let high: Vec<f64> = series.bars.iter().map(|b| b.high).collect();
    let low: Vec<f64> = series.bars.iter().map(|b| b.low).collect();
    let close: Vec<f64> = series.bars.iter().map(|b| b.close).collect();
    let adj_close: Vec<Option<f64>> = series.bars.iter().map(|b| b.adj_close).collect();
    let volume: Vec<f64> = series.bars.iter().map(|b| b.volume).collect();

    df!(
        "Date" => dates,
        "Open" => open,
        "High" => high,
        "Low" => low,
        "Close" => close,
        "Adj Close" => adj_close,
        "Volume" => volume,
    )
    .map_err(|e| {
        ConversionSnafu {
            message: e.to_string(),
        }
        .build()
    })
}

/// Writes each series to `<dir>/<symbol>_<timestamp>_<uuid>.feather`.
pub struct FeatherSink {
    dir: PathBuf,
}

impl FeatherSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// A sink rooted at `<tmp>/market_data_ingestor`.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join("market_data_ingestor"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_one(&self, series: &BarSeries) -> Result<PathBuf, SinkError> {
        fs::create_dir_all(&self.dir).context(IoSnafu)?;

        let timestamp = Utc::now().format("%Y%m%d%H%M%S");
        let filename = format!("{}_{}_{}.feather", series.symbol, timestamp, Uuid::new_v4());
        let output_path = self.dir.join(filename);

        let mut df = bar_series_to_dataframe(series)?;
        let mut file = File::create(&output_path).context(IoSnafu)?;
        IpcWriter::new(&mut file).finish(&mut df).map_err(|e| {
            WriteSnafu {
                message: format!("{}: {e}", output_path.display()),
            }
            .build()
        })?;

        Ok(output_path)
    }
}

#[async_trait]
impl DataSink for FeatherSink {
    type Output = Vec<PathBuf>;

    async fn write(&self, data: &[BarSeries]) -> Result<Self::Output, SinkError> {
        data.iter().map(|s| self.write_one(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::models::{bar::Bar, timeframe::TimeFrame};

    fn series() -> BarSeries {
        let bars = (1..=3)
            .map(|d| Bar {
                timestamp: Utc.with_ymd_and_hms(2020, 1, d, 2, 0, 0).unwrap(),
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: 1.5,
                adj_close: None,
                volume: 10.0,
            })
            .collect();
        BarSeries::new("BBRI.JK", TimeFrame::day(), bars)
    }

    #[test]
    fn dataframe_has_one_row_per_bar() {
        let df = bar_series_to_dataframe(&series()).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 7);
    }

    #[tokio::test]
    async fn feather_files_land_in_the_sink_dir() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FeatherSink::new(dir.path());
        let paths = sink.write(&[series()]).await.unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].starts_with(dir.path()));
        assert!(paths[0].exists());
    }

    #[test]
    fn default_sink_lives_under_the_temp_dir() {
        let sink = FeatherSink::in_temp_dir();
        assert!(sink.dir().starts_with(std::env::temp_dir()));
        assert!(sink.dir().ends_with("market_data_ingestor"));
    }
}
