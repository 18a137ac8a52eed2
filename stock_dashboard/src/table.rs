//! Date-indexed price table shared by previews and the spreadsheet export.

use chrono::NaiveDate;
use indexmap::IndexMap;
use market_data_ingestor::models::{bar::Bar, bar_series::BarSeries};
use serde::Serialize;
use thiserror::Error;

pub const DATE: &str = "Date";
pub const OPEN: &str = "Open";
pub const HIGH: &str = "High";
pub const LOW: &str = "Low";
pub const CLOSE: &str = "Close";
pub const ADJ_CLOSE: &str = "Adj Close";
pub const VOLUME: &str = "Volume";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("column `{column}` has {got} values, table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("column `{0}` already exists")]
    DuplicateColumn(String),
}

/// Rows keyed by session date, with ordered named numeric columns.
///
/// Missing values are `None`; they export as empty cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    columns: IndexMap<String, Vec<Option<f64>>>,
}

impl PriceTable {
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            columns: IndexMap::new(),
        }
    }

    /// `Open, High, Low, Close, Adj Close, Volume` for every bar, oldest first.
    pub fn from_bars(series: &BarSeries) -> Self {
        let col = |f: fn(&Bar) -> Option<f64>| {
            series.bars.iter().map(f).collect::<Vec<_>>()
        };
        let mut columns = IndexMap::new();
        columns.insert(OPEN.to_string(), col(|b| Some(b.open)));
        columns.insert(HIGH.to_string(), col(|b| Some(b.high)));
        columns.insert(LOW.to_string(), col(|b| Some(b.low)));
        columns.insert(CLOSE.to_string(), col(|b| Some(b.close)));
        columns.insert(ADJ_CLOSE.to_string(), col(|b| b.adj_close));
        columns.insert(VOLUME.to_string(), col(|b| Some(b.volume)));

        Self {
            dates: series.dates(),
            columns,
        }
    }

    /// Appends a column; its length must match the row count.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, TableError> {
        let name = name.into();
        if values.len() != self.dates.len() {
            return Err(TableError::LengthMismatch {
                column: name,
                expected: self.dates.len(),
                got: values.len(),
            });
        }
        if name == DATE || self.columns.contains_key(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        self.columns.insert(name, values);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Row `i` as `(date, values in column order)`.
    pub fn row(&self, i: usize) -> Option<(NaiveDate, Vec<Option<f64>>)> {
        let date = *self.dates.get(i)?;
        Some((date, self.columns.values().map(|c| c[i]).collect()))
    }

    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, Vec<Option<f64>>)> + '_ {
        (0..self.len()).filter_map(|i| self.row(i))
    }

    /// The first `n` rows (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> Self {
        self.slice(0, n.min(self.len()))
    }

    /// The last `n` rows, still in chronological order.
    pub fn tail(&self, n: usize) -> Self {
        self.slice(self.len().saturating_sub(n), self.len())
    }

    fn slice(&self, from: usize, to: usize) -> Self {
        Self {
            dates: self.dates[from..to].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|(k, v)| (k.clone(), v[from..to].to_vec()))
                .collect(),
        }
    }
}
