//! Sidebar inputs: ticker selection and the date range.

use chrono::{NaiveDate, TimeDelta};
use market_data_ingestor::models::date_range::{DateRange, DateRangeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw query parameters. Blank values fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub ticker: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Inputs that passed validation; the only thing the pipeline accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedRequest {
    pub ticker: String,
    pub range: DateRange,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Unknown ticker `{ticker}`; choose one of: {}", allowed.join(", "))]
    UnknownTicker {
        ticker: String,
        allowed: Vec<String>,
    },

    #[error("Invalid {field} date `{value}`, expected YYYY-MM-DD")]
    BadDate {
        field: &'static str,
        value: String,
        source: chrono::ParseError,
    },

    #[error("End date must fall after start date.")]
    InvalidRange(#[source] DateRangeError),

    #[error("A lookback of {days} days reaches outside the calendar")]
    LookbackOutOfRange { days: i64 },
}

/// What the sidebar form should display, echoing the user's input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub tickers: Vec<String>,
    pub ticker: String,
    pub start: String,
    pub end: String,
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn default_start(app: &AppConfig, today: NaiveDate) -> Result<NaiveDate, InputError> {
    TimeDelta::try_days(app.lookback_days)
        .and_then(|lookback| today.checked_sub_signed(lookback))
        .ok_or(InputError::LookbackOutOfRange {
            days: app.lookback_days,
        })
}

fn parse_date(
    field: &'static str,
    raw: Option<&str>,
    default: impl FnOnce() -> Result<NaiveDate, InputError>,
) -> Result<NaiveDate, InputError> {
    match raw {
        None => default(),
        Some(value) => {
            NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| InputError::BadDate {
                field,
                value: value.to_string(),
                source,
            })
        }
    }
}

impl DashboardQuery {
    pub fn new(ticker: Option<String>, start: Option<String>, end: Option<String>) -> Self {
        Self { ticker, start, end }
    }

    /// Checks the ticker against the configured list and enforces `start < end`.
    ///
    /// An invalid range stops the pipeline here; nothing is fetched.
    pub fn validate(&self, app: &AppConfig, today: NaiveDate) -> Result<ValidatedRequest, InputError> {
        let ticker = non_blank(&self.ticker).unwrap_or(app.default_ticker());
        if !app.selectable_tickers().any(|t| t == ticker) {
            return Err(InputError::UnknownTicker {
                ticker: ticker.to_string(),
                allowed: app.selectable_tickers().map(str::to_string).collect(),
            });
        }

        let start = parse_date("start", non_blank(&self.start), || default_start(app, today))?;
        let end = parse_date("end", non_blank(&self.end), || Ok(today))?;
        let range = DateRange::new(start, end).map_err(InputError::InvalidRange)?;

        Ok(ValidatedRequest {
            ticker: ticker.to_string(),
            range,
        })
    }

    pub fn form_state(&self, app: &AppConfig, today: NaiveDate) -> FormState {
        let fmt = |d: NaiveDate| d.format(DATE_FORMAT).to_string();
        FormState {
            tickers: app.selectable_tickers().map(str::to_string).collect(),
            ticker: non_blank(&self.ticker)
                .unwrap_or(app.default_ticker())
                .to_string(),
            start: non_blank(&self.start)
                .map(str::to_string)
                .or_else(|| default_start(app, today).ok().map(fmt))
                .unwrap_or_default(),
            end: non_blank(&self.end)
                .map(str::to_string)
                .unwrap_or_else(|| fmt(today)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn query(ticker: &str, start: &str, end: &str) -> DashboardQuery {
        DashboardQuery::new(Some(ticker.into()), Some(start.into()), Some(end.into()))
    }

    #[test]
    fn defaults_cover_four_years_to_today() {
        let app = AppConfig::default();
        let today = d(2024, 6, 30);
        let req = DashboardQuery::default().validate(&app, today).unwrap();

        assert_eq!(req.ticker, "BBRI.JK");
        assert_eq!(req.range.end(), today);
        assert_eq!(req.range.start(), today - TimeDelta::days(1460));
    }

    #[test]
    fn oversized_lookback_is_an_error() {
        let app = AppConfig {
            lookback_days: 1_000_000_000,
            ..Default::default()
        };
        let today = d(2024, 6, 30);

        let err = DashboardQuery::default().validate(&app, today).unwrap_err();
        assert!(matches!(err, InputError::LookbackOutOfRange { days: 1_000_000_000 }));

        let form = DashboardQuery::default().form_state(&app, today);
        assert_eq!(form.start, "");
        assert_eq!(form.end, "2024-06-30");

        // An explicit start never consults the lookback.
        let explicit = DashboardQuery::new(None, Some("2020-01-01".into()), None);
        assert!(explicit.validate(&app, today).is_ok());
    }

    #[test]
    fn explicit_range_is_kept() {
        let app = AppConfig::default();
        let req = query("BBRI.JK", "2020-01-01", "2020-12-31")
            .validate(&app, d(2024, 1, 1))
            .unwrap();
        assert_eq!(req.range.start(), d(2020, 1, 1));
        assert_eq!(req.range.end(), d(2020, 12, 31));
    }

    #[test]
    fn reversed_range_halts() {
        let app = AppConfig::default();
        let err = query("BBRI.JK", "2020-12-31", "2020-01-01")
            .validate(&app, d(2024, 1, 1))
            .unwrap_err();
        assert!(matches!(err, InputError::InvalidRange(_)));
        assert_eq!(err.to_string(), "End date must fall after start date.");
    }

    #[test]
    fn unknown_ticker_and_bad_dates() {
        let app = AppConfig {
            tickers: vec!["BBRI.JK".into(), "".into(), " ".into()],
            ..Default::default()
        };
        let today = d(2024, 1, 1);

        let err = query("AAPL", "2020-01-01", "2020-12-31")
            .validate(&app, today)
            .unwrap_err();
        assert!(matches!(err, InputError::UnknownTicker { ref allowed, .. } if allowed == &["BBRI.JK"]));

        // Blank entries in the ticker list are never selectable.
        assert!(query("", "2020-01-01", "2020-12-31").validate(&app, today).is_ok());

        let err = query("BBRI.JK", "01/01/2020", "2020-12-31")
            .validate(&app, today)
            .unwrap_err();
        assert!(matches!(err, InputError::BadDate { field: "start", .. }));
    }

    #[test]
    fn form_echoes_raw_input() {
        let app = AppConfig::default();
        let form = query("BBRI.JK", "2020-12-31", "").form_state(&app, d(2024, 1, 1));
        assert_eq!(form.start, "2020-12-31");
        assert_eq!(form.end, "2024-01-01");
        assert_eq!(form.tickers, vec!["BBRI.JK"]);
    }
}
