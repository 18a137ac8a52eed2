use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    models::{
        request_params::{BarsRequestParams, ProviderParams},
        timeframe::{TimeFrame, TimeFrameUnit},
    },
    providers::{ProviderError, ValidationSnafu},
};

/// Yahoo-specific parameters for a chart request.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct YahooBarsParams {
    /// Ask for the adjusted close series (defaults to `true`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_adjusted_close: Option<bool>,
    /// Include pre- and post-market bars for intraday intervals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_pre_post: Option<bool>,
}

/// Maps a universal [`TimeFrame`] onto one of Yahoo's fixed interval strings.
pub fn validate_timeframe(timeframe: &TimeFrame) -> Result<&'static str, ProviderError> {
    let interval = match (timeframe.unit, timeframe.amount) {
        (TimeFrameUnit::Minute, 1) => "1m",
        (TimeFrameUnit::Minute, 2) => "2m",
        (TimeFrameUnit::Minute, 5) => "5m",
        (TimeFrameUnit::Minute, 15) => "15m",
        (TimeFrameUnit::Minute, 30) => "30m",
        (TimeFrameUnit::Minute, 60) => "60m",
        (TimeFrameUnit::Minute, 90) => "90m",
        (TimeFrameUnit::Hour, 1) => "1h",
        (TimeFrameUnit::Day, 1) => "1d",
        (TimeFrameUnit::Day, 5) => "5d",
        (TimeFrameUnit::Week, 1) => "1wk",
        (TimeFrameUnit::Month, 1) => "1mo",
        (TimeFrameUnit::Month, 3) => "3mo",
        _ => {
            return ValidationSnafu {
                message: format!("Yahoo does not serve {timeframe} bars"),
            }
            .fail();
        }
    };
    Ok(interval)
}

/// Builds the query string for one chart request.
///
/// The period is padded by a day on each side: Yahoo stamps daily bars at the
/// exchange open, which for markets east of UTC falls on the previous UTC day.
/// The provider trims the response back to the requested range.
pub fn construct_params(
    params: &BarsRequestParams,
    interval: &str,
) -> Vec<(String, String)> {
    let specific = match &params.provider_specific {
        ProviderParams::Yahoo(p) => p.clone(),
        ProviderParams::None => YahooBarsParams::default(),
    };

    let mut query = vec![
        (
            "period1".to_string(),
            unix_seconds(params.start - Duration::days(1)),
        ),
        ("period2".to_string(), unix_seconds(params.end + Duration::days(1))),
        ("interval".to_string(), interval.to_string()),
        ("events".to_string(), "div,splits".to_string()),
        (
            "includeAdjustedClose".to_string(),
            specific.include_adjusted_close.unwrap_or(true).to_string(),
        ),
    ];
    if let Some(pre_post) = specific.include_pre_post {
        query.push(("includePrePost".to_string(), pre_post.to_string()));
    }
    query
}

fn unix_seconds(ts: DateTime<Utc>) -> String {
    ts.timestamp().to_string()
}
