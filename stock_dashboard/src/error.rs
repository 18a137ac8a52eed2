use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use market_data_ingestor::providers::ProviderError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{charts::ChartError, export::ExportError, input::InputError, table::TableError};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("market data request failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("no data for {ticker} between {start} and {end}")]
    NoData {
        ticker: String,
        start: String,
        end: String,
    },

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("failed to assemble price table: {0}")]
    Table(#[from] TableError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}

impl DashboardError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NoData { .. } => StatusCode::NOT_FOUND,
            Self::Provider(ProviderError::Api {
                status: Some(404), ..
            }) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
            Self::Export(_) | Self::Table(_) | Self::Chart(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "dashboard request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use market_data_ingestor::{models::date_range::DateRangeError, providers::ApiSnafu};

    use super::*;

    #[test]
    fn status_mapping() {
        let d = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let input = DashboardError::from(InputError::InvalidRange(DateRangeError::NotIncreasing {
            start: d,
            end: d,
        }));
        assert_eq!(input.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let no_data = DashboardError::NoData {
            ticker: "BBRI.JK".into(),
            start: "2020-01-01".into(),
            end: "2020-01-02".into(),
        };
        assert_eq!(no_data.status(), StatusCode::NOT_FOUND);

        let unknown = DashboardError::from(
            ApiSnafu {
                status: Some(404u16),
                message: "No data found",
            }
            .build(),
        );
        assert_eq!(unknown.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let upstream = DashboardError::from(
            ApiSnafu {
                status: Some(500u16),
                message: "boom",
            }
            .build(),
        );
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
    }
}
