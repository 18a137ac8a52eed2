//! HTTP surface: the HTML dashboard, its JSON model and the spreadsheet download.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::{Local, NaiveDate};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    dashboard::Dashboard,
    error::DashboardError,
    export::{FILE_NAME, XLSX_MIME},
    html,
    input::{DashboardQuery, ValidatedRequest},
    render::RenderModel,
};

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Dashboard,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self { dashboard }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn validate(&self, query: &DashboardQuery) -> Result<ValidatedRequest, DashboardError> {
        Ok(query.validate(self.dashboard.app(), Self::today())?)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/dashboard", get(api_dashboard))
        .route("/download", get(download))
        .route("/health", get(health))
        .with_state(state)
}

/// Serves until the listener fails or the task is cancelled.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "dashboard listening");
    }
    axum::serve(listener, router(state)).await
}

async fn index(State(state): State<AppState>, Query(query): Query<DashboardQuery>) -> Response {
    let app = state.dashboard.app();
    let form = query.form_state(app, AppState::today());

    let result = match state.validate(&query) {
        Ok(req) => state.dashboard.render(&req).await,
        Err(e) => Err(e),
    };
    let page = result.and_then(|model| Ok(html::dashboard_page(app, &form, &model)?));

    match page {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            let status = e.status();
            if status.is_server_error() {
                error!(error = %e, "dashboard page failed");
            }
            (status, Html(html::error_page(app, &form, &e.to_string()))).into_response()
        }
    }
}

async fn api_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<RenderModel>, DashboardError> {
    let req = state.validate(&query)?;
    Ok(Json(state.dashboard.render(&req).await?))
}

async fn download(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, DashboardError> {
    let req = state.validate(&query)?;
    let bytes = state.dashboard.export(&req).await?;
    info!(ticker = %req.ticker, bytes = bytes.len(), "serving spreadsheet");

    let disposition = format!("attachment; filename=\"{FILE_NAME}\"");
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_MIME)),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_str(&disposition)
                    .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
            ),
        ],
        bytes,
    )
        .into_response())
}

async fn health() -> &'static str {
    "ok"
}
