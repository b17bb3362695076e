//! HTTP API for the dashboard front end
//!
//! Every request reads the sheet afresh; nothing is cached between requests.

use anyhow::{anyhow, Result};
use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::any::Any;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tracing::{error, info};

use crate::dashboard::Dashboard;
use crate::filters::{FilterState, StatusFilter};
use crate::source::{load_rows, named_rows, DataSource};
use crate::statements::{FinancialBalance, FinancialSummary};

#[derive(Clone)]
pub struct AppState {
    source: Arc<DataSource>,
}

impl AppState {
    pub fn new(source: DataSource) -> Self {
        Self {
            source: Arc::new(source),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RowsQuery {
    search: Option<String>,
    status: Option<String>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/api/health", get(api_health))
        .route("/api/sheet-data", get(api_sheet_data))
        .route("/api/dashboard", get(api_dashboard))
        .route("/api/rows", get(api_rows))
        .route("/api/financial-summary", get(api_financial_summary))
        .route("/api/financial-balance", get(api_financial_balance))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
}

pub async fn run_server(source: DataSource, host: &str, port: u16) -> Result<()> {
    let app = router(AppState::new(source));

    let bind = format!("{}:{}", host, port)
        .parse::<SocketAddr>()
        .map_err(|err| anyhow!("invalid bind address: {err}"))?;

    let listener = tokio::net::TcpListener::bind(bind).await.map_err(|error| {
        if error.kind() == ErrorKind::AddrInUse {
            anyhow!("failed to bind {bind}: address already in use. Rerun with `serve --port <free-port>`")
        } else {
            anyhow!("failed to bind {bind}: {error}")
        }
    })?;

    info!("Dashboard API listening on http://{}", bind);
    axum::serve(listener, app).await?;
    Ok(())
}

fn json_response<T: Serialize>(payload: T, status: StatusCode) -> Response {
    let mut response = Json(payload).into_response();
    *response.status_mut() = status;
    response
}

fn error_response(status: StatusCode, error: &str, details: impl std::fmt::Display) -> Response {
    json_response(json!({ "error": error, "details": details.to_string() }), status)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown error".to_string()
    };
    error!("Request handler panicked: {}", details);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", details)
}

// =============================================================================
// Handlers
// =============================================================================

async fn api_health() -> Response {
    json_response(json!({ "status": "ok" }), StatusCode::OK)
}

async fn api_sheet_data(State(state): State<AppState>) -> Response {
    let loaded = load_rows(&state.source).await;
    json_response(named_rows(loaded.rows), StatusCode::OK)
}

async fn api_dashboard(State(state): State<AppState>) -> Response {
    let dashboard = Dashboard::from_loaded(load_rows(&state.source).await);
    json_response(dashboard, StatusCode::OK)
}

async fn api_rows(Query(params): Query<RowsQuery>, State(state): State<AppState>) -> Response {
    let status = match params.status.as_deref().unwrap_or("all").parse::<StatusFilter>() {
        Ok(status) => status,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, "Invalid status filter", err),
    };
    let filter = FilterState::default()
        .with_search(params.search.unwrap_or_default())
        .with_status(status);

    let dashboard = Dashboard::from_loaded(load_rows(&state.source).await);
    json_response(filter.apply(&dashboard.rows), StatusCode::OK)
}

async fn api_financial_summary() -> Response {
    json_response(FinancialSummary::from_config(), StatusCode::OK)
}

async fn api_financial_balance() -> Response {
    json_response(FinancialBalance::from_config(), StatusCode::OK)
}
