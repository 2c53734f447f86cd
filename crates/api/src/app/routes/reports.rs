use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Requested report day; defaults to today (UTC).
fn report_date(
    query: Result<Query<dto::DailyReportQuery>, QueryRejection>,
) -> Result<NaiveDate, axum::response::Response> {
    let Query(query) = query.map_err(errors::query_rejection_to_response)?;
    query
        .date_or(Utc::now().date_naive())
        .map_err(|e| errors::service_error_to_response(e.into()))
}

pub async fn daily_stock_out(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::DailyReportQuery>, QueryRejection>,
) -> axum::response::Response {
    let date = match report_date(query) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    match services.reports.daily_stock_out(date).await {
        Ok(rows) => {
            let body: Vec<_> = rows.iter().map(dto::daily_row_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn daily_stock_out_summary(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::DailyReportQuery>, QueryRejection>,
) -> axum::response::Response {
    let date = match report_date(query) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    match services.reports.daily_summary(date).await {
        Ok(summary) => (StatusCode::OK, Json(dto::daily_summary_to_json(&summary))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn stock_status(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.reports.stock_status().await {
        Ok(rows) => {
            let body: Vec<_> = rows.iter().map(dto::stock_status_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn stock_status_summary(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.reports.stock_status_summary().await {
        Ok(summary) => (StatusCode::OK, Json(dto::stock_status_summary_to_json(&summary))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn dashboard(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.reports.dashboard().await {
        Ok(summary) => (StatusCode::OK, Json(dto::dashboard_to_json(&summary))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
