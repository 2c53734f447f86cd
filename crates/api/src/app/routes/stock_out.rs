use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use sims_core::StockOutId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn list_stock_out(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.ledger.list_stock_out().await {
        Ok(rows) => {
            let body: Vec<_> = rows.iter().map(dto::stock_out_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn record_stock_out(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::StockOutRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };

    match services.ledger.record_stock_out(body.into()).await {
        Ok(entry) => (
            StatusCode::OK,
            Json(json!({
                "message": "Stock out recorded successfully",
                "id": entry.id,
            })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_stock_out(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::StockOutRequest>, JsonRejection>,
) -> axum::response::Response {
    let id: StockOutId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::service_error_to_response(e.into()),
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };

    match services.ledger.update_stock_out(id, body.into()).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "message": "Stock out updated successfully" }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_stock_out(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: StockOutId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::service_error_to_response(e.into()),
    };

    match services.ledger.delete_stock_out(id).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "Stock out deleted successfully" }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
