use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn list_stock_in(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.ledger.list_stock_in().await {
        Ok(rows) => {
            let body: Vec<_> = rows.iter().map(dto::stock_in_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn record_stock_in(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::StockInRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };

    match services.ledger.record_stock_in(body.into()).await {
        Ok(entry) => (
            StatusCode::OK,
            Json(json!({
                "message": "Stock in recorded successfully",
                "id": entry.id,
            })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
