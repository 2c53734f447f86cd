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

pub async fn list_parts(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.catalog.list_parts().await {
        Ok(parts) => {
            let body: Vec<_> = parts.iter().map(dto::part_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn add_part(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreatePartRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let new_part = match body.into_new_part() {
        Ok(p) => p,
        Err(e) => return errors::service_error_to_response(e.into()),
    };

    match services.catalog.add_part(new_part).await {
        Ok(part) => (
            StatusCode::OK,
            Json(json!({
                "message": "Spare part added successfully",
                "id": part.id,
            })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
