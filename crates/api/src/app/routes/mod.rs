use axum::{
    routing::{get, post, put},
    Router,
};

pub mod auth;
pub mod reports;
pub mod spare_parts;
pub mod stock_in;
pub mod stock_out;
pub mod system;

/// Router for all session-protected endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/api/logout", post(auth::logout))
        .route("/api/spare-parts", get(spare_parts::list_parts).post(spare_parts::add_part))
        .route("/api/stock-in", get(stock_in::list_stock_in).post(stock_in::record_stock_in))
        .route("/api/stock-out", get(stock_out::list_stock_out).post(stock_out::record_stock_out))
        .route(
            "/api/stock-out/:id",
            put(stock_out::update_stock_out).delete(stock_out::delete_stock_out),
        )
        .route("/api/reports/daily-stock-out", get(reports::daily_stock_out))
        .route("/api/reports/daily-stock-out/summary", get(reports::daily_stock_out_summary))
        .route("/api/reports/stock-status", get(reports::stock_status))
        .route("/api/reports/stock-status/summary", get(reports::stock_status_summary))
        .route("/api/dashboard", get(reports::dashboard))
}
