//! Route table for the dashboard

use super::handlers::{
    AppState, create_invoice, delete_invoice, health_check, list_invoices, login, update_invoice,
};
use crate::core::invoice::INVOICES_PATH;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build the dashboard routes
///
/// - GET  /health
/// - GET  /dashboard/invoices - cached listing
/// - POST /dashboard/invoices - create
/// - POST /dashboard/invoices/{id}/edit - update
/// - POST /dashboard/invoices/{id}/delete - delete
/// - POST /login
pub fn build_dashboard_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(INVOICES_PATH, get(list_invoices).post(create_invoice))
        .route(&format!("{INVOICES_PATH}/{{id}}/edit"), post(update_invoice))
        .route(&format!("{INVOICES_PATH}/{{id}}/delete"), post(delete_invoice))
        .route("/login", post(login))
        .with_state(state)
}

/// Merge custom routes into the dashboard routes and add request tracing
pub fn finish_router(routes: Router, custom_routes: Vec<Router>) -> Router {
    custom_routes
        .into_iter()
        .fold(routes, Router::merge)
        .layer(TraceLayer::new_for_http())
}
