//! HTTP surface of the gateway.

pub mod analysis;
pub mod consultation;
pub mod health;
pub mod models;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::router())
        .merge(models::router())
        .merge(consultation::router())
        .merge(analysis::router())
}
