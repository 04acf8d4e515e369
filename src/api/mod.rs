//! HTTP surface.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod serialize;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::store::DocumentStore;

pub use error::ApiError;
pub use handlers::{Created, HealthReport, DEFAULT_ORDER_LIMIT};
pub use serialize::serialize_record;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        Self { store, config: Arc::new(config) }
    }
}

/// Routes with tracing and a CORS policy that admits any origin, method and
/// header, credentials included.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/test", get(handlers::health))
        .route("/api/products", get(handlers::list_products).post(handlers::create_product))
        .route("/api/orders", get(handlers::list_orders).post(handlers::create_order))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::very_permissive()))
        .with_state(state)
}
