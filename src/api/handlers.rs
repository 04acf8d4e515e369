use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use bson::Document;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::ApiError;
use super::extract::{ValidatedJson, ValidatedQuery};
use super::serialize::serialize_record;
use super::AppState;
use crate::domain::{Order, Product, Record};
use crate::store::{ConnectionState, DocumentStore, StoreError, StoreHealth};

/// Orders are listed 100 at a time unless the caller asks otherwise;
/// products are unbounded.
pub const DEFAULT_ORDER_LIMIT: i64 = 100;

const HEALTH_ERROR_CHARS: usize = 80;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

impl HealthReport {
    fn new(url_set: bool, name_set: bool, state: ConnectionState, health: StoreHealth) -> Self {
        let set = |flag: bool| (if flag { "✅ Set" } else { "❌ Not Set" }).to_string();
        let (database, collections) = match health {
            StoreHealth::NotInitialized => ("⚠️ Available but not initialized".to_string(), vec![]),
            StoreHealth::Working { collections } => ("✅ Connected & Working".to_string(), collections),
            StoreHealth::Failing { error } => {
                let error: String = error.chars().take(HEALTH_ERROR_CHARS).collect();
                (format!("⚠️ Connected but Error: {error}"), vec![])
            }
        };
        Self {
            backend: "✅ Running".to_string(),
            database,
            database_url: set(url_set),
            database_name: set(name_set),
            connection_status: state.to_string(),
            collections,
        }
    }
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Sunny Online Store Backend is running" }))
}

pub async fn health(State(s): State<AppState>) -> Json<HealthReport> {
    let health = s.store.health().await;
    Json(HealthReport::new(
        s.config.database_url.is_some(),
        s.config.database_name.is_some(),
        s.store.state(),
        health,
    ))
}

pub async fn list_products(State(s): State<AppState>, ValidatedQuery(p): ValidatedQuery<ListParams>) -> Result<Json<Vec<Value>>, ApiError> {
    list(s.store.as_ref(), Product::COLLECTION, p.limit).await
}

pub async fn create_product(State(s): State<AppState>, ValidatedJson(product): ValidatedJson<Product>) -> Result<(StatusCode, Json<Created>), ApiError> {
    create(s.store.as_ref(), &product).await
}

pub async fn list_orders(State(s): State<AppState>, ValidatedQuery(p): ValidatedQuery<ListParams>) -> Result<Json<Vec<Value>>, ApiError> {
    list(s.store.as_ref(), Order::COLLECTION, Some(p.limit.unwrap_or(DEFAULT_ORDER_LIMIT))).await
}

pub async fn create_order(State(s): State<AppState>, ValidatedJson(order): ValidatedJson<Order>) -> Result<(StatusCode, Json<Created>), ApiError> {
    create(s.store.as_ref(), &order).await
}

async fn list(store: &dyn DocumentStore, collection: &str, limit: Option<i64>) -> Result<Json<Vec<Value>>, ApiError> {
    let docs = store.find(collection, Document::new(), limit).await?;
    Ok(Json(docs.into_iter().map(|d| serialize_record(Some(d))).collect()))
}

async fn create<R: Record>(store: &dyn DocumentStore, record: &R) -> Result<(StatusCode, Json<Created>), ApiError> {
    let doc = record.to_document().map_err(StoreError::from)?;
    let id = store.insert_one(R::COLLECTION, doc).await?;
    tracing::info!(collection = R::COLLECTION, %id, "record created");
    Ok((StatusCode::CREATED, Json(Created { id })))
}
