//! Record schemas for the store's collections.
//!
//! Inbound payloads are shaped by serde (presence, JSON types, defaults) and
//! then range-checked by `validator`. Nothing here touches the store.

pub mod aggregates;
pub mod de;

use bson::Document;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

pub use aggregates::{Order, OrderItem, Product};

/// A validated record that can be written to a named collection.
pub trait Record: Serialize + Validate {
    /// Collection the record is persisted in.
    const COLLECTION: &'static str;

    /// Encodes the record as a store document.
    fn to_document(&self) -> Result<Document, bson::ser::Error> {
        bson::to_document(self)
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid payload: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("invalid field values: {0}")]
    Fields(#[from] ValidationErrors),
}

/// Shapes `payload` into `T` and checks its field constraints.
pub fn validate_record<T>(payload: serde_json::Value) -> Result<T, SchemaError>
where
    T: DeserializeOwned + Validate,
{
    let record: T = serde_json::from_value(payload)?;
    record.validate()?;
    Ok(record)
}

pub fn validate_product(payload: serde_json::Value) -> Result<Product, SchemaError> {
    validate_record(payload)
}

pub fn validate_order(payload: serde_json::Value) -> Result<Order, SchemaError> {
    validate_record(payload)
}

pub fn validate_order_item(payload: serde_json::Value) -> Result<OrderItem, SchemaError> {
    validate_record(payload)
}
