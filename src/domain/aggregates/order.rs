//! Order Aggregate

use bson::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{de, Record};

/// Snapshot of a product at purchase time. Never persisted on its own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct OrderItem {
    pub id: String,
    pub title: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 1))]
    #[serde(deserialize_with = "de::whole_number")]
    pub qty: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Order {
    #[validate]
    pub items: Vec<OrderItem>,
    #[validate(range(min = 0.0))]
    pub total: f64,
    #[serde(
        rename = "createdAt",
        default,
        deserialize_with = "de::optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Order {
    const COLLECTION: &'static str = "order";

    // createdAt is kept as a native timestamp rather than serde's string form.
    fn to_document(&self) -> Result<Document, bson::ser::Error> {
        let mut doc = bson::to_document(self)?;
        if let Some(created_at) = self.created_at {
            doc.insert("createdAt", bson::DateTime::from_chrono(created_at));
        }
        Ok(doc)
    }
}
