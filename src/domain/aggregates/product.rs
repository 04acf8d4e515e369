//! Product Aggregate

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::Record;

pub const DEFAULT_RATING: f64 = 4.5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    /// Image URL, stored as given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    /// Average rating. An explicit `null` clears the default.
    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(default = "default_rating", skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

fn default_in_stock() -> bool { true }
fn default_rating() -> Option<f64> { Some(DEFAULT_RATING) }

impl Record for Product {
    const COLLECTION: &'static str = "product";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{validate_product, SchemaError};
    use serde_json::json;

    #[test]
    fn test_defaults_applied() {
        let p = validate_product(json!({"title": "Mug", "price": 9.99})).unwrap();
        assert_eq!(p.title, "Mug");
        assert!(p.in_stock);
        assert_eq!(p.rating, Some(DEFAULT_RATING));
        assert!(p.description.is_none());
    }

    #[test]
    fn test_explicit_null_rating() {
        let p = validate_product(json!({"title": "Mug", "price": 1.0, "rating": null})).unwrap();
        assert_eq!(p.rating, None);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let p = validate_product(json!({"title": "Mug", "price": 1.0, "colour": "red"})).unwrap();
        let doc = p.to_document().unwrap();
        assert!(!doc.contains_key("colour"));
    }

    #[test]
    fn test_missing_required_fields() {
        assert!(matches!(validate_product(json!({"price": 1.0})), Err(SchemaError::Shape(_))));
        assert!(matches!(validate_product(json!({"title": "Mug"})), Err(SchemaError::Shape(_))));
        assert!(matches!(validate_product(json!({"title": "Mug", "price": "cheap"})), Err(SchemaError::Shape(_))));
    }

    #[test]
    fn test_negative_price() {
        match validate_product(json!({"title": "Mug", "price": -0.01})) {
            Err(SchemaError::Fields(errors)) => assert!(errors.field_errors().contains_key("price")),
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn test_rating_range() {
        assert!(validate_product(json!({"title": "Mug", "price": 0, "rating": 5})).is_ok());
        assert!(validate_product(json!({"title": "Mug", "price": 0, "rating": 0})).is_ok());
        assert!(matches!(validate_product(json!({"title": "Mug", "price": 0, "rating": 5.1})), Err(SchemaError::Fields(_))));
        assert!(matches!(validate_product(json!({"title": "Mug", "price": 0, "rating": -1})), Err(SchemaError::Fields(_))));
    }

    #[test]
    fn test_document_skips_absent_fields() {
        let p = validate_product(json!({"title": "Mug", "price": 9.99})).unwrap();
        let doc = p.to_document().unwrap();
        let mut keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["in_stock", "price", "rating", "title"]);
        assert_eq!(doc.get_f64("price").unwrap(), 9.99);
        assert!(doc.get_bool("in_stock").unwrap());
    }
}
