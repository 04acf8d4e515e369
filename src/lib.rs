//! Sunny Online Store backend
//!
//! Create and list products and orders kept in a document database.
//!
//! ## Layout
//! - `domain`: record schemas and their validation
//! - `store`: the document store gateway (MongoDB, plus an in-memory store)
//! - `api`: axum routes, error mapping and output serialization
//! - `config`: environment configuration

pub mod api;
pub mod config;
pub mod domain;
pub mod store;

pub use api::{app, AppState};
pub use config::Config;
