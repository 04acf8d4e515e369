//! MongoDB-backed gateway.

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::{
    error::{Error as DriverError, ErrorKind, RETRYABLE_WRITE_ERROR},
    options::{ClientOptions, FindOptions},
    Client, Database,
};

use super::{ConnectionState, DocumentStore, StateCell, StoreError, StoreHealth, HEALTH_COLLECTION_LIMIT};

const APP_NAME: &str = "sunny-store";

#[derive(Debug)]
pub struct MongoStore {
    database: Option<Database>,
    state: StateCell,
}

impl MongoStore {
    /// Dials the database named `name` at `url` and pings it once.
    ///
    /// Never fails: without a url and name, or when the url cannot be parsed,
    /// the store stays uninitialized and every operation reports
    /// [`StoreError::Unavailable`]. A failed ping leaves the handle in place
    /// but marks the store degraded.
    pub async fn connect(url: Option<&str>, name: Option<&str>) -> Self {
        let (Some(url), Some(name)) = (url, name) else {
            tracing::warn!("DATABASE_URL or DATABASE_NAME not set; running without a database");
            return Self::disconnected();
        };

        let state = StateCell::new(ConnectionState::Connecting);
        let mut options = match ClientOptions::parse(url).await {
            Ok(options) => options,
            Err(e) => {
                tracing::error!(error = %e, "invalid DATABASE_URL");
                return Self::disconnected();
            }
        };
        options.app_name = Some(APP_NAME.to_string());
        let database = match Client::with_options(options) {
            Ok(client) => client.database(name),
            Err(e) => {
                tracing::error!(error = %e, "failed to create database client");
                return Self::disconnected();
            }
        };

        match database.run_command(doc! { "ping": 1 }, None).await {
            Ok(_) => {
                state.set(ConnectionState::Connected);
                tracing::info!(database = name, "connected to database");
            }
            Err(e) => {
                state.set(ConnectionState::Degraded);
                tracing::warn!(database = name, error = %e, "database ping failed");
            }
        }
        Self { database: Some(database), state }
    }

    pub fn disconnected() -> Self {
        Self { database: None, state: StateCell::new(ConnectionState::Uninitialized) }
    }

    fn database(&self) -> Result<&Database, StoreError> {
        self.database.as_ref().ok_or(StoreError::Unavailable)
    }

    /// Successes mark the store connected and transient failures mark it
    /// degraded; other failures leave the state alone.
    fn observe<T>(&self, result: &mongodb::error::Result<T>) {
        let next = match result {
            Ok(_) => ConnectionState::Connected,
            Err(e) if is_transient(e) => ConnectionState::Degraded,
            Err(_) => return,
        };
        let prev = self.state.set(next);
        if prev != next {
            tracing::warn!(from = %prev, to = %next, "database connection state changed");
        }
    }
}

fn is_transient(error: &DriverError) -> bool {
    error.contains_label(RETRYABLE_WRITE_ERROR) || is_transient_kind(&error.kind)
}

fn is_transient_kind(kind: &ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::Io(_)
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::DnsResolve { .. }
    )
}

fn id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert_one(&self, collection: &str, record: Document) -> Result<String, StoreError> {
        let result = self.database()?.collection::<Document>(collection).insert_one(record, None).await;
        self.observe(&result);
        let inserted = result.map_err(|e| StoreError::Write { collection: collection.to_string(), message: e.to_string() })?;
        Ok(id_to_string(inserted.inserted_id))
    }

    async fn find(&self, collection: &str, filter: Document, limit: Option<i64>) -> Result<Vec<Document>, StoreError> {
        let coll = self.database()?.collection::<Document>(collection);
        let options = FindOptions::builder().limit(limit.filter(|n| *n != 0)).build();
        let result = match coll.find(filter, options).await {
            Ok(cursor) => cursor.try_collect::<Vec<Document>>().await,
            Err(e) => Err(e),
        };
        self.observe(&result);
        result.map_err(|e| StoreError::Read { collection: collection.to_string(), message: e.to_string() })
    }

    async fn health(&self) -> StoreHealth {
        let Some(database) = self.database.as_ref() else {
            return StoreHealth::NotInitialized;
        };
        let result = database.list_collection_names(None).await;
        self.observe(&result);
        match result {
            Ok(mut names) => {
                names.truncate(HEALTH_COLLECTION_LIMIT);
                StoreHealth::Working { collections: names }
            }
            Err(e) => StoreHealth::Failing { error: e.to_string() },
        }
    }

    fn state(&self) -> ConnectionState { self.state.get() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_missing_configuration_leaves_store_uninitialized() {
        let store = MongoStore::connect(None, Some("shop")).await;
        assert_eq!(store.state(), ConnectionState::Uninitialized);
        assert_eq!(store.health().await, StoreHealth::NotInitialized);
        assert!(matches!(store.insert_one("product", doc! {"title": "Mug"}).await, Err(StoreError::Unavailable)));
        assert!(matches!(store.find("order", Document::new(), Some(100)).await, Err(StoreError::Unavailable)));
    }

    #[tokio::test]
    async fn test_invalid_url_leaves_store_uninitialized() {
        let store = MongoStore::connect(Some("not-a-mongo-url"), Some("shop")).await;
        assert_eq!(store.state(), ConnectionState::Uninitialized);
    }

    #[test]
    fn test_only_connectivity_failures_are_transient() {
        let reset = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        assert!(is_transient_kind(&ErrorKind::Io(Arc::new(reset))));
        assert!(is_transient_kind(&ErrorKind::ServerSelection { message: "timed out".into() }));
        assert!(is_transient_kind(&ErrorKind::DnsResolve { message: "no such host".into() }));
        assert!(!is_transient_kind(&ErrorKind::InvalidArgument { message: "bad filter".into() }));
        assert!(!is_transient_kind(&ErrorKind::Internal { message: "document too large".into() }));
    }

    #[test]
    fn test_id_to_string() {
        let oid = ObjectId::new();
        assert_eq!(id_to_string(Bson::ObjectId(oid)), oid.to_hex());
        assert_eq!(id_to_string(Bson::String("abc".into())), "abc");
    }
}
