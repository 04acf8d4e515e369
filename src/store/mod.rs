//! Document store gateway.
//!
//! Handlers only see [`DocumentStore`]; `main` wires in [`MongoStore`] and the
//! tests use [`MemoryStore`].

pub mod memory;
pub mod mongo;

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;
use bson::Document;
use thiserror::Error;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Collection names reported by a health check are capped at this many.
pub const HEALTH_COLLECTION_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database not available. Check DATABASE_URL and DATABASE_NAME environment variables.")]
    Unavailable,
    #[error("failed to write to `{collection}`: {message}")]
    Write { collection: String, message: String },
    #[error("failed to read from `{collection}`: {message}")]
    Read { collection: String, message: String },
    #[error("failed to encode record: {0}")]
    Encode(#[from] bson::ser::Error),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Appends `record` to `collection` and returns the assigned identifier.
    async fn insert_one(&self, collection: &str, record: Document) -> Result<String, StoreError>;

    /// Documents of `collection` matching `filter`. A `limit` of `None` or `0`
    /// means unbounded.
    async fn find(&self, collection: &str, filter: Document, limit: Option<i64>) -> Result<Vec<Document>, StoreError>;

    /// Connectivity report; never fails.
    async fn health(&self) -> StoreHealth;

    fn state(&self) -> ConnectionState;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreHealth {
    NotInitialized,
    Working { collections: Vec<String> },
    Failing { error: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Connecting,
    Connected,
    Degraded,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connecting,
            2 => Self::Connected,
            3 => Self::Degraded,
            _ => Self::Uninitialized,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "Not Connected",
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
            Self::Degraded => "Degraded",
        };
        f.write_str(s)
    }
}

/// Lock-free holder for the gateway's [`ConnectionState`].
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl StateCell {
    pub fn new(state: ConnectionState) -> Self { Self(AtomicU8::new(state as u8)) }

    pub fn get(&self) -> ConnectionState { ConnectionState::from_u8(self.0.load(Ordering::Acquire)) }

    /// Stores `state`, returning the previous one.
    pub fn set(&self, state: ConnectionState) -> ConnectionState {
        ConnectionState::from_u8(self.0.swap(state as u8, Ordering::AcqRel))
    }
}

/// Normalizes a find limit to the number of documents to return.
/// Negative limits count like their absolute value.
pub(crate) fn effective_limit(limit: Option<i64>) -> Option<usize> {
    limit
        .filter(|n| *n != 0)
        .map(|n| usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX))
}
