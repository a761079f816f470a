//! Device key-value store port.
//!
//! The client library persists its entitlement cache through this seam. The
//! platform provides the real store; this crate ships in-memory and JSON-file
//! adapters.

use async_trait::async_trait;

/// Errors from the underlying store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Failed to serialize store contents: {0}")]
    Serialization(String),

    #[error("Store contents are corrupt: {0}")]
    Corrupt(String),
}

/// String key-value persistence.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrites any existing value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
