//! Storage Adapters
//!
//! Implementations of the `KeyValueStore` port used by the client-side
//! entitlement cache.
//!
//! ## Available Adapters
//!
//! - **FileKeyValueStore** - One JSON file, replaced atomically on write
//! - **InMemoryKeyValueStore** - Volatile map (testing/headless clients)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileKeyValueStore, InMemoryKeyValueStore};
//!
//! let store = FileKeyValueStore::new("./data/device.json");
//! let store = InMemoryKeyValueStore::new();
//! ```

mod file_key_value_store;
mod in_memory_key_value_store;

pub use file_key_value_store::FileKeyValueStore;
pub use in_memory_key_value_store::InMemoryKeyValueStore;
