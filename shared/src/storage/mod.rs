//! Storage traits and implementations.
//!
//! This module provides the key-value abstraction the registry persists to.
//! The `KeyValueStore` trait defines the interface, allowing different
//! implementations (in-memory, file-backed, etc.).

pub mod kv_store;

pub use kv_store::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, StoreError};
