//! Persistence adapters - Key/value storage for the room configuration

mod configuration_repository;
mod key_value_store;

#[allow(unused_imports)]
pub use configuration_repository::{KeyValueConfigurationRepository, CONFIGURATION_KEY};
pub use key_value_store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StorageError};
