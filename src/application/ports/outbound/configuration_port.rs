use async_trait::async_trait;

use crate::domain::value_objects::RoomConfiguration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationStoreError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[async_trait]
pub trait ConfigurationRepositoryPort: Send + Sync {
    /// `None` when nothing has been persisted yet
    async fn load(&self) -> Result<Option<RoomConfiguration>, ConfigurationStoreError>;
    async fn save(&self, config: &RoomConfiguration) -> Result<(), ConfigurationStoreError>;
    async fn reset(&self) -> Result<RoomConfiguration, ConfigurationStoreError>;
}
