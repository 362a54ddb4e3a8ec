use async_trait::async_trait;
use serde_json::Value;

use crate::application::ports::outbound::{ConfigurationRepositoryPort, ConfigurationStoreError};
use crate::domain::value_objects::{HexColor, RoomConfiguration, RoomId};
use crate::infrastructure::persistence::{KeyValueStore, StorageError};

/// Storage key holding the serialized configuration
pub const CONFIGURATION_KEY: &str = "fudge-config";

impl From<StorageError> for ConfigurationStoreError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e.to_string())
    }
}

pub struct KeyValueConfigurationRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KeyValueConfigurationRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Read a stored record field by field, keeping defaults for anything
/// missing or unreadable.
fn parse_record(raw: &str) -> RoomConfiguration {
    let mut config = RoomConfiguration::default();

    let record = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(record)) => record,
        Ok(other) => {
            tracing::warn!("Stored configuration is not an object ({}), using defaults", other);
            return config;
        }
        Err(e) => {
            tracing::warn!("Stored configuration unreadable ({}), using defaults", e);
            return config;
        }
    };

    for (key, value) in record {
        match key.as_str() {
            "useColors" => {
                if let Some(v) = value.as_bool() {
                    config.use_colors = v;
                }
            }
            "plusColor" => {
                if let Some(v) = value.as_str().and_then(|s| HexColor::parse(s).ok()) {
                    config.plus_color = v;
                }
            }
            "minusColor" => {
                if let Some(v) = value.as_str().and_then(|s| HexColor::parse(s).ok()) {
                    config.minus_color = v;
                }
            }
            "rooms" => {
                if let Some(rooms) = value.as_array() {
                    config = RoomConfiguration::new(
                        config.use_colors,
                        config.plus_color,
                        config.minus_color,
                        rooms.iter().filter_map(Value::as_str).map(RoomId::from),
                    );
                }
            }
            _ => {}
        }
    }

    config
}

#[async_trait]
impl<S: KeyValueStore> ConfigurationRepositoryPort for KeyValueConfigurationRepository<S> {
    async fn load(&self) -> Result<Option<RoomConfiguration>, ConfigurationStoreError> {
        let raw = self.store.get(CONFIGURATION_KEY).await?;
        Ok(raw.as_deref().map(parse_record))
    }

    async fn save(&self, config: &RoomConfiguration) -> Result<(), ConfigurationStoreError> {
        let raw = serde_json::to_string(config)
            .map_err(|e| ConfigurationStoreError::Serialization(e.to_string()))?;
        self.store.set(CONFIGURATION_KEY, &raw).await?;
        Ok(())
    }

    async fn reset(&self) -> Result<RoomConfiguration, ConfigurationStoreError> {
        self.store.remove(CONFIGURATION_KEY).await?;
        Ok(RoomConfiguration::default())
    }
}
