//! Configuration Service - Owns the room configuration for this installation
//!
//! Every mutation is persisted through the repository port and followed by a
//! synchronous presentation sync.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::application::ports::outbound::{ConfigurationRepositoryPort, ConfigurationStoreError};
use crate::application::services::PresentationSync;
use crate::domain::value_objects::{
    HexColor, InvalidColor, PresentationState, RoomConfiguration, RoomId,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    InvalidColor(#[from] InvalidColor),

    #[error(transparent)]
    Store(#[from] ConfigurationStoreError),
}

pub struct ConfigurationService {
    repository: Arc<dyn ConfigurationRepositoryPort>,
    presentation: PresentationSync,
    room: RoomId,
    current: RwLock<RoomConfiguration>,
}

impl ConfigurationService {
    /// Load the persisted configuration, writing defaults on first run
    pub async fn load(
        repository: Arc<dyn ConfigurationRepositoryPort>,
        presentation: PresentationSync,
        room: RoomId,
    ) -> Result<Self, ConfigurationError> {
        let config = match repository.load().await? {
            Some(config) => config,
            None => {
                tracing::info!("No stored configuration, initialising defaults");
                let config = RoomConfiguration::default();
                repository.save(&config).await?;
                config
            }
        };

        presentation.sync(&config, &room);
        Ok(Self {
            repository,
            presentation,
            room,
            current: RwLock::new(config),
        })
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    pub async fn current(&self) -> RoomConfiguration {
        self.current.read().await.clone()
    }

    pub async fn presentation_state(&self) -> PresentationState {
        PresentationState::derive(&*self.current.read().await, &self.room)
    }

    /// Whether annotation is enabled for the room this page shows
    pub async fn is_room_active(&self) -> bool {
        self.current.read().await.is_room_active(&self.room)
    }

    pub async fn set_use_colors(&self, enabled: bool) -> Result<(), ConfigurationError> {
        self.mutate(|config| config.use_colors = enabled).await
    }

    pub async fn set_plus_color(&self, color: &str) -> Result<(), ConfigurationError> {
        let color = HexColor::parse(color)?;
        self.mutate(|config| config.plus_color = color).await
    }

    pub async fn set_minus_color(&self, color: &str) -> Result<(), ConfigurationError> {
        let color = HexColor::parse(color)?;
        self.mutate(|config| config.minus_color = color).await
    }

    pub async fn activate_room(&self, room: RoomId) -> Result<(), ConfigurationError> {
        self.mutate(|config| {
            config.activate_room(room);
        })
        .await
    }

    pub async fn deactivate_room(&self, room: &RoomId) -> Result<(), ConfigurationError> {
        self.mutate(|config| {
            config.deactivate_room(room);
        })
        .await
    }

    /// Toggle the current room
    pub async fn set_room_active(&self, active: bool) -> Result<(), ConfigurationError> {
        let room = self.room.clone();
        if active {
            self.activate_room(room).await
        } else {
            self.deactivate_room(&room).await
        }
    }

    /// Restore defaults in storage and in memory
    pub async fn reset(&self) -> Result<RoomConfiguration, ConfigurationError> {
        let mut current = self.current.write().await;
        let config = self.repository.reset().await?;
        *current = config.clone();
        self.presentation.sync(&config, &self.room);
        Ok(config)
    }

    async fn mutate(
        &self,
        apply: impl FnOnce(&mut RoomConfiguration),
    ) -> Result<(), ConfigurationError> {
        let mut current = self.current.write().await;
        let mut updated = current.clone();
        apply(&mut updated);
        self.repository.save(&updated).await?;
        *current = updated;
        self.presentation.sync(&current, &self.room);
        Ok(())
    }
}
