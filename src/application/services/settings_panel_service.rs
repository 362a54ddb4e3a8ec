//! Settings Panel Service - Binds settings inputs to the configuration service
//!
//! Input widgets notify synchronously; configuration updates are async. Each
//! change is pushed onto a channel and applied in order by the settings
//! worker.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::outbound::InputComponent;
use crate::application::services::{ConfigurationError, ConfigurationService};
use crate::domain::value_objects::{RoomConfiguration, RoomId};

/// A user edit coming from one of the settings inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingChange {
    RoomEnabled(bool),
    UseColors(bool),
    PlusColor(String),
    MinusColor(String),
}

/// The four inputs rendered in the settings panel
#[derive(Clone)]
pub struct SettingsPanel {
    pub room_enabled: Arc<dyn InputComponent<bool>>,
    pub use_colors: Arc<dyn InputComponent<bool>>,
    pub plus_color: Arc<dyn InputComponent<String>>,
    pub minus_color: Arc<dyn InputComponent<String>>,
}

impl SettingsPanel {
    /// Show the given configuration without firing change listeners
    pub fn populate(&self, config: &RoomConfiguration, room: &RoomId) {
        self.room_enabled.set_value(config.is_room_active(room));
        self.use_colors.set_value(config.use_colors);
        self.plus_color.set_value(config.plus_color.to_string());
        self.minus_color.set_value(config.minus_color.to_string());
    }

    /// Forward user edits into `changes`
    pub fn bind(&self, changes: mpsc::UnboundedSender<SettingChange>) {
        let tx = changes.clone();
        self.room_enabled.on_change(Box::new(move |value: &bool| {
            let _ = tx.send(SettingChange::RoomEnabled(*value));
        }));
        let tx = changes.clone();
        self.use_colors.on_change(Box::new(move |value: &bool| {
            let _ = tx.send(SettingChange::UseColors(*value));
        }));
        let tx = changes.clone();
        self.plus_color.on_change(Box::new(move |value: &String| {
            let _ = tx.send(SettingChange::PlusColor(value.clone()));
        }));
        let tx = changes;
        self.minus_color.on_change(Box::new(move |value: &String| {
            let _ = tx.send(SettingChange::MinusColor(value.clone()));
        }));
    }
}

/// Apply a single edit to the configuration.
///
/// Rejected edits are reverted in the panel so the inputs keep showing what is
/// actually stored.
pub async fn apply_setting_change(
    service: &ConfigurationService,
    panel: &SettingsPanel,
    change: SettingChange,
) -> Result<(), ConfigurationError> {
    tracing::debug!("Applying setting change: {:?}", change);
    let result = match change {
        SettingChange::RoomEnabled(enabled) => service.set_room_active(enabled).await,
        SettingChange::UseColors(enabled) => service.set_use_colors(enabled).await,
        SettingChange::PlusColor(color) => service.set_plus_color(&color).await,
        SettingChange::MinusColor(color) => service.set_minus_color(&color).await,
    };

    if let Err(e) = &result {
        tracing::warn!("Setting change rejected: {}", e);
        panel.populate(&service.current().await, service.room());
    }
    result
}
