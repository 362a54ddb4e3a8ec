//! Background worker applying settings edits in arrival order

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{apply_setting_change, ConfigurationService, SettingChange, SettingsPanel};

/// Drain `changes` until every sender is gone
pub async fn settings_worker(
    mut changes: mpsc::UnboundedReceiver<SettingChange>,
    service: Arc<ConfigurationService>,
    panel: SettingsPanel,
) {
    tracing::info!("Starting settings worker");
    while let Some(change) = changes.recv().await {
        // Rejections are logged and reverted by apply_setting_change.
        let _ = apply_setting_change(&service, &panel, change).await;
    }
    tracing::info!("Settings worker stopped");
}
