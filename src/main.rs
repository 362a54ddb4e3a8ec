//! Fudge Overlay - Fudge dice annotation for chat transcripts
//!
//! The engine:
//! - Finds rendered six-sided dice in the chat container and overlays a
//!   fudge face (-1 / 0 / +1) on each, exactly once
//! - Watches live rooms for new messages, debouncing bursts of changes
//! - Keeps per-room enablement and the color scheme in a persisted store
//!   and mirrors it onto the presentation root

mod application;
mod domain;
mod infrastructure;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::ports::outbound::{DocumentPort, NewElement};
use crate::application::services::{
    ConfigurationService, LiveAnnotation, PresentationSync, SettingsPanel,
};
use crate::domain::entities::{DIE_CLASS, PROCESSED_CLASS};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::document::MemoryDocument;
use crate::infrastructure::inputs::MemoryInput;
use crate::infrastructure::persistence::{FileKeyValueStore, KeyValueConfigurationRepository};
use crate::infrastructure::presentation::MemoryPresentationRoot;
use crate::infrastructure::settings_worker::settings_worker;
use crate::infrastructure::transcript::{load_transcript, replay};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fudge_overlay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Fudge Overlay");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Store: {}", config.store_path.display());
    tracing::info!("  Room: {} ({:?})", config.room_id, config.page_mode);
    tracing::info!("  Debounce: {:?}", config.debounce_window);

    // Persisted room configuration
    let store = FileKeyValueStore::open(&config.store_path).await?;
    let repository = Arc::new(KeyValueConfigurationRepository::new(store));
    let presentation_root = Arc::new(MemoryPresentationRoot::new());
    let configuration = Arc::new(
        ConfigurationService::load(
            repository,
            PresentationSync::new(presentation_root.clone()),
            config.room_id.clone(),
        )
        .await?,
    );

    // Host page with the chat container for this page mode
    let document = Arc::new(MemoryDocument::new());
    let container = document.append_element(
        document.body(),
        NewElement::new("div").with_attribute("id", config.page_mode.container_id()),
    )?;

    let mut live = LiveAnnotation::start(
        document.clone(),
        document.clone(),
        config.page_mode,
        config.debounce_window,
    )?;

    // Settings panel
    let panel = SettingsPanel {
        room_enabled: Arc::new(MemoryInput::new(false)),
        use_colors: Arc::new(MemoryInput::new(false)),
        plus_color: Arc::new(MemoryInput::new(String::new())),
        minus_color: Arc::new(MemoryInput::new(String::new())),
    };
    panel.populate(&configuration.current().await, configuration.room());
    let (changes_tx, changes_rx) = mpsc::unbounded_channel();
    panel.bind(changes_tx);
    let settings_worker_task = tokio::spawn(settings_worker(
        changes_rx,
        configuration.clone(),
        panel.clone(),
    ));

    let session = async {
        if let Some(path) = &config.transcript_path {
            let messages = load_transcript(path).await?;
            tracing::info!("Replaying {} messages from {}", messages.len(), path.display());
            let dice = replay(&*document, container, &messages, config.replay_interval).await?;
            tracing::info!("Replayed {} dice", dice);
        }

        // Let the last burst settle
        tokio::time::sleep(config.debounce_window * 4).await;
        anyhow::Ok(())
    };

    tokio::select! {
        result = session => {
            if let Err(e) = result {
                tracing::error!("Replay failed: {:#}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    let total = document.descendants_with_class(container, DIE_CLASS)?.len();
    let annotated = document
        .descendants_with_class(container, PROCESSED_CLASS)?
        .len();
    tracing::info!(
        "Annotated {}/{} dice (observing: {}, faulted: {})",
        annotated,
        total,
        live.is_observing(),
        live.has_faulted()
    );
    tracing::debug!(
        "Container after annotation: {}",
        serde_json::to_string(&document.snapshot(container)?)?
    );
    tracing::info!(
        "Presentation: {:?} classes={:?}",
        configuration.presentation_state().await,
        presentation_root.classes()
    );

    live.stop();
    settings_worker_task.abort();
    tracing::info!("Stopped");

    Ok(())
}
