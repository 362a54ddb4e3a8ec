//! Application configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::application::services::DEFAULT_DEBOUNCE_WINDOW;
use crate::domain::value_objects::{PageMode, RoomId};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// File backing the key/value store
    pub store_path: PathBuf,

    /// Room the page belongs to
    pub room_id: RoomId,
    /// Kind of page being annotated
    pub page_mode: PageMode,

    /// Quiet period before a burst of changes triggers a pass
    pub debounce_window: Duration,

    /// Optional JSON transcript replayed into the page at startup
    pub transcript_path: Option<PathBuf>,
    /// Delay between replayed messages
    pub replay_interval: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let debounce_ms: u64 = match env::var("FUDGE_DEBOUNCE_MS") {
            Ok(v) => v
                .parse()
                .context("FUDGE_DEBOUNCE_MS must be a number of milliseconds")?,
            Err(_) => DEFAULT_DEBOUNCE_WINDOW.as_millis() as u64,
        };

        Ok(Self {
            store_path: env::var("FUDGE_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("fudge-store.json")),

            room_id: RoomId::new(env::var("FUDGE_ROOM_ID").unwrap_or_else(|_| "11".to_string())),
            page_mode: env::var("FUDGE_PAGE_MODE")
                .unwrap_or_else(|_| "live".to_string())
                .parse::<PageMode>()
                .map_err(|e| anyhow!("FUDGE_PAGE_MODE is invalid: {}", e))?,

            debounce_window: Duration::from_millis(debounce_ms),

            transcript_path: env::var("FUDGE_TRANSCRIPT").ok().map(PathBuf::from),
            replay_interval: Duration::from_millis(
                env::var("FUDGE_REPLAY_INTERVAL_MS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("FUDGE_REPLAY_INTERVAL_MS must be a number of milliseconds")?,
            ),
        })
    }
}
