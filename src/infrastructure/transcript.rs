//! Transcript replay - Feeds recorded chat messages into the page

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::application::ports::outbound::{DocumentPort, ElementId};
use crate::infrastructure::document::render_message;

/// One recorded chat message
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TranscriptMessage {
    pub author: String,
    #[serde(default)]
    pub dice: Vec<u32>,
}

pub async fn load_transcript(path: &Path) -> Result<Vec<TranscriptMessage>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read transcript {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Transcript {} is not valid JSON", path.display()))
}

/// Append each message to `container`, pausing `interval` between messages
pub async fn replay<D: DocumentPort + ?Sized>(
    document: &D,
    container: ElementId,
    messages: &[TranscriptMessage],
    interval: Duration,
) -> Result<usize> {
    let mut dice = 0;
    for message in messages {
        render_message(document, container, &message.author, &message.dice)?;
        dice += message.dice.len();
        tracing::debug!("Replayed message from {} with {} dice", message.author, message.dice.len());
        if !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
    }
    Ok(dice)
}
