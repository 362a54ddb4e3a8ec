//! Kind of chat page the engine is attached to

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageMode {
    /// Continuously updating chat room
    LiveRoom,
    /// Static transcript of past messages
    Transcript,
    /// Saved conversation excerpt
    Conversation,
}

impl PageMode {
    /// Id of the container holding the chat messages
    pub fn container_id(&self) -> &'static str {
        match self {
            Self::LiveRoom => "chat",
            Self::Transcript => "transcript",
            Self::Conversation => "conversation",
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::LiveRoom)
    }
}

impl std::str::FromStr for PageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" | "room" | "live_room" => Ok(Self::LiveRoom),
            "transcript" => Ok(Self::Transcript),
            "conversation" => Ok(Self::Conversation),
            _ => Err(format!(
                "Unknown page mode: {}. Valid modes: live, transcript, conversation",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_live_room_is_live() {
        assert!(PageMode::LiveRoom.is_live());
        assert!(!PageMode::Transcript.is_live());
        assert!(!PageMode::Conversation.is_live());
    }

    #[test]
    fn test_parse() {
        assert_eq!("live".parse::<PageMode>(), Ok(PageMode::LiveRoom));
        assert_eq!("Transcript".parse::<PageMode>(), Ok(PageMode::Transcript));
        assert!("lobby".parse::<PageMode>().is_err());
    }
}
