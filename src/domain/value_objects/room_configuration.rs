//! Per-installation room configuration
//!
//! This is the record persisted under a single key of the key/value store.
//! The serialized field names are the storage contract:
//! `{useColors, plusColor, minusColor, rooms}`.

use serde::Serialize;

use super::{HexColor, RoomId};

pub const DEFAULT_PLUS_COLOR: &str = "#008800";
pub const DEFAULT_MINUS_COLOR: &str = "#CC0000";
pub const DEFAULT_ROOMS: [&str; 2] = ["11", "8403"];

/// User-editable settings shared by every room
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfiguration {
    pub use_colors: bool,
    pub plus_color: HexColor,
    pub minus_color: HexColor,
    rooms: Vec<RoomId>,
}

impl Default for RoomConfiguration {
    fn default() -> Self {
        Self {
            use_colors: false,
            plus_color: Self::default_plus_color(),
            minus_color: Self::default_minus_color(),
            rooms: DEFAULT_ROOMS.iter().map(|r| RoomId::from(*r)).collect(),
        }
    }
}

impl RoomConfiguration {
    pub fn new(
        use_colors: bool,
        plus_color: HexColor,
        minus_color: HexColor,
        rooms: impl IntoIterator<Item = RoomId>,
    ) -> Self {
        let mut config = Self {
            use_colors,
            plus_color,
            minus_color,
            rooms: Vec::new(),
        };
        for room in rooms {
            config.activate_room(room);
        }
        config
    }

    pub fn default_plus_color() -> HexColor {
        HexColor::from_static(DEFAULT_PLUS_COLOR)
    }

    pub fn default_minus_color() -> HexColor {
        HexColor::from_static(DEFAULT_MINUS_COLOR)
    }

    pub fn rooms(&self) -> &[RoomId] {
        &self.rooms
    }

    pub fn is_room_active(&self, room: &RoomId) -> bool {
        self.rooms.contains(room)
    }

    /// Add a room. Returns `false` when it was already active.
    pub fn activate_room(&mut self, room: RoomId) -> bool {
        if self.is_room_active(&room) {
            return false;
        }
        self.rooms.push(room);
        true
    }

    /// Remove a room. Returns `false` when it was not active.
    pub fn deactivate_room(&mut self, room: &RoomId) -> bool {
        let before = self.rooms.len();
        self.rooms.retain(|r| r != room);
        self.rooms.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RoomConfiguration::default();
        assert!(!config.use_colors);
        assert_eq!(config.plus_color.as_str(), "#008800");
        assert_eq!(config.minus_color.as_str(), "#CC0000");
        assert_eq!(config.rooms().len(), 2);
        assert!(config.is_room_active(&RoomId::from("11")));
    }

    #[test]
    fn test_activate_is_idempotent() {
        let mut config = RoomConfiguration::default();
        assert!(config.activate_room(RoomId::from("42")));
        let snapshot = config.rooms().to_vec();

        assert!(!config.activate_room(RoomId::from("42")));
        assert_eq!(config.rooms(), snapshot.as_slice());
    }

    #[test]
    fn test_deactivate_non_member_is_noop() {
        let mut config = RoomConfiguration::default();
        let snapshot = config.rooms().to_vec();

        assert!(!config.deactivate_room(&RoomId::from("999")));
        assert_eq!(config.rooms(), snapshot.as_slice());

        assert!(config.deactivate_room(&RoomId::from("11")));
        assert!(!config.is_room_active(&RoomId::from("11")));
    }

    #[test]
    fn test_new_drops_duplicate_rooms() {
        let config = RoomConfiguration::new(
            true,
            RoomConfiguration::default_plus_color(),
            RoomConfiguration::default_minus_color(),
            ["1", "2", "1"].into_iter().map(RoomId::from),
        );
        assert_eq!(config.rooms(), &[RoomId::from("1"), RoomId::from("2")]);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(RoomConfiguration::default()).unwrap();
        assert_eq!(json["useColors"], false);
        assert_eq!(json["plusColor"], "#008800");
        assert_eq!(json["minusColor"], "#CC0000");
        assert_eq!(json["rooms"], serde_json::json!(["11", "8403"]));
    }
}
