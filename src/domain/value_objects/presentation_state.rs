//! Derived presentation toggles

use super::{HexColor, RoomConfiguration, RoomId};

/// What the presentation root should show for the current room.
///
/// Always recomputed from a configuration snapshot; never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationState {
    pub annotations_visible: bool,
    pub colors_enabled: bool,
    pub plus_color: HexColor,
    pub minus_color: HexColor,
}

impl PresentationState {
    pub fn derive(config: &RoomConfiguration, room: &RoomId) -> Self {
        Self {
            annotations_visible: config.is_room_active(room),
            colors_enabled: config.use_colors,
            plus_color: config.plus_color.clone(),
            minus_color: config.minus_color.clone(),
        }
    }
}
