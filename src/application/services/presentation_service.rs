//! Presentation Sync - Reconciles configuration onto the presentation root

use std::sync::Arc;

use crate::application::ports::outbound::PresentationRootPort;
use crate::domain::value_objects::{PresentationState, RoomConfiguration, RoomId};

pub const ACTIVE_CLASS: &str = "fudge-active";
pub const COLORS_CLASS: &str = "fudge-colors";
pub const PLUS_COLOR_VARIABLE: &str = "--fudge-plus-color";
pub const MINUS_COLOR_VARIABLE: &str = "--fudge-minus-color";

/// Full recompute of the presentation toggles. No diffing, no stored state.
#[derive(Clone)]
pub struct PresentationSync {
    root: Arc<dyn PresentationRootPort>,
}

impl PresentationSync {
    pub fn new(root: Arc<dyn PresentationRootPort>) -> Self {
        Self { root }
    }

    pub fn sync(&self, config: &RoomConfiguration, room: &RoomId) -> PresentationState {
        let state = PresentationState::derive(config, room);
        self.root.toggle_class(ACTIVE_CLASS, state.annotations_visible);
        self.root.toggle_class(COLORS_CLASS, state.colors_enabled);
        self.root
            .set_variable(PLUS_COLOR_VARIABLE, state.plus_color.as_str());
        self.root
            .set_variable(MINUS_COLOR_VARIABLE, state.minus_color.as_str());
        tracing::debug!(
            room = %room,
            visible = state.annotations_visible,
            colors = state.colors_enabled,
            "Presentation synced"
        );
        state
    }
}
