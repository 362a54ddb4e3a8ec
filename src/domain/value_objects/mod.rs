//! Value objects - Immutable objects defined by their attributes

mod hex_color;
mod ids;
mod outcome;
mod page_mode;
mod presentation_state;
mod room_configuration;

pub use hex_color::{HexColor, InvalidColor};
pub use ids::{RoomId, SubscriptionId};
pub use outcome::Outcome;
pub use page_mode::PageMode;
pub use presentation_state::PresentationState;
#[allow(unused_imports)]
pub use room_configuration::{
    RoomConfiguration, DEFAULT_MINUS_COLOR, DEFAULT_PLUS_COLOR, DEFAULT_ROOMS,
};
