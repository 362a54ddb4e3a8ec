//! Domain layer - Core logic with no external dependencies
//!
//! This layer contains:
//! - Entities: the annotation attached to a rendered die, and its marker names
//! - Value Objects: Outcome, RoomConfiguration, PresentationState, ids

pub mod entities;
pub mod value_objects;
