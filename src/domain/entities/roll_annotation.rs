//! Annotation attached to one rendered die

use crate::domain::value_objects::Outcome;

/// Marker class of a rendered six-sided die
pub const DIE_CLASS: &str = "six-sided-die";
/// Marker class of one pip position inside a die
pub const DOT_CLASS: &str = "dot";
/// Marker class added once a die has been annotated
pub const PROCESSED_CLASS: &str = "fudged";
/// Class of the overlay element appended to a die
pub const OVERLAY_CLASS: &str = "fudge-face";

pub const PIPS_ATTRIBUTE: &str = "data-pips";
pub const OUTCOME_ATTRIBUTE: &str = "data-fudge";

/// Everything the engine writes onto a single die widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollAnnotation {
    pub pips: u32,
    pub outcome: Outcome,
}

impl RollAnnotation {
    pub fn from_pips(pips: u32) -> Self {
        Self {
            pips,
            outcome: Outcome::classify(pips),
        }
    }

    pub fn glyph(&self) -> &'static str {
        self.outcome.glyph()
    }

    pub fn tooltip(&self) -> String {
        format!("Rolled {}", self.pips)
    }

    /// Attribute pairs stored on the widget
    pub fn attributes(&self) -> [(&'static str, String); 2] {
        [
            (PIPS_ATTRIBUTE, self.pips.to_string()),
            (OUTCOME_ATTRIBUTE, self.outcome.value().to_string()),
        ]
    }
}
