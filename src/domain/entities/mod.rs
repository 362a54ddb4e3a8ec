//! Entities - what the engine knows about the widgets it annotates

mod roll_annotation;

pub use roll_annotation::{
    RollAnnotation, DIE_CLASS, DOT_CLASS, OUTCOME_ATTRIBUTE, OVERLAY_CLASS, PIPS_ATTRIBUTE,
    PROCESSED_CLASS,
};
