//! Application services - Use case implementations
//!
//! Services depend only on outbound ports; concrete adapters are injected
//! from the infrastructure layer.

pub mod annotation_service;
pub mod change_scheduler;
pub mod configuration_service;
pub mod live_annotation_service;
pub mod presentation_service;
pub mod settings_panel_service;

pub use annotation_service::{AnnotationEngine, AnnotationError};
#[allow(unused_imports)]
pub use change_scheduler::{
    ChangeScheduler, DebounceEdge, FaultHandler, PassFn, SchedulerCanceller, SchedulerError,
    DEFAULT_DEBOUNCE_WINDOW,
};
pub use configuration_service::{ConfigurationError, ConfigurationService};
#[allow(unused_imports)]
pub use live_annotation_service::{LiveAnnotation, LiveAnnotationError};
#[allow(unused_imports)]
pub use presentation_service::{
    PresentationSync, ACTIVE_CLASS, COLORS_CLASS, MINUS_COLOR_VARIABLE, PLUS_COLOR_VARIABLE,
};
pub use settings_panel_service::{apply_setting_change, SettingChange, SettingsPanel};
