//! Outbound ports - Interfaces that the application requires from the host environment

mod configuration_port;
mod document_port;
mod input_port;
mod mutation_port;
mod presentation_port;

pub use configuration_port::{ConfigurationRepositoryPort, ConfigurationStoreError};
pub use document_port::{DocumentError, DocumentPort, ElementId, NewElement};
pub use input_port::{ChangeListener, InputComponent};
pub use mutation_port::{
    MutationBatch, MutationCallback, MutationKind, MutationRecord, MutationSourcePort,
    SubscriptionHandle,
};
pub use presentation_port::PresentationRootPort;
