//! Mutation source port - Push notifications for subtree changes

use std::sync::Arc;

use crate::application::ports::outbound::ElementId;
use crate::domain::value_objects::SubscriptionId;

/// Kind of change observed in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    ChildAdded,
    ClassChanged,
    AttributeChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: ElementId,
    pub kind: MutationKind,
}

/// One delivery from the mutation source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationBatch {
    pub records: Vec<MutationRecord>,
}

impl MutationBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Records reporting new children, i.e. freshly rendered content
    pub fn added(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.kind == MutationKind::ChildAdded)
            .count()
    }
}

pub type MutationCallback = Arc<dyn Fn(&MutationBatch) + Send + Sync>;

/// Live subscription to a mutation source.
///
/// Cancelling is idempotent. Dropping the handle cancels it.
pub struct SubscriptionHandle {
    id: SubscriptionId,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionHandle {
    pub fn new(id: SubscriptionId, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
            tracing::debug!("Mutation subscription {} cancelled", self.id);
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Source of "subtree changed" notifications scoped to a root element
pub trait MutationSourcePort: Send + Sync {
    fn subscribe(&self, root: ElementId, on_batch: MutationCallback) -> SubscriptionHandle;
}
