//! Document port - Read/annotate access to the host page's element tree

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque reference to an element owned by the host document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("Element no longer exists: {0}")]
    StaleElement(ElementId),
    #[error("Document unavailable: {0}")]
    Unavailable(String),
}

/// Description of an element to be created by the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewElement {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
}

impl NewElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// Minimal element-tree surface needed to find and annotate dice.
///
/// Queries return elements in document order.
pub trait DocumentPort: Send + Sync {
    /// Look up an element by its `id` attribute
    fn element_by_id(&self, id: &str) -> Option<ElementId>;

    /// Descendants of `root` carrying `class` but not `excluded_class`
    fn select_excluding(
        &self,
        root: ElementId,
        class: &str,
        excluded_class: &str,
    ) -> Result<Vec<ElementId>, DocumentError>;

    /// Descendants of `element` carrying `class`
    fn descendants_with_class(
        &self,
        element: ElementId,
        class: &str,
    ) -> Result<Vec<ElementId>, DocumentError>;

    fn has_class(&self, element: ElementId, class: &str) -> Result<bool, DocumentError>;

    /// Add `class` to `element`. Returns `false` when it was already present.
    fn add_class(&self, element: ElementId, class: &str) -> Result<bool, DocumentError>;

    fn text_content(&self, element: ElementId) -> Result<String, DocumentError>;

    fn attribute(&self, element: ElementId, name: &str) -> Result<Option<String>, DocumentError>;

    fn set_attribute(&self, element: ElementId, name: &str, value: &str)
        -> Result<(), DocumentError>;

    /// Create `child` and append it as the last child of `parent`
    fn append_element(&self, parent: ElementId, child: NewElement)
        -> Result<ElementId, DocumentError>;
}
