//! Annotation Service - Idempotent fudge overlay pass over the chat container
//!
//! Each pass selects the dice under the root that do not yet carry the
//! processed marker and annotates them. Because the selector already excludes
//! marked dice, running a pass twice over an unchanged subtree is a no-op.

use std::sync::Arc;

use crate::application::ports::outbound::{DocumentError, DocumentPort, ElementId, NewElement};
use crate::domain::entities::{
    RollAnnotation, DIE_CLASS, DOT_CLASS, OVERLAY_CLASS, PROCESSED_CLASS,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    #[error("Chat container not found: #{0}")]
    ContainerNotFound(String),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

/// Annotates six-sided dice under a fixed root container
pub struct AnnotationEngine {
    document: Arc<dyn DocumentPort>,
    root: ElementId,
}

impl AnnotationEngine {
    /// Resolve the root container.
    ///
    /// A missing container is fatal; the engine never falls back to scanning
    /// the whole document.
    pub fn new(document: Arc<dyn DocumentPort>, container_id: &str) -> Result<Self, AnnotationError> {
        let root = document
            .element_by_id(container_id)
            .ok_or_else(|| AnnotationError::ContainerNotFound(container_id.to_string()))?;
        tracing::debug!("Annotation root #{} resolved to {}", container_id, root);
        Ok(Self { document, root })
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Run one pass over the current document
    pub fn annotate(&self) -> Result<(), AnnotationError> {
        let dice = self
            .document
            .select_excluding(self.root, DIE_CLASS, PROCESSED_CLASS)?;
        if dice.is_empty() {
            return Ok(());
        }

        let mut annotated = 0;
        for die in dice {
            if self.annotate_die(die)?.is_some() {
                annotated += 1;
            }
        }
        tracing::debug!("Annotated {} dice", annotated);
        Ok(())
    }

    /// Claim and annotate one die. Returns `None` when a nested pass already
    /// claimed it after this pass selected it.
    fn annotate_die(&self, die: ElementId) -> Result<Option<RollAnnotation>, AnnotationError> {
        // Mark first: the writes below can re-enter a pass.
        if !self.document.add_class(die, PROCESSED_CLASS)? {
            return Ok(None);
        }

        let annotation = RollAnnotation::from_pips(self.count_pips(die));
        for (name, value) in annotation.attributes() {
            self.document.set_attribute(die, name, &value)?;
        }

        let overlay = NewElement::new("span")
            .with_class(OVERLAY_CLASS)
            .with_attribute("title", annotation.tooltip())
            .with_text(annotation.glyph());
        self.document.append_element(die, overlay)?;

        Ok(Some(annotation))
    }

    /// Visible dots inside a die. Unreadable markup counts as zero.
    fn count_pips(&self, die: ElementId) -> u32 {
        let dots = match self.document.descendants_with_class(die, DOT_CLASS) {
            Ok(dots) => dots,
            Err(e) => {
                tracing::debug!("Unreadable die markup on {}: {}", die, e);
                return 0;
            }
        };

        let visible = dots
            .into_iter()
            .filter(|dot| {
                self.document
                    .text_content(*dot)
                    .map(|text| !text.trim().is_empty())
                    .unwrap_or(false)
            })
            .count();
        u32::try_from(visible).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{OUTCOME_ATTRIBUTE, PIPS_ATTRIBUTE};
    use crate::infrastructure::document::{render_die, MemoryDocument};

    fn chat_document() -> (Arc<MemoryDocument>, ElementId) {
        let document = Arc::new(MemoryDocument::new());
        let chat = document
            .append_element(document.body(), NewElement::new("div").with_attribute("id", "chat"))
            .unwrap();
        (document, chat)
    }

    fn overlays(document: &MemoryDocument, die: ElementId) -> Vec<ElementId> {
        document.descendants_with_class(die, OVERLAY_CLASS).unwrap()
    }

    #[test]
    fn test_missing_container_is_fatal() {
        let document = Arc::new(MemoryDocument::new());
        let result = AnnotationEngine::new(document, "chat");
        assert_eq!(
            result.err(),
            Some(AnnotationError::ContainerNotFound("chat".to_string()))
        );
    }

    #[test]
    fn test_annotates_unprocessed_dice_and_skips_marked() {
        let (document, chat) = chat_document();
        let low = render_die(&*document, chat, 1).unwrap();
        let high = render_die(&*document, chat, 6).unwrap();
        let done = render_die(&*document, chat, 3).unwrap();
        document.add_class(done, PROCESSED_CLASS).unwrap();
        let untouched = document.snapshot(done).unwrap();

        let engine = AnnotationEngine::new(document.clone(), "chat").unwrap();
        engine.annotate().unwrap();

        assert_eq!(document.attribute(low, OUTCOME_ATTRIBUTE).unwrap().as_deref(), Some("-1"));
        assert_eq!(document.attribute(low, PIPS_ATTRIBUTE).unwrap().as_deref(), Some("1"));
        assert_eq!(document.attribute(high, OUTCOME_ATTRIBUTE).unwrap().as_deref(), Some("1"));
        for die in [low, high] {
            assert!(document.has_class(die, PROCESSED_CLASS).unwrap());
            assert_eq!(overlays(&document, die).len(), 1);
        }

        let overlay = overlays(&document, high)[0];
        assert_eq!(document.text_content(overlay).unwrap(), "+");
        assert_eq!(document.attribute(overlay, "title").unwrap().as_deref(), Some("Rolled 6"));

        assert_eq!(document.snapshot(done).unwrap(), untouched);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let (document, chat) = chat_document();
        render_die(&*document, chat, 2).unwrap();
        render_die(&*document, chat, 4).unwrap();

        let engine = AnnotationEngine::new(document.clone(), "chat").unwrap();
        engine.annotate().unwrap();
        let once = document.snapshot(chat).unwrap();
        engine.annotate().unwrap();

        assert_eq!(document.snapshot(chat).unwrap(), once);
    }

    #[test]
    fn test_nested_pass_never_annotates_a_die_twice() {
        use crate::application::ports::outbound::{MutationBatch, MutationSourcePort};
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::OnceLock;

        let (document, chat) = chat_document();
        let low = render_die(&*document, chat, 1).unwrap();
        let high = render_die(&*document, chat, 6).unwrap();

        let engine = Arc::new(AnnotationEngine::new(document.clone(), "chat").unwrap());
        let nested: Arc<OnceLock<Arc<AnnotationEngine>>> = Arc::new(OnceLock::new());
        let fired = Arc::new(AtomicBool::new(false));
        let _handle = {
            let nested = nested.clone();
            document.subscribe(
                chat,
                Arc::new(move |_: &MutationBatch| {
                    if fired.swap(true, Ordering::SeqCst) {
                        return;
                    }
                    if let Some(engine) = nested.get() {
                        engine.annotate().unwrap();
                    }
                }),
            )
        };
        let _ = nested.set(engine.clone());

        engine.annotate().unwrap();

        assert_eq!(overlays(&document, low).len(), 1);
        assert_eq!(overlays(&document, high).len(), 1);
        assert_eq!(document.attribute(high, OUTCOME_ATTRIBUTE).unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_empty_container_is_noop() {
        let (document, chat) = chat_document();
        let before = document.snapshot(chat).unwrap();

        let engine = AnnotationEngine::new(document.clone(), "chat").unwrap();
        engine.annotate().unwrap();

        assert_eq!(document.snapshot(chat).unwrap(), before);
    }

    #[test]
    fn test_die_without_dots_counts_as_zero() {
        let (document, chat) = chat_document();
        let bare = document
            .append_element(chat, NewElement::new("span").with_class(DIE_CLASS))
            .unwrap();

        let engine = AnnotationEngine::new(document.clone(), "chat").unwrap();
        engine.annotate().unwrap();

        assert_eq!(document.attribute(bare, PIPS_ATTRIBUTE).unwrap().as_deref(), Some("0"));
        assert_eq!(document.attribute(bare, OUTCOME_ATTRIBUTE).unwrap().as_deref(), Some("-1"));
    }

    #[test]
    fn test_dice_outside_root_are_ignored() {
        let (document, _chat) = chat_document();
        let sidebar = document
            .append_element(document.body(), NewElement::new("div"))
            .unwrap();
        let outside = render_die(&*document, sidebar, 5).unwrap();

        let engine = AnnotationEngine::new(document.clone(), "chat").unwrap();
        engine.annotate().unwrap();

        assert!(!document.has_class(outside, PROCESSED_CLASS).unwrap());
    }
}
