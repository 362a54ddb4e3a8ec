//! Live Annotation Service - Wires the scheduler to the mutation source
//!
//! Startup resolves the container and runs one pass over what is already
//! rendered. On live pages every mutation batch under the container triggers
//! the debounced scheduler. The first failing pass tears the subscription and
//! the scheduler down; whatever was annotated so far stays as it is.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::application::ports::outbound::{
    DocumentPort, MutationBatch, MutationSourcePort, SubscriptionHandle,
};
use crate::application::services::{
    AnnotationEngine, AnnotationError, ChangeScheduler, PassFn, SchedulerError,
};
use crate::domain::value_objects::PageMode;

#[derive(Debug, thiserror::Error)]
pub enum LiveAnnotationError {
    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

type SharedSubscription = Arc<Mutex<Option<SubscriptionHandle>>>;

/// Running annotation for one page
pub struct LiveAnnotation {
    scheduler: Option<ChangeScheduler>,
    subscription: SharedSubscription,
    faulted: Arc<AtomicBool>,
}

impl LiveAnnotation {
    pub fn start(
        document: Arc<dyn DocumentPort>,
        mutations: Arc<dyn MutationSourcePort>,
        page: PageMode,
        window: Duration,
    ) -> Result<Self, LiveAnnotationError> {
        let engine = Arc::new(AnnotationEngine::new(document, page.container_id())?);
        engine.annotate()?;

        let subscription: SharedSubscription = Arc::new(Mutex::new(None));
        let faulted = Arc::new(AtomicBool::new(false));

        if !page.is_live() {
            tracing::info!("Static {:?} page annotated, not observing changes", page);
            return Ok(Self {
                scheduler: None,
                subscription,
                faulted,
            });
        }

        let pass: PassFn = {
            let engine = engine.clone();
            Arc::new(move || engine.annotate())
        };
        let scheduler = ChangeScheduler::new(window, pass)?;

        {
            let canceller = scheduler.canceller();
            let subscription = subscription.clone();
            let faulted = faulted.clone();
            scheduler.on_fault(Arc::new(move |e: &AnnotationError| {
                if faulted.swap(true, Ordering::SeqCst) {
                    return;
                }
                tracing::error!("Live annotation stopped after scan fault: {}", e);
                canceller.cancel();
                take_subscription(&subscription);
            }));
        }

        let on_batch = {
            let scheduler = scheduler.clone();
            Arc::new(move |batch: &MutationBatch| {
                tracing::trace!(
                    "Mutation batch of {} records ({} added)",
                    batch.len(),
                    batch.added()
                );
                scheduler.trigger();
            })
        };
        let handle = mutations.subscribe(engine.root(), on_batch);
        tracing::info!(
            "Observing #{} for new dice (debounce {:?})",
            page.container_id(),
            window
        );
        *subscription
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(handle);

        Ok(Self {
            scheduler: Some(scheduler),
            subscription,
            faulted,
        })
    }

    /// Whether new dice are still being picked up
    pub fn is_observing(&self) -> bool {
        self.subscription
            .lock()
            .map(|s| s.as_ref().is_some_and(SubscriptionHandle::is_active))
            .unwrap_or(false)
    }

    pub fn has_faulted(&self) -> bool {
        self.faulted.load(Ordering::SeqCst)
    }

    pub fn stop(&mut self) {
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.cancel();
        }
        take_subscription(&self.subscription);
    }
}

impl Drop for LiveAnnotation {
    fn drop(&mut self) {
        self.stop();
    }
}

fn take_subscription(subscription: &SharedSubscription) {
    let handle = subscription
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .take();
    // Cancel outside the lock; the handle calls back into the mutation source.
    if let Some(mut handle) = handle {
        handle.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::{DocumentError, ElementId, NewElement};
    use crate::domain::entities::{OUTCOME_ATTRIBUTE, OVERLAY_CLASS, PROCESSED_CLASS};
    use crate::infrastructure::document::{render_die, MemoryDocument};

    const WINDOW: Duration = Duration::from_millis(50);

    fn page(mode: PageMode) -> (Arc<MemoryDocument>, ElementId) {
        let document = Arc::new(MemoryDocument::new());
        let container = document
            .append_element(
                document.body(),
                NewElement::new("div").with_attribute("id", mode.container_id()),
            )
            .unwrap();
        (document, container)
    }

    #[tokio::test(start_paused = true)]
    async fn test_existing_dice_annotated_at_startup() {
        let (document, chat) = page(PageMode::LiveRoom);
        let die = render_die(&*document, chat, 5).unwrap();

        let live =
            LiveAnnotation::start(document.clone(), document.clone(), PageMode::LiveRoom, WINDOW)
                .unwrap();

        assert!(live.is_observing());
        assert_eq!(document.attribute(die, OUTCOME_ATTRIBUTE).unwrap().as_deref(), Some("1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_dice_annotated_after_debounce() {
        let (document, chat) = page(PageMode::LiveRoom);
        let _live =
            LiveAnnotation::start(document.clone(), document.clone(), PageMode::LiveRoom, WINDOW)
                .unwrap();

        let first = render_die(&*document, chat, 1).unwrap();
        let second = render_die(&*document, chat, 6).unwrap();
        assert!(!document.has_class(first, PROCESSED_CLASS).unwrap());

        tokio::time::sleep(WINDOW * 4).await;

        for die in [first, second] {
            assert!(document.has_class(die, PROCESSED_CLASS).unwrap());
            assert_eq!(document.descendants_with_class(die, OVERLAY_CLASS).unwrap().len(), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_static_pages_are_not_observed() {
        let (document, transcript) = page(PageMode::Transcript);
        let die = render_die(&*document, transcript, 3).unwrap();

        let live = LiveAnnotation::start(
            document.clone(),
            document.clone(),
            PageMode::Transcript,
            WINDOW,
        )
        .unwrap();

        assert!(!live.is_observing());
        assert_eq!(document.observer_count(), 0);
        assert!(document.has_class(die, PROCESSED_CLASS).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_container_aborts_startup() {
        let (document, _) = page(PageMode::Transcript);

        let result =
            LiveAnnotation::start(document.clone(), document.clone(), PageMode::LiveRoom, WINDOW);

        assert!(matches!(
            result,
            Err(LiveAnnotationError::Annotation(AnnotationError::ContainerNotFound(_)))
        ));
        assert_eq!(document.observer_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_disconnects() {
        let (document, chat) = page(PageMode::LiveRoom);
        let mut live =
            LiveAnnotation::start(document.clone(), document.clone(), PageMode::LiveRoom, WINDOW)
                .unwrap();
        assert_eq!(document.observer_count(), 1);

        live.stop();
        let die = render_die(&*document, chat, 6).unwrap();
        tokio::time::sleep(WINDOW * 4).await;

        assert_eq!(document.observer_count(), 0);
        assert!(!document.has_class(die, PROCESSED_CLASS).unwrap());
    }

    /// Delegates to a memory document but fails selection once tripped
    struct FlakyDocument {
        inner: Arc<MemoryDocument>,
        broken: AtomicBool,
    }

    impl DocumentPort for FlakyDocument {
        fn element_by_id(&self, id: &str) -> Option<ElementId> {
            self.inner.element_by_id(id)
        }

        fn select_excluding(
            &self,
            root: ElementId,
            class: &str,
            excluded_class: &str,
        ) -> Result<Vec<ElementId>, DocumentError> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(DocumentError::Unavailable("container detached".to_string()));
            }
            self.inner.select_excluding(root, class, excluded_class)
        }

        fn descendants_with_class(
            &self,
            element: ElementId,
            class: &str,
        ) -> Result<Vec<ElementId>, DocumentError> {
            self.inner.descendants_with_class(element, class)
        }

        fn has_class(&self, element: ElementId, class: &str) -> Result<bool, DocumentError> {
            self.inner.has_class(element, class)
        }

        fn add_class(&self, element: ElementId, class: &str) -> Result<bool, DocumentError> {
            self.inner.add_class(element, class)
        }

        fn text_content(&self, element: ElementId) -> Result<String, DocumentError> {
            self.inner.text_content(element)
        }

        fn attribute(&self, element: ElementId, name: &str) -> Result<Option<String>, DocumentError> {
            self.inner.attribute(element, name)
        }

        fn set_attribute(
            &self,
            element: ElementId,
            name: &str,
            value: &str,
        ) -> Result<(), DocumentError> {
            self.inner.set_attribute(element, name, value)
        }

        fn append_element(
            &self,
            parent: ElementId,
            child: NewElement,
        ) -> Result<ElementId, DocumentError> {
            self.inner.append_element(parent, child)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_fault_tears_down_observation() {
        let (inner, chat) = page(PageMode::LiveRoom);
        let flaky = Arc::new(FlakyDocument {
            inner: inner.clone(),
            broken: AtomicBool::new(false),
        });
        let live =
            LiveAnnotation::start(flaky.clone(), inner.clone(), PageMode::LiveRoom, WINDOW)
                .unwrap();

        flaky.broken.store(true, Ordering::SeqCst);
        render_die(&*inner, chat, 2).unwrap();
        tokio::time::sleep(WINDOW * 4).await;

        assert!(live.has_faulted());
        assert!(!live.is_observing());
        assert_eq!(inner.observer_count(), 0);

        flaky.broken.store(false, Ordering::SeqCst);
        let later = render_die(&*inner, chat, 6).unwrap();
        tokio::time::sleep(WINDOW * 4).await;
        assert!(!inner.has_class(later, PROCESSED_CLASS).unwrap());
    }

    /// Shared log sink for a thread-local subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_fault_is_reported_once() {
        let logs = CapturedLogs::default();
        let sink = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (inner, chat) = page(PageMode::LiveRoom);
        let flaky = Arc::new(FlakyDocument {
            inner: inner.clone(),
            broken: AtomicBool::new(false),
        });
        let live =
            LiveAnnotation::start(flaky.clone(), inner.clone(), PageMode::LiveRoom, WINDOW)
                .unwrap();

        flaky.broken.store(true, Ordering::SeqCst);
        render_die(&*inner, chat, 4).unwrap();
        tokio::time::sleep(WINDOW * 4).await;
        assert!(live.has_faulted());

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let reports: Vec<&str> = output
            .lines()
            .filter(|line| line.contains("container detached"))
            .collect();
        assert_eq!(reports.len(), 1, "{}", output);
        assert!(reports[0].contains("ERROR"));
    }
}
