//! Change Scheduler - Debounced trigger for annotation passes
//!
//! Mutation notifications arrive in unbounded bursts. The scheduler collapses
//! each burst into a single pass that runs once the debounce window has been
//! quiet. Each `trigger()` restarts the window; `cancel()` stops any pending
//! window and refuses further triggers.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::application::services::AnnotationError;

pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(50);

pub type PassFn = Arc<dyn Fn() -> Result<(), AnnotationError> + Send + Sync>;
pub type FaultHandler = Arc<dyn Fn(&AnnotationError) + Send + Sync>;

/// Which edge of a burst runs the pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebounceEdge {
    /// Run once the window closes after the last trigger
    #[default]
    Trailing,
    /// Run on the first trigger, then stay quiet until the window closes
    Leading,
}

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("No async runtime available to host the debounce timer")]
    NoRuntime,
}

struct SchedulerState {
    timer: Option<JoinHandle<()>>,
    generation: u64,
    cancelled: bool,
    on_fault: Option<FaultHandler>,
}

fn lock(state: &Mutex<SchedulerState>) -> MutexGuard<'_, SchedulerState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Debounced pass scheduler owning a single timer
#[derive(Clone)]
pub struct ChangeScheduler {
    window: Duration,
    edge: DebounceEdge,
    pass: PassFn,
    runtime: Handle,
    state: Arc<Mutex<SchedulerState>>,
}

impl ChangeScheduler {
    /// Create a trailing-edge scheduler on the current tokio runtime
    pub fn new(window: Duration, pass: PassFn) -> Result<Self, SchedulerError> {
        Self::with_edge(window, DebounceEdge::Trailing, pass)
    }

    pub fn with_edge(
        window: Duration,
        edge: DebounceEdge,
        pass: PassFn,
    ) -> Result<Self, SchedulerError> {
        let runtime = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;
        Ok(Self {
            window,
            edge,
            pass,
            runtime,
            state: Arc::new(Mutex::new(SchedulerState {
                timer: None,
                generation: 0,
                cancelled: false,
                on_fault: None,
            })),
        })
    }

    /// Register the handler told about failing passes. The handler is then
    /// the only place a fault is reported.
    pub fn on_fault(&self, handler: FaultHandler) {
        lock(&self.state).on_fault = Some(handler);
    }

    /// Restart the debounce window. Returns `false` once cancelled.
    pub fn trigger(&self) -> bool {
        let fire_now = {
            let mut state = lock(&self.state);
            if state.cancelled {
                return false;
            }

            let window_open = state.timer.is_some();
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
            state.generation = state.generation.wrapping_add(1);
            let generation = state.generation;

            let weak = Arc::downgrade(&self.state);
            let window = self.window;
            let edge = self.edge;
            let pass = self.pass.clone();
            state.timer = Some(self.runtime.spawn(async move {
                tokio::time::sleep(window).await;
                if let Some(on_fault) = close_window(&weak, generation) {
                    if edge == DebounceEdge::Trailing {
                        run_pass(&pass, on_fault);
                    }
                }
            }));

            self.edge == DebounceEdge::Leading && !window_open
        };

        if fire_now {
            let on_fault = lock(&self.state).on_fault.clone();
            run_pass(&self.pass, on_fault);
        }
        true
    }

    /// Stop the pending window, if any, and refuse future triggers
    pub fn cancel(&self) {
        let mut state = lock(&self.state);
        if state.cancelled {
            return;
        }
        state.cancelled = true;
        state.on_fault = None;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        tracing::debug!("Change scheduler cancelled");
    }

    #[cfg(test)]
    pub fn is_cancelled(&self) -> bool {
        lock(&self.state).cancelled
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        lock(&self.state).timer.is_some()
    }

    /// Handle that can cancel this scheduler without keeping it alive
    pub fn canceller(&self) -> SchedulerCanceller {
        SchedulerCanceller {
            state: Arc::downgrade(&self.state),
        }
    }
}

/// Weak cancel-only handle to a [`ChangeScheduler`]
#[derive(Clone)]
pub struct SchedulerCanceller {
    state: Weak<Mutex<SchedulerState>>,
}

impl SchedulerCanceller {
    pub fn cancel(&self) {
        if let Some(state) = self.state.upgrade() {
            let mut state = lock(&state);
            state.cancelled = true;
            state.on_fault = None;
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
        }
    }
}

/// Close the window for `generation`.
///
/// Returns `None` when the window was superseded, cancelled, or the scheduler
/// is gone; otherwise the fault handler to use for the pass.
fn close_window(
    state: &Weak<Mutex<SchedulerState>>,
    generation: u64,
) -> Option<Option<FaultHandler>> {
    let state = state.upgrade()?;
    let mut state = lock(&state);
    if state.cancelled || state.generation != generation {
        return None;
    }
    state.timer = None;
    Some(state.on_fault.clone())
}

fn run_pass(pass: &PassFn, on_fault: Option<FaultHandler>) {
    if let Err(e) = pass() {
        match on_fault {
            Some(handler) => handler(&e),
            None => tracing::warn!("Annotation pass failed: {}", e),
        }
    }
}
