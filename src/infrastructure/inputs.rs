//! In-memory settings inputs

use std::sync::{Mutex, MutexGuard};

use crate::application::ports::outbound::{ChangeListener, InputComponent};

/// Input widget holding a value and its change listeners
pub struct MemoryInput<T> {
    value: Mutex<T>,
    listeners: Mutex<Vec<ChangeListener<T>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T: Clone + Send> MemoryInput<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Simulate the user editing the input
    #[cfg(test)]
    pub fn user_input(&self, value: T) {
        *lock(&self.value) = value.clone();
        for listener in lock(&self.listeners).iter() {
            listener(&value);
        }
    }
}

impl<T: Clone + Send> InputComponent<T> for MemoryInput<T> {
    fn value(&self) -> T {
        lock(&self.value).clone()
    }

    fn set_value(&self, value: T) {
        *lock(&self.value) = value;
    }

    fn on_change(&self, listener: ChangeListener<T>) {
        lock(&self.listeners).push(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_only_user_input_notifies() {
        let input = MemoryInput::new(false);
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        input.on_change(Box::new(move |_: &bool| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        input.set_value(true);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(input.value());

        input.user_input(false);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!input.value());
    }
}
