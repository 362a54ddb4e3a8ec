//! In-memory presentation root

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use crate::application::ports::outbound::PresentationRootPort;

#[derive(Default)]
pub struct MemoryPresentationRoot {
    classes: Mutex<BTreeSet<String>>,
    variables: Mutex<BTreeMap<String, String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryPresentationRoot {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn has_class(&self, class: &str) -> bool {
        lock(&self.classes).contains(class)
    }

    #[cfg(test)]
    pub fn variable(&self, name: &str) -> Option<String> {
        lock(&self.variables).get(name).cloned()
    }

    pub fn classes(&self) -> Vec<String> {
        lock(&self.classes).iter().cloned().collect()
    }
}

impl PresentationRootPort for MemoryPresentationRoot {
    fn toggle_class(&self, class: &str, enabled: bool) {
        let mut classes = lock(&self.classes);
        if enabled {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }

    fn set_variable(&self, name: &str, value: &str) {
        lock(&self.variables).insert(name.to_string(), value.to_string());
    }
}
