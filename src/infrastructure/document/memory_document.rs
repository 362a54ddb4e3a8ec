//! In-memory element tree
//!
//! Stands in for the host page: it owns the elements, answers the queries the
//! annotation engine needs and pushes a mutation batch to every subscriber
//! whose root contains the changed element.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use serde::Serialize;

use crate::application::ports::outbound::{
    DocumentError, DocumentPort, ElementId, MutationBatch, MutationCallback, MutationKind,
    MutationRecord, MutationSourcePort, NewElement, SubscriptionHandle,
};
use crate::domain::value_objects::SubscriptionId;

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

struct Tree {
    elements: HashMap<ElementId, Element>,
    next_id: u64,
}

impl Tree {
    fn get(&self, id: ElementId) -> Result<&Element, DocumentError> {
        self.elements.get(&id).ok_or(DocumentError::StaleElement(id))
    }

    fn get_mut(&mut self, id: ElementId) -> Result<&mut Element, DocumentError> {
        self.elements
            .get_mut(&id)
            .ok_or(DocumentError::StaleElement(id))
    }

    /// Descendants of `root` in document order, excluding `root` itself
    fn descendants(&self, root: ElementId) -> Result<Vec<ElementId>, DocumentError> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.get(root)?.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.get(id)?.children.iter().rev().copied());
        }
        Ok(out)
    }

    fn contains(&self, ancestor: ElementId, mut id: ElementId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.elements.get(&id).and_then(|e| e.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    fn text_content(&self, id: ElementId) -> Result<String, DocumentError> {
        let mut text = self.get(id)?.text.clone();
        for child in self.descendants(id)? {
            text.push_str(&self.get(child)?.text);
        }
        Ok(text)
    }
}

struct Subscriber {
    id: SubscriptionId,
    root: ElementId,
    on_batch: MutationCallback,
}

/// Serializable view of a subtree, used for comparisons and reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementSnapshot {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub children: Vec<ElementSnapshot>,
}

pub struct MemoryDocument {
    body: ElementId,
    tree: Mutex<Tree>,
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryDocument {
    pub fn new() -> Self {
        let body = ElementId(0);
        let mut elements = HashMap::new();
        elements.insert(
            body,
            Element {
                tag: "body".to_string(),
                classes: BTreeSet::new(),
                attributes: BTreeMap::new(),
                text: String::new(),
                parent: None,
                children: Vec::new(),
            },
        );
        Self {
            body,
            tree: Mutex::new(Tree {
                elements,
                next_id: 1,
            }),
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    #[cfg(test)]
    pub fn observer_count(&self) -> usize {
        lock(&self.subscribers).len()
    }

    pub fn snapshot(&self, id: ElementId) -> Result<ElementSnapshot, DocumentError> {
        let tree = lock(&self.tree);
        snapshot(&tree, id)
    }

    /// Deliver one record to every subscriber watching `target`.
    ///
    /// Callbacks run after both locks are released so they may call back
    /// into the document.
    fn notify(&self, record: MutationRecord) {
        let callbacks = {
            let tree = lock(&self.tree);
            let subscribers = lock(&self.subscribers);
            let selected: Vec<MutationCallback> = subscribers
                .iter()
                .filter(|s| tree.contains(s.root, record.target))
                .map(|s| s.on_batch.clone())
                .collect();
            selected
        };
        if callbacks.is_empty() {
            return;
        }
        let batch = MutationBatch {
            records: vec![record],
        };
        for callback in callbacks {
            callback(&batch);
        }
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn snapshot(tree: &Tree, id: ElementId) -> Result<ElementSnapshot, DocumentError> {
    let element = tree.get(id)?;
    let children = element
        .children
        .iter()
        .map(|child| snapshot(tree, *child))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ElementSnapshot {
        tag: element.tag.clone(),
        classes: element.classes.iter().cloned().collect(),
        attributes: element.attributes.clone(),
        text: element.text.clone(),
        children,
    })
}

impl DocumentPort for MemoryDocument {
    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        let tree = lock(&self.tree);
        let found = std::iter::once(self.body)
            .chain(tree.descendants(self.body).ok()?)
            .find(|e| {
                tree.elements
                    .get(e)
                    .and_then(|el| el.attributes.get("id"))
                    .is_some_and(|v| v == id)
            });
        found
    }

    fn select_excluding(
        &self,
        root: ElementId,
        class: &str,
        excluded_class: &str,
    ) -> Result<Vec<ElementId>, DocumentError> {
        let tree = lock(&self.tree);
        let mut selected = Vec::new();
        for id in tree.descendants(root)? {
            let classes = &tree.get(id)?.classes;
            if classes.contains(class) && !classes.contains(excluded_class) {
                selected.push(id);
            }
        }
        Ok(selected)
    }

    fn descendants_with_class(
        &self,
        element: ElementId,
        class: &str,
    ) -> Result<Vec<ElementId>, DocumentError> {
        let tree = lock(&self.tree);
        let mut selected = Vec::new();
        for id in tree.descendants(element)? {
            if tree.get(id)?.classes.contains(class) {
                selected.push(id);
            }
        }
        Ok(selected)
    }

    fn has_class(&self, element: ElementId, class: &str) -> Result<bool, DocumentError> {
        Ok(lock(&self.tree).get(element)?.classes.contains(class))
    }

    fn add_class(&self, element: ElementId, class: &str) -> Result<bool, DocumentError> {
        let inserted = lock(&self.tree)
            .get_mut(element)?
            .classes
            .insert(class.to_string());
        if inserted {
            self.notify(MutationRecord {
                target: element,
                kind: MutationKind::ClassChanged,
            });
        }
        Ok(inserted)
    }

    fn text_content(&self, element: ElementId) -> Result<String, DocumentError> {
        lock(&self.tree).text_content(element)
    }

    fn attribute(&self, element: ElementId, name: &str) -> Result<Option<String>, DocumentError> {
        Ok(lock(&self.tree).get(element)?.attributes.get(name).cloned())
    }

    fn set_attribute(
        &self,
        element: ElementId,
        name: &str,
        value: &str,
    ) -> Result<(), DocumentError> {
        lock(&self.tree)
            .get_mut(element)?
            .attributes
            .insert(name.to_string(), value.to_string());
        self.notify(MutationRecord {
            target: element,
            kind: MutationKind::AttributeChanged,
        });
        Ok(())
    }

    fn append_element(
        &self,
        parent: ElementId,
        child: NewElement,
    ) -> Result<ElementId, DocumentError> {
        let id = {
            let mut tree = lock(&self.tree);
            tree.get(parent)?;
            let id = ElementId(tree.next_id);
            tree.next_id += 1;
            tree.elements.insert(
                id,
                Element {
                    tag: child.tag,
                    classes: child.classes.into_iter().collect(),
                    attributes: child.attributes,
                    text: child.text,
                    parent: Some(parent),
                    children: Vec::new(),
                },
            );
            tree.get_mut(parent)?.children.push(id);
            id
        };
        self.notify(MutationRecord {
            target: parent,
            kind: MutationKind::ChildAdded,
        });
        Ok(id)
    }
}

impl MutationSourcePort for MemoryDocument {
    fn subscribe(&self, root: ElementId, on_batch: MutationCallback) -> SubscriptionHandle {
        let id = SubscriptionId::new();
        lock(&self.subscribers).push(Subscriber { id, root, on_batch });
        tracing::debug!("Mutation subscription {} on {}", id, root);

        let subscribers: Weak<Mutex<Vec<Subscriber>>> = Arc::downgrade(&self.subscribers);
        SubscriptionHandle::new(id, move || {
            if let Some(subscribers) = subscribers.upgrade() {
                lock(&subscribers).retain(|s| s.id != id);
            }
        })
    }
}
