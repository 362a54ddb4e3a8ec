//! Input port - Settings widgets owned by the host page

pub type ChangeListener<T> = Box<dyn Fn(&T) + Send + Sync>;

/// A settings input exposing a typed value and change notifications
pub trait InputComponent<T: Clone>: Send + Sync {
    fn value(&self) -> T;

    /// Programmatic update; does not notify listeners
    fn set_value(&self, value: T);

    /// Register a listener fired when the user changes the value
    fn on_change(&self, listener: ChangeListener<T>);
}
