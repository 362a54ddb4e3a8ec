//! Presentation root port - The element whose toggles follow configuration

pub trait PresentationRootPort: Send + Sync {
    /// Add or remove a boolean class toggle
    fn toggle_class(&self, class: &str, enabled: bool);

    /// Set a style variable such as `--fudge-plus-color`
    fn set_variable(&self, name: &str, value: &str);
}
