//! Toolkit errors

use fos_dom::DomError;

/// Result type for toolkit operations
pub type Result<T> = std::result::Result<T, KitError>;

/// Toolkit errors
#[derive(Debug, thiserror::Error)]
pub enum KitError {
    /// `on`/`once` resolved no targets under a strict configuration
    #[error("Elements are empty for {0}")]
    EmptyTargets(String),

    /// `ref_component` found no element for the child component
    #[error("Component with selector '{selector}' not found in {component}")]
    ComponentNotFound {
        selector: String,
        component: &'static str,
    },

    /// An awaited element fired `error` or has nothing to wait on
    #[error("Failed to load {0}")]
    LoadFailed(String),

    #[error(transparent)]
    Dom(#[from] DomError),
}
