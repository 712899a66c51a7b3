//! Application state.

use std::sync::Arc;

use task_store::TaskStore;

/// Shared application state.
pub struct AppState<S: TaskStore> {
    /// Task store.
    pub store: S,
}

impl<S: TaskStore> AppState<S> {
    /// Creates new application state.
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state around a store.
pub fn create_shared_state<S: TaskStore>(store: S) -> SharedState<S> {
    Arc::new(AppState::new(store))
}
