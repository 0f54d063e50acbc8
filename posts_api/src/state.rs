use std::sync::Arc;

use crate::store::PostStore;

/// Shared handles for request handlers. The store is built once at startup
/// and only read afterwards.
#[derive(Debug)]
pub struct AppContext<S> {
    pub store: Arc<S>,
}

impl<S: PostStore> AppContext<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

// Manual impl: cloning the context must not require `S: Clone`.
impl<S> Clone for AppContext<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}
