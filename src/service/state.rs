use std::sync::Arc;

use crate::client::DirectoryLookup;

/// Shared state for the lookup route handlers.
pub(super) struct ServiceState<L> {
    pub(super) lookup: Arc<L>,
}

// Manual Clone: avoid derive adding an `L: Clone` bound.
impl<L> Clone for ServiceState<L> {
    fn clone(&self) -> Self {
        Self {
            lookup: self.lookup.clone(),
        }
    }
}

impl<L: DirectoryLookup> ServiceState<L> {
    pub(super) fn new(lookup: L) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }
}
