//! State shared across all request handlers.

use std::sync::Arc;

use domains::ContentModerator;
use services::{PublishService, SharedStore};

use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub publisher: PublishService,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Wires the store and the moderation collaborator together.
    pub fn new(store: SharedStore, moderator: Arc<dyn ContentModerator>) -> Self {
        Self {
            publisher: PublishService::new(store.clone(), moderator),
            store,
            metrics: Arc::new(Metrics::new()),
        }
    }
}
