//! unfiltered/crates/services/src/lib.rs
//!
//! Business logic for UnFiltered: the in-memory content store, its derived
//! views, the activity layer and the moderated publish flow.

pub mod activity;
pub mod chat;
pub mod content_store;
pub mod pseudonym;
pub mod publish;
pub mod ui_state;
pub mod views;

pub use activity::{activity_for, DomainEvent};
pub use content_store::{ContentStore, StoreLimits};
pub use pseudonym::{generate_pseudonym, generate_pseudonym_with};
pub use publish::{shared, PublishService, SharedStore};
pub use ui_state::{ChatTarget, UiState};
