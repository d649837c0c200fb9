//! unfiltered/crates/domains/src/lib.rs
//!
//! Data model, error taxonomy and collaborator contracts for UnFiltered.

pub mod activity;
pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use activity::*;
pub use error::*;
pub use models::*;
pub use ports::*;
