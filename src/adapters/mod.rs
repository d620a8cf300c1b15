//! Adapters - Implementations of port interfaces.
//!
//! - `events` - event bus implementations
//! - `memory` - repositories and collaborator readers held in process

pub mod events;
pub mod memory;

pub use events::InMemoryEventBus;
pub use memory::{InMemoryAssessmentRepository, InMemoryCatalog, InMemoryScoreRepository};
