//! Repository trait definitions for database operations.
//!
//! Responsibilities are split across two focused traits: [`EventRepository`]
//! for events, notices and localizations, and [`PlanRepository`] for
//! observation plans and their exposures. A complete backend implements both;
//! the [`FullRepository`] bound covers code that needs everything.

pub mod error;
pub mod events;
pub mod plans;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use events::EventRepository;
pub use plans::PlanRepository;

/// Composite trait bound for a complete repository implementation.
pub trait FullRepository: EventRepository + PlanRepository {}

// Blanket implementation: implementing both traits implements FullRepository.
impl<T> FullRepository for T where T: EventRepository + PlanRepository {}
