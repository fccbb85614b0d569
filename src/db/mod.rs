//! Persistence layer for events, notices, localizations and plans.
//!
//! The module follows the repository pattern so storage backends can be
//! swapped: an in-memory `local` implementation backs unit tests and
//! development, and a Diesel/Postgres implementation (feature
//! `postgres-repo`) backs production.
//!
//! - `repository`: trait definitions and error types
//! - `repositories::local`: in-memory implementation
//! - `repositories::postgres`: Postgres implementation with Diesel ORM
//! - `factory`: repository construction from env/config
//! - `services`: high-level operations used by the ingestion handler and
//!   the HTTP API
//! - `checksum`: payload checksums for notice deduplication logging

// Feature flag priority: postgres > local
#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod checksum;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

pub use checksum::calculate_checksum;
pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::{PostgresConfig, PostgresRepository};
pub use repository::{
    ErrorContext, EventRepository, FullRepository, PlanRepository, RepositoryError,
    RepositoryResult,
};
