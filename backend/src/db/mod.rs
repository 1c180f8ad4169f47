//! Schedule and fleet storage.
//!
//! Storage sits behind the repository traits so the conflict engine and the
//! HTTP layer never depend on a concrete backend.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers / schedule management                    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Conflict engine (crate::services)                      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository traits (repository/)                        │
//! └──────────┬────────────────────────────────┬─────────────┘
//!            │                                │
//!   ┌────────▼─────────┐            ┌─────────▼────────┐
//!   │ LocalRepository  │            │ PostgresRepository│
//!   │   (in-memory)    │            │ (Diesel, feature) │
//!   └──────────────────┘            └──────────────────┘
//! ```
//!
//! - `repository`: trait definitions and [`RepositoryError`]
//! - `repositories::local`: in-memory implementation for tests and development
//! - `repositories::postgres`: Postgres implementation with Diesel ORM
//! - `factory`: picks a backend from the environment or `repository.toml`
//! - `seed`: JSON fleet documents for the in-memory store

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod seed;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::PostgresConfig;
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::{LocalSettings, RepositoryConfig};
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    ErrorContext, FleetRepository, FullRepository, RepositoryError, RepositoryResult,
    ScheduleRepository,
};
pub use seed::FleetSeed;
