//! Repository trait definitions.
//!
//! - [`error`]: Error types for repository operations
//! - [`schedule`]: Schedule window queries and writes
//! - [`fleet`]: Shuttle and driver directories
//!
//! # Convenience Trait Bound
//!
//! Code that needs both capabilities takes a [`FullRepository`]:
//!
//! ```ignore
//! async fn check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let shuttles = repo.list_shuttles().await?;
//!     let healthy = repo.health_check().await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod fleet;
pub mod schedule;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use fleet::FleetRepository;
pub use schedule::ScheduleRepository;

/// Composite trait bound for a complete store implementation.
pub trait FullRepository: ScheduleRepository + FleetRepository {}

impl<T> FullRepository for T where T: ScheduleRepository + FleetRepository {}
