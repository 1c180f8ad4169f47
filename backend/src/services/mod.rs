//! Service layer: the schedule conflict engine and the validated schedule
//! writes built on top of it.
//!
//! All operations take the store as an injected capability (any
//! [`ScheduleRepository`](crate::db::repository::ScheduleRepository) or
//! [`FullRepository`](crate::db::repository::FullRepository), including
//! `dyn` trait objects) and hold no state of their own.
//!
//! - [`conflict_checker`]: yes/no overlap predicate
//! - [`conflict_reporter`]: the colliding schedule per resource dimension
//! - [`suggestions`]: greedy single-axis alternatives for a conflicting request
//! - [`schedules`]: create/update guarded by the checker

pub mod candidate;
pub mod conflict_checker;
pub mod conflict_reporter;
pub mod error;
pub mod policy;
pub mod schedules;
pub mod suggestions;

pub use candidate::CandidateAssignment;
pub use conflict_checker::has_conflict;
pub use conflict_reporter::{describe_conflicts, ConflictDetail};
pub use error::ConflictError;
pub use policy::ConflictPolicy;
pub use schedules::{create_checked, update_checked, ScheduleWriteError};
pub use suggestions::{suggest_alternatives, Suggestion, SuggestionReport};

#[cfg(test)]
pub(crate) mod test_fixtures;
