//! # Fleet Dispatch Backend
//!
//! Schedule conflict detection and suggestion engine for a shuttle fleet.
//!
//! A schedule assigns one driver and one shuttle to a date and start time.
//! Before an assignment is persisted, the engine answers three questions:
//!
//! - does it collide with a live schedule that shares its driver or shuttle
//!   within ±30 minutes on the same date?
//! - which existing schedules does it collide with, per resource?
//! - which single-axis changes (another shuttle, another driver, an hour
//!   earlier or later) would avoid the collision?
//!
//! ## Architecture
//!
//! - [`models`]: identifiers, schedules, fleet directory entries, time windows
//! - [`db`]: repository traits plus in-memory and Postgres backends
//! - [`services`]: the conflict engine and checked schedule writes
//! - [`http`]: axum REST API (feature `http-server`)

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
