//! Shared models and wire types for the ReportDAO report/verify workflow.
//!
//! No I/O lives here: `models` holds the domain values, `api` the JSON bodies
//! exchanged with the scoring service, `events` the user-facing notices.

pub mod api;
pub mod events;
pub mod models;
