//! `bpaudit-auditor` library crate.
//!
//! Audits the business process hierarchy, removes parent links from
//! top-level processes, and prints a console report. The binary entrypoint
//! lives in `main.rs`. The in-memory store used by the integration tests is
//! only built for tests or with the `testing` feature.

pub mod audit;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod report;
pub mod store;
