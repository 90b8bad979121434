//! Domain types and hierarchy rules for the business process audit.
//!
//! Nothing in this crate touches the database; the rules here are shared
//! by the repositories, the audit run, and the in-memory test store.

pub mod error;
pub mod hierarchy;
pub mod tree;
pub mod types;
