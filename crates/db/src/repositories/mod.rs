//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&mut PgConnection` as the first argument, so the same
//! method runs on the plain connection or inside a transaction.

pub mod business_process_repo;
pub mod relationship_repo;

pub use business_process_repo::BusinessProcessRepo;
pub use relationship_repo::ProcessRelationshipRepo;
