//! Row structs for the business process tables.
//!
//! Each struct matches the column list of the query that produces it;
//! the tables themselves are owned by the application database, not by
//! this tool.

pub mod business_process;
pub mod relationship;
