/// Primary keys of the business process tables are PostgreSQL SERIAL (INTEGER).
pub type DbId = i32;

/// Ordering of a child among its siblings under one parent.
pub type SequenceNumber = i32;
