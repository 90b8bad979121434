use crate::store::StoreError;

/// Exit code for a failed audit run.
pub const EXIT_FAILURE: u8 = 1;
/// Exit code when the database could not be reached at startup.
pub const EXIT_CONNECT_FAILURE: u8 = 2;

/// Error returned by an audit run.
///
/// A connection failure is detected before any query runs and is kept
/// apart from [`AuditError::Store`], which means some step failed midway.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// Required configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The single database connection could not be opened.
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// A query or the repair transaction failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The report could not be written.
    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Convenience type alias for audit results.
pub type AuditResult<T> = Result<T, AuditError>;

impl AuditError {
    /// Process exit code the binary reports for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AuditError::Connect(_) => EXIT_CONNECT_FAILURE,
            AuditError::Config(_) | AuditError::Store(_) | AuditError::Output(_) => EXIT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_failure_has_its_own_exit_code() {
        let err = AuditError::Connect(sqlx::Error::PoolTimedOut);
        assert_eq!(err.exit_code(), EXIT_CONNECT_FAILURE);
    }

    #[test]
    fn other_failures_exit_with_one() {
        let config = AuditError::Config("DATABASE_URL must be set".into());
        let store = AuditError::Store(StoreError::Unavailable("gone".into()));
        assert_eq!(config.exit_code(), EXIT_FAILURE);
        assert_eq!(store.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn store_error_message_passes_through() {
        let err = AuditError::from(StoreError::Unavailable("disk full".into()));
        assert_eq!(err.to_string(), "Store unavailable: disk full");
    }
}
