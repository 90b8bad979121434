use sqlx::{Connection, PgConnection};

pub mod models;
pub mod repositories;

/// Open a single connection from a database URL.
///
/// The audit runs every statement over this one connection; there is no
/// pool.
pub async fn connect(database_url: &str) -> Result<PgConnection, sqlx::Error> {
    let conn = PgConnection::connect(database_url).await?;
    tracing::debug!("Database connection established");
    Ok(conn)
}

/// Verify the connection answers a trivial query.
pub async fn health_check(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(conn).await?;
    Ok(())
}
