//! Data source seam for the audit run.
//!
//! [`HierarchyStore`] lists exactly the result sets the audit reports on.
//! [`PgHierarchyStore`] answers them from the single Postgres connection;
//! `memory::InMemoryStore` answers them from vectors in tests.

use async_trait::async_trait;
use bpaudit_core::hierarchy::TOP_LEVEL;
use bpaudit_db::models::business_process::{BusinessProcess, MultiParentProcess};
use bpaudit_db::models::relationship::{HierarchyEdge, InvalidParentLink};
use bpaudit_db::repositories::{BusinessProcessRepo, ProcessRelationshipRepo};
use sqlx::{Connection, PgConnection};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// An invalid link after its delete statement ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedLink {
    pub link: InvalidParentLink,
    /// Rows matched by the child/parent pair. Duplicate rows for one pair
    /// are all removed by the first delete, leaving 0 for the repeats.
    pub rows_removed: u64,
}

/// Queries and the one repair the audit performs.
#[async_trait]
pub trait HierarchyStore: Send {
    /// Processes at the top level, ordered by name.
    async fn top_level_processes(&mut self) -> Result<Vec<BusinessProcess>, StoreError>;

    /// Relationships whose child is a top-level process.
    async fn invalid_parent_links(&mut self) -> Result<Vec<InvalidParentLink>, StoreError>;

    /// Delete each link by exact child/parent pair in one transaction,
    /// committed once after the last delete. Nothing is applied on error.
    async fn remove_parent_links(
        &mut self,
        links: &[InvalidParentLink],
    ) -> Result<Vec<RemovedLink>, StoreError>;

    /// Non-top-level processes that are never a relationship child,
    /// ordered by level then name.
    async fn orphaned_processes(&mut self) -> Result<Vec<BusinessProcess>, StoreError>;

    /// Non-top-level processes under more than one distinct parent.
    async fn processes_with_multiple_parents(
        &mut self,
    ) -> Result<Vec<MultiParentProcess>, StoreError>;

    /// Every relationship joined with both endpoints, ordered by parent
    /// name, parent id, then sequence number.
    async fn hierarchy_edges(&mut self) -> Result<Vec<HierarchyEdge>, StoreError>;
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// [`HierarchyStore`] over one open Postgres connection.
pub struct PgHierarchyStore {
    conn: PgConnection,
}

impl PgHierarchyStore {
    pub fn new(conn: PgConnection) -> Self {
        Self { conn }
    }

    /// Close the connection cleanly.
    pub async fn close(self) -> Result<(), StoreError> {
        self.conn.close().await?;
        tracing::debug!("Database connection closed");
        Ok(())
    }
}

#[async_trait]
impl HierarchyStore for PgHierarchyStore {
    async fn top_level_processes(&mut self) -> Result<Vec<BusinessProcess>, StoreError> {
        Ok(BusinessProcessRepo::list_by_level(&mut self.conn, TOP_LEVEL).await?)
    }

    async fn invalid_parent_links(&mut self) -> Result<Vec<InvalidParentLink>, StoreError> {
        Ok(ProcessRelationshipRepo::list_with_child_level(&mut self.conn, TOP_LEVEL).await?)
    }

    async fn remove_parent_links(
        &mut self,
        links: &[InvalidParentLink],
    ) -> Result<Vec<RemovedLink>, StoreError> {
        let mut tx = self.conn.begin().await?;
        let mut removed = Vec::with_capacity(links.len());

        for link in links {
            let rows_removed =
                ProcessRelationshipRepo::delete_link(&mut *tx, link.child_id, link.parent_id)
                    .await?;
            tracing::debug!(
                child_id = link.child_id,
                parent_id = link.parent_id,
                rows_removed,
                "Deleted parent link",
            );
            removed.push(RemovedLink {
                link: link.clone(),
                rows_removed,
            });
        }

        tx.commit().await?;
        Ok(removed)
    }

    async fn orphaned_processes(&mut self) -> Result<Vec<BusinessProcess>, StoreError> {
        Ok(BusinessProcessRepo::list_orphans(&mut self.conn, TOP_LEVEL).await?)
    }

    async fn processes_with_multiple_parents(
        &mut self,
    ) -> Result<Vec<MultiParentProcess>, StoreError> {
        Ok(BusinessProcessRepo::list_with_multiple_parents(&mut self.conn, TOP_LEVEL).await?)
    }

    async fn hierarchy_edges(&mut self) -> Result<Vec<HierarchyEdge>, StoreError> {
        Ok(ProcessRelationshipRepo::list_edges(&mut self.conn).await?)
    }
}
