//! The audit and repair run.
//!
//! Steps, in order:
//! 1. list top-level processes
//! 2. find relationships whose child is top level
//! 3. delete those relationships in one transaction (skipped when none)
//! 4. list orphaned and multi-parent processes
//! 5. check level adjacency and print the hierarchy tree
//!
//! Step 3 is the only one that writes to the database.

use std::io::Write;

use bpaudit_core::hierarchy::{adjacency_violation, TOP_LEVEL};
use bpaudit_core::tree::group_by_parent;
use bpaudit_db::models::relationship::HierarchyEdge;
use sqlx::PgConnection;

use crate::config::AuditConfig;
use crate::error::{AuditError, AuditResult};
use crate::report::{AdjacencyViolation, Report};
use crate::store::{HierarchyStore, PgHierarchyStore};

/// Counts gathered during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditSummary {
    pub top_level_processes: usize,
    /// Links found in step 2.
    pub invalid_links: usize,
    /// Relationship rows deleted in step 3.
    pub links_removed: u64,
    pub orphaned_processes: usize,
    pub multi_parent_processes: usize,
    pub adjacency_violations: usize,
    /// Parent headings printed in the tree.
    pub tree_parents: usize,
}

impl AuditSummary {
    /// Whether problems remain that the run does not repair.
    pub fn needs_attention(&self) -> bool {
        self.orphaned_processes > 0
            || self.multi_parent_processes > 0
            || self.adjacency_violations > 0
    }
}

/// Connect to the configured database and run the audit over it.
///
/// A connection failure prints one line to `out` and returns
/// [`AuditError::Connect`] before any query is issued.
pub async fn run<W: Write>(config: &AuditConfig, out: &mut W) -> AuditResult<AuditSummary> {
    tracing::info!(database = %config.redacted_url(), "Starting business process audit");

    let conn = match bpaudit_db::connect(&config.database_url).await {
        Ok(conn) => conn,
        Err(e) => return Err(connect_failed(out, e)),
    };

    run_connected(conn, out).await
}

/// Run the audit over an already open connection, then close it.
///
/// The connection must answer a health check first; a failed check is
/// reported the same way as a failed connect.
pub async fn run_connected<W: Write>(
    mut conn: PgConnection,
    out: &mut W,
) -> AuditResult<AuditSummary> {
    if let Err(e) = bpaudit_db::health_check(&mut conn).await {
        return Err(connect_failed(out, e));
    }

    let mut store = PgHierarchyStore::new(conn);
    let summary = run_audit(&mut store, out).await?;
    store.close().await?;
    Ok(summary)
}

fn connect_failed<W: Write>(out: &mut W, e: sqlx::Error) -> AuditError {
    tracing::error!(error = %e, "Failed to connect to database");
    match writeln!(out, "Failed to connect to database: {e}") {
        Ok(()) => AuditError::Connect(e),
        Err(io) => AuditError::Output(io),
    }
}

/// Run every audit step against `store`, writing the report to `out`.
pub async fn run_audit<S, W>(store: &mut S, out: &mut W) -> AuditResult<AuditSummary>
where
    S: HierarchyStore + ?Sized,
    W: Write,
{
    let mut report = Report::new(out);
    let mut summary = AuditSummary::default();

    report.header()?;

    // 1. Top-level processes.
    let top_level = store.top_level_processes().await?;
    summary.top_level_processes = top_level.len();
    tracing::info!(count = top_level.len(), level = TOP_LEVEL, "Listed top-level processes");
    report.top_level(&top_level)?;

    // 2. Top-level processes that have a parent.
    report.section(&format!(
        "Checking for Level {TOP_LEVEL} processes with parent relationships..."
    ))?;
    let invalid = store.invalid_parent_links().await?;
    summary.invalid_links = invalid.len();
    report.invalid_links(&invalid)?;

    // 3. Repair.
    if !invalid.is_empty() {
        tracing::warn!(count = invalid.len(), "Top-level processes with parent links found");
        report.section(&format!(
            "Fixing the issue by removing parent relationships for Level {TOP_LEVEL} processes..."
        ))?;
        let removed = store.remove_parent_links(&invalid).await?;
        summary.links_removed = removed.iter().map(|r| r.rows_removed).sum();
        tracing::info!(rows = summary.links_removed, "Invalid parent links removed");
        report.removed_links(&removed)?;
    }

    // 4. Orphans and multiple parents.
    report.section(&format!(
        "Checking for orphaned processes (non-Level {TOP_LEVEL} without parents)..."
    ))?;
    let orphans = store.orphaned_processes().await?;
    summary.orphaned_processes = orphans.len();
    if !orphans.is_empty() {
        tracing::warn!(count = orphans.len(), "Orphaned processes found");
    }
    report.orphans(&orphans)?;

    report.section("Checking for processes with more than one parent...")?;
    let multi = store.processes_with_multiple_parents().await?;
    summary.multi_parent_processes = multi.len();
    if !multi.is_empty() {
        tracing::warn!(count = multi.len(), "Processes with multiple parents found");
    }
    report.multiple_parents(&multi)?;

    // 5. Level order and tree.
    let edges = store.hierarchy_edges().await?;

    report.section("Checking relationships against level order...")?;
    let violations = level_order_violations(&edges);
    summary.adjacency_violations = violations.len();
    if !violations.is_empty() {
        tracing::warn!(count = violations.len(), "Relationships violating level order found");
    }
    report.adjacency(&violations)?;

    report.section("Final Business Process Tree Structure:")?;
    let groups = group_by_parent(edges, |e| e.parent_id);
    summary.tree_parents = groups.len();
    report.tree(&groups)?;

    report.footer()?;

    tracing::info!(?summary, "Audit complete");
    Ok(summary)
}

fn level_order_violations(edges: &[HierarchyEdge]) -> Vec<AdjacencyViolation> {
    edges
        .iter()
        .filter_map(|e| {
            adjacency_violation(&e.parent_level, &e.child_level).map(|reason| {
                AdjacencyViolation {
                    edge: e.clone(),
                    reason,
                }
            })
        })
        .collect()
}
