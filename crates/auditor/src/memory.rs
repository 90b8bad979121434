//! In-memory [`HierarchyStore`] for driving the audit without a database.
//!
//! Mirrors the Postgres queries: inner joins drop relationships whose
//! endpoints are missing, orphan detection is a NOT-IN over relationship
//! children, and every listing uses the same sort keys. Text is compared
//! bytewise, so ordering can differ from a locale-aware collation.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use bpaudit_core::hierarchy::is_top_level;
use bpaudit_core::types::{DbId, SequenceNumber};
use bpaudit_db::models::business_process::{BusinessProcess, MultiParentProcess};
use bpaudit_db::models::relationship::{HierarchyEdge, InvalidParentLink, ProcessRelationship};

use crate::store::{HierarchyStore, RemovedLink, StoreError};

/// A store operation that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    TopLevel,
    InvalidLinks,
    RemoveLinks,
    Orphans,
    MultipleParents,
    Edges,
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    processes: Vec<BusinessProcess>,
    relationships: Vec<ProcessRelationship>,
    fail_on: Option<StoreOperation>,
    calls: Vec<StoreOperation>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active process.
    pub fn with_process(self, id: DbId, name: &str, level: &str) -> Self {
        self.with_process_status(id, name, level, "active")
    }

    pub fn with_process_status(mut self, id: DbId, name: &str, level: &str, status: &str) -> Self {
        self.processes.push(BusinessProcess {
            id,
            business_process: name.to_string(),
            level: level.to_string(),
            status: status.to_string(),
        });
        self
    }

    /// Record `child` under `parent` at sibling position `seq`.
    pub fn with_relationship(mut self, parent: DbId, child: DbId, seq: SequenceNumber) -> Self {
        self.relationships.push(ProcessRelationship {
            child_process_id: child,
            parent_process_id: parent,
            sequence_number: seq,
        });
        self
    }

    /// Make `op` return [`StoreError::Unavailable`] without side effects.
    pub fn failing_on(mut self, op: StoreOperation) -> Self {
        self.fail_on = Some(op);
        self
    }

    /// Current relationship rows, in insertion order.
    pub fn relationships(&self) -> &[ProcessRelationship] {
        &self.relationships
    }

    /// Relationship rows whose child is `child_id`.
    pub fn relationships_for_child(&self, child_id: DbId) -> Vec<&ProcessRelationship> {
        self.relationships
            .iter()
            .filter(|r| r.child_process_id == child_id)
            .collect()
    }

    /// Operations invoked so far, in order, including failed ones.
    pub fn calls(&self) -> &[StoreOperation] {
        &self.calls
    }

    fn enter(&mut self, op: StoreOperation) -> Result<(), StoreError> {
        self.calls.push(op);
        if self.fail_on == Some(op) {
            return Err(StoreError::Unavailable(format!("{op:?} failed")));
        }
        Ok(())
    }

    fn by_id(&self) -> HashMap<DbId, &BusinessProcess> {
        self.processes.iter().map(|p| (p.id, p)).collect()
    }
}

#[async_trait]
impl HierarchyStore for InMemoryStore {
    async fn top_level_processes(&mut self) -> Result<Vec<BusinessProcess>, StoreError> {
        self.enter(StoreOperation::TopLevel)?;

        let mut rows: Vec<BusinessProcess> = self
            .processes
            .iter()
            .filter(|p| is_top_level(&p.level))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.business_process.cmp(&b.business_process));
        Ok(rows)
    }

    async fn invalid_parent_links(&mut self) -> Result<Vec<InvalidParentLink>, StoreError> {
        self.enter(StoreOperation::InvalidLinks)?;

        let by_id = self.by_id();
        let mut rows: Vec<InvalidParentLink> = self
            .relationships
            .iter()
            .filter_map(|r| {
                let child = by_id.get(&r.child_process_id)?;
                let parent = by_id.get(&r.parent_process_id)?;
                is_top_level(&child.level).then(|| InvalidParentLink {
                    child_id: child.id,
                    child_name: child.business_process.clone(),
                    child_level: child.level.clone(),
                    parent_id: parent.id,
                    parent_name: parent.business_process.clone(),
                    parent_level: parent.level.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            (&a.child_name, a.child_id, &a.parent_name, a.parent_id).cmp(&(
                &b.child_name,
                b.child_id,
                &b.parent_name,
                b.parent_id,
            ))
        });
        Ok(rows)
    }

    async fn remove_parent_links(
        &mut self,
        links: &[InvalidParentLink],
    ) -> Result<Vec<RemovedLink>, StoreError> {
        self.enter(StoreOperation::RemoveLinks)?;

        // Work on a copy so nothing is applied unless every delete succeeds.
        let mut rows = self.relationships.clone();
        let mut removed = Vec::with_capacity(links.len());
        for link in links {
            let before = rows.len();
            rows.retain(|r| {
                !(r.child_process_id == link.child_id && r.parent_process_id == link.parent_id)
            });
            removed.push(RemovedLink {
                link: link.clone(),
                rows_removed: (before - rows.len()) as u64,
            });
        }

        self.relationships = rows;
        Ok(removed)
    }

    async fn orphaned_processes(&mut self) -> Result<Vec<BusinessProcess>, StoreError> {
        self.enter(StoreOperation::Orphans)?;

        let children: BTreeSet<DbId> = self
            .relationships
            .iter()
            .map(|r| r.child_process_id)
            .collect();
        let mut rows: Vec<BusinessProcess> = self
            .processes
            .iter()
            .filter(|p| !is_top_level(&p.level) && !children.contains(&p.id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (&a.level, &a.business_process).cmp(&(&b.level, &b.business_process)));
        Ok(rows)
    }

    async fn processes_with_multiple_parents(
        &mut self,
    ) -> Result<Vec<MultiParentProcess>, StoreError> {
        self.enter(StoreOperation::MultipleParents)?;

        let mut parents: HashMap<DbId, BTreeSet<DbId>> = HashMap::new();
        for r in &self.relationships {
            parents
                .entry(r.child_process_id)
                .or_default()
                .insert(r.parent_process_id);
        }

        let mut rows: Vec<MultiParentProcess> = self
            .processes
            .iter()
            .filter(|p| !is_top_level(&p.level))
            .filter_map(|p| {
                let count = parents.get(&p.id).map_or(0, BTreeSet::len);
                (count > 1).then(|| MultiParentProcess {
                    id: p.id,
                    business_process: p.business_process.clone(),
                    level: p.level.clone(),
                    parent_count: count as i64,
                })
            })
            .collect();
        rows.sort_by(|a, b| (&a.level, &a.business_process).cmp(&(&b.level, &b.business_process)));
        Ok(rows)
    }

    async fn hierarchy_edges(&mut self) -> Result<Vec<HierarchyEdge>, StoreError> {
        self.enter(StoreOperation::Edges)?;

        let by_id = self.by_id();
        let mut rows: Vec<HierarchyEdge> = self
            .relationships
            .iter()
            .filter_map(|r| {
                let parent = by_id.get(&r.parent_process_id)?;
                let child = by_id.get(&r.child_process_id)?;
                Some(HierarchyEdge {
                    parent_id: parent.id,
                    parent_name: parent.business_process.clone(),
                    parent_level: parent.level.clone(),
                    child_id: child.id,
                    child_name: child.business_process.clone(),
                    child_level: child.level.clone(),
                    sequence_number: r.sequence_number,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            (&a.parent_name, a.parent_id, a.sequence_number, a.child_id).cmp(&(
                &b.parent_name,
                b.parent_id,
                b.sequence_number,
                b.child_id,
            ))
        });
        Ok(rows)
    }
}
