//! Console report for an audit run.
//!
//! Human-readable text only; sections are separated by a row of `=`.

use std::io::{self, Write};

use bpaudit_core::hierarchy::TOP_LEVEL;
use bpaudit_core::tree::ParentGroup;
use bpaudit_db::models::business_process::{BusinessProcess, MultiParentProcess};
use bpaudit_db::models::relationship::{HierarchyEdge, InvalidParentLink};

use crate::store::RemovedLink;

/// Width of the section separator.
pub const SEPARATOR_WIDTH: usize = 80;

/// A relationship that breaks the level adjacency rule, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyViolation {
    pub edge: HierarchyEdge,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Line formatting
// ---------------------------------------------------------------------------

pub fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

pub fn process_line(p: &BusinessProcess) -> String {
    format!(
        "  ID: {}, Name: {}, Level: {}, Status: {}",
        p.id, p.business_process, p.level, p.status
    )
}

pub fn parent_heading(name: &str, level: &str) -> String {
    format!("{name} (Level {level})")
}

pub fn child_line(edge: &HierarchyEdge) -> String {
    format!(
        "  └── {} (Level {}, Seq: {})",
        edge.child_name, edge.child_level, edge.sequence_number
    )
}

// ---------------------------------------------------------------------------
// Report writer
// ---------------------------------------------------------------------------

/// Writes each report section to `W`.
pub struct Report<W> {
    out: W,
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn header(&mut self) -> io::Result<()> {
        writeln!(self.out, "Analyzing Business Processes...")?;
        writeln!(self.out, "{}", separator())
    }

    /// Blank line, separator, then the section title.
    pub fn section(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", separator())?;
        writeln!(self.out, "{title}")
    }

    pub fn top_level(&mut self, processes: &[BusinessProcess]) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "Found {} Level {TOP_LEVEL} processes:",
            processes.len()
        )?;
        for p in processes {
            writeln!(self.out, "{}", process_line(p))?;
        }
        Ok(())
    }

    pub fn invalid_links(&mut self, links: &[InvalidParentLink]) -> io::Result<()> {
        writeln!(self.out)?;
        if links.is_empty() {
            return writeln!(
                self.out,
                "No Level {TOP_LEVEL} processes with parent relationships found (Good!)"
            );
        }

        writeln!(
            self.out,
            "FOUND {} Level {TOP_LEVEL} processes with parent relationships (INVALID):",
            links.len()
        )?;
        for link in links {
            writeln!(self.out)?;
            writeln!(
                self.out,
                "  Child: {} (ID: {}, Level: {})",
                link.child_name, link.child_id, link.child_level
            )?;
            writeln!(
                self.out,
                "  Parent: {} (ID: {}, Level: {})",
                link.parent_name, link.parent_id, link.parent_level
            )?;
        }
        Ok(())
    }

    pub fn removed_links(&mut self, removed: &[RemovedLink]) -> io::Result<()> {
        for r in removed {
            writeln!(
                self.out,
                "  Removed parent relationship: {} is no longer a child of {}",
                r.link.child_name, r.link.parent_name
            )?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "All invalid parent relationships have been removed!")
    }

    pub fn orphans(&mut self, orphans: &[BusinessProcess]) -> io::Result<()> {
        writeln!(self.out)?;
        if orphans.is_empty() {
            return writeln!(self.out, "No orphaned processes found (Good!)");
        }

        writeln!(self.out, "Found {} orphaned processes:", orphans.len())?;
        for p in orphans {
            writeln!(self.out, "{}", process_line(p))?;
        }
        writeln!(self.out)?;
        writeln!(
            self.out,
            "These processes should either be Level {TOP_LEVEL} or have a parent process!"
        )
    }

    pub fn multiple_parents(&mut self, processes: &[MultiParentProcess]) -> io::Result<()> {
        writeln!(self.out)?;
        if processes.is_empty() {
            return writeln!(self.out, "No processes with multiple parents found (Good!)");
        }

        writeln!(
            self.out,
            "Found {} processes with multiple parents:",
            processes.len()
        )?;
        for p in processes {
            writeln!(
                self.out,
                "  ID: {}, Name: {}, Level: {}, Parents: {}",
                p.id, p.business_process, p.level, p.parent_count
            )?;
        }
        Ok(())
    }

    pub fn adjacency(&mut self, violations: &[AdjacencyViolation]) -> io::Result<()> {
        writeln!(self.out)?;
        if violations.is_empty() {
            return writeln!(self.out, "All relationships follow level order (Good!)");
        }

        writeln!(
            self.out,
            "Found {} relationships violating level order:",
            violations.len()
        )?;
        for v in violations {
            let e = &v.edge;
            writeln!(
                self.out,
                "  {} (ID: {}, Level: {}) -> {} (ID: {}, Level: {}): {}",
                e.parent_name,
                e.parent_id,
                e.parent_level,
                e.child_name,
                e.child_id,
                e.child_level,
                v.reason
            )?;
        }
        Ok(())
    }

    /// Parent heading followed by one indented line per child edge.
    pub fn tree(&mut self, groups: &[ParentGroup<HierarchyEdge>]) -> io::Result<()> {
        for group in groups {
            let Some(first) = group.children.first() else {
                continue;
            };
            writeln!(self.out)?;
            writeln!(
                self.out,
                "{}",
                parent_heading(&first.parent_name, &first.parent_level)
            )?;
            for edge in &group.children {
                writeln!(self.out, "{}", child_line(edge))?;
            }
        }
        Ok(())
    }

    pub fn footer(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", separator())?;
        writeln!(self.out, "Analysis complete!")?;
        self.out.flush()
    }
}
