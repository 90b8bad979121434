//! Process level constants, validation, and parent/child rules.
//!
//! Levels are stored as free text in `business_processes.level`. Only
//! `A`, `B` and `C` are meaningful; anything else is reported verbatim
//! and never treated as top level.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Level constants
// ---------------------------------------------------------------------------

/// Top rank of the hierarchy. Processes at this level must have no parent.
pub const LEVEL_A: &str = "A";
/// Second rank; children of `A` processes.
pub const LEVEL_B: &str = "B";
/// Leaf rank; children of `B` processes.
pub const LEVEL_C: &str = "C";

/// The level value the audit treats as top rank.
pub const TOP_LEVEL: &str = LEVEL_A;

/// All valid level values, top rank first.
pub const VALID_LEVELS: &[&str] = &[LEVEL_A, LEVEL_B, LEVEL_C];

// ---------------------------------------------------------------------------
// ProcessLevel
// ---------------------------------------------------------------------------

/// A known classification level of a business process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProcessLevel {
    A,
    B,
    C,
}

impl ProcessLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessLevel::A => LEVEL_A,
            ProcessLevel::B => LEVEL_B,
            ProcessLevel::C => LEVEL_C,
        }
    }

    pub fn is_top(self) -> bool {
        self == ProcessLevel::A
    }

    /// The only level allowed directly beneath this one, if any.
    pub fn child_level(self) -> Option<ProcessLevel> {
        match self {
            ProcessLevel::A => Some(ProcessLevel::B),
            ProcessLevel::B => Some(ProcessLevel::C),
            ProcessLevel::C => None,
        }
    }

    /// Whether a process at `self` may be the parent of one at `child`.
    pub fn may_parent(self, child: ProcessLevel) -> bool {
        self.child_level() == Some(child)
    }
}

impl fmt::Display for ProcessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            LEVEL_A => Ok(ProcessLevel::A),
            LEVEL_B => Ok(ProcessLevel::B),
            LEVEL_C => Ok(ProcessLevel::C),
            other => Err(CoreError::Validation(format!(
                "Unknown process level: '{other}'. Valid levels: {}",
                VALID_LEVELS.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule helpers
// ---------------------------------------------------------------------------

/// Whether a stored level value is the top rank. Exact match, as in SQL.
pub fn is_top_level(level: &str) -> bool {
    level.parse::<ProcessLevel>().is_ok_and(ProcessLevel::is_top)
}

/// Check a stored parent/child level pair against the adjacency rule.
///
/// Returns the reason the pair is invalid, or `None` when it is allowed.
/// Unknown level values on either side are always reported.
pub fn adjacency_violation(parent_level: &str, child_level: &str) -> Option<String> {
    let parent = match parent_level.parse::<ProcessLevel>() {
        Ok(level) => level,
        Err(e) => return Some(format!("parent: {e}")),
    };
    let child = match child_level.parse::<ProcessLevel>() {
        Ok(level) => level,
        Err(e) => return Some(format!("child: {e}")),
    };

    if parent.may_parent(child) {
        return None;
    }

    Some(match parent.child_level() {
        None => format!("Level {parent} processes cannot have children"),
        Some(expected) => {
            format!("Only Level {expected} processes can be children of Level {parent}")
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
