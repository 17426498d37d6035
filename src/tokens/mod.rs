//! Token estimation and budget enforcement for memory files.
//!
//! Memory files are the small markdown notes (`CLAUDE.md` and
//! `.claude/memory/*.md`) that seed an AI agent's context; each carries a
//! token budget so the whole set stays cheap to load.

pub mod estimator;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub use estimator::{check_file, estimate_tokens, estimate_tokens_for, validate, ContentMode};

/// Per-file token budgets keyed by file name.
pub static BUDGETS: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    HashMap::from([
        ("CLAUDE.md", 500),
        ("architecture.md", 5000),
        ("conventions.md", 3000),
        ("glossary.md", 2000),
    ])
});

/// Default budget applied to any memory file not listed in [`BUDGETS`].
pub const MEMORY_DEFAULT_BUDGET: usize = 5000;

/// Aggregate budget for all memory files combined.
pub const MEMORY_TOTAL_BUDGET: usize = 10_000;

/// Result of checking one memory file against its budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCheck {
    /// Estimated token count (0 when the file could not be read)
    pub tokens: usize,
    /// Budget the file was checked against
    pub budget: usize,
    /// Whether the file exceeds its budget
    pub over: bool,
    /// Percentage of the budget used, absent when the file could not be read
    pub pct: Option<f64>,
    /// Read failure description, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate validation report for a repository's memory files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// False iff any budget violation or read failure was recorded
    pub valid: bool,
    /// Per-file results in report order
    pub files: Vec<(String, FileCheck)>,
    /// Total estimated tokens across all checked files
    pub total: usize,
    /// Human-readable violation descriptions
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            valid: true,
            files: Vec::new(),
            total: 0,
            errors: Vec::new(),
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}
