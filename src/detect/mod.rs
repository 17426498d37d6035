//! Repository architecture detection.
//!
//! This module classifies a repository tree into one of four architecture
//! categories using weighted structural signals:
//! - Monorepos (workspace config files, package directories)
//! - Microservices (compose manifests, multiple Dockerfiles)
//! - Libraries (packaging manifests)
//! - Single applications (the fallback when nothing scores strongly)

pub mod classifier;
pub mod dockerfiles;

use serde::{Deserialize, Serialize};

pub use classifier::RepoTypeDetector;
pub use dockerfiles::{find_dockerfiles, find_dockerfiles_within, MAX_DIRS_VISITED, MAX_DOCKERFILE_DEPTH};

/// Architecture category of a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoType {
    Monorepo,
    Microservices,
    SingleApp,
    Library,
}

impl RepoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoType::Monorepo => "monorepo",
            RepoType::Microservices => "microservices",
            RepoType::SingleApp => "single_app",
            RepoType::Library => "library",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "monorepo" => Some(RepoType::Monorepo),
            "microservices" => Some(RepoType::Microservices),
            "single_app" => Some(RepoType::SingleApp),
            "library" => Some(RepoType::Library),
            _ => None,
        }
    }
}

/// Per-category score accumulators.
///
/// Field declaration order is also the tie-break order for winner selection:
/// among equal maximum scores the first of `monorepo, microservices,
/// single_app, library` wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorScores {
    pub monorepo: u32,
    pub microservices: u32,
    pub single_app: u32,
    pub library: u32,
}

impl IndicatorScores {
    pub fn get(&self, repo_type: RepoType) -> u32 {
        match repo_type {
            RepoType::Monorepo => self.monorepo,
            RepoType::Microservices => self.microservices,
            RepoType::SingleApp => self.single_app,
            RepoType::Library => self.library,
        }
    }

    pub fn add(&mut self, repo_type: RepoType, weight: u32) {
        match repo_type {
            RepoType::Monorepo => self.monorepo += weight,
            RepoType::Microservices => self.microservices += weight,
            RepoType::SingleApp => self.single_app += weight,
            RepoType::Library => self.library += weight,
        }
    }

    pub fn total(&self) -> u32 {
        self.monorepo + self.microservices + self.single_app + self.library
    }

    /// Highest-scoring category, first in declaration order among ties.
    pub fn winner(&self) -> RepoType {
        let mut best = RepoType::Monorepo;
        for candidate in [RepoType::Microservices, RepoType::SingleApp, RepoType::Library] {
            if self.get(candidate) > self.get(best) {
                best = candidate;
            }
        }
        best
    }
}

/// Result of classifying a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Winning category
    #[serde(rename = "type")]
    pub repo_type: RepoType,
    /// Winning score divided by the total score, rounded to 2 decimals
    pub confidence: f64,
    /// One human-readable entry per signal that fired, in detection order
    pub evidence: Vec<String>,
    /// Final per-category scores
    pub scores: IndicatorScores,
}
