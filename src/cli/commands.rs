use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use repo_indexer::detect::RepoTypeDetector;
use repo_indexer::error::Result;
use repo_indexer::git::GitSync;
use repo_indexer::memory::{MemoryContext, MemoryUpdateGenerator};
use repo_indexer::tokens;

#[derive(Parser)]
#[command(name = "repo-indexer")]
#[command(about = "CLI tool for repository architecture detection and memory context generation")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Classify the current repository
    repo-indexer detect

    # Classify a specific path, as JSON
    repo-indexer detect ../service --format json

    # Check memory files against their token budgets
    repo-indexer validate

    # Render a memory update snippet from repository facts
    repo-indexer memory-update '{"repo_name":"api","repo_type":"microservices","tech_stack":["Go"],"key_modules":["handlers"],"patterns":[]}'

    # Fast-forward the checkout to the preferred upstream branch
    repo-indexer sync
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the repository architecture type
    Detect {
        /// Path to the repository root
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check memory files against their token budgets
    Validate {
        /// Path to the repository root
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Render a memory update snippet from repository facts
    MemoryUpdate {
        /// JSON object with repo_name, repo_type, tech_stack, key_modules, patterns
        json: Option<String>,
    },

    /// Fast-forward the checkout to the preferred upstream branch
    Sync {
        /// Path to the repository root
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

/// Canonicalize a repository root, exiting with a usage error when it is
/// not a directory.
pub fn resolve_root(path: &Path) -> PathBuf {
    match path.canonicalize() {
        Ok(root) if root.is_dir() => root,
        _ => {
            eprintln!("ERROR: '{}' is not a valid directory", path.display());
            std::process::exit(1);
        }
    }
}

pub fn detect(root: &Path, format: &str) -> Result<()> {
    let classification = RepoTypeDetector::detect(root);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&classification)?);
    } else {
        println!(
            "TYPE: {} (confidence: {:.2})",
            classification.repo_type.as_str(),
            classification.confidence
        );
        for entry in &classification.evidence {
            println!("  - {entry}");
        }
    }

    Ok(())
}

pub fn validate_budgets(root: &Path) -> bool {
    let report = tokens::validate(root);

    println!("Valid: {} | Total: {} tokens", report.valid, report.total);
    for (name, info) in &report.files {
        let status = if info.over { "⚠️ OVER" } else { "✓" };
        let pct = info
            .pct
            .map_or_else(|| "N/A".to_string(), |pct| format!("{pct}%"));
        println!("  {status} {name}: {}/{} ({pct})", info.tokens, info.budget);
    }
    for error in &report.errors {
        println!("❌ {error}");
    }

    report.valid
}

pub fn memory_update(payload: Option<&str>) {
    let context = match payload {
        Some(payload) => match serde_json::from_str::<MemoryContext>(payload) {
            Ok(context) => context,
            Err(e) => {
                eprintln!("ERROR: Invalid JSON input: {e}");
                eprintln!(
                    "  JSON must contain: repo_name, repo_type, tech_stack, key_modules, patterns"
                );
                std::process::exit(1);
            }
        },
        None => MemoryContext::example(),
    };

    println!("{}", MemoryUpdateGenerator::generate(&context));
}

pub fn sync(path: &Path) {
    match GitSync::new(path).sync() {
        Ok(outcome) => println!("SYNCED: {} ({})", outcome.branch, outcome.short_sha),
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}
