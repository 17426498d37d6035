//! Git synchronisation for repository checkouts.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{IndexerError, Result};

/// Branches considered for sync, in priority order.
const SYNC_BRANCHES: [&str; 3] = ["release", "main", "master"];

/// Outcome of a successful sync
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub branch: String,
    pub short_sha: String,
}

/// Fast-forwards a working copy to the preferred branch on `origin`
pub struct GitSync {
    repo_path: PathBuf,
}

impl GitSync {
    pub fn new(repo_path: impl AsRef<Path>) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
        }
    }

    /// Sync the checkout to the highest-priority branch available on origin.
    ///
    /// Preflight refuses paths that are not a checkout, a detached HEAD and
    /// a dirty work tree; only fast-forward updates are performed.
    pub fn sync(&self) -> Result<SyncOutcome> {
        self.ensure_work_tree()?;
        self.ensure_attached_head()?;
        self.ensure_clean_worktree()?;
        self.ensure_origin_remote()?;
        self.fetch()?;

        let branch = self.pick_branch()?;
        self.fast_forward(&branch)?;

        let short_sha = self.run(&["rev-parse", "--short", "HEAD"])?.trim().to_string();
        Ok(SyncOutcome { branch, short_sha })
    }

    fn ensure_work_tree(&self) -> Result<()> {
        if self.git(&["rev-parse", "--is-inside-work-tree"])?.status.success() {
            Ok(())
        } else {
            Err(IndexerError::Git(format!(
                "{} is not a git checkout, nothing to sync",
                self.repo_path.display()
            )))
        }
    }

    fn ensure_attached_head(&self) -> Result<()> {
        if self.git(&["symbolic-ref", "-q", "HEAD"])?.status.success() {
            Ok(())
        } else {
            Err(IndexerError::Git(
                "detached HEAD, checkout a branch before syncing".to_string(),
            ))
        }
    }

    fn ensure_clean_worktree(&self) -> Result<()> {
        let status = self.run(&["status", "--porcelain"])?;
        if status.trim().is_empty() {
            Ok(())
        } else {
            Err(IndexerError::Git(
                "uncommitted changes in working tree, commit or stash them first".to_string(),
            ))
        }
    }

    fn ensure_origin_remote(&self) -> Result<()> {
        if self.git(&["remote", "get-url", "origin"])?.status.success() {
            Ok(())
        } else {
            Err(IndexerError::Git(
                "no 'origin' remote configured, fix with: git remote add origin <url>".to_string(),
            ))
        }
    }

    fn fetch(&self) -> Result<()> {
        let shallow = self.run(&["rev-parse", "--is-shallow-repository"])?;
        if shallow.trim() == "true" {
            if !self.git(&["fetch", "--unshallow", "origin"])?.status.success() {
                tracing::warn!("could not unshallow repository, falling back to plain fetch");
                self.run(&["fetch", "origin"])?;
            }
        } else {
            self.run(&["fetch", "origin"])?;
        }
        Ok(())
    }

    fn pick_branch(&self) -> Result<String> {
        for branch in SYNC_BRANCHES {
            let probe = self.git(&[
                "rev-parse",
                "--verify",
                "--quiet",
                &format!("refs/remotes/origin/{branch}"),
            ])?;
            if probe.status.success() {
                return Ok(branch.to_string());
            }
        }
        Err(IndexerError::Git(
            "no release/main/master branch on origin".to_string(),
        ))
    }

    fn fast_forward(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch])?;
        self.run(&["merge", "--ff-only", &format!("origin/{branch}")])?;
        Ok(())
    }

    /// Run git, returning stdout; a non-zero exit becomes a Git error
    /// carrying the command's stderr.
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.git(args)?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(IndexerError::Git(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )))
        }
    }

    fn git(&self, args: &[&str]) -> Result<std::process::Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .map_err(|e| IndexerError::Git(format!("could not run git: {e}")))
    }
}
