//! Bounded Dockerfile discovery.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// Directories never descended into during traversal.
const SKIP_DIRS: [&str; 6] = [".git", "node_modules", "vendor", "venv", ".venv", "__pycache__"];

/// Maximum directory depth to traverse when searching for Dockerfiles.
pub const MAX_DOCKERFILE_DEPTH: usize = 4;

/// Abort descent after visiting this many directories (breadth guard for huge trees).
pub const MAX_DIRS_VISITED: usize = 1000;

fn is_skipped(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIP_DIRS.contains(&name))
}

/// Find `Dockerfile`s up to [`MAX_DOCKERFILE_DEPTH`] levels below `root`.
pub fn find_dockerfiles(root: &Path) -> Vec<PathBuf> {
    find_dockerfiles_within(root, MAX_DOCKERFILE_DEPTH)
}

/// Find `Dockerfile`s up to `max_depth` levels below `root`.
///
/// Symbolic links are not followed, so a linked directory cannot pull the
/// search outside the repository root. Unreadable entries are skipped.
pub fn find_dockerfiles_within(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    walk_dockerfiles(root, max_depth, MAX_DIRS_VISITED)
}

fn walk_dockerfiles(root: &Path, max_depth: usize, max_dirs: usize) -> Vec<PathBuf> {
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

    let mut found = Vec::new();
    let mut dirs_visited = 0usize;
    let mut walker = WalkDir::new(&root)
        .follow_links(false)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry));

    while let Some(entry) = walker.next() {
        let Ok(entry) = entry else { continue };
        if entry.file_type().is_dir() {
            dirs_visited += 1;
            if dirs_visited > max_dirs {
                // Finish the already-entered frontier without descending further.
                tracing::debug!(
                    "dockerfile search visited more than {max_dirs} directories, not descending further"
                );
                walker.skip_current_dir();
            }
        } else if entry.file_type().is_file() && entry.file_name() == "Dockerfile" {
            found.push(entry.into_path());
        }
    }

    found
}
