//! Byte-length token estimation and budget checks.

use std::fs;
use std::path::Path;

use super::{FileCheck, ValidationReport, BUDGETS, MEMORY_DEFAULT_BUDGET, MEMORY_TOTAL_BUDGET};

// Rough estimate: 1 token ~ 4 UTF-8 bytes of prose; code packs denser,
// closer to 3 bytes per token.
const PROSE_BYTES_PER_TOKEN: usize = 4;
const CODE_BYTES_PER_TOKEN: usize = 3;

/// Skip files larger than this to avoid reading huge files into memory.
const MAX_FILE_BYTES: u64 = 1_000_000;

/// Extensions estimated at the code density.
const CODE_EXTENSIONS: [&str; 18] = [
    "py", "js", "ts", "tsx", "jsx", "rs", "go", "java", "kt", "c", "cpp", "h", "rb", "sh",
    "yaml", "yml", "json", "toml",
];

/// Content density class used for token estimation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentMode {
    #[default]
    Prose,
    Code,
}

impl ContentMode {
    /// Guess the content mode from a file's extension.
    pub fn guess(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if CODE_EXTENSIONS.contains(&ext) => ContentMode::Code,
            _ => ContentMode::Prose,
        }
    }

    fn bytes_per_token(self) -> usize {
        match self {
            ContentMode::Prose => PROSE_BYTES_PER_TOKEN,
            ContentMode::Code => CODE_BYTES_PER_TOKEN,
        }
    }
}

/// Convert UTF-8 byte length to an approximate token count at prose density.
pub fn estimate_tokens(text: &str) -> usize {
    estimate_tokens_for(text, ContentMode::Prose)
}

/// Convert UTF-8 byte length to an approximate token count for `mode`.
pub fn estimate_tokens_for(text: &str, mode: ContentMode) -> usize {
    text.len() / mode.bytes_per_token()
}

fn budget_for(path: &Path) -> usize {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| BUDGETS.get(n).copied())
        .unwrap_or(MEMORY_DEFAULT_BUDGET)
}

fn unreadable(budget: usize, error: String) -> FileCheck {
    FileCheck {
        tokens: 0,
        budget,
        over: true,
        pct: None,
        error: Some(error),
    }
}

/// Check a memory file's token count against its budget.
///
/// Returns `None` when the file does not exist. Oversized or unreadable
/// files are flagged as over budget with an error description instead of
/// propagating the failure.
pub fn check_file(path: &Path) -> Option<FileCheck> {
    if !path.exists() {
        return None;
    }
    let budget = budget_for(path);

    let size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) => return Some(unreadable(budget, e.to_string())),
    };
    if size > MAX_FILE_BYTES {
        return Some(unreadable(budget, "file too large to check".to_string()));
    }

    let content = match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => return Some(unreadable(budget, e.to_string())),
    };

    let tokens = estimate_tokens_for(&content, ContentMode::guess(path));
    let pct = (tokens as f64 / budget as f64 * 1000.0).round() / 10.0;

    Some(FileCheck {
        tokens,
        budget,
        over: tokens > budget,
        pct: Some(pct),
        error: None,
    })
}

fn record(report: &mut ValidationReport, name: String, info: FileCheck) -> usize {
    let tokens = info.tokens;
    report.total += tokens;
    if info.over {
        report.errors.push(match &info.error {
            Some(err) => format!("{name}: {err}"),
            None => format!("{name}: {} > {}", info.tokens, info.budget),
        });
        report.valid = false;
    }
    report.files.push((name, info));
    tokens
}

/// Validate all memory files under `root` against their budgets.
///
/// Checks `CLAUDE.md` at the root and every `*.md` under `.claude/memory/`;
/// the memory files are additionally held to the combined
/// [`MEMORY_TOTAL_BUDGET`]. Missing files are simply not reported.
pub fn validate(root: &Path) -> ValidationReport {
    let mut report = ValidationReport::new();

    if let Some(info) = check_file(&root.join("CLAUDE.md")) {
        record(&mut report, "CLAUDE.md".to_string(), info);
    }

    let memory_dir = root.join(".claude").join("memory");
    if let Ok(entries) = fs::read_dir(&memory_dir) {
        let mut paths: Vec<_> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("md"))
            .collect();
        // Sorted so reports and error lists are deterministic across platforms.
        paths.sort();

        let mut memory_total = 0;
        for path in paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if let Some(info) = check_file(&path) {
                memory_total += record(&mut report, format!("memory/{name}"), info);
            }
        }

        if memory_total > MEMORY_TOTAL_BUDGET {
            report.errors.push(format!(
                "memory total: {memory_total} > {MEMORY_TOTAL_BUDGET} aggregate budget"
            ));
            report.valid = false;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_estimate_ascii() {
        assert_eq!(estimate_tokens("hello"), 1); // 5 bytes / 4
    }

    #[test]
    fn test_estimate_empty() {
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn test_estimate_longer_text() {
        let text = "word ".repeat(100); // 500 bytes
        assert_eq!(estimate_tokens(&text), 125);
    }

    #[test]
    fn test_estimate_multibyte() {
        let text = "\u{e9}".repeat(100); // 200 bytes of e-acute
        assert_eq!(estimate_tokens(&text), 50);
    }

    #[test]
    fn test_code_mode_is_denser() {
        let text = "x".repeat(300);
        assert_eq!(estimate_tokens_for(&text, ContentMode::Code), 100);
        assert_eq!(estimate_tokens_for(&text, ContentMode::Prose), 75);
    }

    #[test]
    fn test_guess_content_mode() {
        assert_eq!(ContentMode::guess(Path::new("script.py")), ContentMode::Code);
        assert_eq!(ContentMode::guess(Path::new("app.js")), ContentMode::Code);
        assert_eq!(ContentMode::guess(Path::new("config.yaml")), ContentMode::Code);
        assert_eq!(ContentMode::guess(Path::new("README.md")), ContentMode::Prose);
        assert_eq!(ContentMode::guess(Path::new("Makefile")), ContentMode::Prose);
    }

    #[test]
    fn test_check_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(check_file(&temp_dir.path().join("nonexistent.md")).is_none());
    }

    #[test]
    fn test_check_file_within_budget() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("CLAUDE.md");
        fs::write(&path, "# Short\nMinimal content.\n").unwrap();

        let info = check_file(&path).unwrap();
        assert!(!info.over);
        assert_eq!(info.budget, 500);
        assert!(info.pct.is_some());
    }

    #[test]
    fn test_check_file_over_budget() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("CLAUDE.md");
        // 3000 bytes of prose, well past the 500-token budget.
        fs::write(&path, "word ".repeat(600)).unwrap();

        let info = check_file(&path).unwrap();
        assert!(info.over);
        assert!(info.tokens > 500);
    }

    #[test]
    fn test_unknown_file_uses_default_budget() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.md");
        fs::write(&path, "# Custom\nSome content.\n").unwrap();

        let info = check_file(&path).unwrap();
        assert_eq!(info.budget, MEMORY_DEFAULT_BUDGET);
    }

    #[test]
    fn test_oversized_file_flagged_not_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("CLAUDE.md");
        fs::write(&path, vec![b'x'; 1_000_001]).unwrap();

        let info = check_file(&path).unwrap();
        assert!(info.over);
        assert_eq!(info.pct, None);
        assert_eq!(info.error.as_deref(), Some("file too large to check"));
    }

    #[test]
    fn test_file_exactly_at_max_bytes_is_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("CLAUDE.md");
        fs::write(&path, vec![b'x'; 1_000_000]).unwrap();

        // The guard is strictly greater than the limit.
        let info = check_file(&path).unwrap();
        assert!(info.error.is_none());
        assert!(info.tokens > 0);
    }

    #[test]
    fn test_validate_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let report = validate(temp_dir.path());

        assert!(report.valid);
        assert_eq!(report.total, 0);
        assert!(report.files.is_empty());
    }

    #[test]
    fn test_validate_claude_md_within_budget() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("CLAUDE.md"), "# Boot\nStack: Rust\n").unwrap();

        let report = validate(temp_dir.path());
        assert!(report.valid);
        assert!(report.files.iter().any(|(name, _)| name == "CLAUDE.md"));
    }

    #[test]
    fn test_validate_claude_md_over_budget() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("CLAUDE.md"), "word ".repeat(600)).unwrap();

        let report = validate(temp_dir.path());
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("CLAUDE.md")));
    }

    #[test]
    fn test_validate_memory_files_checked() {
        let temp_dir = TempDir::new().unwrap();
        let memory = temp_dir.path().join(".claude").join("memory");
        fs::create_dir_all(&memory).unwrap();
        fs::write(memory.join("architecture.md"), "# Architecture\n").unwrap();
        fs::write(memory.join("notes.txt"), "not markdown\n").unwrap();

        let report = validate(temp_dir.path());
        assert!(report.valid);
        assert!(report
            .files
            .iter()
            .any(|(name, _)| name == "memory/architecture.md"));
        assert!(!report.files.iter().any(|(name, _)| name.contains("notes")));
    }

    #[test]
    fn test_validate_aggregate_budget_enforced() {
        let temp_dir = TempDir::new().unwrap();
        let memory = temp_dir.path().join(".claude").join("memory");
        fs::create_dir_all(&memory).unwrap();
        // 5 files x 2500 tokens each, past the 10000-token aggregate.
        for i in 0..5 {
            fs::write(memory.join(format!("file{i}.md")), "word ".repeat(2000)).unwrap();
        }

        let report = validate(temp_dir.path());
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("memory total")));
    }

    #[test]
    fn test_validate_aggregate_budget_passes() {
        let temp_dir = TempDir::new().unwrap();
        let memory = temp_dir.path().join(".claude").join("memory");
        fs::create_dir_all(&memory).unwrap();
        fs::write(memory.join("architecture.md"), "word ".repeat(50)).unwrap();
        fs::write(memory.join("conventions.md"), "word ".repeat(30)).unwrap();

        let report = validate(temp_dir.path());
        assert!(report.valid);
    }

    #[test]
    fn test_validate_oversized_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("CLAUDE.md"), vec![b'x'; 1_000_001]).unwrap();

        let report = validate(temp_dir.path());
        assert!(!report.valid);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("CLAUDE.md") && e.contains("too large")));
    }
}
