//! Repository type scoring heuristic.

use std::fs;
use std::path::Path;

use serde_json::Value;

use super::dockerfiles::find_dockerfiles;
use super::{Classification, IndicatorScores, RepoType};

/// Directory names suggesting a monorepo layout.
const MONOREPO_DIR_MARKERS: [&str; 5] = ["packages", "apps", "libs", "modules", "services"];

/// Workspace config files, stronger monorepo evidence than a bare directory.
const WORKSPACE_CONFIG_FILES: [&str; 4] =
    ["pnpm-workspace.yaml", "lerna.json", "nx.json", "turbo.json"];

/// Compose manifest names, tried in order; only the first readable one counts.
const COMPOSE_FILES: [&str; 4] =
    ["docker-compose.yml", "docker-compose.yaml", "compose.yml", "compose.yaml"];

/// Packaging manifests suggesting a library.
const LIBRARY_MARKERS: [&str; 4] = ["setup.py", "pyproject.toml", "Cargo.toml", "go.mod"];

// Directory markers score lower than config files; a bare packages/ dir is
// weak evidence.
const MONOREPO_DIR_SCORE: u32 = 2;
const MONOREPO_CONFIG_SCORE: u32 = 3;

/// Minimum service-indicator lines in a compose manifest to count as evidence.
const MIN_SERVICES_FOR_MICROSERVICES: usize = 3;

/// Winning scores below this threshold fall back to `single_app`.
const MIN_WINNING_SCORE: u32 = 2;

/// Scores a repository tree against the four architecture categories.
pub struct RepoTypeDetector;

impl RepoTypeDetector {
    /// Classify the repository rooted at `path`.
    ///
    /// Unreadable or malformed marker files never abort classification: each
    /// failure is reported on stderr and that one signal is scored as absent.
    pub fn detect(path: &Path) -> Classification {
        let mut scores = IndicatorScores::default();
        let mut evidence = Vec::new();

        for marker in MONOREPO_DIR_MARKERS {
            if path.join(marker).is_dir() {
                scores.add(RepoType::Monorepo, MONOREPO_DIR_SCORE);
                evidence.push(format!("Found {marker}/"));
            }
        }

        for config in WORKSPACE_CONFIG_FILES {
            // Workspace config files are authoritative, hence the higher weight.
            if path.join(config).exists() {
                scores.add(RepoType::Monorepo, MONOREPO_CONFIG_SCORE);
                evidence.push(format!("Found {config}"));
            }
        }

        if Self::package_json_has_workspaces(path) {
            scores.add(RepoType::Monorepo, MONOREPO_CONFIG_SCORE);
            evidence.push("package.json has workspaces".to_string());
        }

        if let Some((compose_name, services)) = Self::compose_service_count(path) {
            if services >= MIN_SERVICES_FOR_MICROSERVICES {
                scores.add(RepoType::Microservices, services as u32);
                evidence.push(format!("{compose_name} with {services} services"));
            }
        }

        let dockerfiles = find_dockerfiles(path);
        if dockerfiles.len() > 2 {
            scores.add(RepoType::Microservices, dockerfiles.len() as u32);
            evidence.push(format!("{} Dockerfiles found", dockerfiles.len()));
        }

        for marker in LIBRARY_MARKERS {
            if path.join(marker).exists() {
                scores.add(RepoType::Library, 1);
            }
        }

        let src_only = path.join("src").is_dir() && !path.join("apps").is_dir();
        if src_only && !MONOREPO_DIR_MARKERS.iter().any(|m| path.join(m).is_dir()) {
            scores.add(RepoType::Library, 2);
            scores.add(RepoType::SingleApp, 2);
        }

        let mut repo_type = scores.winner();
        let mut confidence =
            f64::from(scores.get(repo_type)) / f64::from(scores.total().max(1));

        // Default to single_app when nothing scored strongly enough.
        if scores.get(repo_type) < MIN_WINNING_SCORE {
            repo_type = RepoType::SingleApp;
            confidence = 0.5;
            evidence.push("No strong indicators, defaulting to single_app".to_string());
        }

        Classification {
            repo_type,
            confidence: (confidence.clamp(0.0, 1.0) * 100.0).round() / 100.0,
            evidence,
            scores,
        }
    }

    fn package_json_has_workspaces(path: &Path) -> bool {
        let pkg_json = path.join("package.json");
        if !pkg_json.exists() {
            return false;
        }
        let content = match read_lossy(&pkg_json) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("WARNING: Could not read {}: {}", pkg_json.display(), e);
                return false;
            }
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map.contains_key("workspaces"),
            Ok(_) => false,
            Err(e) => {
                eprintln!("WARNING: Could not parse {} as JSON: {}", pkg_json.display(), e);
                false
            }
        }
    }

    /// Service-indicator count from the first readable compose manifest.
    fn compose_service_count(path: &Path) -> Option<(&'static str, usize)> {
        for compose_name in COMPOSE_FILES {
            let compose_path = path.join(compose_name);
            if !compose_path.exists() {
                continue;
            }
            match read_lossy(&compose_path) {
                Ok(content) => {
                    let services =
                        content.lines().filter(|line| Self::is_service_line(line)).count();
                    return Some((compose_name, services));
                }
                Err(e) => {
                    // Try the next variant.
                    eprintln!("WARNING: Could not read {compose_name}: {e}");
                }
            }
        }
        None
    }

    /// `build:` or `image:` counts only when it appears before any `#` on the
    /// line; fully commented lines are skipped.
    fn is_service_line(line: &str) -> bool {
        if line.trim_start().starts_with('#') {
            return false;
        }
        let effective = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        effective.contains("build:") || effective.contains("image:")
    }
}

fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
