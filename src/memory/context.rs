//! Input model for memory update generation.

use serde::{Deserialize, Serialize};

/// Repository facts used to build a memory update snippet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryContext {
    /// Repository name
    pub repo_name: String,
    /// Detected architecture type
    pub repo_type: String,
    /// Primary technologies, most important first
    pub tech_stack: Vec<String>,
    /// Key top-level modules
    pub key_modules: Vec<String>,
    /// Detected architectural patterns
    pub patterns: Vec<String>,
    /// Optional one-line summary
    #[serde(default)]
    pub summary: String,
}

impl MemoryContext {
    /// Built-in example payload, used by the CLI when no input is given.
    pub fn example() -> Self {
        Self {
            repo_name: "api-gateway".to_string(),
            repo_type: "microservices".to_string(),
            tech_stack: vec![
                "Go 1.21".to_string(),
                "gRPC".to_string(),
                "PostgreSQL".to_string(),
                "Redis".to_string(),
            ],
            key_modules: vec![
                "handlers".to_string(),
                "services".to_string(),
                "middleware".to_string(),
                "proto".to_string(),
            ],
            patterns: vec![
                "Clean Architecture".to_string(),
                "Repository Pattern".to_string(),
                "CQRS".to_string(),
            ],
            summary: String::new(),
        }
    }
}
