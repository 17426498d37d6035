//! Memory update snippet rendering.

use chrono::{Local, NaiveDate};

use super::context::MemoryContext;

const MAX_STACK_ENTRIES: usize = 5;
const MAX_MODULE_ENTRIES: usize = 4;
const MAX_PATTERN_ENTRIES: usize = 3;

/// Renders memory update suggestions from repository facts.
pub struct MemoryUpdateGenerator;

impl MemoryUpdateGenerator {
    /// Generate the memory update text for `context`, dated today.
    pub fn generate(context: &MemoryContext) -> String {
        Self::generate_at(context, Local::now().date_naive())
    }

    /// Generate the memory update text with an explicit index date.
    pub fn generate_at(context: &MemoryContext, indexed_on: NaiveDate) -> String {
        let mut entries = Vec::new();

        entries.push(format!(
            "Repo: {} | Type: {} | Stack: {}",
            context.repo_name,
            context.repo_type,
            join_first(&context.tech_stack, MAX_STACK_ENTRIES),
        ));

        entries.push(format!(
            "{} indexed {} | Key: {}",
            context.repo_name,
            indexed_on.format("%Y-%m-%d"),
            join_first(&context.key_modules, MAX_MODULE_ENTRIES),
        ));

        if !context.patterns.is_empty() {
            entries.push(format!(
                "{} patterns: {}",
                context.repo_name,
                join_first(&context.patterns, MAX_PATTERN_ENTRIES),
            ));
        }

        if !context.summary.is_empty() {
            entries.push(format!("{} summary: {}", context.repo_name, context.summary));
        }

        format!(
            "## Claude Memory Update\n\
             \n\
             After indexing, suggest adding to Claude's memory:\n\
             \n\
             ```\n\
             {entries}\n\
             ```\n\
             \n\
             ### How to add:\n\
             1. Ask Claude: \"Remember that I work on {repo_name}\"\n\
             2. Or use memory tool: add the entries above\n\
             \n\
             ### Why this matters:\n\
             - Next session, Claude already knows this repo exists\n\
             - No need to load CLAUDE.md for basic context\n\
             - Enables cross-repo pattern recognition",
            entries = entries.join("\n"),
            repo_name = context.repo_name,
        )
    }
}

fn join_first(items: &[String], limit: usize) -> String {
    items
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
