//! Named prompt templates with single-placeholder substitution.
//!
//! Keeps common prompt shapes out of ad-hoc string building. A template
//! contains one `{input}` placeholder; [`TemplateCache::get`] substitutes the
//! caller's input for the *first* occurrence only. Five built-ins covering
//! the common task operations are seeded at construction; user templates can
//! be merged over them from a JSON file.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Substitution placeholder recognized in template strings.
pub const PLACEHOLDER: &str = "{input}";

/// Built-in templates seeded at construction: `(name, template)`.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "create_simple_task",
        "Create a task: {input}. Format: Title only, no description needed.",
    ),
    (
        "prioritize_tasks",
        "Rank these tasks by priority (high/medium/low): {input}",
    ),
    ("suggest_due_date", "Suggest a realistic due date for: {input}"),
    (
        "break_down_task",
        "Break down this complex task into subtasks: {input}",
    ),
    (
        "estimate_duration",
        "Estimate how long this task might take: {input}",
    ),
];

/// Registry of named prompt templates.
pub struct TemplateCache {
    templates: RwLock<HashMap<String, String>>,
}

impl TemplateCache {
    /// Create a registry seeded with the built-in templates.
    pub fn new() -> Self {
        let templates = BUILTIN_TEMPLATES
            .iter()
            .map(|(name, template)| ((*name).to_string(), (*template).to_string()))
            .collect();
        Self {
            templates: RwLock::new(templates),
        }
    }

    /// Materialize the named template with `input` substituted for the first
    /// `{input}` occurrence. Returns `None` for unknown names.
    ///
    /// Only the first occurrence is replaced; a template that repeats the
    /// placeholder keeps the later occurrences verbatim.
    pub fn get(&self, name: &str, input: &str) -> Option<String> {
        let templates = self.templates.read().unwrap_or_else(|e| e.into_inner());
        templates
            .get(name)
            .map(|template| template.replacen(PLACEHOLDER, input, 1))
    }

    /// Insert or overwrite a named template unconditionally.
    pub fn add(&self, name: impl Into<String>, template: impl Into<String>) {
        let mut templates = self.templates.write().unwrap_or_else(|e| e.into_inner());
        templates.insert(name.into(), template.into());
    }

    /// Names of all registered templates. Order is not significant.
    pub fn list(&self) -> Vec<String> {
        let templates = self.templates.read().unwrap_or_else(|e| e.into_inner());
        templates.keys().cloned().collect()
    }

    /// Names of the built-in templates.
    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTIN_TEMPLATES.iter().map(|(name, _)| *name)
    }

    /// Merge user templates from a JSON file of `name → template` over the
    /// current registry (user entries win). Returns the number merged.
    pub fn merge_from_path(&self, path: &Path) -> Result<usize> {
        let data = std::fs::read_to_string(path).map_err(|source| {
            warn!(path = %path.display(), error = %source, "Failed to read user templates");
            Error::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let user: HashMap<String, String> = serde_json::from_str(&data).map_err(|source| {
            warn!(path = %path.display(), error = %source, "User template file is not a JSON object of strings");
            Error::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let merged = user.len();
        let mut templates = self.templates.write().unwrap_or_else(|e| e.into_inner());
        templates.extend(user);
        debug!(merged, path = %path.display(), "Merged user templates");
        Ok(merged)
    }
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::new()
    }
}
