//! Prompt templates for the AI backends
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/finsight/prompts/)
//! 2. Fall back to the embedded defaults below
//!
//! Templates use mustache-style `{{var}}` placeholders.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};

mod defaults {
    pub const CATEGORIZE_TRANSACTION: &str = r#"Categorize this transaction: "{{description}}" (Amount: ₹{{amount}}).
Choose exactly one: [{{categories}}].
Return ONLY the word."#;

    pub const SUMMARIZE_SPENDING: &str = r#"Analyze spending (INR): {{totals}}.
Return JSON with:
- "summary": 2 short sentences
- "tips": array of 3 concise tips"#;
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    CategorizeTransaction,
    SummarizeSpending,
}

impl PromptId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CategorizeTransaction => "categorize_transaction",
            Self::SummarizeSpending => "summarize_spending",
        }
    }

    pub fn all() -> &'static [PromptId] {
        &[Self::CategorizeTransaction, Self::SummarizeSpending]
    }

    fn default_content(&self) -> &'static str {
        match self {
            Self::CategorizeTransaction => defaults::CATEGORIZE_TRANSACTION,
            Self::SummarizeSpending => defaults::SUMMARIZE_SPENDING,
        }
    }
}

/// Resolves and renders prompt templates
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    override_dir: Option<PathBuf>,
}

impl PromptLibrary {
    /// Library using the default override directory
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
        }
    }

    /// Library with a custom override directory
    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
        }
    }

    /// Library that never looks at the filesystem
    pub fn embedded_only() -> Self {
        Self { override_dir: None }
    }

    /// Path of the override file for `id`, if one exists
    pub fn override_path(&self, id: PromptId) -> Option<PathBuf> {
        self.override_dir
            .as_ref()
            .map(|d| d.join(format!("{}.md", id.as_str())))
            .filter(|p| p.exists())
    }

    /// Template text for `id` (override first, then embedded)
    pub fn template(&self, id: PromptId) -> Result<String> {
        match self.override_path(id) {
            Some(path) => fs::read_to_string(&path).map_err(|e| {
                Error::InvalidData(format!(
                    "Failed to read prompt override {}: {}",
                    path.display(),
                    e
                ))
            }),
            None => Ok(id.default_content().to_string()),
        }
    }

    /// Render `id` with template variables replaced
    pub fn render(&self, id: PromptId, vars: &HashMap<&str, String>) -> Result<String> {
        let mut result = self.template(id)?;
        for (key, value) in vars {
            let pattern = format!("{{{{{}}}}}", key);
            result = result.replace(&pattern, value);
        }
        Ok(result)
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("finsight").join("prompts"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_categorize_prompt() {
        let library = PromptLibrary::embedded_only();
        let mut vars = HashMap::new();
        vars.insert("description", "Netflix".to_string());
        vars.insert("amount", "649".to_string());
        vars.insert("categories", "Food, Other".to_string());

        let prompt = library
            .render(PromptId::CategorizeTransaction, &vars)
            .unwrap();
        assert!(prompt.contains("Categorize this transaction: \"Netflix\" (Amount: ₹649)."));
        assert!(prompt.contains("[Food, Other]"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_override_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("summarize_spending.md"),
            "Custom: {{totals}}",
        )
        .unwrap();

        let library = PromptLibrary::with_override_dir(dir.path().to_path_buf());
        assert!(library.override_path(PromptId::SummarizeSpending).is_some());
        assert!(library.override_path(PromptId::CategorizeTransaction).is_none());

        let mut vars = HashMap::new();
        vars.insert("totals", "{\"Food\":10.0}".to_string());
        let prompt = library.render(PromptId::SummarizeSpending, &vars).unwrap();
        assert_eq!(prompt, "Custom: {\"Food\":10.0}");
    }

    #[test]
    fn test_all_prompt_ids_have_defaults() {
        let library = PromptLibrary::embedded_only();
        for id in PromptId::all() {
            assert!(!library.template(*id).unwrap().is_empty());
        }
    }
}
