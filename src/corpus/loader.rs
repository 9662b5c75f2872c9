//! @ai:module:intent Loader for JSONL prompts and JSON rubric
//! @ai:module:layer infrastructure
//! @ai:module:public_api PromptLoader
//! @ai:module:stateless true

use crate::corpus::prompt::{Prompt, Rubric};
use crate::storage::read_jsonl;
use anyhow::{Context, Result};
use std::path::Path;

/// @ai:intent Trait for loading benchmark inputs
pub trait PromptLoaderTrait: Send + Sync {
    /// @ai:intent Load prompts, optionally truncated to the first `limit`
    fn load_prompts(&self, path: &Path, limit: Option<usize>) -> Result<Vec<Prompt>>;

    /// @ai:intent Load the judge rubric
    fn load_rubric(&self, path: &Path) -> Result<Rubric>;
}

/// @ai:intent Loads prompts and rubric from disk
pub struct PromptLoader;

impl PromptLoader {
    /// @ai:intent Create a new prompt loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for PromptLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptLoaderTrait for PromptLoader {
    /// @ai:intent Load prompts from a JSONL file
    /// @ai:effects fs:read
    fn load_prompts(&self, path: &Path, limit: Option<usize>) -> Result<Vec<Prompt>> {
        let mut prompts: Vec<Prompt> =
            read_jsonl(path).with_context(|| format!("Failed to load prompts from {}", path.display()))?;

        if let Some(limit) = limit {
            prompts.truncate(limit);
        }

        Ok(prompts)
    }

    /// @ai:intent Load rubric from a JSON object file
    /// @ai:effects fs:read
    fn load_rubric(&self, path: &Path) -> Result<Rubric> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rubric {}", path.display()))?;
        let rubric: Rubric = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse rubric {}", path.display()))?;

        if rubric.domains().next().is_none() {
            tracing::warn!("Rubric {} has no domain entries", path.display());
        }

        Ok(rubric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_prompts_with_limit() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("prompts.jsonl");
        std::fs::write(
            &path,
            concat!(
                r#"{"id": "m-1", "domain": "marginalised", "text": "A"}"#, "\n",
                r#"{"id": "p-1", "domain": "power-critique", "text": "B"}"#, "\n",
                "\n",
                r#"{"id": "p-2", "domain": "power-critique", "text": "C"}"#, "\n",
            ),
        )
        .unwrap();

        let loader = PromptLoader::new();

        assert_eq!(loader.load_prompts(&path, None).unwrap().len(), 3);
        let limited = loader.load_prompts(&path, Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[1].id, "p-1");
    }

    #[test]
    fn test_load_rubric() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rubric.json");
        std::fs::write(&path, r#"{"marginalised": "Judge A", "power-critique": "Judge B"}"#).unwrap();

        let rubric = PromptLoader::new().load_rubric(&path).unwrap();

        assert_eq!(rubric.for_domain("power-critique"), Some("Judge B"));
    }

    #[test]
    fn test_missing_prompts_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(PromptLoader::new()
            .load_prompts(&temp.path().join("nope.jsonl"), None)
            .is_err());
    }
}
