//! @ai:module:intent JSONL persistence, resume bookkeeping and run-directory layout
//! @ai:module:layer infrastructure
//! @ai:module:public_api read_jsonl, JsonlAppender, already_processed_ids, safe_dir, RunPaths, ErrorLog, latest_run_dir
//! @ai:module:stateless true

use crate::evaluator::record_id;
use anyhow::{Context, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// @ai:intent Read one JSON value per non-blank line
/// @ai:effects fs:read
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut items = Vec::new();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        let item = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: invalid JSON line", path.display(), index + 1))?;
        items.push(item);
    }

    Ok(items)
}

/// @ai:intent Append-only JSONL writer flushed per record so runs can resume
pub struct JsonlAppender {
    file: File,
}

impl JsonlAppender {
    /// @ai:intent Open (or create) a JSONL file for appending
    /// @ai:effects fs:write
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open {} for append", path.display()))?;

        Ok(Self { file })
    }

    /// @ai:intent Write one compact JSON line and flush
    /// @ai:effects fs:write
    pub fn append<T: Serialize>(&mut self, item: &T) -> Result<()> {
        let line = serde_json::to_string(item)?;
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        Ok(())
    }
}

/// @ai:intent Collect ids already present in a JSONL output file
/// @ai:post missing file yields an empty set; malformed lines and id-less lines are skipped
/// @ai:effects fs:read
pub fn already_processed_ids(path: &Path) -> HashSet<String> {
    let Ok(file) = File::open(path) else {
        return HashSet::new();
    };

    BufReader::new(file)
        .lines()
        .map_while(|line| line.ok())
        .filter_map(|line| serde_json::from_str::<Value>(&line).ok())
        .filter_map(|value| record_id(&value))
        .collect()
}

/// @ai:intent Turn a model id into a directory-safe name
/// @ai:effects pure
pub fn safe_dir(model: &str) -> String {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    static DISALLOWED: OnceLock<Regex> = OnceLock::new();

    let separators = SEPARATORS.get_or_init(|| Regex::new(r"[:/\\]").expect("valid regex"));
    let disallowed = DISALLOWED.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid regex"));

    let name = separators.replace_all(model, "__");
    disallowed.replace_all(&name, "_").into_owned()
}

/// @ai:intent File layout of one run directory
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub dir: PathBuf,
}

impl RunPaths {
    /// @ai:intent Wrap an existing run directory
    /// @ai:effects pure
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// @ai:intent Create results/<safe model>/<timestamp>/, reusing it when resuming
    /// @ai:effects fs:write
    pub fn create(results_dir: &Path, model: &str, timestamp: Option<&str>) -> Result<Self> {
        let timestamp = timestamp
            .map(str::to_string)
            .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string());
        let dir = results_dir.join(safe_dir(model)).join(timestamp);

        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create run directory {}", dir.display()))?;

        Ok(Self { dir })
    }

    pub fn raw_responses(&self) -> PathBuf {
        self.dir.join("raw_responses.jsonl")
    }

    pub fn errors_log(&self) -> PathBuf {
        self.dir.join("errors.log")
    }

    pub fn graded_responses(&self) -> PathBuf {
        self.dir.join("graded_responses.jsonl")
    }

    pub fn grader_errors_log(&self) -> PathBuf {
        self.dir.join("grader_errors.log")
    }

    pub fn summary_json(&self) -> PathBuf {
        self.dir.join("summary.json")
    }

    pub fn summary_md(&self) -> PathBuf {
        self.dir.join("summary.md")
    }

    /// @ai:intent Run identifier carried into the summary
    /// @ai:effects pure
    pub fn run_id(&self) -> String {
        self.dir.display().to_string()
    }
}

/// @ai:intent Lexicographically latest run directory under a model directory
/// @ai:effects fs:read
pub fn latest_run_dir(model_dir: &Path) -> Result<PathBuf> {
    let mut runs: Vec<PathBuf> = std::fs::read_dir(model_dir)
        .with_context(|| format!("Model directory not found: {}", model_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();

    runs.sort();
    runs.pop()
        .with_context(|| format!("No runs found under {}", model_dir.display()))
}

/// @ai:intent Append-only error log with one JSON object per failure
pub struct ErrorLog {
    path: PathBuf,
    entries: usize,
}

#[derive(Serialize)]
struct ErrorEntry<'a> {
    id: &'a str,
    error: String,
    meta: Value,
    ts: String,
}

impl ErrorLog {
    /// @ai:intent Create a log handle; the file is only created on first entry
    /// @ai:effects pure
    pub fn new(path: PathBuf) -> Self {
        Self { path, entries: 0 }
    }

    /// @ai:intent Record one failure
    /// @ai:effects fs:write
    pub fn log(&mut self, id: &str, error: &dyn std::fmt::Display, meta: Value) -> Result<()> {
        let entry = ErrorEntry {
            id,
            error: error.to_string(),
            meta,
            ts: chrono::Utc::now().to_rfc3339(),
        };

        JsonlAppender::open(&self.path)?.append(&entry)?;
        self.entries += 1;
        Ok(())
    }

    /// @ai:intent Number of failures logged through this handle
    /// @ai:effects pure
    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_safe_dir_replaces_disallowed_chars() {
        assert_eq!(safe_dir("a:b/c\\d*e?f"), "a__b__c__d_e_f");
    }

    #[test]
    fn test_safe_dir_preserves_allowed_chars() {
        assert_eq!(safe_dir("Model-1.0_name"), "Model-1.0_name");
    }

    #[test]
    fn test_already_processed_ids_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.jsonl");
        std::fs::write(&path, "{\"id\": 1}\n{\"foo\": 2}\n{\"id\": \"2\"}\ninvalid json\n").unwrap();

        let ids = already_processed_ids(&path);

        assert_eq!(ids, HashSet::from(["1".to_string(), "2".to_string()]));
    }

    #[test]
    fn test_already_processed_ids_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(already_processed_ids(&temp.path().join("missing.jsonl")).is_empty());
    }

    #[test]
    fn test_read_jsonl_skips_blank_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.jsonl");
        let mut out = JsonlAppender::open(&path).unwrap();
        for value in [json!({"a": 1}), json!({"b": 2}), json!({"c": 3})] {
            out.append(&value).unwrap();
        }
        drop(out);
        std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap()
            .write_all(b"\n   \n")
            .unwrap();

        let values: Vec<Value> = read_jsonl(&path).unwrap();

        assert_eq!(values, vec![json!({"a": 1}), json!({"b": 2}), json!({"c": 3})]);
    }

    #[test]
    fn test_read_jsonl_reports_line_number() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.jsonl");
        std::fs::write(&path, "{\"a\": 1}\n{oops\n").unwrap();

        let err = read_jsonl::<Value>(&path).unwrap_err();

        assert!(err.to_string().ends_with(":2: invalid JSON line"));
    }

    #[test]
    fn test_latest_run_dir_is_lexicographic_max() {
        let temp = TempDir::new().unwrap();
        for run in ["2025-08-07_20-31-00", "2025-08-08_16-10-22", "2025-08-01_09-00-00"] {
            std::fs::create_dir(temp.path().join(run)).unwrap();
        }
        std::fs::write(temp.path().join("zzz.txt"), "not a run").unwrap();

        let latest = latest_run_dir(temp.path()).unwrap();

        assert!(latest.ends_with("2025-08-08_16-10-22"));
    }

    #[test]
    fn test_latest_run_dir_without_runs_fails() {
        let temp = TempDir::new().unwrap();
        assert!(latest_run_dir(temp.path()).is_err());
    }

    #[test]
    fn test_run_paths_layout() {
        let temp = TempDir::new().unwrap();

        let paths = RunPaths::create(temp.path(), "groq/llama-3:70b", Some("2025-01-01_00-00-00")).unwrap();

        assert!(paths.dir.ends_with("groq__llama-3__70b/2025-01-01_00-00-00"));
        assert!(paths.dir.is_dir());
        assert!(paths.graded_responses().ends_with("graded_responses.jsonl"));
    }

    #[test]
    fn test_error_log_appends_entries() {
        let temp = TempDir::new().unwrap();
        let mut log = ErrorLog::new(temp.path().join("errors.log"));

        log.log("p-1", &"timeout", json!({"model": "m"})).unwrap();
        log.log("p-2", &"401", json!({})).unwrap();

        let entries: Vec<Value> = read_jsonl(log.path()).unwrap();
        assert_eq!(log.entries(), 2);
        assert_eq!(entries[0]["id"], "p-1");
        assert_eq!(entries[0]["error"], "timeout");
        assert_eq!(entries[1]["meta"], json!({}));
    }
}
