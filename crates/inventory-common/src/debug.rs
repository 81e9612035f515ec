//! Debug logging for menu actions.
//!
//! Appends one JSONL entry per action, for tracing down what happened to
//! the inventory file between runs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Environment variable enabling the action log.
pub const DEBUG_ENV: &str = "INVENTORY_DEBUG";

const MAX_DETAIL_LEN: usize = 200;

/// Debug log entry for one menu action
#[derive(Debug, Serialize)]
pub struct ActionLog {
    pub timestamp: DateTime<Utc>,
    /// Action name (e.g., "add", "delete")
    pub action: String,
    /// Item name the action targeted
    pub target: String,
    /// ok / rejected / failed
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ActionLog {
    pub fn new(action: &str, target: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            action: action.to_string(),
            target: target.to_string(),
            outcome: String::new(),
            detail: None,
        }
    }

    pub fn with_outcome(mut self, outcome: &str) -> Self {
        self.outcome = outcome.to_string();
        self
    }

    pub fn with_detail(mut self, detail: &str) -> Self {
        // Keep entries short
        self.detail = Some(if detail.chars().count() > MAX_DETAIL_LEN {
            let head: String = detail.chars().take(MAX_DETAIL_LEN).collect();
            format!("{}...", head)
        } else {
            detail.to_string()
        });
        self
    }

    /// Write log entry to file
    pub fn write(&self) -> std::io::Result<()> {
        if !is_debug_enabled() {
            return Ok(());
        }
        self.write_to_path(&debug_log_path())
    }

    fn write_to_path(&self, log_path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let json = serde_json::to_string(self).unwrap_or_default();
        writeln!(file, "{}", json)?;

        Ok(())
    }
}

/// Check if debug mode is enabled
pub fn is_debug_enabled() -> bool {
    if std::env::var(DEBUG_ENV).is_ok() {
        return true;
    }

    // Or a marker file next to the inventory
    PathBuf::from(".inventory").join(".debug").exists()
}

/// Get debug log file path
pub fn debug_log_path() -> PathBuf {
    PathBuf::from(".inventory")
        .join("logs")
        .join("actions.jsonl")
}

/// Quick helper to log an action result
pub fn log_action(action: &str, target: &str, outcome: &str, detail: Option<&str>) {
    let mut log = ActionLog::new(action, target).with_outcome(outcome);
    if let Some(detail) = detail {
        log = log.with_detail(detail);
    }

    let _ = log.write();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_action_log_serialization() {
        let log = ActionLog::new("delete", "Widget")
            .with_outcome("rejected")
            .with_detail("no item named 'Widget'");

        let json = serde_json::to_string(&log).unwrap();
        assert!(json.contains("\"action\":\"delete\""));
        assert!(json.contains("\"outcome\":\"rejected\""));
        assert!(json.contains("no item named"));
    }

    #[test]
    fn test_detail_is_omitted_when_absent() {
        let log = ActionLog::new("list", "").with_outcome("ok");
        let json = serde_json::to_string(&log).unwrap();
        assert!(!json.contains("detail"));
    }

    #[test]
    fn test_truncation() {
        let long_detail = "é".repeat(500);
        let log = ActionLog::new("add", "x").with_detail(&long_detail);

        let detail = log.detail.unwrap();
        assert_eq!(detail.chars().count(), MAX_DETAIL_LEN + 3);
        assert!(detail.ends_with("..."));
    }

    #[test]
    fn test_write_appends_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("actions.jsonl");

        ActionLog::new("add", "Widget")
            .with_outcome("ok")
            .write_to_path(&path)
            .unwrap();
        ActionLog::new("delete", "Widget")
            .with_outcome("ok")
            .write_to_path(&path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["target"], "Widget");
    }
}
