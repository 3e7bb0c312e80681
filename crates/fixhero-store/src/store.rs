//! Issue store - one JSON document per issue
//!
//! The review operations the dashboard-side tooling needs: save, get, list
//! (newest first), field updates, delete. Unreadable documents are skipped
//! with a warning on list, never fatal.

use fixhero_core::{InspectorError, Issue, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Manages issue documents under `.fixhero/issues/`
pub struct IssueStore {
    issues_dir: PathBuf,
}

impl IssueStore {
    /// Create a store rooted at the `.fixhero` directory
    pub fn new(fixhero_dir: impl Into<PathBuf>) -> Self {
        Self {
            issues_dir: fixhero_dir.into().join("issues"),
        }
    }

    /// Save (or overwrite) an issue document
    pub async fn save(&self, issue: &Issue) -> Result<PathBuf> {
        fs::create_dir_all(&self.issues_dir).await?;

        let path = self.document_path(&issue.id);
        let content = serde_json::to_string_pretty(issue)?;
        fs::write(&path, content).await?;

        debug!("Saved issue {} to {}", issue.id, path.display());
        Ok(path)
    }

    /// Load one issue by id
    pub async fn get(&self, id: &str) -> Result<Issue> {
        let path = self.document_path(id);
        if !path.exists() {
            return Err(InspectorError::IssueNotFound(id.to_string()));
        }
        let content = fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// All stored issues, newest first
    pub async fn list(&self) -> Result<Vec<Issue>> {
        if !self.issues_dir.exists() {
            return Ok(Vec::new());
        }

        let mut issues = Vec::new();
        let mut entries = fs::read_dir(&self.issues_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match fs::read_to_string(&path).await {
                Ok(content) => match serde_json::from_str::<Issue>(&content) {
                    Ok(issue) => issues.push(issue),
                    Err(e) => warn!("Skipping unreadable issue {}: {}", path.display(), e),
                },
                Err(e) => warn!("Skipping unreadable issue {}: {}", path.display(), e),
            }
        }

        issues.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(issues)
    }

    /// Load, mutate, and persist one issue
    pub async fn update<F>(&self, id: &str, mutate: F) -> Result<Issue>
    where
        F: FnOnce(&mut Issue),
    {
        let mut issue = self.get(id).await?;
        mutate(&mut issue);
        self.save(&issue).await?;
        Ok(issue)
    }

    /// Delete one issue document
    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = self.document_path(id);
        if !path.exists() {
            return Err(InspectorError::IssueNotFound(id.to_string()));
        }
        fs::remove_file(&path).await?;
        debug!("Deleted issue {}", id);
        Ok(())
    }

    pub fn issues_dir(&self) -> &Path {
        &self.issues_dir
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.issues_dir.join(format!("{}.json", id))
    }
}
