//! Store-backed issue sink
//!
//! The assembler publishes into this sink; the issue document write is the
//! one operation that must succeed, the screenshot artifact mirror is
//! fail-open enrichment.

use async_trait::async_trait;
use fixhero_core::fail_open::fail_open;
use fixhero_core::{Issue, Result};
use fixhero_inspector::IssueSink;
use std::path::PathBuf;

use crate::artifacts::ArtifactStore;
use crate::store::IssueStore;

/// Persists published issues locally
pub struct StoreSink {
    store: IssueStore,
    artifacts: Option<ArtifactStore>,
}

impl StoreSink {
    pub fn new(fixhero_dir: impl Into<PathBuf>) -> Self {
        let fixhero_dir = fixhero_dir.into();
        Self {
            store: IssueStore::new(fixhero_dir.clone()),
            artifacts: Some(ArtifactStore::new(fixhero_dir)),
        }
    }

    /// Keep screenshots embedded in the issue document only
    pub fn without_artifacts(mut self) -> Self {
        self.artifacts = None;
        self
    }
}

#[async_trait]
impl IssueSink for StoreSink {
    async fn publish(&self, issue: &Issue) -> Result<()> {
        self.store.save(issue).await?;

        if let (Some(artifacts), Some(screenshot)) = (&self.artifacts, &issue.screenshot) {
            fail_open("screenshot artifact", || {
                artifacts.store_screenshot(&issue.id, screenshot)
            })
            .await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_publish_saves_document_and_artifact() {
        let temp = TempDir::new().unwrap();
        let fixhero_dir = temp.path().join(".fixhero");
        let sink = StoreSink::new(fixhero_dir.clone());

        let issue = Issue::new("https://app.test", "App")
            .with_screenshot("data:image/png;base64,aGk=");
        sink.publish(&issue).await.unwrap();

        let stored = IssueStore::new(fixhero_dir.clone()).get(&issue.id).await.unwrap();
        assert_eq!(stored.id, issue.id);
        assert!(fixhero_dir.join("artifacts").join(&issue.id).exists());
    }

    #[tokio::test]
    async fn test_bad_screenshot_does_not_fail_publish() {
        let temp = TempDir::new().unwrap();
        let fixhero_dir = temp.path().join(".fixhero");
        let sink = StoreSink::new(fixhero_dir.clone());

        let issue = Issue::new("https://app.test", "App").with_screenshot("not-a-data-url");
        sink.publish(&issue).await.unwrap();

        assert!(IssueStore::new(fixhero_dir).get(&issue.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_without_artifacts_skips_mirror() {
        let temp = TempDir::new().unwrap();
        let fixhero_dir = temp.path().join(".fixhero");
        let sink = StoreSink::new(fixhero_dir.clone()).without_artifacts();

        let issue = Issue::new("https://app.test", "App")
            .with_screenshot("data:image/png;base64,aGk=");
        sink.publish(&issue).await.unwrap();

        assert!(!fixhero_dir.join("artifacts").exists());
    }
}
