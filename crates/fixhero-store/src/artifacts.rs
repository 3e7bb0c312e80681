//! Screenshot artifacts
//!
//! Issue documents embed screenshots as data URLs; this mirrors them as
//! plain PNG files under `.fixhero/artifacts/<issue-id>/` so they can be
//! opened directly during review.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use fixhero_core::{InspectorError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Metadata for a stored screenshot file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenshotArtifact {
    /// Path relative to the artifacts directory
    pub path: PathBuf,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// Manages screenshot files under `.fixhero/artifacts/`
pub struct ArtifactStore {
    base_dir: PathBuf,
}

impl ArtifactStore {
    /// Create an artifact store rooted at the `.fixhero` directory
    pub fn new(fixhero_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: fixhero_dir.into().join("artifacts"),
        }
    }

    /// Decode a screenshot data URL and write it as
    /// `artifacts/{issue_id}/{timestamp}-screenshot.png`
    pub async fn store_screenshot(
        &self,
        issue_id: &str,
        data_url: &str,
    ) -> Result<ScreenshotArtifact> {
        let png = decode_data_url(data_url)?;

        let issue_dir = self.base_dir.join(issue_id);
        fs::create_dir_all(&issue_dir).await?;

        let filename = format!("{}-screenshot.png", Utc::now().format("%Y%m%d-%H%M%S"));
        let path = issue_dir.join(&filename);
        fs::write(&path, &png).await?;

        debug!("Stored screenshot for issue {} ({} bytes)", issue_id, png.len());
        Ok(ScreenshotArtifact {
            path: PathBuf::from(issue_id).join(filename),
            size_bytes: png.len() as u64,
            created_at: Utc::now(),
        })
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }
}

fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let encoded = data_url.strip_prefix(DATA_URL_PREFIX).ok_or_else(|| {
        InspectorError::Store("screenshot is not a PNG data URL".to_string())
    })?;
    STANDARD
        .decode(encoded)
        .map_err(|e| InspectorError::Store(format!("invalid screenshot encoding: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_decode_data_url() {
        assert_eq!(decode_data_url("data:image/png;base64,aGk=").unwrap(), b"hi");
        assert!(decode_data_url("nonsense").is_err());
        assert!(decode_data_url("data:image/png;base64,!!!").is_err());
    }

    #[tokio::test]
    async fn test_store_screenshot_writes_png() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path().join(".fixhero"));

        let artifact = store
            .store_screenshot("abc123", "data:image/png;base64,aGk=")
            .await
            .unwrap();

        assert_eq!(artifact.size_bytes, 2);
        let absolute = store.base_dir().join(&artifact.path);
        assert_eq!(fs::read(&absolute).await.unwrap(), b"hi");
    }

    #[tokio::test]
    async fn test_store_rejects_non_data_url() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path().join(".fixhero"));
        assert!(store.store_screenshot("abc123", "https://elsewhere/x.png").await.is_err());
    }
}
