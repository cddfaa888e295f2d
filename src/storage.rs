use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::async_trait;
use bytes::Bytes;
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};

const STAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year][month][day]_[hour][minute][second]");

/// Where uploaded leaf images live. History rows reference images by the
/// name this trait hands back, relative to the store's root.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the bytes and return the stored name.
    async fn save(&self, original_name: &str, body: Bytes) -> anyhow::Result<String>;
    async fn remove(&self, stored_name: &str) -> anyhow::Result<()>;
}

/// Flat files beneath a configured upload root.
#[derive(Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

/// Timestamp-prefixed name for an upload. Client-supplied directory
/// components are stripped so the name is always a single path segment.
fn timestamped_name(original_name: &str, now: OffsetDateTime) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("upload");
    let stamp = now
        .format(STAMP_FORMAT)
        .unwrap_or_else(|_| "00000000_000000".into());
    format!("{stamp}_{base}")
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, original_name: &str, body: Bytes) -> anyhow::Result<String> {
        let name = timestamped_name(original_name, OffsetDateTime::now_utc());
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("create upload dir {}", self.root.display()))?;
        let path = self.root.join(&name);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write image {}", path.display()))?;
        Ok(name)
    }

    async fn remove(&self, stored_name: &str) -> anyhow::Result<()> {
        let path = self.root.join(stored_name);
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("remove image {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn name_is_timestamp_prefixed() {
        let name = timestamped_name("leaf.jpg", datetime!(2025-03-04 05:06:07 UTC));
        assert_eq!(name, "20250304_050607_leaf.jpg");
    }

    #[test]
    fn name_strips_client_directories() {
        let now = datetime!(2025-03-04 05:06:07 UTC);
        assert_eq!(
            timestamped_name("../../etc/passwd", now),
            "20250304_050607_passwd"
        );
        assert_eq!(
            timestamped_name("photos/leaf.png", now),
            "20250304_050607_leaf.png"
        );
    }

    #[test]
    fn empty_name_falls_back() {
        let now = datetime!(2025-03-04 05:06:07 UTC);
        assert_eq!(timestamped_name("", now), "20250304_050607_upload");
    }

    #[tokio::test]
    async fn save_then_remove_roundtrip() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let root = std::env::temp_dir().join(format!("leafscan-store-test-{nanos}"));
        let store = LocalImageStore::new(root.clone());

        let name = store
            .save("leaf.jpg", Bytes::from_static(b"not really a jpeg"))
            .await
            .expect("save should succeed");
        assert!(name.ends_with("_leaf.jpg"));
        assert!(root.join(&name).exists());

        store.remove(&name).await.expect("remove should succeed");
        assert!(!root.join(&name).exists());

        tokio::fs::remove_dir_all(&root).await.ok();
    }

    #[tokio::test]
    async fn remove_missing_file_errors() {
        let store = LocalImageStore::new(std::env::temp_dir().join("leafscan-missing"));
        assert!(store.remove("nope.jpg").await.is_err());
    }
}
