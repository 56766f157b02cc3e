//! Filesystem-backed object store
//!
//! Object keys map to relative paths below the configured root. Keys containing
//! `..`, absolute paths or drive prefixes are refused.

use crate::domain::repository::ObjectStore;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Open (and create if needed) a store rooted at `root`
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .with_context(|| format!("failed to create storage root '{}'", root.display()))?;
        tracing::info!(path = %root.display(), "Object store initialized");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            bail!("empty object key");
        }
        let mut resolved = self.root.clone();
        for component in Path::new(key).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    bail!("object key '{key}' escapes the storage root");
                }
            }
        }
        if resolved == self.root {
            bail!("object key '{key}' does not name a file");
        }
        Ok(resolved)
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create '{}'", parent.display()))?;
        }
        // Stage beside the target, then rename into place
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let staging = path.with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));
        fs::write(&staging, bytes)
            .await
            .with_context(|| format!("failed to write object '{key}'"))?;
        if let Err(err) = fs::rename(&staging, &path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(err).with_context(|| format!("failed to commit object '{key}'"));
        }
        tracing::debug!(key, size = bytes.len(), "Stored object");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.resolve(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("failed to read object '{key}'")),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(key, "Deleted object");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("failed to delete object '{key}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path()).await.unwrap();

        store.put("owner/abc-file.pdf", b"%PDF-1.7").await.unwrap();
        assert!(dir.path().join("owner").join("abc-file.pdf").exists());
        assert_eq!(
            store.get("owner/abc-file.pdf").await.unwrap().as_deref(),
            Some(&b"%PDF-1.7"[..])
        );

        store.delete("owner/abc-file.pdf").await.unwrap();
        assert!(store.get("owner/abc-file.pdf").await.unwrap().is_none());
        store.delete("owner/abc-file.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn test_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path().join("objects")).await.unwrap();

        assert!(store.put("../escape.txt", b"x").await.is_err());
        assert!(store.put("owner/../../escape.txt", b"x").await.is_err());
        assert!(store.get("/etc/passwd").await.is_err());
        assert!(store.put("", b"x").await.is_err());
        assert!(!dir.path().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn test_put_overwrites_and_leaves_no_staging_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path()).await.unwrap();

        store.put("owner/contrato.pdf", b"v1").await.unwrap();
        store.put("owner/contrato.pdf", b"v2").await.unwrap();

        assert_eq!(
            store.get("owner/contrato.pdf").await.unwrap().as_deref(),
            Some(&b"v2"[..])
        );
        let entries: Vec<String> = std::fs::read_dir(dir.path().join("owner"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["contrato.pdf".to_string()]);
    }
}
