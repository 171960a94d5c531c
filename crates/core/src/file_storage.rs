//! Contract for the external file-storage collaborator.
//!
//! A provider accepts one file (bytes plus name and MIME type) under an
//! object key and answers with a durable URL. Batches are stored in input
//! order and either every file yields a URL or the whole batch fails.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::attachments::AttachmentKind;
use crate::error::CoreError;
use crate::types::DbId;

/// A file received from the client, ready to be handed to a provider.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original file name as sent by the browser.
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A durable file store.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Short provider name used in logs (`local`, `s3`, ...).
    fn provider(&self) -> &'static str;

    /// Store `file` under `key` and return its durable URL.
    async fn store(&self, key: &str, file: &UploadFile) -> Result<String, CoreError>;
}

/// Store every file of a batch, in order.
///
/// Returns exactly one URL per file. The first failure aborts the batch with
/// [`CoreError::Upstream`]; callers must then append nothing.
pub async fn store_batch(
    storage: &dyn FileStorage,
    key_prefix: &str,
    client_id: DbId,
    kind: AttachmentKind,
    files: &[UploadFile],
) -> Result<Vec<String>, CoreError> {
    let mut urls = Vec::with_capacity(files.len());

    for file in files {
        let key = object_key(key_prefix, client_id, kind, &file.file_name);
        let url = storage.store(&key, file).await.map_err(|e| {
            tracing::warn!(
                provider = storage.provider(),
                client_id,
                kind = %kind,
                file_name = %file.file_name,
                error = %e,
                "File upload failed, rejecting batch"
            );
            match e {
                CoreError::Upstream(msg) => CoreError::Upstream(msg),
                other => CoreError::Upstream(format!(
                    "Failed to store '{}': {other}",
                    file.file_name
                )),
            }
        })?;
        urls.push(url);
    }

    Ok(urls)
}

/// Build a collision-free object key for an uploaded file.
///
/// Layout: `{prefix}/{client_id}/{kind}/{uuid}-{sanitized_name}`.
pub fn object_key(prefix: &str, client_id: DbId, kind: AttachmentKind, file_name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let name = sanitize_file_name(file_name);
    let unique = uuid::Uuid::new_v4();
    if prefix.is_empty() {
        format!("{client_id}/{kind}/{unique}-{name}")
    } else {
        format!("{prefix}/{client_id}/{kind}/{unique}-{name}")
    }
}

/// Replace anything outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Join a public base URL and an object key.
pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.trim_start_matches('/'))
}

// ---------------------------------------------------------------------------
// Local filesystem provider
// ---------------------------------------------------------------------------

/// Stores files under a local directory served at `public_base_url`.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    fn provider(&self) -> &'static str {
        "local"
    }

    async fn store(&self, key: &str, file: &UploadFile) -> Result<String, CoreError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CoreError::Upstream(format!("Failed to create upload directory: {e}"))
            })?;
        }
        tokio::fs::write(&path, &file.data)
            .await
            .map_err(|e| CoreError::Upstream(format!("Failed to write '{key}': {e}")))?;

        tracing::debug!(key, bytes = file.data.len(), "Stored file locally");
        Ok(public_url(&self.public_base_url, key))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> UploadFile {
        UploadFile {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            data: b"png-bytes".to_vec(),
        }
    }

    /// Provider that fails on one specific file name.
    struct FailOn(&'static str);

    #[async_trait]
    impl FileStorage for FailOn {
        fn provider(&self) -> &'static str {
            "fail-on"
        }

        async fn store(&self, key: &str, file: &UploadFile) -> Result<String, CoreError> {
            if file.file_name == self.0 {
                Err(CoreError::Upstream("disk full".to_string()))
            } else {
                Ok(public_url("https://files.example", key))
            }
        }
    }

    #[test]
    fn sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\photos\\front door.jpg"), "front_door.jpg");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name(""), "upload");
    }

    #[test]
    fn object_key_layout() {
        let key = object_key("/clients/", 42, AttachmentKind::Pictures, "front.png");
        assert!(key.starts_with("clients/42/pictures/"));
        assert!(key.ends_with("-front.png"));
    }

    #[test]
    fn object_keys_are_unique() {
        let a = object_key("clients", 1, AttachmentKind::Contract, "c.pdf");
        let b = object_key("clients", 1, AttachmentKind::Contract, "c.pdf");
        assert_ne!(a, b);
    }

    #[test]
    fn public_url_joins_cleanly() {
        assert_eq!(
            public_url("https://cdn.example/uploads/", "/a/b.png"),
            "https://cdn.example/uploads/a/b.png"
        );
    }

    #[tokio::test]
    async fn local_storage_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "http://localhost:3000/uploads");

        let url = storage.store("clients/1/pictures/x.png", &file("x.png")).await.unwrap();
        assert_eq!(url, "http://localhost:3000/uploads/clients/1/pictures/x.png");

        let written = std::fs::read(dir.path().join("clients/1/pictures/x.png")).unwrap();
        assert_eq!(written, b"png-bytes");
    }

    #[tokio::test]
    async fn batch_preserves_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "http://localhost/uploads");
        let files = [file("one.png"), file("two.png"), file("three.png")];

        let urls = store_batch(&storage, "clients", 7, AttachmentKind::Pictures, &files)
            .await
            .unwrap();

        assert_eq!(urls.len(), 3);
        assert!(urls[0].ends_with("-one.png"));
        assert!(urls[1].ends_with("-two.png"));
        assert!(urls[2].ends_with("-three.png"));
    }

    #[tokio::test]
    async fn batch_fails_as_a_whole() {
        let storage = FailOn("u5.png");
        let files = [file("u4.png"), file("u5.png")];

        let err = store_batch(&storage, "clients", 7, AttachmentKind::Pictures, &files)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Upstream(_)));
    }
}
