use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use tokio::sync::OnceCell;

/// Result of persisting an object: the backend key plus the URL clients use.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub public_url: String,
}

/// Capability interface over the photo storage backends.
///
/// `list_keys` is only meaningful on backends that report
/// `supports_pruning()`; the others refuse it.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> anyhow::Result<StoredObject>;

    async fn delete_object(&self, key: &str) -> anyhow::Result<()>;

    fn supports_pruning(&self) -> bool {
        false
    }

    async fn list_keys(&self) -> anyhow::Result<Vec<String>> {
        anyhow::bail!("este backend no soporta listado de archivos")
    }
}

// ---- S3 / MinIO ----

#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    endpoint: String,
}

impl S3Storage {
    pub async fn new(
        endpoint: &str,
        bucket: &str,
        access_key: &str,
        secret_key: &str,
        region: &str,
    ) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(Credentials::new(
                access_key, secret_key, None, None, "static",
            ))
            .endpoint_url(endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: bucket.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl StorageClient for S3Storage {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> anyhow::Result<StoredObject> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .context("s3 put_object")?;
        Ok(StoredObject {
            key: key.to_string(),
            // Path-style URL, matches force_path_style above.
            public_url: format!("{}/{}/{}", self.endpoint, self.bucket, key),
        })
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .context("s3 delete_object")?;
        Ok(())
    }
}

// ---- Local filesystem ----

pub struct LocalStorage {
    base_dir: PathBuf,
    base_url: String,
    initialized: OnceCell<()>,
}

impl LocalStorage {
    pub fn new(base_dir: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            base_dir: base_dir.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            initialized: OnceCell::new(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(key)
    }

    async fn ensure_base_dir(&self) -> anyhow::Result<()> {
        self.initialized
            .get_or_try_init(|| async {
                tokio::fs::create_dir_all(&self.base_dir)
                    .await
                    .with_context(|| format!("crear {}", self.base_dir.display()))
            })
            .await?;
        Ok(())
    }

    async fn collect_keys(dir: &Path, prefix: &str, out: &mut Vec<String>) -> anyhow::Result<()> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let key = if prefix.is_empty() {
                name
            } else {
                format!("{}/{}", prefix, name)
            };
            if entry.file_type().await?.is_dir() {
                // Keys are at most one directory deep; recursion keeps it honest.
                Box::pin(Self::collect_keys(&entry.path(), &key, out)).await?;
            } else {
                out.push(key);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        _content_type: &str,
    ) -> anyhow::Result<StoredObject> {
        self.ensure_base_dir().await?;
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("crear {}", parent.display()))?;
        }
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("escribir {}", path.display()))?;
        Ok(StoredObject {
            key: key.to_string(),
            public_url: format!("{}/uploads/{}", self.base_url, key),
        })
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path_for(key);
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("borrar {}", path.display()))?;
        Ok(())
    }

    fn supports_pruning(&self) -> bool {
        true
    }

    async fn list_keys(&self) -> anyhow::Result<Vec<String>> {
        self.ensure_base_dir().await?;
        let mut out = Vec::new();
        Self::collect_keys(&self.base_dir, "", &mut out).await?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_storage() -> (LocalStorage, PathBuf) {
        let dir = std::env::temp_dir().join(format!("dulzura-storage-{}", Uuid::new_v4()));
        (
            LocalStorage::new(dir.clone(), "http://localhost:3000"),
            dir,
        )
    }

    #[tokio::test]
    async fn put_list_delete_roundtrip() {
        let (storage, dir) = temp_storage();

        let stored = storage
            .put_object("productos/a.jpg", Bytes::from_static(b"jpegdata"), "image/jpeg")
            .await
            .expect("put");
        assert_eq!(stored.key, "productos/a.jpg");
        assert_eq!(
            stored.public_url,
            "http://localhost:3000/uploads/productos/a.jpg"
        );
        assert!(dir.join("productos/a.jpg").exists());

        let keys = storage.list_keys().await.expect("list");
        assert_eq!(keys, vec!["productos/a.jpg".to_string()]);

        storage.delete_object("productos/a.jpg").await.expect("delete");
        assert!(!dir.join("productos/a.jpg").exists());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn local_backend_supports_pruning() {
        let (storage, dir) = temp_storage();
        assert!(storage.supports_pruning());
        let keys = storage.list_keys().await.expect("list on empty dir");
        assert!(keys.is_empty());
        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn delete_missing_object_errors() {
        let (storage, dir) = temp_storage();
        storage.ensure_base_dir().await.unwrap();
        assert!(storage.delete_object("no/such.jpg").await.is_err());
        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
