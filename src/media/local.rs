//! Local filesystem media provider

use async_trait::async_trait;
use std::path::PathBuf;

use super::{MediaStore, PreparedImage, StoredMedia, UploadError};

/// Stores images under `root/<folder>/<uuid>.<ext>`
pub struct LocalMediaStore {
    root: PathBuf,
    public_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Directory served at `/media`
    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn store(&self, folder: &str, image: PreparedImage) -> Result<StoredMedia, UploadError> {
        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir).await?;

        let id = uuid::Uuid::new_v4().to_string();
        let file_name = format!("{}.{}", id, image.extension);
        tokio::fs::write(dir.join(&file_name), &image.bytes).await?;

        Ok(StoredMedia {
            url: format!("{}/{}/{}", self.public_url, folder, file_name),
            public_id: Some(format!("{}/{}", folder, id)),
        })
    }

    async fn discard(&self, media: &StoredMedia) -> Result<bool, UploadError> {
        let Some((folder, id)) = media.public_id.as_deref().and_then(|p| p.rsplit_once('/')) else {
            return Ok(false);
        };
        // The file name carries the extension; the public id does not
        let file_name = match media.url.rsplit('/').next() {
            Some(name) if name.starts_with(id) && !name.contains("..") => name,
            _ => return Ok(false),
        };

        match tokio::fs::remove_file(self.root.join(folder).join(file_name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::tests::png_bytes;
    use crate::media::UploadPolicy;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_discard_removes_file() {
        let dir = tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "http://localhost:8082/media/");
        let image = UploadPolicy::default()
            .prepare(Some("a.png"), &png_bytes(4, 4))
            .unwrap();

        let stored = store.store("hackathon_payments", image).await.unwrap();
        let path = dir
            .path()
            .join(format!("{}.png", stored.public_id.as_deref().unwrap()));
        assert!(path.exists());

        assert!(store.discard(&stored).await.unwrap());
        assert!(!path.exists());
        assert!(!store.discard(&stored).await.unwrap());
    }

    #[tokio::test]
    async fn test_discard_ignores_foreign_urls() {
        let dir = tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "http://localhost:8082/media");
        let media = StoredMedia {
            url: "http://localhost:8082/media/hackathon_payments/../secret.png".to_string(),
            public_id: Some("hackathon_payments/abc".to_string()),
        };
        assert!(!store.discard(&media).await.unwrap());
    }
}
