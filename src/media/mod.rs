//! Payment Screenshot Uploads
//!
//! Validates an uploaded image against the [`UploadPolicy`], downsizes it
//! to fit the bounding box and hands it to a [`MediaStore`] provider.
//!
//! - **local**: files under a data directory, served at `/media`
//! - **cloudinary**: unsigned preset upload to the Cloudinary API
//!
//! The identifier/URL returned by the provider is passed through untouched.

mod cloudinary;
mod local;

pub use cloudinary::CloudinaryStore;
pub use local::LocalMediaStore;

use async_trait::async_trait;
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use serde::Serialize;
use std::io::Cursor;
use std::sync::Arc;
use thiserror::Error;

use crate::config::MediaConfig;

/// Logical folder every screenshot is stored under
pub const UPLOAD_FOLDER: &str = "hackathon_payments";

/// Multipart field carrying the file
pub const UPLOAD_FIELD: &str = "image";

/// Constraints applied before anything reaches the provider
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub allowed_formats: Vec<&'static str>,
    pub max_bytes: usize,
    pub max_width: u32,
    pub max_height: u32,
    pub folder: String,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_formats: vec!["jpg", "jpeg", "png", "webp"],
            max_bytes: 5 * 1024 * 1024,
            max_width: 1000,
            max_height: 1000,
            folder: UPLOAD_FOLDER.to_string(),
        }
    }
}

impl UploadPolicy {
    fn allows(&self, ext: &str) -> bool {
        self.allowed_formats
            .iter()
            .any(|f| f.eq_ignore_ascii_case(ext))
    }

    /// Validate, decode and resize an upload
    pub fn prepare(&self, file_name: Option<&str>, bytes: &[u8]) -> Result<PreparedImage, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::MissingFile);
        }
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                size: bytes.len(),
                limit: self.max_bytes,
            });
        }

        if let Some(ext) = file_name.and_then(|n| n.rsplit_once('.')).map(|(_, ext)| ext) {
            if !self.allows(ext) {
                return Err(UploadError::UnsupportedFormat(ext.to_lowercase()));
            }
        }

        let format = image::guess_format(bytes)
            .map_err(|_| UploadError::UnsupportedFormat("unrecognized image data".to_string()))?;
        let extension = match format {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::WebP => "webp",
            other => return Err(UploadError::UnsupportedFormat(format!("{:?}", other).to_lowercase())),
        };
        if !self.allows(extension) {
            return Err(UploadError::UnsupportedFormat(extension.to_string()));
        }

        let decoded = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| UploadError::Decode(e.to_string()))?;

        let (width, height) = (decoded.width(), decoded.height());
        let needs_resize = width > self.max_width || height > self.max_height;

        let (bytes, width, height) = if needs_resize {
            let resized = decoded.resize(self.max_width, self.max_height, FilterType::Lanczos3);
            let (w, h) = (resized.width(), resized.height());
            tracing::debug!(from = ?(width, height), to = ?(w, h), "Resized upload");
            (encode(&resized, format)?, w, h)
        } else {
            (bytes.to_vec(), width, height)
        };

        Ok(PreparedImage {
            bytes,
            format,
            extension,
            width,
            height,
        })
    }
}

fn encode(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, UploadError> {
    // JPEG has no alpha channel and the WebP encoder only takes 8-bit RGB(A)
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        ImageFormat::WebP => DynamicImage::ImageRgba8(img.to_rgba8()),
        _ => img.clone(),
    };

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format)
        .map_err(|e| UploadError::Encode(e.to_string()))?;
    Ok(buf.into_inner())
}

/// An image that passed validation and fits the bounding box
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub extension: &'static str,
    pub width: u32,
    pub height: u32,
}

impl PreparedImage {
    pub fn content_type(&self) -> &'static str {
        match self.format {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            _ => "image/png",
        }
    }
}

/// What the provider handed back
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredMedia {
    pub url: String,
    pub public_id: Option<String>,
}

/// Upload failures
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file provided in field '{}'", UPLOAD_FIELD)]
    MissingFile,

    #[error("File is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    /// The request body hit the server's limit before the file was read
    #[error("Upload exceeds the request limit of {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("Unsupported image format: {0}. Use jpg, jpeg, png or webp")]
    UnsupportedFormat(String),

    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("Could not encode image: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Media provider error: {0}")]
    Provider(String),
}

/// A place uploaded images end up
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Persist the image under `folder`
    async fn store(&self, folder: &str, image: PreparedImage) -> Result<StoredMedia, UploadError>;

    /// Remove a previously stored image. `Ok(false)` when the provider
    /// cannot delete it.
    async fn discard(&self, _media: &StoredMedia) -> Result<bool, UploadError> {
        Ok(false)
    }
}

/// Policy plus provider
#[derive(Clone)]
pub struct Uploader {
    policy: UploadPolicy,
    store: Arc<dyn MediaStore>,
}

impl Uploader {
    pub fn new(policy: UploadPolicy, store: Arc<dyn MediaStore>) -> Self {
        Self { policy, store }
    }

    /// Build the configured provider with the default policy
    pub fn from_config(config: &MediaConfig) -> Self {
        let store: Arc<dyn MediaStore> = match config.provider.to_lowercase().as_str() {
            "cloudinary" => Arc::new(CloudinaryStore::new(&config.cloud_name, &config.upload_preset)),
            other => {
                if other != "local" {
                    tracing::warn!(provider = %other, "Unknown media provider, falling back to local");
                }
                Arc::new(LocalMediaStore::new(&config.local_dir, &config.public_url))
            }
        };
        Self::new(UploadPolicy::default(), store)
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn provider(&self) -> &str {
        self.store.name()
    }

    /// Validate and store one file
    pub async fn upload(&self, file_name: Option<&str>, bytes: &[u8]) -> Result<StoredMedia, UploadError> {
        let prepared = self.policy.prepare(file_name, bytes)?;
        let (width, height) = (prepared.width, prepared.height);

        let stored = self.store.store(&self.policy.folder, prepared).await?;

        tracing::info!(
            provider = self.store.name(),
            url = %stored.url,
            width,
            height,
            "Stored upload"
        );
        Ok(stored)
    }

    /// Drop an upload that never got a database record
    pub async fn discard(&self, media: &StoredMedia) {
        match self.store.discard(media).await {
            Ok(true) => tracing::info!(url = %media.url, "Discarded orphaned upload"),
            Ok(false) => tracing::warn!(
                provider = self.store.name(),
                url = %media.url,
                public_id = ?media.public_id,
                "Orphaned upload left at provider"
            ),
            Err(e) => tracing::error!(
                url = %media.url,
                public_id = ?media.public_id,
                error = %e,
                "Failed to discard orphaned upload"
            ),
        }
    }
}
