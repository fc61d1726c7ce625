//! Cloudinary media provider
//!
//! Unsigned uploads through a preset, so no API secret lives on the server.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use super::{MediaStore, PreparedImage, StoredMedia, UploadError};

const CLOUDINARY_API: &str = "https://api.cloudinary.com/v1_1";

pub struct CloudinaryStore {
    client: Client,
    endpoint: String,
    upload_preset: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
    public_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

impl CloudinaryStore {
    pub fn new(cloud_name: &str, upload_preset: &str) -> Self {
        Self::with_endpoint(
            format!("{}/{}/image/upload", CLOUDINARY_API, cloud_name),
            upload_preset,
        )
    }

    /// Point at a different upload endpoint
    pub fn with_endpoint(endpoint: impl Into<String>, upload_preset: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            upload_preset: upload_preset.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    fn name(&self) -> &str {
        "cloudinary"
    }

    async fn store(&self, folder: &str, image: PreparedImage) -> Result<StoredMedia, UploadError> {
        let content_type = image.content_type();
        let file_name = format!("upload.{}", image.extension);

        let part = Part::bytes(image.bytes)
            .file_name(file_name)
            .mime_str(content_type)
            .map_err(|e| UploadError::Provider(e.to_string()))?;

        let form = Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", folder.to_string())
            .part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(UploadError::Provider(format!("{}: {}", status.as_u16(), message)));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::Provider(e.to_string()))?;

        let url = body
            .secure_url
            .or(body.url)
            .ok_or_else(|| UploadError::Provider("response carried no URL".to_string()))?;

        Ok(StoredMedia {
            url,
            public_id: body.public_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{UploadPolicy, UPLOAD_FOLDER};
    use axum::{extract::Multipart, http::StatusCode, routing::post, Json, Router};

    async fn spawn_host(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_endpoint_from_cloud_name() {
        let store = CloudinaryStore::new("demo", "unsigned");
        assert_eq!(
            store.endpoint(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }

    #[tokio::test]
    async fn test_upload_returns_provider_url() {
        async fn handler(mut multipart: Multipart) -> Json<serde_json::Value> {
            let mut folder = String::new();
            let mut preset = String::new();
            let mut file_len = 0;
            while let Some(field) = multipart.next_field().await.unwrap() {
                match field.name().unwrap_or_default().to_string().as_str() {
                    "folder" => folder = field.text().await.unwrap(),
                    "upload_preset" => preset = field.text().await.unwrap(),
                    "file" => file_len = field.bytes().await.unwrap().len(),
                    _ => {}
                }
            }
            assert_eq!(preset, "unsigned");
            assert!(file_len > 0);
            Json(serde_json::json!({
                "secure_url": format!("https://res.example/{}/abc.png", folder),
                "public_id": format!("{}/abc", folder),
            }))
        }

        let base = spawn_host(Router::new().route("/upload", post(handler))).await;
        let store = CloudinaryStore::with_endpoint(format!("{}/upload", base), "unsigned");

        let prepared = UploadPolicy::default()
            .prepare(Some("p.png"), &crate::media::tests::png_bytes(16, 16))
            .unwrap();
        let stored = store.store(UPLOAD_FOLDER, prepared).await.unwrap();

        assert_eq!(stored.url, "https://res.example/hackathon_payments/abc.png");
        assert_eq!(stored.public_id.as_deref(), Some("hackathon_payments/abc"));
    }

    #[tokio::test]
    async fn test_provider_error_is_surfaced() {
        async fn handler() -> (StatusCode, Json<serde_json::Value>) {
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": {"message": "Upload preset not found"}})),
            )
        }

        let base = spawn_host(Router::new().route("/upload", post(handler))).await;
        let store = CloudinaryStore::with_endpoint(format!("{}/upload", base), "missing");

        let prepared = UploadPolicy::default()
            .prepare(Some("p.png"), &crate::media::tests::png_bytes(16, 16))
            .unwrap();
        let err = store.store(UPLOAD_FOLDER, prepared).await.unwrap_err();
        assert!(matches!(err, UploadError::Provider(msg) if msg.contains("Upload preset not found")));
    }
}
