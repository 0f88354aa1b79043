use std::path::{Path, PathBuf};

use async_trait::async_trait;
use axum::body::Bytes;
use log::info;
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),
}

#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Hosts an image somewhere and hands back the URL it can be fetched from.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, image: ImageFile) -> Result<String, UploadError>;
}

/// Keeps uploaded images in a local directory served under `base_url`.
pub struct LocalImageUploader {
    dir: PathBuf,
    base_url: String,
}

impl LocalImageUploader {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        LocalImageUploader {
            dir: dir.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ImageUploader for LocalImageUploader {
    async fn upload(&self, image: ImageFile) -> Result<String, UploadError> {
        let extension = image_extension(&image)?;
        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.dir.join(&file_name), &image.bytes).await?;
        info!("Stored image {} ({} bytes)", file_name, image.bytes.len());
        Ok(format!("{}/{}", self.base_url, file_name))
    }
}

fn image_extension(image: &ImageFile) -> Result<&'static str, UploadError> {
    if let Some(content_type) = image.content_type.as_deref() {
        if let Some(extension) = extension_for_mime(content_type) {
            return Ok(extension);
        }
    }
    image
        .file_name
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|extension| extension.to_str())
        .and_then(extension_for_suffix)
        .ok_or_else(|| {
            UploadError::UnsupportedType(
                image.content_type.clone().or_else(|| image.file_name.clone()).unwrap_or_default(),
            )
        })
}

fn extension_for_mime(content_type: &str) -> Option<&'static str> {
    match content_type.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/avif" => Some("avif"),
        _ => None,
    }
}

fn extension_for_suffix(suffix: &str) -> Option<&'static str> {
    match suffix.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("jpg"),
        "png" => Some("png"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        "avif" => Some("avif"),
        _ => None,
    }
}
