//! Files attached to a new post.

use std::path::Path;

use bytes::Bytes;
use reqwest::multipart::Part;

use skillsync_shared::constants::MAX_MEDIA_SIZE;

use crate::error::NetError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl MediaUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Result<Self> {
        let data = data.into();
        if data.len() > MAX_MEDIA_SIZE {
            return Err(NetError::Media(format!(
                "file is {} bytes, limit is {MAX_MEDIA_SIZE}",
                data.len()
            )));
        }
        Ok(Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        })
    }

    /// Read a file from disk, guessing its content type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| NetError::Media(format!("{}: {e}", path.display())))?;
        if meta.len() > MAX_MEDIA_SIZE as u64 {
            return Err(NetError::Media(format!(
                "{} is larger than {MAX_MEDIA_SIZE} bytes",
                path.display()
            )));
        }
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| NetError::Media(format!("{}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = guess_content_type(&file_name);
        Self::new(file_name, content_type, data)
    }

    pub fn kind(&self) -> MediaKind {
        match self.content_type.split('/').next() {
            Some("image") => MediaKind::Image,
            Some("video") => MediaKind::Video,
            _ => MediaKind::Other,
        }
    }

    pub(crate) fn into_part(self) -> Result<Part> {
        Part::bytes(self.data.to_vec())
            .file_name(self.file_name)
            .mime_str(&self.content_type)
            .map_err(|e| NetError::Media(e.to_string()))
    }
}

fn guess_content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}
