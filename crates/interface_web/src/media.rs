//! Uploaded images
//!
//! Images are stored below `<media_root>/posts/` under a fresh UUID and
//! served back from `/media/`. The stored path (relative to the media root)
//! is what the post keeps in its `image` field.

use std::path::{Path, PathBuf};

use image::{GenericImageView, ImageFormat};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Sub-directory of the media root holding post images
pub const POSTS_DIR: &str = "posts";

/// Errors raised while storing media
#[derive(Debug, Error)]
pub enum MediaError {
    /// The upload is not one of the accepted image formats
    #[error("Unsupported image upload")]
    InvalidImage,

    #[error("Media storage failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Accepted image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Gif,
    Png,
    Jpeg,
    Webp,
}

impl ImageKind {
    /// Recognizes an accepted format from the leading bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            ImageFormat::Gif => Some(ImageKind::Gif),
            ImageFormat::Png => Some(ImageKind::Png),
            ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            ImageFormat::WebP => Some(ImageKind::Webp),
            _ => None,
        }
    }

    fn format(&self) -> ImageFormat {
        match self {
            ImageKind::Gif => ImageFormat::Gif,
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Webp => ImageFormat::WebP,
        }
    }

    /// Maps a declared MIME type onto a format
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type.split(';').next().map(str::trim) {
            Some("image/gif") => Some(ImageKind::Gif),
            Some("image/png") => Some(ImageKind::Png),
            Some("image/jpeg") | Some("image/jpg") => Some(ImageKind::Jpeg),
            Some("image/webp") => Some(ImageKind::Webp),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Gif => "gif",
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpg",
            ImageKind::Webp => "webp",
        }
    }
}

/// Checks that an upload is an accepted image
///
/// A declared content type, when present, must agree with the content, and
/// the whole image has to decode. A valid header over a broken body is
/// rejected.
pub fn detect_image(content_type: Option<&str>, bytes: &[u8]) -> Result<ImageKind, MediaError> {
    let kind = ImageKind::sniff(bytes).ok_or(MediaError::InvalidImage)?;
    if let Some(declared) = content_type {
        if ImageKind::from_content_type(declared) != Some(kind) {
            debug!(declared, "Upload content does not match its content type");
            return Err(MediaError::InvalidImage);
        }
    }

    let decoded = image::load_from_memory_with_format(bytes, kind.format()).map_err(|e| {
        debug!(error = %e, "Upload failed to decode");
        MediaError::InvalidImage
    })?;
    let (width, height) = decoded.dimensions();
    debug!(width, height, "Upload decoded");

    Ok(kind)
}

/// Filesystem store for uploaded images
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the directory tree uploads are written to
    pub async fn ensure_dirs(&self) -> Result<(), MediaError> {
        tokio::fs::create_dir_all(self.root.join(POSTS_DIR)).await?;
        Ok(())
    }

    /// Validates and stores an uploaded image
    ///
    /// # Returns
    ///
    /// The stored path relative to the media root, e.g. `posts/<uuid>.gif`
    pub async fn save_image(
        &self,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, MediaError> {
        let kind = detect_image(content_type, bytes)?;

        self.ensure_dirs().await?;
        let relative = format!("{}/{}.{}", POSTS_DIR, Uuid::new_v4(), kind.extension());
        tokio::fs::write(self.root.join(&relative), bytes).await?;

        debug!(path = %relative, size = bytes.len(), "Image stored");
        Ok(relative)
    }

    /// Deletes a stored image; a missing file is not an error
    pub async fn remove(&self, relative: &str) {
        if let Err(e) = tokio::fs::remove_file(self.root.join(relative)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = relative, error = %e, "Failed to remove image");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIF: &[u8] = b"GIF89a\x02\x00\x01\x00\x80\x00\x00\x00\x00\x00\xff\xff\xff!\xf9\x04\x00\x00\x00\x00\x00,\x00\x00\x00\x00\x02\x00\x01\x00\x00\x02\x02\x0c\n\x00;";
    const GIF_HEADER_ONLY: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";

    fn temp_store() -> MediaStore {
        MediaStore::new(std::env::temp_dir().join(format!("blog-media-{}", Uuid::new_v4())))
    }

    #[test]
    fn test_sniff() {
        assert_eq!(ImageKind::sniff(GIF), Some(ImageKind::Gif));
        assert_eq!(ImageKind::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::sniff(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageKind::Webp));
        assert_eq!(ImageKind::sniff(b"hello world"), None);
    }

    #[test]
    fn test_header_without_image_data_is_rejected() {
        assert_eq!(ImageKind::sniff(GIF_HEADER_ONLY), Some(ImageKind::Gif));
        assert!(matches!(
            detect_image(Some("image/gif"), GIF_HEADER_ONLY),
            Err(MediaError::InvalidImage)
        ));
        assert!(matches!(
            detect_image(Some("image/gif"), b"GIF89a this is not an image"),
            Err(MediaError::InvalidImage)
        ));
        assert!(matches!(
            detect_image(None, &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0]),
            Err(MediaError::InvalidImage)
        ));
        assert_eq!(detect_image(Some("image/gif"), GIF).unwrap(), ImageKind::Gif);
    }

    #[test]
    fn test_content_type_parameters_are_ignored() {
        assert_eq!(
            ImageKind::from_content_type("image/png; charset=binary"),
            Some(ImageKind::Png)
        );
        assert_eq!(ImageKind::from_content_type("text/plain"), None);
    }

    #[tokio::test]
    async fn test_save_image_writes_under_posts() {
        let store = temp_store();
        let path = store.save_image(Some("image/gif"), GIF).await.unwrap();

        assert!(path.starts_with("posts/"));
        assert!(path.ends_with(".gif"));
        assert_eq!(tokio::fs::read(store.root().join(&path)).await.unwrap(), GIF);

        store.remove(&path).await;
        assert!(!store.root().join(&path).exists());
    }

    #[tokio::test]
    async fn test_non_image_is_rejected() {
        let store = temp_store();
        let result = store.save_image(Some("image/gif"), b"plain text").await;
        assert!(matches!(result, Err(MediaError::InvalidImage)));

        let mismatched = store.save_image(Some("image/png"), GIF).await;
        assert!(matches!(mismatched, Err(MediaError::InvalidImage)));
    }
}
