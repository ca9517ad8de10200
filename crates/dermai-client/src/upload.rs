//! Image upload validation.
//!
//! Type and size are checked before any bytes leave the machine. Size is
//! read from file metadata first so an oversized file is never loaded.

use std::path::Path;

use crate::error::UploadError;

/// Accepted image encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// `image/jpeg` (also declared as `image/jpg`).
    Jpeg,
    /// `image/png`.
    Png,
}

impl ImageKind {
    /// Canonical MIME type sent in the multipart part.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Parse a declared MIME type.
    #[must_use]
    pub fn from_mime(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Infer from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// A validated image ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    kind: ImageKind,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Validate in-memory bytes with a declared MIME type.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::UnsupportedType`] for anything but JPEG/PNG and
    /// [`UploadError::TooLarge`] above `max_bytes`.
    pub fn from_bytes(
        file_name: impl Into<String>,
        mime: &str,
        bytes: Vec<u8>,
        max_bytes: u64,
    ) -> Result<Self, UploadError> {
        let kind = ImageKind::from_mime(mime).ok_or_else(|| UploadError::UnsupportedType {
            detected: mime.to_string(),
        })?;
        check_size(bytes.len() as u64, max_bytes)?;
        Ok(Self {
            file_name: file_name.into(),
            kind,
            bytes,
        })
    }

    /// Validate and load an image from disk.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::UnsupportedType`] when the extension is not
    /// JPEG/PNG, [`UploadError::TooLarge`] above `max_bytes`, and
    /// [`UploadError::Read`] when the file cannot be read.
    pub async fn from_path(path: &Path, max_bytes: u64) -> Result<Self, UploadError> {
        let kind = ImageKind::from_path(path).ok_or_else(|| UploadError::UnsupportedType {
            detected: path
                .extension()
                .map_or_else(String::new, |ext| ext.to_string_lossy().into_owned()),
        })?;
        let read_error = |source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        };
        let metadata = tokio::fs::metadata(path).await.map_err(read_error)?;
        check_size(metadata.len(), max_bytes)?;
        let bytes = tokio::fs::read(path).await.map_err(read_error)?;
        check_size(bytes.len() as u64, max_bytes)?;

        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());
        Ok(Self {
            file_name,
            kind,
            bytes,
        })
    }

    /// Original file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Image encoding.
    #[must_use]
    pub const fn kind(&self) -> ImageKind {
        self.kind
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the image is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn into_parts(self) -> (String, ImageKind, Vec<u8>) {
        (self.file_name, self.kind, self.bytes)
    }
}

const fn check_size(size: u64, limit: u64) -> Result<(), UploadError> {
    if size > limit {
        Err(UploadError::TooLarge { size, limit })
    } else {
        Ok(())
    }
}
