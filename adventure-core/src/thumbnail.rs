//! Story thumbnails.
//!
//! A thumbnail is kept as the encoded image bytes. Decoding belongs to
//! whichever surface displays it, so equality here is content equality.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use tokio::fs;

/// Encoded image data attached to a story.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Thumbnail {
    bytes: Vec<u8>,
}

impl Thumbnail {
    /// Wrap already-encoded image bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Read an image file from disk.
    pub async fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let bytes = fs::read(path).await?;
        Ok(Self { bytes })
    }

    /// The encoded image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the encoded image in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hash of the image content, stable within a process.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.bytes.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_equality() {
        let a = Thumbnail::from_bytes(vec![1, 2, 3]);
        let b = Thumbnail::from_bytes([1u8, 2, 3].as_slice());
        let c = Thumbnail::from_bytes(vec![3, 2, 1]);

        assert_eq!(a, b);
        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("cover.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).expect("Write should succeed");

        let thumbnail = Thumbnail::load(&path).await.expect("Load should succeed");
        assert_eq!(thumbnail.bytes(), &[0x89, b'P', b'N', b'G']);
        assert_eq!(thumbnail.len(), 4);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = Thumbnail::load("/definitely/not/here.png").await;
        assert!(result.is_err());
    }
}
