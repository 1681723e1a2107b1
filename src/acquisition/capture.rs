use log::info;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;

use super::ImageRef;
use crate::error::LensError;

/// Writes camera captures into a directory, one timestamped JPEG per shot
#[derive(Debug, Clone)]
pub struct CaptureSink {
    dir: PathBuf,
}

impl CaptureSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a capture taken at `millis` since the epoch is written to
    pub fn capture_path(&self, millis: u128) -> PathBuf {
        self.dir.join(format!("{}.jpg", millis))
    }

    /// Store a captured frame and return its `file://` reference
    pub async fn save(&self, image_data: &[u8]) -> Result<ImageRef, LensError> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        self.save_at(image_data, millis).await
    }

    async fn save_at(&self, image_data: &[u8], millis: u128) -> Result<ImageRef, LensError> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.capture_path(millis);
        fs::write(&path, image_data).await?;
        info!("Saved capture to {}", path.display());

        let absolute = if path.is_absolute() {
            path
        } else {
            std::env::current_dir()?.join(path)
        };
        ImageRef::from_path(&absolute).ok_or_else(|| {
            LensError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("cannot reference {}", absolute.display()),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_path_is_timestamped() {
        let sink = CaptureSink::new("/data/media/app");
        assert_eq!(
            sink.capture_path(1_700_000_000_123),
            PathBuf::from("/data/media/app/1700000000123.jpg")
        );
    }

    #[tokio::test]
    async fn test_save_writes_file_and_returns_file_reference() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CaptureSink::new(dir.path().join("captures"));

        let image = sink.save_at(b"jpeg bytes", 42).await.unwrap();
        assert_eq!(image.scheme(), "file");

        let path = image.file_path().unwrap();
        assert!(path.ends_with("captures/42.jpg"));
        assert_eq!(std::fs::read(path).unwrap(), b"jpeg bytes");
    }
}
