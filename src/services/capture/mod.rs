// Capture sources: anything that can hand the pipeline a photo

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::errors::CaptureError;
use crate::core::types::{CaptureResult, PermissionStatus};

/// Camera device abstraction.
#[async_trait]
pub trait ImageCapturer: Send + Sync {
    /// Ask the device for camera access.
    async fn request_permission(&self) -> PermissionStatus;

    /// Take a photo and return a handle to the stored image.
    async fn capture(&self) -> Result<CaptureResult, CaptureError>;
}

/// Capture source backed by a still image already on disk.
#[derive(Debug, Clone)]
pub struct FileCapturer {
    path: PathBuf,
}

impl FileCapturer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ImageCapturer for FileCapturer {
    async fn request_permission(&self) -> PermissionStatus {
        match tokio::fs::File::open(&self.path).await {
            Ok(_) => PermissionStatus::Granted,
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => PermissionStatus::Denied,
            // A missing file is reported by capture(), not as a permission problem
            Err(_) => PermissionStatus::Granted,
        }
    }

    async fn capture(&self) -> Result<CaptureResult, CaptureError> {
        let metadata = match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CaptureError::NotFound(self.path.clone()));
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(CaptureError::PermissionDenied);
            }
            Err(source) => {
                return Err(CaptureError::ReadFailed {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if !metadata.is_file() {
            return Err(CaptureError::NotFound(self.path.clone()));
        }

        debug!("Captured {} ({} bytes)", self.path.display(), metadata.len());

        Ok(CaptureResult {
            image_path: self.path.clone(),
        })
    }
}
