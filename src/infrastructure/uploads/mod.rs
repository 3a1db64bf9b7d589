use axum::body::Bytes;
use futures::{Stream, StreamExt};
use std::fmt::Display;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload exceeds the {limit} byte limit")]
    TooLarge { limit: usize },
    #[error("upload storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("upload interrupted: {0}")]
    Stream(String),
}

/// Temporary storage for uploaded audio, one file per request
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    /// Create the store, making sure `dir` exists
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, max_bytes })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist an inbound payload under a fresh UUID file name, owned by
    /// the request `request_id`.
    ///
    /// The handle exists before the first byte is written, so any failure
    /// (size limit, broken stream, cancellation) removes the partial file.
    pub async fn accept<S, E>(
        &self,
        stream: S,
        content_type: Option<String>,
        request_id: &str,
    ) -> Result<UploadHandle, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Display,
    {
        let mut stream = std::pin::pin!(stream);
        let id = Uuid::new_v4();
        let path = self.dir.join(format!("{}.upload", id));
        let mut handle = UploadHandle {
            id,
            request_id: request_id.to_string(),
            path,
            size: 0,
            content_type,
            released: false,
        };

        let mut file = tokio::fs::File::create(&handle.path).await?;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| UploadError::Stream(e.to_string()))?;
            if handle.size + chunk.len() > self.max_bytes {
                tracing::warn!(
                    upload_id = %handle.id,
                    request_id = %handle.request_id,
                    limit = self.max_bytes,
                    "Upload rejected: size limit exceeded"
                );
                return Err(UploadError::TooLarge {
                    limit: self.max_bytes,
                });
            }
            file.write_all(&chunk).await?;
            handle.size += chunk.len();
        }
        file.flush().await?;

        tracing::debug!(
            upload_id = %handle.id,
            request_id = %handle.request_id,
            size_bytes = handle.size,
            content_type = ?handle.content_type,
            "Upload stored"
        );

        Ok(handle)
    }

    pub async fn release(&self, handle: UploadHandle) -> std::io::Result<()> {
        handle.release().await
    }
}

/// Exclusive owner of one uploaded file.
///
/// Dropping the handle without calling [`UploadHandle::release`] removes the
/// file synchronously.
#[derive(Debug)]
pub struct UploadHandle {
    id: Uuid,
    request_id: String,
    path: PathBuf,
    size: usize,
    content_type: Option<String>,
    released: bool,
}

impl UploadHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The request that uploaded the file
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }

    /// Remove the file. A file that is already gone counts as released.
    pub async fn release(mut self) -> std::io::Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        self.released = true;
        tracing::debug!(upload_id = %self.id, request_id = %self.request_id, "Upload released");
        Ok(())
    }
}

impl Drop for UploadHandle {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(
                upload_id = %self.id,
                request_id = %self.request_id,
                "Upload removed on drop"
            ),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                upload_id = %self.id,
                request_id = %self.request_id,
                path = %self.path.display(),
                error = %e,
                "Failed to remove upload"
            ),
        }
    }
}
