//! Disk-backed résumé storage.
//!
//! Uploads are streamed chunk by chunk into `<upload_dir>/<millis>-<filename>`.
//! The directory is created on first use. Stored files are never removed by
//! this service; only a partial file from an aborted upload is cleaned up.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// How many fresh timestamps to try when `<millis>-<name>` already exists.
const NAME_ATTEMPTS: u32 = 5;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file exceeds the {limit} byte upload limit")]
    TooLarge { limit: u64 },

    #[error("unusable upload filename '{0}'")]
    InvalidName(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A résumé that has been written to disk.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Filename as the client sent it, used for the email attachment.
    pub original_name: String,
    /// `<millis>-<original_name>` on disk.
    pub stored_name: String,
    pub path: PathBuf,
    pub content_type: String,
    pub size: u64,
}

impl StoredFile {
    pub async fn read(&self) -> Result<Vec<u8>, StorageError> {
        Ok(fs::read(&self.path).await?)
    }
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_file_bytes: u64,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_file_bytes: u64) -> Self {
        Self {
            dir: dir.into(),
            max_file_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    /// Opens a new upload file. Write chunks with [`PendingUpload::write_chunk`]
    /// and seal it with [`PendingUpload::finish`].
    pub async fn begin(
        &self,
        original_name: &str,
        content_type: Option<&str>,
    ) -> Result<PendingUpload, StorageError> {
        fs::create_dir_all(&self.dir).await?;

        let original_name = sanitize_filename(original_name)
            .ok_or_else(|| StorageError::InvalidName(original_name.to_string()))?;
        let (file, stored_name, path) = self.create_unique(&original_name).await?;

        debug!(stored_name = %stored_name, "Opened upload file");

        Ok(PendingUpload {
            file,
            limit: self.max_file_bytes,
            written: 0,
            stored: StoredFile {
                original_name,
                stored_name,
                path,
                content_type: content_type
                    .unwrap_or("application/octet-stream")
                    .to_string(),
                size: 0,
            },
        })
    }

    /// Creates `<millis>-<name>` without clobbering an existing file. On a
    /// clash the next millisecond is tried.
    async fn create_unique(&self, name: &str) -> Result<(File, String, PathBuf), StorageError> {
        let mut attempt = 1;
        loop {
            let stored_name = format!("{}-{}", chrono::Utc::now().timestamp_millis(), name);
            let path = self.dir.join(&stored_name);

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((file, stored_name, path)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt < NAME_ATTEMPTS => {
                    debug!(stored_name = %stored_name, "Upload name taken, retrying");
                    attempt += 1;
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// An upload in progress. Dropping it without calling `finish` or `abort`
/// leaves whatever was written on disk.
#[derive(Debug)]
pub struct PendingUpload {
    file: File,
    limit: u64,
    written: u64,
    stored: StoredFile,
}

impl PendingUpload {
    /// Appends a chunk. Fails with [`StorageError::TooLarge`] as soon as the
    /// running total passes the limit; the caller should then `abort`.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), StorageError> {
        let next = self.written + chunk.len() as u64;
        if next > self.limit {
            return Err(StorageError::TooLarge { limit: self.limit });
        }
        self.file.write_all(chunk).await?;
        self.written = next;
        Ok(())
    }

    pub async fn finish(mut self) -> Result<StoredFile, StorageError> {
        self.file.flush().await?;
        self.stored.size = self.written;
        Ok(self.stored)
    }

    /// Closes and deletes the partial file.
    pub async fn abort(self) {
        let path = self.stored.path.clone();
        drop(self.file);
        if let Err(e) = fs::remove_file(&path).await {
            warn!(path = %path.display(), "Failed to remove partial upload: {e}");
        }
    }
}

/// Keeps only the final path component so a crafted name cannot escape the
/// upload directory. Handles both `/` and `\` separators. `None` when
/// nothing usable is left.
fn sanitize_filename(name: &str) -> Option<String> {
    let last = name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();

    match last {
        "" | "." | ".." => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_plain_name_unchanged() {
        assert_eq!(sanitize_filename("resume.pdf").as_deref(), Some("resume.pdf"));
        assert_eq!(
            sanitize_filename("My CV (2024).docx").as_deref(),
            Some("My CV (2024).docx")
        );
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(
            sanitize_filename("C:\\Users\\jane\\resume.pdf").as_deref(),
            Some("resume.pdf")
        );
    }

    #[test]
    fn test_sanitize_rejects_unusable_names() {
        assert_eq!(sanitize_filename(""), None);
        assert_eq!(sanitize_filename("uploads/"), None);
        assert_eq!(sanitize_filename(".."), None);
    }

    #[tokio::test]
    async fn test_begin_refuses_unusable_name() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path(), 1024);

        let err = store.begin("", None).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidName(_)));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_same_name_uploads_never_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path(), 1024);

        let mut first = store.begin("resume.pdf", None).await.unwrap();
        let mut second = store.begin("resume.pdf", None).await.unwrap();
        first.write_chunk(b"first").await.unwrap();
        second.write_chunk(b"second").await.unwrap();
        let first = first.finish().await.unwrap();
        let second = second.finish().await.unwrap();

        assert_ne!(first.stored_name, second.stored_name);
        assert_eq!(first.read().await.unwrap(), b"first");
        assert_eq!(second.read().await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_store_creates_directory_and_names_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("uploads");
        let store = UploadStore::new(&dir, 1024);

        let mut upload = store.begin("resume.pdf", Some("application/pdf")).await.unwrap();
        upload.write_chunk(b"hello ").await.unwrap();
        upload.write_chunk(b"world").await.unwrap();
        let stored = upload.finish().await.unwrap();

        assert!(dir.is_dir());
        assert_eq!(stored.original_name, "resume.pdf");
        assert_eq!(stored.size, 11);
        assert_eq!(stored.content_type, "application/pdf");

        let (millis, rest) = stored.stored_name.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok(), "prefix was {millis}");
        assert_eq!(rest, "resume.pdf");
        assert_eq!(stored.read().await.unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn test_limit_is_inclusive() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path(), 4);

        let mut upload = store.begin("a.txt", None).await.unwrap();
        upload.write_chunk(b"abcd").await.unwrap();
        let stored = upload.finish().await.unwrap();
        assert_eq!(stored.size, 4);
        assert_eq!(stored.content_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected_and_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path(), 4);

        let mut upload = store.begin("big.pdf", None).await.unwrap();
        upload.write_chunk(b"abc").await.unwrap();
        let err = upload.write_chunk(b"de").await.unwrap_err();
        assert!(matches!(err, StorageError::TooLarge { limit: 4 }));

        upload.abort().await;
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
