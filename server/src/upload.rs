//! Multipart spooling.
//!
//! Incoming file fields are written to a temporary file before any handler
//! looks at them. The outcome of the transfer is summarized as an
//! [`UploadErrorCode`], so handlers only have to check one value.
//!
//! The temporary file is removed once the [`UploadedFile`] is dropped.

use std::path::Path;
use anyhow::anyhow;
use axum::extract::multipart::{Field, Multipart};
use bytes::Bytes;
use tempfile::{Builder, TempPath};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use common::v1::upload::{UploadErrorCode, FILE_FIELD, MAX_FILE_SIZE_FIELD};
use crate::config::UploadConfig;
use crate::error::{ErrorKind, ServerError, ServerResult};

/// Prefix of spooled files.
const TMP_PREFIX: &str = "blobpost-";

/// A file received through a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    /// The filename sent by the client.
    name: String,
    /// The content type sent by the client.
    content_type: Option<String>,
    /// Number of bytes spooled.
    size: u64,
    /// Outcome of the transfer.
    error: UploadErrorCode,
    /// Where the content was spooled to.
    ///
    /// Only set if the transfer succeeded.
    tmp_path: Option<TempPath>,
}

impl UploadedFile {
    pub(crate) fn spooled(
        name: String,
        content_type: Option<String>,
        size: u64,
        tmp_path: TempPath,
    ) -> Self {
        Self {
            name,
            content_type,
            size,
            error: UploadErrorCode::OK,
            tmp_path: Some(tmp_path),
        }
    }

    pub(crate) fn failed(
        name: String,
        content_type: Option<String>,
        error: UploadErrorCode,
    ) -> Self {
        Self {
            name,
            content_type,
            size: 0,
            error,
            tmp_path: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn error(&self) -> UploadErrorCode {
        self.error
    }

    pub fn tmp_path(&self) -> Option<&Path> {
        self.tmp_path.as_deref()
    }

    /// Reads the whole spooled file into memory.
    pub async fn read(&self) -> ServerResult<Bytes> {
        let path = self.tmp_path().ok_or_else(|| {
            ServerError::from(ErrorKind::ReadError(anyhow!(
                "\"{}\" has no spooled content (code {})",
                self.name,
                self.error
            )))
        })?;

        let data = fs::read(path).await.map_err(ServerError::read_error)?;

        Ok(Bytes::from(data))
    }
}

/// Finds the file field in a multipart body and spools it.
///
/// Returns `None` if the body has no file field or cannot be parsed
/// before reaching one. A part named like the file field but sent
/// without a filename is a plain form value and does not count.
pub async fn receive(mut multipart: Multipart, config: &UploadConfig) -> Option<UploadedFile> {
    let mut form_limit: Option<u64> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!("Malformed multipart body: {}", e);
                return None;
            }
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) if field.file_name().is_some() => {
                return Some(spool(field, config, form_limit).await);
            }
            Some(MAX_FILE_SIZE_FIELD) => {
                form_limit = field
                    .text()
                    .await
                    .ok()
                    .and_then(|text| text.trim().parse().ok())
                    .filter(|limit| *limit > 0);
            }
            _ => {}
        }
    }
}

/// Writes one file field to a fresh temporary file.
async fn spool(
    mut field: Field<'_>,
    config: &UploadConfig,
    form_limit: Option<u64>,
) -> UploadedFile {
    let name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);

    // An empty file picker still sends the field.
    if name.is_empty() {
        return UploadedFile::failed(name, content_type, UploadErrorCode::NO_FILE);
    }

    let tmp_dir = config.tmp_dir();
    let has_tmp_dir = fs::metadata(&tmp_dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !has_tmp_dir {
        tracing::warn!("Temporary directory {:?} is missing", tmp_dir);
        return UploadedFile::failed(name, content_type, UploadErrorCode::NO_TMP_DIR);
    }

    let (file, tmp_path) = match Builder::new().prefix(TMP_PREFIX).tempfile_in(&tmp_dir) {
        Ok(tmp) => tmp.into_parts(),
        Err(e) => {
            tracing::warn!("Could not create a temporary file in {:?}: {}", tmp_dir, e);
            return UploadedFile::failed(name, content_type, UploadErrorCode::CANT_WRITE);
        }
    };
    let mut file = File::from_std(file);

    let mut size: u64 = 0;
    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                tracing::debug!("Upload of \"{}\" broke off: {}", name, e);
                return UploadedFile::failed(name, content_type, UploadErrorCode::PARTIAL);
            }
        };

        size += chunk.len() as u64;
        if config.max_file_size > 0 && size > config.max_file_size {
            return UploadedFile::failed(name, content_type, UploadErrorCode::INI_SIZE);
        }
        if form_limit.map_or(false, |limit| size > limit) {
            return UploadedFile::failed(name, content_type, UploadErrorCode::FORM_SIZE);
        }

        if let Err(e) = file.write_all(&chunk).await {
            tracing::warn!("Could not write to {:?}: {}", tmp_path, e);
            return UploadedFile::failed(name, content_type, UploadErrorCode::CANT_WRITE);
        }
    }

    if let Err(e) = file.flush().await {
        tracing::warn!("Could not write to {:?}: {}", tmp_path, e);
        return UploadedFile::failed(name, content_type, UploadErrorCode::CANT_WRITE);
    }

    tracing::debug!("Spooled \"{}\" ({} bytes) to {:?}", name, size, tmp_path);

    UploadedFile::spooled(name, content_type, size, tmp_path)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn spooled_file(contents: &[u8]) -> UploadedFile {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(contents).unwrap();

        UploadedFile::spooled(
            "hello.txt".to_string(),
            Some("text/plain".to_string()),
            contents.len() as u64,
            tmp.into_temp_path(),
        )
    }

    #[tokio::test]
    async fn test_read_spooled() {
        let file = spooled_file(b"hello");

        assert!(file.error().is_ok());
        assert_eq!(5, file.size());
        assert_eq!(&b"hello"[..], &file.read().await.unwrap()[..]);
    }

    #[tokio::test]
    async fn test_tmp_file_removed_on_drop() {
        let file = spooled_file(b"hello");
        let path = file.tmp_path().unwrap().to_owned();
        assert!(path.exists());

        drop(file);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_read_failed() {
        let file = UploadedFile::failed(
            "big.bin".to_string(),
            None,
            UploadErrorCode::INI_SIZE,
        );

        assert!(file.tmp_path().is_none());
        let err = file.read().await.unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ReadError(_)));
    }
}
