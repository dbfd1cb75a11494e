//! Reference document retrieval.
//!
//! Documents are read from local disk, or (property/unit data only) fetched
//! from a remote URL. Neither path retries, caches or applies a timeout.

use std::io::ErrorKind;
use std::path::Path;

use crate::types::{DocumentSource, RefDataError, RefDataResult};

impl DocumentSource {
    /// Reads the document content from this source.
    pub async fn read(&self) -> RefDataResult<String> {
        match self {
            DocumentSource::LocalFile(path) => read_local_document(path).await,
            DocumentSource::Remote(url) => fetch_remote_document(url).await,
        }
    }
}

/// Reads a reference document from local disk.
pub async fn read_local_document<P: AsRef<Path>>(path: P) -> RefDataResult<String> {
    let path = path.as_ref();

    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(RefDataError::FileNotFound {
            path: path.display().to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Fetches a reference document over HTTP(S).
///
/// A non-success status is an error; the body is not inspected.
#[cfg(feature = "remote")]
pub async fn fetch_remote_document(url: &str) -> RefDataResult<String> {
    let response = reqwest::get(url).await.map_err(|source| RefDataError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(RefDataError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| RefDataError::Http {
        url: url.to_string(),
        source,
    })
}

/// Fetches a reference document over HTTP(S).
///
/// Always fails: the crate was built without the `remote` feature.
#[cfg(not(feature = "remote"))]
pub async fn fetch_remote_document(url: &str) -> RefDataResult<String> {
    Err(RefDataError::RemoteDisabled {
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_read_local_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<PropertyUnits/>").unwrap();

        let content = read_local_document(file.path()).await.unwrap();
        assert_eq!(content, "<PropertyUnits/>");

        let source = DocumentSource::LocalFile(file.path().to_path_buf());
        assert_eq!(source.read().await.unwrap(), "<PropertyUnits/>");
    }

    #[tokio::test]
    async fn test_missing_local_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.xml");

        let error = read_local_document(&path).await.unwrap_err();
        match error {
            RefDataError::FileNotFound { path: reported } => {
                assert!(reported.ends_with("absent.xml"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[cfg(not(feature = "remote"))]
    #[tokio::test]
    async fn test_remote_disabled() {
        let error = fetch_remote_document("https://example.invalid/x.xml")
            .await
            .unwrap_err();
        assert!(matches!(error, RefDataError::RemoteDisabled { .. }));
    }
}
