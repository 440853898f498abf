//! Input resolution: turn a user-supplied path or URL into PDF bytes.
//!
//! Local paths are read straight from disk. URLs go through the download
//! cache: a fresh entry is served from disk, otherwise the document is
//! fetched once, written back to the cache, and returned. The file handle is
//! released before the bytes are returned on every path.

use super::cache::{CacheLookup, CacheStore};
use super::fetch::Fetcher;
use crate::config::ExtractionConfig;
use crate::error::Pdf2TxtError;
use crate::output::{CacheOutcome, SourceKind};
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, info};

/// PDF bytes plus where they came from.
#[derive(Debug)]
pub struct ResolvedSource {
    pub bytes: Vec<u8>,
    pub kind: SourceKind,
    pub cache: CacheOutcome,
    /// Cache file backing a remote source; `None` for local inputs.
    pub cache_path: Option<PathBuf>,
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to the PDF's bytes.
pub async fn resolve_source(
    input: &str,
    config: &ExtractionConfig,
) -> Result<ResolvedSource, Pdf2TxtError> {
    if is_url(input) {
        let store = CacheStore::new(&config.cache_dir, config.cache_ttl);
        let fetcher = Fetcher::new(config)?;
        resolve_remote(input, &store, &fetcher, SystemTime::now()).await
    } else {
        resolve_local(input).await
    }
}

/// Read a local file in full.
pub async fn resolve_local(path_str: &str) -> Result<ResolvedSource, Pdf2TxtError> {
    let path = PathBuf::from(path_str);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| Pdf2TxtError::from_input_io(&path, e))?;

    debug!("Read local PDF: {} ({} bytes)", path.display(), bytes.len());
    Ok(ResolvedSource {
        bytes,
        kind: SourceKind::Local,
        cache: CacheOutcome::NotApplicable,
        cache_path: None,
    })
}

/// Serve `url` from `store` when fresh, otherwise download it with `fetcher`.
///
/// A failed download leaves the cache untouched.
pub async fn resolve_remote(
    url: &str,
    store: &CacheStore,
    fetcher: &Fetcher,
    now: SystemTime,
) -> Result<ResolvedSource, Pdf2TxtError> {
    let path = store.path_for(url)?;

    let outcome = match store.lookup(&path, now).await? {
        CacheLookup::Fresh => {
            info!("Using cached PDF: {}", path.display());
            let bytes = store.read(&path).await?;
            return Ok(ResolvedSource {
                bytes,
                kind: SourceKind::Remote,
                cache: CacheOutcome::Hit,
                cache_path: Some(path),
            });
        }
        CacheLookup::Missing => {
            info!("No cache found, downloading: {}", url);
            CacheOutcome::Miss
        }
        CacheLookup::Expired => {
            info!("Cache expired, downloading: {}", url);
            CacheOutcome::Expired
        }
    };

    let bytes = fetcher.fetch(url).await?;
    store.write(&path, &bytes).await?;
    info!("Cached to: {}", path.display());

    Ok(ResolvedSource {
        bytes,
        kind: SourceKind::Remote,
        cache: outcome,
        cache_path: Some(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url("ftp://example.com/doc.pdf"));
        assert!(!is_url(""));
    }

    #[tokio::test]
    async fn local_file_is_read_whole() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.7 body").unwrap();

        let resolved = resolve_local(path.to_str().unwrap()).await.unwrap();
        assert_eq!(resolved.bytes, b"%PDF-1.7 body");
        assert_eq!(resolved.kind, SourceKind::Local);
        assert_eq!(resolved.cache, CacheOutcome::NotApplicable);
        assert!(resolved.cache_path.is_none());
    }

    #[tokio::test]
    async fn missing_local_file_is_not_found() {
        let err = resolve_local("/definitely/not/a/real/file.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2TxtError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn fresh_cache_entry_skips_network() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CacheStore::new(tmp.path(), std::time::Duration::from_secs(60));
        // Port 9 (discard) on localhost: any real request would fail.
        let url = "http://127.0.0.1:9/cached.pdf";
        let path = store.path_for(url).unwrap();
        store.write(&path, b"%PDF cached").await.unwrap();

        let fetcher = Fetcher::with_options("test-agent", 1).unwrap();
        let resolved = resolve_remote(url, &store, &fetcher, SystemTime::now())
            .await
            .unwrap();
        assert_eq!(resolved.bytes, b"%PDF cached");
        assert_eq!(resolved.cache, CacheOutcome::Hit);
        assert_eq!(resolved.cache_path.as_deref(), Some(path.as_path()));
    }
}
