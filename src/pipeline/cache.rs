//! On-disk store for downloaded PDFs.
//!
//! Entries are plain files under one root directory, named by
//! [`cache_key::cache_file_name`](super::cache_key::cache_file_name). The
//! file's modification time is the entry's timestamp: an entry is fresh while
//! `now - mtime < ttl`. Nothing is ever evicted; an expired entry is simply
//! overwritten by the next successful download.
//!
//! Writes go to a temp file in the same directory and are then renamed over
//! the target, so a concurrent reader sees either the old bytes or the new
//! ones, never a truncated file. Two processes racing on the same URL both
//! download and the last rename wins.

use super::cache_key;
use crate::error::Pdf2TxtError;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;

/// State of a cache entry at lookup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookup {
    /// No file exists for the URL.
    Missing,
    /// A file exists but is older than the freshness window.
    Expired,
    /// A file exists and is within the freshness window.
    Fresh,
}

/// Read-through cache of downloaded PDF bytes.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            root: root.into(),
            ttl,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cache file path for `url`; creates the root directory if absent.
    pub fn path_for(&self, url: &str) -> Result<PathBuf, Pdf2TxtError> {
        cache_key::cache_path(&self.root, url)
    }

    /// Classify the entry at `path` relative to `now`.
    ///
    /// A modification time in the future (clock skew, restored backups)
    /// counts as fresh.
    pub async fn lookup(&self, path: &Path, now: SystemTime) -> Result<CacheLookup, Pdf2TxtError> {
        let meta = match tokio::fs::metadata(path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(CacheLookup::Missing),
            Err(source) => {
                return Err(Pdf2TxtError::CacheIo {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        if !meta.is_file() {
            return Ok(CacheLookup::Missing);
        }

        let mtime = meta.modified().map_err(|source| Pdf2TxtError::CacheIo {
            path: path.to_path_buf(),
            source,
        })?;

        let state = match now.duration_since(mtime) {
            Ok(age) if age >= self.ttl => CacheLookup::Expired,
            _ => CacheLookup::Fresh,
        };
        debug!("Cache entry {} is {:?}", path.display(), state);
        Ok(state)
    }

    /// `true` iff the entry at `path` exists and is within the freshness window.
    pub async fn is_fresh(&self, path: &Path, now: SystemTime) -> Result<bool, Pdf2TxtError> {
        Ok(self.lookup(path, now).await? == CacheLookup::Fresh)
    }

    /// Raw bytes of the cached file.
    pub async fn read(&self, path: &Path) -> Result<Vec<u8>, Pdf2TxtError> {
        tokio::fs::read(path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                Pdf2TxtError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Pdf2TxtError::CacheIo {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })
    }

    /// Replace the file at `path` with `bytes`, creating it if absent.
    pub async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), Pdf2TxtError> {
        let target = path.to_path_buf();
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        let bytes = bytes.to_vec();

        tokio::task::spawn_blocking(move || write_atomic(&dir, &target, &bytes))
            .await
            .map_err(|e| Pdf2TxtError::Internal(format!("Cache write task panicked: {}", e)))??;

        debug!("Wrote cache entry {}", path.display());
        Ok(())
    }
}

fn write_atomic(dir: &Path, target: &Path, bytes: &[u8]) -> Result<(), Pdf2TxtError> {
    let io_err = |source: std::io::Error| Pdf2TxtError::CacheIo {
        path: target.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(io_err)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(target).map_err(|e| io_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn store(dir: &Path) -> CacheStore {
        CacheStore::new(dir, DAY)
    }

    #[tokio::test]
    async fn missing_entry_is_not_fresh() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let path = store.path_for("http://example.com/a.pdf").unwrap();

        assert_eq!(
            store.lookup(&path, SystemTime::now()).await.unwrap(),
            CacheLookup::Missing
        );
        assert!(!store.is_fresh(&path, SystemTime::now()).await.unwrap());
    }

    #[tokio::test]
    async fn written_entry_is_fresh_then_expires() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let path = store.path_for("http://example.com/a.pdf").unwrap();

        store.write(&path, b"%PDF-1.4 one").await.unwrap();
        let now = SystemTime::now();
        assert_eq!(store.lookup(&path, now).await.unwrap(), CacheLookup::Fresh);

        let later = now + DAY + Duration::from_secs(1);
        assert_eq!(store.lookup(&path, later).await.unwrap(), CacheLookup::Expired);
    }

    #[tokio::test]
    async fn future_mtime_counts_as_fresh() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let path = store.path_for("http://example.com/a.pdf").unwrap();
        store.write(&path, b"%PDF").await.unwrap();

        let past = SystemTime::now() - Duration::from_secs(3600);
        assert!(store.is_fresh(&path, past).await.unwrap());
    }

    #[tokio::test]
    async fn write_overwrites_and_read_returns_latest() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let path = store.path_for("http://example.com/a.pdf").unwrap();

        store.write(&path, b"first version").await.unwrap();
        store.write(&path, b"second").await.unwrap();
        assert_eq!(store.read(&path).await.unwrap(), b"second");

        // Only the entry itself remains; no temp files are left behind.
        let files: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn read_missing_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let err = store.read(&tmp.path().join("nope.pdf")).await.unwrap_err();
        assert!(matches!(err, Pdf2TxtError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn zero_ttl_is_always_expired() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CacheStore::new(tmp.path(), Duration::ZERO);
        let path = store.path_for("http://example.com/a.pdf").unwrap();
        store.write(&path, b"%PDF").await.unwrap();

        let now = SystemTime::now() + Duration::from_millis(1);
        assert_eq!(store.lookup(&path, now).await.unwrap(), CacheLookup::Expired);
    }
}
