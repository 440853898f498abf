//! Cache file naming for downloaded PDFs.

use crate::error::Pdf2TxtError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Extension every cache file carries.
pub const PDF_EXTENSION: &str = ".pdf";

/// Derive the cache file name for `url`.
///
/// The last path segment is used verbatim when it ends in `.pdf`; anything
/// else (no segment, query-driven endpoints, unparsable URLs) is named after
/// the SHA-256 of the full URL text. The result depends on the URL only.
pub fn cache_file_name(url: &str) -> String {
    if let Some(name) = url_basename(url) {
        if name.ends_with(PDF_EXTENSION) && name.len() > PDF_EXTENSION.len() {
            return name;
        }
    }
    format!("{}{}", url_hash(url), PDF_EXTENSION)
}

/// Path of the cache file for `url` under `root`, creating `root` if needed.
pub fn cache_path(root: &Path, url: &str) -> Result<PathBuf, Pdf2TxtError> {
    std::fs::create_dir_all(root).map_err(|source| Pdf2TxtError::CacheIo {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(root.join(cache_file_name(url)))
}

fn url_basename(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    if last.is_empty() {
        None
    } else {
        Some(last.to_string())
    }
}

fn url_hash(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
