//! Result types returned by the extraction entry points.

use serde::Serialize;
use std::path::PathBuf;

/// Where the PDF bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A filesystem path.
    Local,
    /// An HTTP(S) URL, served through the download cache.
    Remote,
    /// Bytes handed directly to [`crate::extract_from_bytes`].
    Memory,
}

/// How the download cache was used for a remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheOutcome {
    /// The source was not remote; the cache was not consulted.
    NotApplicable,
    /// A fresh entry was served without touching the network.
    Hit,
    /// No entry existed; the document was downloaded and cached.
    Miss,
    /// An entry existed but was stale; it was re-downloaded and overwritten.
    Expired,
}

/// Text of one selected page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageText {
    /// 1-indexed page number.
    pub page_num: usize,
    pub text: String,
}

/// Provenance of the extracted document.
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    /// The identifier as the caller supplied it.
    pub input: String,
    pub kind: SourceKind,
    pub cache: CacheOutcome,
    /// Cache file for remote sources.
    pub cache_path: Option<PathBuf>,
    /// Size of the PDF in bytes.
    pub byte_len: usize,
}

/// Timing and size statistics for one extraction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages included in the output.
    pub selected_pages: usize,
    pub resolve_duration_ms: u64,
    pub extract_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// The complete result of an extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutput {
    /// Selected pages joined with `\n`.
    pub text: String,
    /// The selected pages, in document order.
    pub pages: Vec<PageText>,
    pub source: SourceInfo,
    pub stats: ExtractionStats,
}
