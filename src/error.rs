//! Error types for the pdf2txt library.
//!
//! Every failure is fatal: an extraction either produces the full requested
//! text or returns one [`Pdf2TxtError`]. Variants are grouped by the stage
//! that raises them so callers can match on the class of problem
//! (missing input, failed download, unreadable PDF, bad page range) without
//! parsing messages.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2txt library.
#[derive(Debug, Error)]
pub enum Pdf2TxtError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Fetch errors ──────────────────────────────────────────────────────
    /// The server answered, but not with a PDF (non-200 status or a
    /// content-type other than `application/pdf`).
    #[error(
        "Failed to fetch '{url}': HTTP {status}, content-type {}",
        .content_type.as_deref().unwrap_or("<none>")
    )]
    FetchFailed {
        url: String,
        status: u16,
        content_type: Option<String>,
    },

    /// The request never produced a response (DNS, TLS, connection reset…).
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Cache errors ──────────────────────────────────────────────────────
    /// The cache directory or a cache file could not be created or written.
    #[error("Cache I/O error at '{path}': {source}")]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// pdfium rejected the document.
    #[error("PDF is corrupt or unsupported: {detail}")]
    CorruptPdf { detail: String },

    /// Text extraction failed for one page of an otherwise loadable document.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install pdfium system-wide, or set PDFIUM_LIB_PATH=/path/to/libpdfium.\n\
Prebuilt binaries: https://github.com/bblanchon/pdfium-binaries\n"
    )]
    PdfiumBindingFailed(String),

    // ── Page range errors ─────────────────────────────────────────────────
    /// The page-range expression could not be parsed.
    #[error("Invalid page range '{expr}': {reason}")]
    InvalidPageRange { expr: String, reason: String },

    /// A selected page number exceeds the document's page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output text file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2TxtError {
    /// Map an I/O error raised while opening `path` onto the input variants.
    pub(crate) fn from_input_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => Pdf2TxtError::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => Pdf2TxtError::PermissionDenied { path },
            _ => Pdf2TxtError::ReadFailed { path, source: err },
        }
    }
}
