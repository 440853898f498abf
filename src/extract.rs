//! Extraction entry points.
//!
//! Every entry point runs the same three steps in order: resolve the input
//! to bytes, parse the bytes into per-page text once, then apply the page
//! selection. An error at any step is returned as-is; there is no partial
//! output.

use crate::config::{ExtractionConfig, PageSelection};
use crate::error::Pdf2TxtError;
use crate::output::{
    CacheOutcome, ExtractionOutput, ExtractionStats, SourceInfo, SourceKind,
};
use crate::pipeline::input::{self, ResolvedSource};
use crate::pipeline::select;
use crate::pipeline::text::{self, PageTextExtractor, PdfiumTextExtractor};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Extract text from a PDF file or URL.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str`: Local file path or HTTP/HTTPS URL to a PDF
/// * `config`: Extraction configuration (cache location, page selection…)
///
/// # Errors
/// - File not found / permission denied
/// - Download failed, timed out, or did not return a PDF
/// - pdfium could not be bound or rejected the document
/// - The page selection names a page the document does not have
pub async fn extract(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2TxtError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting extraction: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_source(input_str, config).await?;
    let resolve_duration_ms = total_start.elapsed().as_millis() as u64;

    run_pipeline(input_str, resolved, config, total_start, resolve_duration_ms).await
}

/// Extract text with default configuration and an optional range expression.
///
/// `range_expr` uses the [`PageSelection`] syntax; `None` selects every page.
pub async fn extract_text(
    input_str: impl AsRef<str>,
    range_expr: Option<&str>,
) -> Result<String, Pdf2TxtError> {
    let pages = match range_expr {
        Some(expr) => expr.parse::<PageSelection>()?,
        None => PageSelection::All,
    };
    let config = ExtractionConfig::builder().pages(pages).build()?;
    Ok(extract(input_str, &config).await?.text)
}

/// Extract text from PDF bytes already in memory.
///
/// Skips input resolution and the download cache entirely.
pub async fn extract_from_bytes(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2TxtError> {
    let resolved = ResolvedSource {
        bytes: bytes.to_vec(),
        kind: SourceKind::Memory,
        cache: CacheOutcome::NotApplicable,
        cache_path: None,
    };
    run_pipeline("<memory>", resolved, config, Instant::now(), 0).await
}

/// Extract a PDF and write the text directly to a file.
///
/// The text lands in a temp file next to `output_path` and is renamed over
/// it, so readers never see a partial file.
pub async fn extract_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, Pdf2TxtError> {
    let output = extract(input_str, config).await?;
    write_output(output_path.as_ref(), output.text.into_bytes()).await?;
    Ok(output.stats)
}

/// Atomically replace `path` with `contents`, creating parent directories.
///
/// The temp file is removed if anything fails before the rename.
pub async fn write_output(path: &Path, contents: Vec<u8>) -> Result<(), Pdf2TxtError> {
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_output_blocking(&target, &contents))
        .await
        .map_err(|e| Pdf2TxtError::Internal(format!("Output write task panicked: {}", e)))?
}

fn write_output_blocking(path: &Path, contents: &[u8]) -> Result<(), Pdf2TxtError> {
    let io_err = |source: std::io::Error| Pdf2TxtError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(contents).map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally; do not call from inside an
/// async context.
pub fn extract_sync(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2TxtError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2TxtError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract(input_str, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// The configured extractor, or pdfium when none was injected.
fn resolve_extractor(config: &ExtractionConfig) -> Arc<dyn PageTextExtractor> {
    match config.extractor {
        Some(ref extractor) => Arc::clone(extractor),
        None => Arc::new(PdfiumTextExtractor::new(config.pdfium_lib_path.clone())),
    }
}

async fn run_pipeline(
    input_str: &str,
    resolved: ResolvedSource,
    config: &ExtractionConfig,
    total_start: Instant,
    resolve_duration_ms: u64,
) -> Result<ExtractionOutput, Pdf2TxtError> {
    let source = SourceInfo {
        input: input_str.to_string(),
        kind: resolved.kind,
        cache: resolved.cache,
        cache_path: resolved.cache_path,
        byte_len: resolved.bytes.len(),
    };

    // ── Step 2: Per-page text ────────────────────────────────────────────
    let extract_start = Instant::now();
    let all_pages = text::extract_pages(resolve_extractor(config), resolved.bytes).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    debug!(
        "Extracted {} pages in {}ms",
        all_pages.len(),
        extract_duration_ms
    );

    // ── Step 3: Page selection ───────────────────────────────────────────
    let pages = select::select_pages(&all_pages, &config.pages)?;
    let text = select::join_pages(&pages);

    let stats = ExtractionStats {
        total_pages: all_pages.len(),
        selected_pages: pages.len(),
        resolve_duration_ms,
        extract_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Extraction complete: {}/{} pages, {}ms total",
        stats.selected_pages, stats.total_pages, stats.total_duration_ms
    );

    Ok(ExtractionOutput {
        text,
        pages,
        source,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FormFeedExtractor;

    impl PageTextExtractor for FormFeedExtractor {
        fn extract_pages(&self, pdf: &[u8]) -> Result<Vec<String>, Pdf2TxtError> {
            Ok(String::from_utf8_lossy(pdf)
                .split('\u{c}')
                .map(str::to_string)
                .collect())
        }
    }

    fn config(pages: PageSelection) -> ExtractionConfig {
        ExtractionConfig::builder()
            .extractor(Arc::new(FormFeedExtractor))
            .pages(pages)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn from_bytes_selects_pages() {
        let out = extract_from_bytes(b"a\x0cb\x0cc", &config(PageSelection::Range(2, 3)))
            .await
            .unwrap();
        assert_eq!(out.text, "b\nc");
        assert_eq!(out.stats.total_pages, 3);
        assert_eq!(out.stats.selected_pages, 2);
        assert_eq!(out.source.kind, SourceKind::Memory);
        assert_eq!(out.source.byte_len, 5);
    }

    #[tokio::test]
    async fn local_file_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("report.pdf");
        std::fs::write(&path, "Page 1 text.\x0cPage 2 text.").unwrap();

        let out = extract(path.to_str().unwrap(), &config(PageSelection::All))
            .await
            .unwrap();
        assert_eq!(out.text, "Page 1 text.\nPage 2 text.");
        assert_eq!(out.source.kind, SourceKind::Local);
        assert_eq!(out.source.cache, CacheOutcome::NotApplicable);
    }

    #[tokio::test]
    async fn out_of_range_selection_fails_whole_extraction() {
        let err = extract_from_bytes(b"only", &config(PageSelection::Single(2)))
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2TxtError::PageOutOfRange { page: 2, total: 1 }));
    }

    #[tokio::test]
    async fn to_file_writes_text_atomically() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in.pdf");
        std::fs::write(&input, "x\x0cy").unwrap();
        let out_path = tmp.path().join("out").join("doc.txt");

        let stats = extract_to_file(input.to_str().unwrap(), &out_path, &config(PageSelection::All))
            .await
            .unwrap();
        assert_eq!(stats.total_pages, 2);
        assert_eq!(std::fs::read_to_string(&out_path).unwrap(), "x\ny");
        let entries: Vec<_> = std::fs::read_dir(out_path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("doc.txt")]);
    }

    #[tokio::test]
    async fn write_output_replaces_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.json");
        std::fs::write(&path, "old contents that are longer").unwrap();

        write_output(&path, b"{}".to_vec()).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn failed_rename_leaves_no_temp_file() {
        let tmp = tempfile::tempdir().unwrap();
        // A directory at the target path makes the final rename fail.
        let path = tmp.path().join("taken");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        let err = write_output(&path, b"text".to_vec()).await.unwrap_err();
        assert!(matches!(err, Pdf2TxtError::OutputWriteFailed { .. }));
        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("taken")]);
    }

    #[test]
    fn sync_wrapper_reports_missing_file() {
        let err = extract_sync("/definitely/not/here.pdf", &config(PageSelection::All)).unwrap_err();
        assert!(matches!(err, Pdf2TxtError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn text_shortcut_rejects_bad_range_before_io() {
        let err = extract_text("/definitely/not/here.pdf", Some("3-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2TxtError::InvalidPageRange { .. }));
    }
}
