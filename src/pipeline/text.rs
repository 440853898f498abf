//! Per-page text extraction.
//!
//! ## Why a trait?
//!
//! Text extraction is the one stage backed by a native library. Keeping it
//! behind [`PageTextExtractor`] lets callers inject another backend through
//! [`crate::ExtractionConfigBuilder::extractor`], and lets tests run the
//! whole pipeline without pdfium installed.
//!
//! ## Why spawn_blocking?
//!
//! pdfium uses thread-local state internally and is not safe to call from
//! async contexts, so the parse runs on tokio's blocking pool.

use crate::error::Pdf2TxtError;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Turns the bytes of a PDF into one text block per page, in page order.
pub trait PageTextExtractor: Send + Sync {
    fn extract_pages(&self, pdf: &[u8]) -> Result<Vec<String>, Pdf2TxtError>;
}

/// [`PageTextExtractor`] backed by pdfium via `pdfium-render`.
#[derive(Debug, Clone, Default)]
pub struct PdfiumTextExtractor {
    /// Explicit library file; the system library is used when `None`.
    lib_path: Option<PathBuf>,
}

impl PdfiumTextExtractor {
    pub fn new(lib_path: Option<PathBuf>) -> Self {
        Self { lib_path }
    }

    fn bind(&self) -> Result<Pdfium, Pdf2TxtError> {
        let bindings = match &self.lib_path {
            Some(path) => Pdfium::bind_to_library(path).map_err(|e| {
                Pdf2TxtError::PdfiumBindingFailed(format!("{}: {}", path.display(), e))
            })?,
            None => Pdfium::bind_to_system_library()
                .map_err(|e| Pdf2TxtError::PdfiumBindingFailed(e.to_string()))?,
        };
        Ok(Pdfium::new(bindings))
    }
}

impl PageTextExtractor for PdfiumTextExtractor {
    fn extract_pages(&self, pdf: &[u8]) -> Result<Vec<String>, Pdf2TxtError> {
        let pdfium = self.bind()?;

        let document = pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|e| Pdf2TxtError::CorruptPdf {
                detail: format!("{:?}", e),
            })?;

        let pages = document.pages();
        info!("PDF loaded: {} pages", pages.len());

        let mut texts = Vec::with_capacity(pages.len() as usize);
        for (idx, page) in pages.iter().enumerate() {
            let text = page
                .text()
                .map_err(|e| Pdf2TxtError::TextExtractionFailed {
                    page: idx + 1,
                    detail: format!("{:?}", e),
                })?
                .all();
            debug!("Extracted {} chars from page {}", text.len(), idx + 1);
            texts.push(text);
        }

        Ok(texts)
    }
}

/// Run `extractor` over `pdf` on the blocking thread pool.
pub async fn extract_pages(
    extractor: Arc<dyn PageTextExtractor>,
    pdf: Vec<u8>,
) -> Result<Vec<String>, Pdf2TxtError> {
    tokio::task::spawn_blocking(move || extractor.extract_pages(&pdf))
        .await
        .map_err(|e| Pdf2TxtError::Internal(format!("Extraction task panicked: {}", e)))?
}
