//! # pdf2txt
//!
//! Extract plain text from PDF documents, from a local path or an HTTP(S)
//! URL, optionally restricted to a page range.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF path / URL
//!  │
//!  ├─ 1. Input   local read, or download cache (24h TTL) + single GET
//!  ├─ 2. Text    one text block per page via pdfium (spawn_blocking)
//!  ├─ 3. Select  page range "3", "2-5", "1-3,7" → pages joined by "\n"
//!  └─ 4. Output  text + per-page records + cache/timing stats
//! ```
//!
//! Downloads land in [`default_cache_dir()`] (override with
//! `PDF2TXT_CACHE_DIR` or [`ExtractionConfigBuilder::cache_dir`]) under the
//! URL's basename when it ends in `.pdf`, or a SHA-256 of the URL otherwise.
//! A cached file younger than the TTL is reused without touching the network.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2txt::{extract, ExtractionConfig, PageSelection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder()
//!         .pages("1-3".parse::<PageSelection>()?)
//!         .build()?;
//!     let output = extract("https://example.com/report.pdf", &config).await?;
//!     println!("{}", output.text);
//!     eprintln!("cache: {:?}", output.source.cache);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2txt` binary and the [`command`] interface |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2txt = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

#[cfg(feature = "cli")]
pub mod command;
pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{default_cache_dir, ExtractionConfig, ExtractionConfigBuilder, PageSelection};
pub use error::Pdf2TxtError;
pub use extract::{
    extract, extract_from_bytes, extract_sync, extract_text, extract_to_file, write_output,
};
pub use output::{CacheOutcome, ExtractionOutput, ExtractionStats, PageText, SourceInfo, SourceKind};
pub use pipeline::cache::{CacheLookup, CacheStore};
pub use pipeline::fetch::Fetcher;
pub use pipeline::text::{PageTextExtractor, PdfiumTextExtractor};
