//! Pipeline stages for PDF-to-text extraction.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the text backend can be swapped without touching the fetch layer.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ (cache_key ─▶ cache / fetch) ──▶ text ──▶ select
//! (URL/path)   (sha256)    (disk / HTTP)   (pdfium)  (page range)
//! ```
//!
//! 1. [`input`]: classify the identifier; read a local file or go
//!    through the download cache
//! 2. [`cache_key`]: derive the cache file name for a URL
//! 3. [`cache`]: freshness check, read and atomic write of cached bytes
//! 4. [`fetch`]: the only stage with network I/O; single attempt
//! 5. [`text`]: one text block per page; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 6. [`select`]: apply the page selection and join the result

pub mod cache;
pub mod cache_key;
pub mod fetch;
pub mod input;
pub mod select;
pub mod text;
