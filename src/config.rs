//! Configuration types for PDF text extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. The cache location is an ordinary
//! field rather than a process-wide constant, so tests and embedding
//! applications can point each extraction at its own directory.

use crate::error::Pdf2TxtError;
use crate::pipeline::text::PageTextExtractor;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Default freshness window for cached downloads.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default User-Agent sent with every download.
///
/// Some hosts refuse requests that do not look like they come from a browser.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Environment variable overriding the default cache directory.
pub const CACHE_DIR_ENV: &str = "PDF2TXT_CACHE_DIR";

/// Environment variable pointing at an existing pdfium library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Configuration for a PDF text extraction.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2txt::{ExtractionConfig, PageSelection};
/// use std::time::Duration;
///
/// let config = ExtractionConfig::builder()
///     .cache_dir("/tmp/pdf2txt-cache")
///     .cache_ttl(Duration::from_secs(3600))
///     .pages("2-4".parse::<PageSelection>().unwrap())
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Directory holding downloaded PDFs. Default: [`default_cache_dir()`].
    pub cache_dir: PathBuf,

    /// How long a cached download stays fresh. Default: 24 hours.
    ///
    /// Freshness is judged purely on the cache file's modification time; the
    /// server is never asked whether the document changed.
    pub cache_ttl: Duration,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// User-Agent header for downloads. Default: [`DEFAULT_USER_AGENT`].
    pub user_agent: String,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// Explicit path to the pdfium shared library.
    ///
    /// Defaults to `$PDFIUM_LIB_PATH` when set; otherwise the system library
    /// search path is used.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Pre-constructed text extractor. Takes precedence over pdfium.
    pub extractor: Option<Arc<dyn PageTextExtractor>>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            cache_ttl: DEFAULT_CACHE_TTL,
            download_timeout_secs: 120,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            pages: PageSelection::default(),
            pdfium_lib_path: std::env::var_os(PDFIUM_LIB_PATH_ENV).map(PathBuf::from),
            extractor: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("cache_dir", &self.cache_dir)
            .field("cache_ttl", &self.cache_ttl)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("pages", &self.pages)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field(
                "extractor",
                &self.extractor.as_ref().map(|_| "<dyn PageTextExtractor>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Returns the default cache directory for downloaded PDFs.
///
/// Default locations:
/// - **macOS**: `~/Library/Caches/pdf2txt/`
/// - **Linux**: `~/.cache/pdf2txt/`
/// - **Windows**: `%LOCALAPPDATA%\pdf2txt\`
///
/// Override by setting `PDF2TXT_CACHE_DIR`.
pub fn default_cache_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CACHE_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }

    let base = dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir);

    base.join("pdf2txt")
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = dir.into();
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn PageTextExtractor>) -> Self {
        self.config.extractor = Some(extractor);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, Pdf2TxtError> {
        let c = &self.config;
        if c.download_timeout_secs == 0 {
            return Err(Pdf2TxtError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        if c.user_agent.trim().is_empty() {
            return Err(Pdf2TxtError::InvalidConfig(
                "User-Agent must not be empty".into(),
            ));
        }
        if c.cache_dir.as_os_str().is_empty() {
            return Err(Pdf2TxtError::InvalidConfig(
                "Cache directory must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Page selection ───────────────────────────────────────────────────────

/// Specifies which pages of the PDF to extract.
///
/// Parsed from the user-facing expression syntax via [`FromStr`]:
///
/// | Expression | Selection |
/// |------------|-----------|
/// | `all`      | [`PageSelection::All`] |
/// | `5`        | [`PageSelection::Single`] |
/// | `3-15`     | [`PageSelection::Range`] (inclusive) |
/// | `1-3,7`    | [`PageSelection::Ranges`] (union) |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Extract all pages (default).
    #[default]
    All,
    /// Extract a single page (1-indexed).
    Single(usize),
    /// Extract a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Extract the union of several inclusive ranges (1-indexed).
    Ranges(Vec<(usize, usize)>),
}

impl PageSelection {
    /// Build a selection from repeated CLI tokens (`-p 1-3 -p 7`).
    ///
    /// Tokens are joined with `,` and parsed as one compound expression; an
    /// empty token list selects every page.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, Pdf2TxtError> {
        if tokens.is_empty() {
            return Ok(PageSelection::All);
        }
        let joined = tokens
            .iter()
            .map(|t| t.as_ref())
            .collect::<Vec<_>>()
            .join(",");
        joined.parse()
    }

    /// Expand the selection into sorted, deduplicated 0-indexed page numbers.
    ///
    /// Any page beyond `total_pages` is rejected with
    /// [`Pdf2TxtError::PageOutOfRange`] rather than silently dropped.
    pub fn to_indices(&self, total_pages: usize) -> Result<Vec<usize>, Pdf2TxtError> {
        let spans: Vec<(usize, usize)> = match self {
            PageSelection::All => return Ok((0..total_pages).collect()),
            PageSelection::Single(p) => vec![(*p, *p)],
            PageSelection::Range(start, end) => vec![(*start, *end)],
            PageSelection::Ranges(spans) => spans.clone(),
        };

        let mut indices = Vec::new();
        for (start, end) in spans {
            check_span(start, end)?;
            if end > total_pages {
                let page = if start > total_pages { start } else { end };
                return Err(Pdf2TxtError::PageOutOfRange {
                    page,
                    total: total_pages,
                });
            }
            indices.extend(start - 1..end);
        }
        indices.sort_unstable();
        indices.dedup();
        Ok(indices)
    }
}

impl fmt::Display for PageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSelection::All => f.write_str("all"),
            PageSelection::Single(p) => write!(f, "{p}"),
            PageSelection::Range(s, e) => write!(f, "{s}-{e}"),
            PageSelection::Ranges(spans) => {
                let parts: Vec<String> = spans
                    .iter()
                    .map(|(s, e)| if s == e { s.to_string() } else { format!("{s}-{e}") })
                    .collect();
                f.write_str(&parts.join(","))
            }
        }
    }
}

impl FromStr for PageSelection {
    type Err = Pdf2TxtError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let s = expr.trim();
        if s.is_empty() {
            return Err(invalid(expr, "expression is empty"));
        }
        if s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        // Compound: "1-3,7"
        if s.contains(',') {
            let spans = s
                .split(',')
                .map(|token| parse_span(expr, token))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(PageSelection::Ranges(spans));
        }

        let (start, end) = parse_span(expr, s)?;
        if start == end && !s.contains('-') {
            Ok(PageSelection::Single(start))
        } else {
            Ok(PageSelection::Range(start, end))
        }
    }
}

/// Parse one `k` or `a-b` token into an inclusive 1-based span.
fn parse_span(expr: &str, token: &str) -> Result<(usize, usize), Pdf2TxtError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(invalid(expr, "empty page token"));
    }

    let (start, end) = match token.split_once('-') {
        Some((start, end)) => (parse_page(expr, start)?, parse_page(expr, end)?),
        None => {
            let page = parse_page(expr, token)?;
            (page, page)
        }
    };
    check_span(start, end).map_err(|_| {
        invalid(
            expr,
            &format!("range {start}-{end} must start at 1 or later and not run backwards"),
        )
    })?;
    Ok((start, end))
}

fn parse_page(expr: &str, raw: &str) -> Result<usize, Pdf2TxtError> {
    let raw = raw.trim();
    raw.parse::<usize>()
        .map_err(|_| invalid(expr, &format!("'{raw}' is not a page number")))
}

fn check_span(start: usize, end: usize) -> Result<(), Pdf2TxtError> {
    if start < 1 {
        return Err(invalid(
            &format!("{start}-{end}"),
            "pages are 1-indexed, minimum is 1",
        ));
    }
    if start > end {
        return Err(invalid(
            &format!("{start}-{end}"),
            "start must be <= end",
        ));
    }
    Ok(())
}

fn invalid(expr: &str, reason: &str) -> Pdf2TxtError {
    Pdf2TxtError::InvalidPageRange {
        expr: expr.to_string(),
        reason: reason.to_string(),
    }
}
