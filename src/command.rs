//! Command interface for embedding extraction in a host CLI.
//!
//! A host builds a root [`clap::Command`], lets every [`Command`] register
//! its subcommand on it, and dispatches the parsed subcommand back to the
//! command whose [`Command::name`] matches. The library core knows nothing
//! about the host; the host knows nothing about extraction.
//!
//! Only compiled with the `cli` feature.

use crate::config::{ExtractionConfig, PageSelection};
use crate::extract::{extract, write_output};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::{ArgMatches, Args, FromArgMatches};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// A subcommand a host CLI can register and run.
#[async_trait]
pub trait Command: Send + Sync {
    /// Subcommand name as typed on the command line.
    fn name(&self) -> &'static str;

    /// Add this command's subcommand (and its arguments) to `parent`.
    fn register(&self, parent: clap::Command) -> clap::Command;

    /// Run with the matches of this command's own subcommand.
    async fn execute(&self, matches: &ArgMatches) -> Result<()>;
}

/// Arguments of the `extract` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Path to the PDF file, or an HTTP/HTTPS URL.
    pub file_path: String,

    /// Pages to extract, e.g. `-p 1-4` for pages 1 to 4, or just a single page.
    /// Repeat values to take a union: `-p 1-3 7`.
    #[arg(short, long, num_args = 1..)]
    pub pages: Vec<String>,

    /// Write the result (text, or JSON with `--json`) to this file instead of stdout.
    #[arg(short, long, env = "PDF2TXT_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Print structured JSON (ExtractionOutput) instead of plain text.
    #[arg(long, env = "PDF2TXT_JSON")]
    pub json: bool,

    /// Directory for cached downloads.
    #[arg(long, env = "PDF2TXT_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Hours a cached download stays fresh.
    #[arg(long, env = "PDF2TXT_CACHE_TTL_HOURS", default_value_t = 24)]
    pub cache_ttl_hours: u64,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2TXT_DOWNLOAD_TIMEOUT", default_value_t = 120,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub download_timeout: u64,

    /// Override the User-Agent sent with downloads.
    #[arg(long, env = "PDF2TXT_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Path to an existing pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pub pdfium_lib: Option<PathBuf>,
}

impl ExtractArgs {
    /// Map CLI args to `ExtractionConfig`.
    pub fn to_config(&self) -> Result<ExtractionConfig> {
        let pages = PageSelection::from_tokens(&self.pages).context("Invalid --pages")?;
        let Some(ttl_secs) = self.cache_ttl_hours.checked_mul(60 * 60) else {
            bail!(
                "Invalid --cache-ttl-hours: {} hours does not fit in seconds",
                self.cache_ttl_hours
            );
        };

        let mut builder = ExtractionConfig::builder()
            .pages(pages)
            .cache_ttl(Duration::from_secs(ttl_secs))
            .download_timeout_secs(self.download_timeout);

        if let Some(ref dir) = self.cache_dir {
            builder = builder.cache_dir(dir);
        }
        if let Some(ref ua) = self.user_agent {
            builder = builder.user_agent(ua);
        }
        if let Some(ref lib) = self.pdfium_lib {
            builder = builder.pdfium_lib_path(lib);
        }

        builder.build().context("Invalid configuration")
    }
}

/// The `extract` subcommand: print the text of a local or remote PDF.
#[derive(Debug, Clone, Default)]
pub struct ExtractCommand {
    /// Show a spinner on stderr while the extraction runs.
    pub show_progress: bool,
}

impl ExtractCommand {
    pub fn new(show_progress: bool) -> Self {
        Self { show_progress }
    }

    /// Run the extraction and return what should be printed to stdout.
    ///
    /// Returns `None` when the result went to `--output` instead.
    pub async fn run(&self, args: &ExtractArgs) -> Result<Option<String>> {
        let config = args.to_config()?;
        self.run_with_config(args, &config).await
    }

    /// Same as [`run`](Self::run), with an already built configuration.
    pub async fn run_with_config(
        &self,
        args: &ExtractArgs,
        config: &ExtractionConfig,
    ) -> Result<Option<String>> {
        let spinner = self.show_progress.then(|| spinner(&args.file_path));
        let result = extract(&args.file_path, config).await;
        if let Some(bar) = spinner {
            bar.finish_and_clear();
        }
        let output = result.context("Extraction failed")?;

        let rendered = if args.json {
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        } else {
            output.text
        };

        match args.output {
            Some(ref path) => {
                write_output(path, rendered.into_bytes())
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                Ok(None)
            }
            None => Ok(Some(rendered)),
        }
    }
}

#[async_trait]
impl Command for ExtractCommand {
    fn name(&self) -> &'static str {
        "extract"
    }

    fn register(&self, parent: clap::Command) -> clap::Command {
        let sub = clap::Command::new(self.name())
            .visible_alias("pdf2txt")
            .about("Extract text from a given pdf");
        parent.subcommand(ExtractArgs::augment_args(sub))
    }

    async fn execute(&self, matches: &ArgMatches) -> Result<()> {
        let args = ExtractArgs::from_arg_matches(matches).context("Invalid arguments")?;

        if let Some(text) = self.run(&args).await? {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(text.as_bytes())
                .context("Failed to write to stdout")?;
            if !text.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }
        Ok(())
    }
}

fn spinner(input: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix("Extracting");
    bar.set_message(input.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Pdf2TxtError;
    use crate::pipeline::text::PageTextExtractor;
    use std::sync::Arc;

    fn parse(argv: &[&str]) -> ExtractArgs {
        let cmd = ExtractCommand::default();
        let root = cmd.register(clap::Command::new("host"));
        let matches = root.try_get_matches_from(argv).unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, cmd.name());
        ExtractArgs::from_arg_matches(sub).unwrap()
    }

    #[test]
    fn register_exposes_file_path_and_pages() {
        let args = parse(&["host", "extract", "hello", "-p", "1-4"]);
        assert_eq!(args.file_path, "hello");
        assert_eq!(args.pages, vec!["1-4"]);
    }

    #[test]
    fn pages_flag_accepts_several_values() {
        let args = parse(&["host", "pdf2txt", "doc.pdf", "--pages", "1-3", "7"]);
        assert_eq!(args.pages, vec!["1-3", "7"]);
        let config = args.to_config().unwrap();
        assert_eq!(config.pages, PageSelection::Ranges(vec![(1, 3), (7, 7)]));
    }

    #[test]
    fn pages_default_to_all() {
        let args = parse(&["host", "extract", "doc.pdf"]);
        assert!(args.pages.is_empty());
        assert_eq!(args.to_config().unwrap().pages, PageSelection::All);
    }

    #[test]
    fn cache_flags_map_to_config() {
        let args = parse(&[
            "host",
            "extract",
            "https://example.com/a.pdf",
            "--cache-dir",
            "/tmp/pdf2txt-test",
            "--cache-ttl-hours",
            "2",
        ]);
        let config = args.to_config().unwrap();
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/pdf2txt-test"));
        assert_eq!(config.cache_ttl, Duration::from_secs(7200));
    }

    #[test]
    fn bad_pages_fail_config() {
        let args = parse(&["host", "extract", "doc.pdf", "-p", "4-2"]);
        assert!(args.to_config().is_err());
    }

    #[test]
    fn huge_cache_ttl_is_rejected() {
        let args = parse(&[
            "host",
            "extract",
            "a.pdf",
            "--cache-ttl-hours",
            "18446744073709551615",
        ]);
        let err = args.to_config().unwrap_err();
        assert!(err.to_string().contains("--cache-ttl-hours"), "got: {err:#}");
    }

    struct FormFeedExtractor;

    impl PageTextExtractor for FormFeedExtractor {
        fn extract_pages(&self, pdf: &[u8]) -> Result<Vec<String>, Pdf2TxtError> {
            Ok(String::from_utf8_lossy(pdf)
                .split('\u{c}')
                .map(str::to_string)
                .collect())
        }
    }

    fn local_run(dir: &std::path::Path, extra: &[&str]) -> (ExtractArgs, ExtractionConfig) {
        let input = dir.join("paper.pdf");
        std::fs::write(&input, "first\x0csecond").unwrap();
        let input = input.to_str().unwrap().to_string();
        let mut argv = vec!["host", "extract", input.as_str()];
        argv.extend_from_slice(extra);
        let args = parse(&argv);
        let config = ExtractionConfig::builder()
            .pages(PageSelection::from_tokens(&args.pages).unwrap())
            .extractor(Arc::new(FormFeedExtractor))
            .build()
            .unwrap();
        (args, config)
    }

    #[tokio::test]
    async fn json_with_output_file_writes_json() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("paper.json");
        let out_str = out.to_str().unwrap().to_string();
        let (args, config) = local_run(tmp.path(), &["--json", "-o", &out_str]);

        let printed = ExtractCommand::default()
            .run_with_config(&args, &config)
            .await
            .unwrap();
        assert!(printed.is_none());

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["text"], "first\nsecond");
        assert_eq!(json["stats"]["total_pages"], 2);
        assert_eq!(json["pages"][1]["page_num"], 2);
    }

    #[tokio::test]
    async fn plain_output_file_gets_selected_text() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("paper.txt");
        let out_str = out.to_str().unwrap().to_string();
        let (args, config) = local_run(tmp.path(), &["-p", "2", "-o", &out_str]);

        let printed = ExtractCommand::default()
            .run_with_config(&args, &config)
            .await
            .unwrap();
        assert!(printed.is_none());
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "second");
    }

    #[tokio::test]
    async fn json_without_output_is_returned_for_stdout() {
        let tmp = tempfile::tempdir().unwrap();
        let (args, config) = local_run(tmp.path(), &["--json"]);

        let printed = ExtractCommand::default()
            .run_with_config(&args, &config)
            .await
            .unwrap()
            .unwrap();
        assert!(printed.trim_start().starts_with('{'));
        assert!(printed.contains("\"total_pages\": 2"));
    }

    #[tokio::test]
    async fn run_reports_missing_input() {
        let args = parse(&["host", "extract", "/definitely/not/here.pdf"]);
        let err = ExtractCommand::default().run(&args).await.unwrap_err();
        assert!(format!("{err:#}").contains("not found"));
    }
}
