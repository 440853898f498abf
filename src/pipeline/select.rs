//! Page selection over the extracted per-page text.

use crate::config::PageSelection;
use crate::error::Pdf2TxtError;
use crate::output::PageText;

/// Separator placed between selected pages.
pub const PAGE_JOINER: &str = "\n";

/// Pick the pages named by `selection`, in document order.
pub fn select_pages(
    pages: &[String],
    selection: &PageSelection,
) -> Result<Vec<PageText>, Pdf2TxtError> {
    let indices = selection.to_indices(pages.len())?;
    Ok(indices
        .into_iter()
        .map(|idx| PageText {
            page_num: idx + 1,
            text: pages[idx].clone(),
        })
        .collect())
}

/// Join selected pages into one text block.
pub fn join_pages(pages: &[PageText]) -> String {
    pages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(PAGE_JOINER)
}

/// Select and join in one step from a raw range expression.
///
/// `None` selects every page; otherwise `range_expr` uses the
/// [`PageSelection`] syntax (`"3"`, `"2-5"`, `"1-3,7"`).
pub fn select_text(pages: &[String], range_expr: Option<&str>) -> Result<String, Pdf2TxtError> {
    let selection = match range_expr {
        None => PageSelection::All,
        Some(expr) => expr.parse()?,
    };
    Ok(join_pages(&select_pages(pages, &selection)?))
}
