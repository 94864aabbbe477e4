//! Squad and league stats on the site are shipped inside HTML comments and
//! only unwrapped client-side, so the live DOM never holds them. This module
//! digs them back out of the comment nodes.

use scraper::{Html, Selector};

use crate::{ScrapeError, text_manipulators::parse_selector};

/// How far to scan once a matching comment has been found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Collect every matching comment (league page).
    AllMatches,
    /// Stop at the first matching comment (squad page).
    FirstMatch,
}

/// Returns the outer HTML of each `table.<marker>` hidden in a comment of
/// `html`, in document order.
pub fn find_commented_tables(
    html: &str,
    marker: &str,
    mode: ScanMode,
) -> Result<Vec<String>, ScrapeError> {
    let table_selector = parse_selector(&format!("table.{marker}"))
        .map_err(|err| ScrapeError::MalformedTable(err.to_string()))?;
    let document = Html::parse_document(html);

    let mut tables = vec![];
    for comment in document
        .tree
        .nodes()
        .filter_map(|node| node.value().as_comment())
    {
        let text: &str = comment;
        if !(text.contains("<table") && text.contains(marker)) {
            continue;
        }
        tables.extend(table_in_fragment(text, &table_selector));
        // On a squad page the first comment mentioning the marker decides,
        // even when it holds no matching table.
        if mode == ScanMode::FirstMatch {
            break;
        }
    }

    if tables.is_empty() {
        return Err(ScrapeError::TableNotFound {
            marker: marker.to_string(),
        });
    }
    Ok(tables)
}

fn table_in_fragment(fragment: &str, table_selector: &Selector) -> Option<String> {
    let fragment = Html::parse_fragment(fragment);
    fragment
        .select(table_selector)
        .next()
        .map(|table| table.html())
}
