pub(crate) mod bio;
pub(crate) mod roster;
pub(crate) mod stats;

use ::scraper::{ElementRef, Html, Selector};
use itertools::Itertools;
use tracing::debug;

use crate::client::PageFetcher;
use crate::error::Result;
use crate::model::{Category, PlayerId};

pub const DEFAULT_BASE_URL: &str = "http://howstat.com/cricket/Statistics/";

/// Builds page urls relative to the howstat statistics root.
#[derive(Debug, Clone)]
pub struct Urls {
    base: String,
}

impl Urls {
    pub fn new(base: &str) -> Self {
        let base = if base.ends_with('/') {
            base.to_owned()
        } else {
            format!("{base}/")
        };
        Self { base }
    }

    pub fn roster(&self) -> String {
        format!("{}Players/PlayerListCurrent.asp", self.base)
    }

    pub fn overview(&self, player_id: &PlayerId) -> String {
        format!(
            "{}Players/PlayerOverviewSummary.asp?PlayerID={player_id}",
            self.base
        )
    }

    pub fn category(&self, category: Category, player_id: &PlayerId) -> String {
        format!("{}{}{player_id}", self.base, category.page_path())
    }
}

impl Default for Urls {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Fetch a URL and parse the response body as an HTML document.
pub(crate) async fn get_document<F: PageFetcher>(fetcher: &F, url: &str) -> Result<Html> {
    debug!(url, "fetching page");
    let body = fetcher.fetch(url).await?;
    Ok(Html::parse_document(&body))
}

/// First element matching `selector` below `element`, if any.
pub(crate) fn select_first<'a>(
    element: &ElementRef<'a>,
    selector: &Selector,
) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// All text below `element`, trimmed.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Replace every run of non-ASCII characters with a single space and
/// collapse whitespace.
pub(crate) fn strip_non_ascii(text: &str) -> String {
    text.split(|c: char| !c.is_ascii())
        .flat_map(str::split_whitespace)
        .join(" ")
}

/// The next `td` sibling of a table cell.
pub(crate) fn next_cell<'a>(cell: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    cell.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "td")
}

/// `true` if the row holds no nested rows of its own.
pub(crate) fn is_leaf_row(row: &ElementRef) -> bool {
    !row.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|e| e.value().name() == "tr")
}

/// First run of ASCII digits in `text`.
pub(crate) fn first_number(text: &str) -> Option<u32> {
    text.split(|c: char| !c.is_ascii_digit())
        .find(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}
