use scraper::Selector;
use tracing::{debug, info, instrument};

use crate::client::PageFetcher;
use crate::error::Result;
use crate::model::{PlayerId, RosterEntry};
use crate::howstat::{self, element_text, select_first, Urls};

/// Fetch the current-player listing. A failure here leaves nothing to scrape.
#[instrument(skip_all)]
pub(crate) async fn get_roster<F: PageFetcher>(fetcher: &F, urls: &Urls) -> Result<Vec<RosterEntry>> {
    let document = howstat::get_document(fetcher, &urls.roster()).await?;
    let roster = parse_roster(&document)?;
    info!(count = roster.len(), "parsed current player roster");
    Ok(roster)
}

/// One entry per listing row that carries a player link, in page order.
pub(crate) fn parse_roster(document: &scraper::Html) -> Result<Vec<RosterEntry>> {
    let row_selector = Selector::parse(".TableLined tr")?;
    let link_selector = Selector::parse(".LinkNormal")?;

    let roster = document
        .select(&row_selector)
        .filter_map(|row| {
            let link = select_first(&row, &link_selector)?;
            let href = link.value().attr("href")?;
            let Some(id) = player_id_from_href(href) else {
                debug!(href, "player link without an id");
                return None;
            };
            Some(RosterEntry {
                id,
                name: element_text(&link).to_lowercase(),
            })
        })
        .collect();
    Ok(roster)
}

/// The token after the first `=` in a link target.
fn player_id_from_href(href: &str) -> Option<PlayerId> {
    href.trim()
        .split('=')
        .nth(1)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(PlayerId::new)
}
