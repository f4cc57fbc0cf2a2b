use std::collections::BTreeMap;

use chrono::{Local, NaiveDateTime};
use itertools::{izip, Itertools};
use scraper::{ElementRef, Selector};
use tracing::{debug, instrument, warn};

use crate::client::PageFetcher;
use crate::error::Result;
use crate::howstat::{
    self, element_text, first_number, next_cell, select_first, strip_non_ascii, Urls,
};
use crate::model::{normalize_key, BioRecord, PlayerId, SeriesCounts, SeriesSchema, BLANK_FIELD};

const BIO_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Fetch and parse a player's overview page.
///
/// Returns `Ok(None)` when the page could not be fetched; the player should
/// be skipped and the run continued.
#[instrument(skip(fetcher, urls, schema))]
pub(crate) async fn get_player_bio<F: PageFetcher>(
    fetcher: &F,
    urls: &Urls,
    schema: &SeriesSchema,
    player_id: &PlayerId,
) -> Result<Option<BioRecord>> {
    let url = urls.overview(player_id);
    let document = match howstat::get_document(fetcher, &url).await {
        Ok(document) => document,
        Err(err) if err.is_fetch_failure() => {
            warn!(%url, error = %err, "overview page unavailable, skipping player");
            return Ok(None);
        }
        Err(err) => return Err(err),
    };

    let bio = parse_player_bio(&document, player_id, schema, Local::now().naive_local())?;
    debug!(name = %bio.name, matches = ?bio.matches, "parsed player bio");
    Ok(Some(bio))
}

/// Build a [`BioRecord`] from an overview page.
///
/// The first nested table block holds the profile, the second the series
/// history. Either may be missing.
pub(crate) fn parse_player_bio(
    document: &scraper::Html,
    player_id: &PlayerId,
    schema: &SeriesSchema,
    extracted_at: NaiveDateTime,
) -> Result<BioRecord> {
    let block_selector = Selector::parse("table table table")?;
    let blocks = document.select(&block_selector).collect_vec();

    let profile = match blocks.first() {
        Some(block) => parse_profile(block)?,
        None => {
            debug!(%player_id, "no profile block on overview page");
            Profile::default()
        }
    };

    let matches = match blocks.get(1) {
        Some(block) => parse_series(block, schema)?,
        None => SeriesCounts::default(),
    };

    Ok(BioRecord {
        id: player_id.clone(),
        name: profile.name,
        country: profile.country,
        fields: profile.fields,
        matches,
        datetime: extracted_at.format(BIO_DATETIME_FORMAT).to_string(),
    })
}

#[derive(Debug, Default)]
struct Profile {
    name: String,
    country: Option<String>,
    fields: BTreeMap<String, String>,
}

fn parse_profile(block: &ElementRef) -> Result<Profile> {
    let heading_selector = Selector::parse(".TextGreenBold12")?;
    let field_selector = Selector::parse(".FieldName")?;

    let (name, country) = select_first(block, &heading_selector)
        .map(|heading| split_name_country(&strip_non_ascii(&element_text(&heading))))
        .unwrap_or_default();

    let fields = block
        .select(&field_selector)
        .filter_map(|label| {
            let value = element_text(&next_cell(&label)?);
            let value = if value.is_empty() {
                BLANK_FIELD.to_string()
            } else {
                value
            };
            Some((normalize_key(&element_text(&label).replace(':', "")), value))
        })
        .collect();

    Ok(Profile {
        name,
        country,
        fields,
    })
}

/// Split `"Virat Kohli (IND)"` into `("virat kohli", Some("ind"))`.
fn split_name_country(heading: &str) -> (String, Option<String>) {
    let (name, country) = match heading.split_once('(') {
        Some((name, rest)) => {
            let code = rest.split(')').next().unwrap_or_default().replace(' ', "");
            (name, Some(code.to_lowercase()).filter(|c| !c.is_empty()))
        }
        None => (heading, None),
    };
    (name.replace('-', " ").trim().to_lowercase(), country)
}

fn parse_series(block: &ElementRef, schema: &SeriesSchema) -> Result<SeriesCounts> {
    let series_selector = Selector::parse(".TextBlackBold10")?;
    let metric_selector = Selector::parse(".TextBlack10")?;

    let mut counts = SeriesCounts::default();
    for (series, metric) in izip!(
        block.select(&series_selector),
        block.select(&metric_selector)
    ) {
        let series = normalize_key(&element_text(&series));
        let metric = strip_non_ascii(&element_text(&metric));
        debug!(%series, %metric, "series history row");

        let Some(category) = schema.resolve(&series) else {
            continue;
        };
        match first_number(&metric) {
            Some(matches) => counts.set(category, matches),
            None => debug!(%series, %metric, "no match count in series row"),
        }
    }
    Ok(counts)
}
