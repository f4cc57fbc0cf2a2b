use std::str::FromStr;

use scraper::{ElementRef, Selector};
use tracing::{debug, instrument};

use crate::client::PageFetcher;
use crate::error::Result;
use crate::howstat::{self, element_text, is_leaf_row, select_first, Urls};
use crate::model::{
    normalize_key, Category, CategoryStatsRecord, FieldMap, PlayerId, Section, STAT_FIELDS,
};

/// Fetch one category's stats page and keep the recognized fields.
#[instrument(skip(fetcher, urls))]
pub(crate) async fn get_category_stats<F: PageFetcher>(
    fetcher: &F,
    urls: &Urls,
    category: Category,
    player_id: &PlayerId,
) -> Result<CategoryStatsRecord> {
    let url = urls.category(category, player_id);
    let document = howstat::get_document(fetcher, &url).await?;
    let fields = parse_stat_fields(&document, STAT_FIELDS)?;
    debug!(count = fields.len(), "parsed category stats");
    Ok(CategoryStatsRecord {
        id: player_id.clone(),
        series: category,
        fields,
    })
}

struct RowSelectors {
    section: Selector,
    name: Selector,
    value: Selector,
}

/// Scan table rows in document order and collect `<section>_<label>` entries
/// for every allowed label.
///
/// A section header stays current until the next recognized header. Fields
/// seen before any header have no section and are dropped. Later rows
/// overwrite earlier ones with the same key.
pub(crate) fn parse_stat_fields(document: &scraper::Html, allowed: &[&str]) -> Result<FieldMap> {
    let row_selector = Selector::parse("tr")?;
    let selectors = RowSelectors {
        section: Selector::parse(".ProfileSection")?,
        name: Selector::parse(".FieldName")?,
        value: Selector::parse(".FieldValue")?,
    };

    let (_, fields) = document
        .select(&row_selector)
        .filter(is_leaf_row)
        .fold((None, FieldMap::new()), |(section, mut fields), row| {
            let section = row_section(&row, &selectors).or(section);
            if let Some((label, value)) = row_field(&row, &selectors) {
                if allowed.contains(&label.as_str()) {
                    match section {
                        Some(section) => {
                            let key = format!("{}_{}", section.key_prefix(), normalize_key(&label));
                            fields.insert(key, value);
                        }
                        None => debug!(%label, "field before any section header"),
                    }
                }
            }
            (section, fields)
        });
    Ok(fields)
}

/// The recognized section this row opens, if it is a header row.
fn row_section(row: &ElementRef, selectors: &RowSelectors) -> Option<Section> {
    let header = select_first(row, &selectors.section)?;
    Section::from_str(&element_text(&header)).ok()
}

/// The bare label and trimmed value of a field row.
fn row_field(row: &ElementRef, selectors: &RowSelectors) -> Option<(String, String)> {
    let name = select_first(row, &selectors.name)?;
    let value = select_first(row, &selectors.value)?;
    let name = element_text(&name);
    let label = name.split(':').next().unwrap_or_default().trim().to_string();
    Some((label, element_text(&value)))
}
