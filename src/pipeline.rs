use chrono::{Datelike, Local};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::client::PageFetcher;
use crate::error::Result;
use crate::howstat::{bio, roster, stats, Urls};
use crate::model::{BioRecord, Category, PlayerId, RosterEntry, RosterSnapshot, SeriesSchema};
use crate::store::RecordStore;

pub const ROSTER_COLLECTION: &str = "player_id";
pub const BIO_COLLECTION: &str = "player_bio";

/// Counters for one full run.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct RunSummary {
    pub players: usize,
    pub bios: usize,
    pub skipped_players: usize,
    pub categories_synced: usize,
    pub categories_failed: usize,
    pub store_failures: usize,
}

/// What happened to one player's category pages.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PlayerSync {
    pub synced: Vec<Category>,
    pub failed: Vec<Category>,
    pub store_failures: usize,
}

/// Drives a full scrape: roster, then each player's bio and category stats,
/// one page at a time.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> howstat_scraper::Result<()> {
/// use howstat_scraper::{HowstatScraper, HttpFetcher, MemoryStore, Urls};
///
/// let mut scraper = HowstatScraper::new(HttpFetcher::new(), MemoryStore::new(), Urls::default());
/// let summary = scraper.run().await?;
/// println!("stored {} bios", summary.bios);
/// # Ok(())
/// # }
/// ```
pub struct HowstatScraper<F, S> {
    fetcher: F,
    store: S,
    urls: Urls,
    schema: SeriesSchema,
}

impl<F: PageFetcher, S: RecordStore> HowstatScraper<F, S> {
    pub fn new(fetcher: F, store: S, urls: Urls) -> Self {
        Self {
            fetcher,
            store,
            urls,
            schema: SeriesSchema::default(),
        }
    }

    /// Restrict which series are read from overview pages.
    pub fn with_schema(mut self, schema: SeriesSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Fetch the roster and persist a snapshot of it keyed by the current year.
    #[instrument(skip(self))]
    pub async fn collect_roster(&mut self) -> Result<Vec<RosterEntry>> {
        let roster = roster::get_roster(&self.fetcher, &self.urls).await?;
        let snapshot = RosterSnapshot::new(Local::now().year(), &roster);
        self.store_record(ROSTER_COLLECTION, &snapshot).await;
        Ok(roster)
    }

    /// Fetch one player's bio. `Ok(None)` means the page was unavailable.
    pub async fn player_bio(&self, player_id: &PlayerId) -> Result<Option<BioRecord>> {
        bio::get_player_bio(&self.fetcher, &self.urls, &self.schema, player_id).await
    }

    /// Refresh the stats of every category the player has matches in, then
    /// the bio itself. A failing category does not affect the others.
    #[instrument(skip(self, bio), fields(player_id = %bio.id))]
    pub async fn sync_player_stats(&mut self, bio: &BioRecord) -> PlayerSync {
        let mut sync = PlayerSync::default();

        for category in bio.matches.played() {
            match stats::get_category_stats(&self.fetcher, &self.urls, category, &bio.id).await {
                Ok(record) => {
                    if self.store_record(category.collection(), &record).await {
                        sync.synced.push(category);
                    } else {
                        sync.store_failures += 1;
                    }
                }
                Err(err) => {
                    warn!(%category, error = %err, "category stats unavailable");
                    sync.failed.push(category);
                }
            }
        }

        if !self.store_record(BIO_COLLECTION, bio).await {
            sync.store_failures += 1;
        }
        sync
    }

    /// Run the whole pipeline once. Only a roster fetch failure is fatal.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<RunSummary> {
        let roster = self.collect_roster().await?;
        let total = roster.len();
        let mut summary = RunSummary {
            players: total,
            ..RunSummary::default()
        };

        for (n, entry) in roster.iter().enumerate() {
            info!(
                player_id = %entry.id,
                name = %entry.name,
                "processing player {}/{total}",
                n + 1
            );
            let bio = match self.player_bio(&entry.id).await {
                Ok(Some(bio)) => bio,
                Ok(None) => {
                    summary.skipped_players += 1;
                    continue;
                }
                Err(err) => {
                    warn!(player_id = %entry.id, error = %err, "could not parse player bio");
                    summary.skipped_players += 1;
                    continue;
                }
            };

            let sync = self.sync_player_stats(&bio).await;
            summary.bios += 1;
            summary.categories_synced += sync.synced.len();
            summary.categories_failed += sync.failed.len();
            summary.store_failures += sync.store_failures;
        }

        info!(?summary, "run complete");
        Ok(summary)
    }

    /// Upsert a record, logging and swallowing store failures.
    async fn store_record<T: Serialize>(&mut self, collection: &str, record: &T) -> bool {
        match self.store.upsert(collection, record).await {
            Ok(_) => true,
            Err(err) => {
                error!(collection, error = %err, "failed to write record");
                false
            }
        }
    }
}
