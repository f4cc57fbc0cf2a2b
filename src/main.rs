use std::process::ExitCode;
use std::time::Instant;

use howstat_scraper::{
    Config, FileStore, HowstatError, HowstatScraper, HttpFetcher, MemoryStore, MongoStore, Result,
    RunSummary, StoreMode, Urls,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let start = Instant::now();
    let outcome = run().await;
    let elapsed = format!("{:.2}s", start.elapsed().as_secs_f64());

    match outcome {
        Ok(summary) => {
            info!(?summary, %elapsed, "scrape finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, %elapsed, "scrape aborted");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<RunSummary> {
    let config = Config::from_env()?;
    info!(base_url = %config.base_url, store = %config.store, db = %config.db_name, "starting scrape");

    let urls = Urls::new(&config.base_url);
    let fetcher = HttpFetcher::new();
    match config.store {
        StoreMode::File => {
            let store = FileStore::open(config.store_root())?;
            HowstatScraper::new(fetcher, store, urls).run().await
        }
        StoreMode::Memory => HowstatScraper::new(fetcher, MemoryStore::new(), urls).run().await,
        StoreMode::Remote => {
            let uri = config.remote_uri().ok_or_else(|| HowstatError::Config {
                key: "HOWSTAT_STORE",
                reason: "remote store selected without credentials".to_owned(),
            })?;
            let store = MongoStore::connect(&uri, &config.db_name).await?;
            HowstatScraper::new(fetcher, store, urls).run().await
        }
    }
}
