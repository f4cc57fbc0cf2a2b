//! Scrapes current cricket players' profiles and per-format statistics from
//! howstat.com and writes them to a keyed document store.

pub use client::{HttpFetcher, PageFetcher};
pub use config::{Config, RemoteCredentials, StoreMode};
pub use error::{HowstatError, Result};
pub use howstat::{Urls, DEFAULT_BASE_URL};
pub use model::*;
pub use pipeline::{HowstatScraper, PlayerSync, RunSummary, BIO_COLLECTION, ROSTER_COLLECTION};
pub use store::{Document, FileStore, MemoryStore, MongoStore, RecordStore, UpsertOutcome};

pub mod client;
pub mod config;
pub mod error;
mod howstat;
pub mod model;
pub mod pipeline;
pub mod store;
#[cfg(test)]
mod testing;
