use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{HowstatError, Result};
use crate::howstat::DEFAULT_BASE_URL;

const DEFAULT_DB_NAME: &str = "howstat";
const DEFAULT_DATA_DIR: &str = "data";

/// Where records are written.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StoreMode {
    /// JSON files under `<data_dir>/<db_name>/`.
    #[default]
    File,
    /// Keep everything in memory and discard it at exit.
    Memory,
    /// MongoDB cluster reached with [`RemoteCredentials`].
    Remote,
}

/// Credentials for the remote document store.
#[derive(Clone, Eq, PartialEq)]
pub struct RemoteCredentials {
    pub user: String,
    pub password: String,
    pub host: String,
}

impl fmt::Debug for RemoteCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteCredentials")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .finish()
    }
}

/// Runtime settings, read once from the environment at startup.
///
/// | variable           | default                                   |
/// |--------------------|-------------------------------------------|
/// | `HOWSTAT_BASE_URL` | `http://howstat.com/cricket/Statistics/`  |
/// | `HOWSTAT_DB_NAME`  | `howstat`                                 |
/// | `HOWSTAT_STORE`    | `file` (`file`, `memory` or `remote`)     |
/// | `HOWSTAT_DATA_DIR` | `data`                                    |
///
/// `remote` additionally requires `HOWSTAT_DB_USER`, `HOWSTAT_DB_PASSWORD`
/// and `HOWSTAT_DB_HOST`.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub db_name: String,
    pub store: StoreMode,
    pub data_dir: PathBuf,
    /// Set only when `store` is [`StoreMode::Remote`].
    pub remote: Option<RemoteCredentials>,
}

impl Config {
    /// Load from the process environment, after applying a `.env` file if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let base_url = var("HOWSTAT_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(HowstatError::Config {
                key: "HOWSTAT_BASE_URL",
                reason: format!("`{base_url}` is not an http(s) url"),
            });
        }

        let db_name = var("HOWSTAT_DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_owned());
        if db_name.contains(['/', '\\']) {
            return Err(HowstatError::Config {
                key: "HOWSTAT_DB_NAME",
                reason: format!("`{db_name}` must not contain path separators"),
            });
        }

        let store = match var("HOWSTAT_STORE") {
            Some(mode) => StoreMode::from_str(&mode.to_lowercase()).map_err(|_| HowstatError::Config {
                key: "HOWSTAT_STORE",
                reason: format!("unknown store mode `{mode}`, expected `file`, `memory` or `remote`"),
            })?,
            None => StoreMode::default(),
        };

        let data_dir = var("HOWSTAT_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_owned());

        let remote = match store {
            StoreMode::Remote => {
                let required = |key: &'static str| {
                    var(key).ok_or_else(|| HowstatError::Config {
                        key,
                        reason: "required when HOWSTAT_STORE is `remote`".to_owned(),
                    })
                };
                Some(RemoteCredentials {
                    user: required("HOWSTAT_DB_USER")?,
                    password: required("HOWSTAT_DB_PASSWORD")?,
                    host: required("HOWSTAT_DB_HOST")?,
                })
            }
            StoreMode::File | StoreMode::Memory => None,
        };

        Ok(Self {
            base_url,
            db_name,
            store,
            data_dir: PathBuf::from(data_dir),
            remote,
        })
    }

    /// Connection string for the remote store, `None` unless it is selected.
    pub fn remote_uri(&self) -> Option<String> {
        self.remote.as_ref().map(|creds| {
            format!(
                "mongodb+srv://{}:{}@{}/{}?retryWrites=true&w=majority",
                urlencoding::encode(&creds.user),
                urlencoding::encode(&creds.password),
                creds.host,
                self.db_name,
            )
        })
    }

    /// Directory the file store writes its collections to.
    pub fn store_root(&self) -> PathBuf {
        self.data_dir.join(&self.db_name)
    }
}
