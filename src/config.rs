use std::env;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://v3.openstates.org";

pub const API_KEY_VAR: &str = "OPENSTATES_API_KEY";
pub const API_URL_VAR: &str = "OPENSTATES_API_URL";
pub const CACHE_DIR_VAR: &str = "OS_ZIP_CACHE";

/// Name of the cache directory under the platform temp dir.
const CACHE_SUBDIR: &str = "OS_ZIP_CACHE";

/// Connection and cache settings shared by the resolver and the archive cache.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: Url,
    pub api_key: String,
    pub cache_dir: PathBuf,
}

impl Config {
    /// Config for `api_key` with the public API host and the temp-dir cache.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api_base: Url::parse(DEFAULT_API_BASE)?,
            api_key: api_key.into(),
            cache_dir: Self::default_cache_dir(),
        })
    }

    /// Read `OPENSTATES_API_KEY` (required), `OPENSTATES_API_URL` and `OS_ZIP_CACHE`.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(API_KEY_VAR)
            .map_err(|_| Error::Config(format!("{API_KEY_VAR} is not set")))?;
        let mut config = Self::new(api_key)?;
        if let Ok(base) = env::var(API_URL_VAR) {
            config = config.with_api_base(&base)?;
        }
        if let Ok(dir) = env::var(CACHE_DIR_VAR) {
            config = config.with_cache_dir(dir);
        }
        Ok(config)
    }

    pub fn with_api_base(mut self, base: &str) -> Result<Self> {
        self.api_base = Url::parse(base)?;
        Ok(self)
    }

    pub fn with_cache_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cache_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn default_cache_dir() -> PathBuf {
        env::temp_dir().join(CACHE_SUBDIR)
    }

    /// `{base}/jurisdictions/{jurisdiction}?apikey=..&include=legislative_sessions`
    pub fn sessions_url(&self, jurisdiction: &str) -> Result<Url> {
        let base = self.api_base.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/jurisdictions/{jurisdiction}"))?;
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .append_pair("include", "legislative_sessions");
        Ok(url)
    }
}
