use serde::Deserialize;
use tracing::{debug, info, instrument};
use url::Url;

use super::Fetch;
use crate::config::Config;
use crate::error::{Error, Result};

/// One entry of a session's `downloads` array.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Download {
    pub url: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LegislativeSession {
    pub identifier: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub downloads: Vec<Download>,
}

#[derive(Debug, Deserialize)]
struct JurisdictionResponse {
    legislative_sessions: Vec<LegislativeSession>,
}

/// Looks up bulk-download URLs via the jurisdictions endpoint.
pub struct SessionResolver<F> {
    fetcher: F,
    config: Config,
}

impl<F: Fetch> SessionResolver<F> {
    pub fn new(fetcher: F, config: Config) -> Self {
        Self { fetcher, config }
    }

    /// All legislative sessions of `jurisdiction`, with their downloads.
    pub fn sessions(&self, jurisdiction: &str) -> Result<Vec<LegislativeSession>> {
        let url = self.config.sessions_url(jurisdiction)?;
        let body = self.fetcher.get_text(&url)?;
        let parsed: JurisdictionResponse = serde_json::from_str(&body)?;
        debug!(
            jurisdiction,
            count = parsed.legislative_sessions.len(),
            "fetched sessions"
        );
        Ok(parsed.legislative_sessions)
    }

    /// URL of the first download listed for `session`.
    #[instrument(level = "info", skip(self))]
    pub fn resolve(&self, jurisdiction: &str, session: &str) -> Result<Url> {
        let found = self
            .sessions(jurisdiction)?
            .into_iter()
            .find(|s| s.identifier == session)
            .ok_or_else(|| Error::InvalidSession {
                jurisdiction: jurisdiction.to_string(),
                session: session.to_string(),
            })?;

        let download = found.downloads.first().ok_or_else(|| Error::NoDownloads {
            session: session.to_string(),
        })?;
        let url = Url::parse(&download.url)?;
        info!(url = %url, "resolved bulk download");
        Ok(url)
    }
}
