use std::path::{Path, PathBuf};

use arrow::record_batch::RecordBatch;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::Result;
use crate::extract::extract;
use crate::fetch::{ArchiveCache, Fetch, HttpFetcher, SessionResolver};
use crate::file_type::FileType;
use crate::join::{left_join, JoinPlan};
use crate::table::{parse_rows, Row, Table};

/// Loads bulk-export tables for a jurisdiction/session pair.
///
/// Each call resolves the session and goes through the archive cache; only
/// the cache directory is shared between calls.
pub struct BulkClient<F = HttpFetcher> {
    resolver: SessionResolver<F>,
    cache: ArchiveCache<F>,
}

impl BulkClient<HttpFetcher> {
    /// Client using `reqwest` for both the API and the archive downloads.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::with_fetcher(HttpFetcher::new()?, config))
    }

    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }
}

impl<F: Fetch + Clone> BulkClient<F> {
    pub fn with_fetcher(fetcher: F, config: Config) -> Self {
        let cache = ArchiveCache::new(fetcher.clone(), config.cache_dir.clone());
        Self {
            resolver: SessionResolver::new(fetcher, config),
            cache,
        }
    }
}

impl<F: Fetch> BulkClient<F> {
    pub fn resolver(&self) -> &SessionResolver<F> {
        &self.resolver
    }

    pub fn cache(&self) -> &ArchiveCache<F> {
        &self.cache
    }

    /// Local archive for the session, downloading it on first use.
    pub fn archive(&self, jurisdiction: &str, session: &str) -> Result<PathBuf> {
        let url = self.resolver.resolve(jurisdiction, session)?;
        self.cache.ensure_local(&url)
    }

    /// Decoded CSV text of one table.
    pub fn load_text(&self, jurisdiction: &str, session: &str, file_type: FileType) -> Result<String> {
        extract(&self.archive(jurisdiction, session)?, file_type)
    }

    pub fn load_rows(&self, jurisdiction: &str, session: &str, file_type: FileType) -> Result<Vec<Row>> {
        parse_rows(&self.load_text(jurisdiction, session, file_type)?)
    }

    pub fn load_table(&self, jurisdiction: &str, session: &str, file_type: FileType) -> Result<Table> {
        Table::from_csv(&self.load_text(jurisdiction, session, file_type)?)
    }

    /// `file_type` joined against its parent tables per [`FileType::join_plan`].
    #[instrument(level = "info", skip(self))]
    pub fn load_joined(
        &self,
        jurisdiction: &str,
        session: &str,
        file_type: FileType,
    ) -> Result<RecordBatch> {
        let archive = self.archive(jurisdiction, session)?;
        join_archive(&archive, file_type)
    }
}

/// Join `file_type` against its parents, all read from one archive.
pub fn join_archive(archive: &Path, file_type: FileType) -> Result<RecordBatch> {
    let batch = |ft: FileType| -> Result<RecordBatch> {
        let table = Table::from_csv(&extract(archive, ft)?)?;
        debug!(file_type = %ft, rows = table.height(), "loaded table");
        table.to_record_batch()
    };

    match file_type.join_plan() {
        JoinPlan::Identity => batch(file_type),
        JoinPlan::Parent { parent, keys } => left_join(&batch(parent)?, &batch(file_type)?, &keys),
        JoinPlan::Chain {
            root,
            middle,
            first,
            second,
        } => {
            let joined = left_join(&batch(root)?, &batch(middle)?, &first)?;
            left_join(&joined, &batch(file_type)?, &second)
        }
    }
}
