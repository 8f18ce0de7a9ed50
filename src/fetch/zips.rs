use std::fs;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};
use url::Url;

use super::Fetch;
use crate::error::{Error, Result};

/// Last non-empty path segment of `url`, used as the cached file name.
pub fn archive_filename(url: &Url) -> Result<&str> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::BadArchiveUrl(url.to_string()))
}

/// Download-once store of bulk archives under a single directory.
///
/// An existing file is reused as-is; nothing is re-validated against the
/// remote copy.
pub struct ArchiveCache<F> {
    fetcher: F,
    dir: PathBuf,
}

impl<F: Fetch> ArchiveCache<F> {
    pub fn new(fetcher: F, dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the archive for `url` lives, whether or not it exists yet.
    pub fn local_path(&self, url: &Url) -> Result<PathBuf> {
        Ok(self.dir.join(archive_filename(url)?))
    }

    /// Return the local path for `url`, downloading it first if absent.
    #[instrument(level = "info", skip(self, url), fields(url = %url))]
    pub fn ensure_local(&self, url: &Url) -> Result<PathBuf> {
        let dest_path = self.local_path(url)?;
        fs::create_dir_all(&self.dir)?;

        if dest_path.exists() {
            debug!(path = %dest_path.display(), "cache hit");
            return Ok(dest_path);
        }

        // stage in the same directory so the rename stays on one filesystem
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        let bytes = self.fetcher.download(url, staged.as_file_mut())?;
        staged.persist(&dest_path).map_err(|e| e.error)?;
        info!(path = %dest_path.display(), bytes, "downloaded archive");
        Ok(dest_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::mock::MockFetcher;
    use tempfile::tempdir;

    #[test]
    fn filename_is_last_segment() {
        let url = Url::parse("https://data.openstates.org/csv/latest/AK_32_csv_1.zip").unwrap();
        assert_eq!(archive_filename(&url).unwrap(), "AK_32_csv_1.zip");
    }

    #[test]
    fn url_without_filename_is_rejected() {
        let url = Url::parse("https://data.openstates.org/csv/").unwrap();
        assert!(matches!(archive_filename(&url), Err(Error::BadArchiveUrl(_))));
    }

    #[test]
    fn downloads_at_most_once() {
        crate::test_support::init_test_logging();
        let tmp = tempdir().unwrap();
        let cache_dir = tmp.path().join("nested").join("OS_ZIP_CACHE");
        let fetcher = MockFetcher::new().with_body("/csv/AK_32.zip", b"PK-bytes".to_vec());
        let cache = ArchiveCache::new(&fetcher, &cache_dir);
        let url = Url::parse("https://example.org/csv/AK_32.zip").unwrap();

        let first = cache.ensure_local(&url).unwrap();
        let second = cache.ensure_local(&url).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, cache_dir.join("AK_32.zip"));
        assert_eq!(fs::read(&first).unwrap(), b"PK-bytes");
        assert_eq!(fetcher.calls_to("/csv/AK_32.zip"), 1);
        // only the persisted archive, no staging leftovers
        assert_eq!(fs::read_dir(&cache_dir).unwrap().count(), 1);
    }

    #[test]
    fn existing_file_is_reused_without_fetching() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("NC_2023.zip"), b"stale").unwrap();
        let fetcher = MockFetcher::new();
        let cache = ArchiveCache::new(&fetcher, tmp.path());
        let url = Url::parse("https://example.org/csv/NC_2023.zip").unwrap();

        let path = cache.ensure_local(&url).unwrap();
        assert_eq!(fs::read(path).unwrap(), b"stale");
        assert!(fetcher.calls.borrow().is_empty());
    }
}
