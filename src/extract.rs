use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, instrument};
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::file_type::FileType;

/// Member names of the archive, in archive order.
pub fn list_members(archive_path: &Path) -> Result<Vec<String>> {
    let mut archive = open(archive_path)?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        names.push(archive.by_index_raw(i)?.name().to_string());
    }
    Ok(names)
}

/// Text of the first member whose name ends with `file_type`'s suffix.
#[instrument(level = "info", skip(archive_path), fields(path = %archive_path.display()))]
pub fn extract(archive_path: &Path, file_type: FileType) -> Result<String> {
    let mut archive = open(archive_path)?;

    let mut found = None;
    for i in 0..archive.len() {
        if archive.by_index_raw(i)?.name().ends_with(file_type.suffix()) {
            found = Some(i);
            break;
        }
    }
    let index = found.ok_or_else(|| Error::MissingMember {
        file_type,
        archive: archive_path.to_path_buf(),
    })?;

    let mut entry = archive.by_index(index)?;
    let name = entry.name().to_string();
    debug!(member = %name, size = entry.size(), "extracting");

    let mut buf = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut buf)?;
    String::from_utf8(buf).map_err(|_| Error::Utf8 { member: name })
}

fn open(archive_path: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let file = File::open(archive_path)?;
    Ok(ZipArchive::new(BufReader::new(file))?)
}
