use std::fs::File;
use std::path::Path;

use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::Result;

/// Write `batch` to `path` as SNAPPY-compressed Parquet.
///
/// The file is written next to `path` and renamed into place once closed.
pub fn write_parquet(batch: &RecordBatch, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let staged = NamedTempFile::new_in(dir)?;
    let file: File = staged.reopen()?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;
    staged.persist(path).map_err(|e| e.error)?;

    info!(path = %path.display(), rows = batch.num_rows(), "wrote parquet");
    Ok(())
}
