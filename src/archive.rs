//! Single-entry zip archiving for uploads that are not images
//!
//! Entries are deflated and stamped with a fixed modification time and
//! permissions, so archiving the same bytes under the same name always yields
//! the same archive.

use crate::error::Result;
use crate::target::{CompressionMethod, CompressionResult};
use crate::utils::temp_file_beside;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use tracing::info;
use zip::write::FileOptions;
use zip::{CompressionMethod as ZipMethod, DateTime, ZipWriter};

const ENTRY_PERMISSIONS: u32 = 0o644;

fn entry_options() -> FileOptions {
    FileOptions::default()
        .compression_method(ZipMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(ENTRY_PERMISSIONS)
}

/// Wraps the file at `input_path` into a zip at `output_path` holding one
/// entry named `entry_name`.
///
/// The target size plays no part here; the output can be larger than the
/// input for already-compressed data such as PDFs.
pub fn archive_file(
    input_path: &Path,
    output_path: &Path,
    entry_name: &str,
) -> Result<CompressionResult> {
    let mut source = BufReader::new(File::open(input_path)?);

    let temp = temp_file_beside(output_path)?;
    let mut writer = ZipWriter::new(temp);
    writer.start_file(entry_name, entry_options())?;
    let copied = io::copy(&mut source, &mut writer)?;
    let temp = writer.finish()?;
    temp.as_file().sync_all()?;
    temp.persist(output_path)?;

    let size = std::fs::metadata(output_path)?.len();
    info!(entry = entry_name, original = copied, size, "archived file");

    Ok(CompressionResult {
        stored: output_path.to_path_buf(),
        size,
        method: CompressionMethod::Archived {
            entry_name: entry_name.to_string(),
        },
    })
}
