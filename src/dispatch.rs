use crate::archive::archive_file;
use crate::constants::ARCHIVE_EXTENSION;
use crate::error::Result;
use crate::formats::AssetKind;
use crate::processing::recompress_image;
use crate::storage::StoredAsset;
use crate::target::{CompressionResult, CompressionTarget};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the artifact for `asset` will be written inside `output_dir`.
///
/// Images keep their stored name; everything else gets a `.zip` suffix.
pub fn output_path_for(asset: &StoredAsset, output_dir: &Path) -> PathBuf {
    if asset.kind.is_image() {
        output_dir.join(&asset.stored_name)
    } else {
        output_dir.join(format!("{}.{}", asset.stored_name, ARCHIVE_EXTENSION))
    }
}

/// Route `asset` to the recompressor (images) or the archiver (everything else).
///
/// `target` only matters for images. PDFs are archived like any other file
/// until real document compression exists.
pub fn dispatch(
    asset: &StoredAsset,
    target: CompressionTarget,
    output_dir: &Path,
) -> Result<CompressionResult> {
    let output = output_path_for(asset, output_dir);
    debug!(filename = %asset.filename, kind = %asset.kind, output = ?output, "dispatching");

    match asset.kind {
        AssetKind::Image(kind) => recompress_image(&asset.source, &output, kind, target),
        AssetKind::TextLike | AssetKind::Document | AssetKind::Other => {
            archive_file(&asset.source, &output, &asset.filename)
        }
    }
}
