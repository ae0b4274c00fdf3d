//! Upload storage, preview publishing and download lookup
//!
//! All locations live in an injected [`StorageDirs`] value. Every upload gets a
//! fresh [`StorageKey`], and everything stored for it is named
//! `<key>_<filename>`, so two requests carrying the same filename never share a
//! path.

use crate::constants::{
    ARCHIVE_EXTENSION, COMPRESSED_PREVIEW_PREFIX, DEFAULT_COMPRESSED_DIR, DEFAULT_STATIC_DIR,
    DEFAULT_UPLOADS_DIR, ORIGINAL_PREVIEW_PREFIX,
};
use crate::error::{CompressionError, Result};
use crate::formats::{base_filename, AssetKind};
use crate::target::CompressionResult;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

const KEY_LEN: usize = 32;
const KEY_SEPARATOR: char = '_';

/// The three directories the front end reads from and writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageDirs {
    /// Raw uploads as received
    pub uploads: PathBuf,
    /// Recompressed images and archives, served by the download endpoint
    pub compressed: PathBuf,
    /// Publicly served directory receiving preview copies
    pub public: PathBuf,
}

impl StorageDirs {
    pub fn new(
        uploads: impl Into<PathBuf>,
        compressed: impl Into<PathBuf>,
        public: impl Into<PathBuf>,
    ) -> Self {
        Self {
            uploads: uploads.into(),
            compressed: compressed.into(),
            public: public.into(),
        }
    }

    /// Default layout (`uploads/`, `compressed/`, `static/`) below `root`.
    pub fn under(root: &Path) -> Self {
        Self::new(
            root.join(DEFAULT_UPLOADS_DIR),
            root.join(DEFAULT_COMPRESSED_DIR),
            root.join(DEFAULT_STATIC_DIR),
        )
    }

    pub fn ensure(&self) -> Result<()> {
        for dir in [&self.uploads, &self.compressed, &self.public] {
            fs::create_dir_all(dir)
                .map_err(|_| CompressionError::DirectoryCreationFailed(dir.clone()))?;
        }
        Ok(())
    }

    /// Persist an uploaded file under a fresh storage key.
    pub fn ingest(&self, declared_name: &str, bytes: &[u8]) -> Result<StoredAsset> {
        let filename = base_filename(declared_name);
        if filename.is_empty() {
            return Err(CompressionError::UnsupportedParameter(
                "uploaded file has no usable filename".to_string(),
            ));
        }

        let key = StorageKey::generate();
        let stored_name = key.stored_name(filename);
        let path = self.uploads.join(&stored_name);

        // create_new: a key collision must never clobber another request's upload
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;
        file.write_all(bytes)?;
        file.sync_all()?;

        debug!(key = %key, filename, bytes = bytes.len(), "stored upload");

        Ok(StoredAsset {
            source: path,
            filename: filename.to_string(),
            stored_name,
            kind: AssetKind::from_filename(filename),
            size: bytes.len() as u64,
        })
    }

    /// Find the artifact for `/download/{name}`, falling back to `{name}.zip`.
    ///
    /// Returns the path on disk and the filename to offer the client.
    pub fn resolve_download(&self, name: &str) -> Option<(PathBuf, String)> {
        if !is_plain_file_name(name) {
            return None;
        }

        let exact = self.compressed.join(name);
        if exact.is_file() {
            return Some((exact, user_facing_name(name).to_string()));
        }

        let zipped_name = format!("{}.{}", name, ARCHIVE_EXTENSION);
        let zipped = self.compressed.join(&zipped_name);
        if zipped.is_file() {
            return Some((zipped, user_facing_name(&zipped_name).to_string()));
        }

        None
    }

    /// Copy the original and compressed image into the public directory.
    pub fn publish_preview(
        &self,
        asset: &StoredAsset,
        result: &CompressionResult,
    ) -> Result<PreviewPair> {
        let pair = PreviewPair {
            original: format!("{}{}", ORIGINAL_PREVIEW_PREFIX, asset.stored_name),
            compressed: format!("{}{}", COMPRESSED_PREVIEW_PREFIX, asset.stored_name),
        };

        let original = self.public.join(&pair.original);
        fs::copy(&asset.source, &original)?;
        if let Err(err) = fs::copy(&result.stored, self.public.join(&pair.compressed)) {
            let _ = fs::remove_file(&original);
            return Err(err.into());
        }

        debug!(original = %pair.original, compressed = %pair.compressed, "published preview");
        Ok(pair)
    }
}

impl Default for StorageDirs {
    fn default() -> Self {
        Self::new(DEFAULT_UPLOADS_DIR, DEFAULT_COMPRESSED_DIR, DEFAULT_STATIC_DIR)
    }
}

/// Per-request identifier prefixed to every stored filename
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn stored_name(&self, filename: &str) -> String {
        format!("{}{}{}", self.0, KEY_SEPARATOR, filename)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An upload (or local input file) ready for compression
#[derive(Debug, Clone)]
pub struct StoredAsset {
    /// Where the original bytes live
    pub source: PathBuf,
    /// User-facing base filename
    pub filename: String,
    /// Name used for every derived file (key-prefixed for uploads)
    pub stored_name: String,
    pub kind: AssetKind,
    pub size: u64,
}

impl StoredAsset {
    /// Wrap a local file without copying it, for one-shot compression.
    pub fn local(path: &Path) -> Result<Self> {
        let metadata =
            fs::metadata(path).map_err(|_| CompressionError::FileNotFound(path.to_path_buf()))?;
        if !metadata.is_file() {
            return Err(CompressionError::UnsupportedFormat(
                "Input path is not a file".to_string(),
            ));
        }

        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                CompressionError::UnsupportedParameter(format!(
                    "input filename is not valid UTF-8: {:?}",
                    path
                ))
            })?
            .to_string();

        Ok(Self {
            source: path.to_path_buf(),
            kind: AssetKind::from_filename(&filename),
            stored_name: filename.clone(),
            filename,
            size: metadata.len(),
        })
    }
}

/// Public preview filenames for an image result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPair {
    pub original: String,
    pub compressed: String,
}

/// Strip the storage key prefix from a stored filename, if it has one.
pub fn user_facing_name(stored_name: &str) -> &str {
    let bytes = stored_name.as_bytes();
    let has_key = bytes.len() > KEY_LEN + 1
        && bytes[..KEY_LEN]
            .iter()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(b))
        && bytes[KEY_LEN] == KEY_SEPARATOR as u8;

    if has_key {
        &stored_name[KEY_LEN + 1..]
    } else {
        stored_name
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && base_filename(name) == name && !name.contains('\0')
}
