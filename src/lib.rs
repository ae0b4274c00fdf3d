pub mod archive;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod formats;
pub mod logger;
pub mod processing;
pub mod storage;
pub mod target;
pub mod utils;
pub mod web;

pub use archive::archive_file;
pub use config::ServerConfig;
pub use dispatch::{dispatch, output_path_for};
pub use error::{CompressionError, Result};
pub use formats::{AssetKind, ImageKind};
pub use processing::{quality_levels, recompress_image, search_quality, QualityEncoder};
pub use storage::{PreviewPair, StorageDirs, StorageKey, StoredAsset};
pub use target::{CompressionMethod, CompressionResult, CompressionTarget};
pub use web::{create_router, handle_upload, serve, UploadOutcome};
