pub const START_QUALITY: u8 = 95;
pub const MIN_QUALITY: u8 = 10;
pub const QUALITY_STEP: u8 = 5;
/// Upper bound on encode attempts for one image: 95, 90, ..., 10.
pub const MAX_QUALITY_ATTEMPTS: usize = ((START_QUALITY - MIN_QUALITY) / QUALITY_STEP) as usize + 1;

pub const BYTES_PER_MB: u64 = 1024 * 1024;

// PNG is lossless: lower quality buys more deflate effort instead
pub const PNG_LIGHT_EFFORT_MIN_QUALITY: u8 = 70;
pub const PNG_MEDIUM_EFFORT_MIN_QUALITY: u8 = 40;
pub const LIBDEFLATER_LIGHT_LEVEL: u8 = 6;
pub const LIBDEFLATER_MEDIUM_LEVEL: u8 = 9;
pub const LIBDEFLATER_HEAVY_LEVEL: u8 = 12;
pub const OXIPNG_PRESET: u8 = 2;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];
pub const TEXT_EXTENSIONS: &[&str] = &["csv", "txt", "json"];
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf"];

pub const ARCHIVE_EXTENSION: &str = "zip";

pub const ORIGINAL_PREVIEW_PREFIX: &str = "original_";
pub const COMPRESSED_PREVIEW_PREFIX: &str = "compressed_";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_UPLOADS_DIR: &str = "uploads";
pub const DEFAULT_COMPRESSED_DIR: &str = "compressed";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 64;

pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";

// Common output message prefixes
pub const ORIGINAL_SIZE_PREFIX: &str = "📊 Original size:";
pub const COMPRESSED_SIZE_PREFIX: &str = "📈 Compressed size:";
pub const COMPRESSION_RATIO_PREFIX: &str = "🎯 Compression ratio:";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const ERROR_PREFIX: &str = "❌";
