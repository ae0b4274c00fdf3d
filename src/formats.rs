//! File type classification and image format handling
//!
//! Uploads are classified purely by the final dot-delimited suffix of their
//! filename, compared case-insensitively against fixed extension sets.

use crate::constants::{DOCUMENT_EXTENSIONS, IMAGE_EXTENSIONS, TEXT_EXTENSIONS};
use crate::error::{CompressionError, Result};
use std::fmt;
use std::str::FromStr;

/// Type tag derived from an upload's filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// jpg, jpeg, png, webp
    Image(ImageKind),
    /// csv, txt, json
    TextLike,
    /// pdf
    Document,
    /// Everything else, including names without a dot
    Other,
}

impl AssetKind {
    pub fn from_filename(filename: &str) -> Self {
        let Some(ext) = extension_of(filename) else {
            return AssetKind::Other;
        };

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            // The extension sets and ImageKind::from_str agree on every image suffix
            ImageKind::from_str(&ext)
                .map(AssetKind::Image)
                .unwrap_or(AssetKind::Other)
        } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            AssetKind::TextLike
        } else if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
            AssetKind::Document
        } else {
            AssetKind::Other
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, AssetKind::Image(_))
    }

    pub fn tag(&self) -> &'static str {
        match self {
            AssetKind::Image(_) => "image",
            AssetKind::TextLike => "text-like",
            AssetKind::Document => "document",
            AssetKind::Other => "other",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Image encodings the recompressor can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Lossy, quality maps straight onto the encoder
    Jpeg,
    /// Lossless, quality selects the optimisation effort
    Png,
    /// Lossless encoder only, quality has no effect
    WebP,
}

impl ImageKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::WebP => "image/webp",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageKind::Jpeg => "JPEG",
            ImageKind::Png => "PNG",
            ImageKind::WebP => "WebP",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ImageKind {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(ImageKind::Jpeg),
            "png" => Ok(ImageKind::Png),
            "webp" => Ok(ImageKind::WebP),
            _ => Err(CompressionError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Lowercased text after the last `.` in `filename`, if there is a dot at all.
pub fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
}

/// Strip any directory part a client may have sent along with the filename.
///
/// Both `/` and `\` count as separators; `.` and `..` collapse to an empty name.
pub fn base_filename(filename: &str) -> &str {
    let base = filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
        .trim();
    match base {
        "." | ".." => "",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_kind_images() {
        assert_eq!(AssetKind::from_filename("photo.jpg"), AssetKind::Image(ImageKind::Jpeg));
        assert_eq!(AssetKind::from_filename("photo.JPEG"), AssetKind::Image(ImageKind::Jpeg));
        assert_eq!(AssetKind::from_filename("shot.Png"), AssetKind::Image(ImageKind::Png));
        assert_eq!(AssetKind::from_filename("anim.webp"), AssetKind::Image(ImageKind::WebP));
    }

    #[test]
    fn test_asset_kind_non_images() {
        assert_eq!(AssetKind::from_filename("data.csv"), AssetKind::TextLike);
        assert_eq!(AssetKind::from_filename("notes.TXT"), AssetKind::TextLike);
        assert_eq!(AssetKind::from_filename("config.json"), AssetKind::TextLike);
        assert_eq!(AssetKind::from_filename("report.pdf"), AssetKind::Document);
        assert_eq!(AssetKind::from_filename("archive.tar.gz"), AssetKind::Other);
        assert_eq!(AssetKind::from_filename("Makefile"), AssetKind::Other);
        assert_eq!(AssetKind::from_filename("photo.bmp"), AssetKind::Other);
    }

    #[test]
    fn test_only_final_suffix_counts() {
        assert_eq!(AssetKind::from_filename("image.png.txt"), AssetKind::TextLike);
        assert_eq!(AssetKind::from_filename("notes.txt.jpg"), AssetKind::Image(ImageKind::Jpeg));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.B.Csv").as_deref(), Some("csv"));
        assert_eq!(extension_of("noext"), None);
        assert_eq!(extension_of("trailing."), Some(String::new()));
    }

    #[test]
    fn test_base_filename() {
        assert_eq!(base_filename("report.csv"), "report.csv");
        assert_eq!(base_filename("/tmp/dir/report.csv"), "report.csv");
        assert_eq!(base_filename("C:\\Users\\me\\photo.jpg"), "photo.jpg");
        assert_eq!(base_filename("../../etc/passwd"), "passwd");
        assert_eq!(base_filename(".."), "");
        assert_eq!(base_filename("dir/"), "");
    }

    #[test]
    fn test_image_kind_from_str() {
        assert_eq!(ImageKind::from_str("jpg").unwrap(), ImageKind::Jpeg);
        assert_eq!(ImageKind::from_str("PNG").unwrap(), ImageKind::Png);
        assert!(ImageKind::from_str("gif").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(AssetKind::TextLike.to_string(), "text-like");
        assert_eq!(ImageKind::WebP.to_string(), "WebP");
    }
}
