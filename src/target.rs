use crate::constants::BYTES_PER_MB;
use crate::error::{CompressionError, Result};
use crate::formats::ImageKind;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Maximum output size requested for one upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompressionTarget {
    bytes: u64,
}

impl CompressionTarget {
    /// Build a target from a positive whole number of megabytes (1 MB = 1024 * 1024 bytes).
    pub fn from_megabytes(megabytes: u64) -> Result<Self> {
        if megabytes == 0 {
            return Err(CompressionError::UnsupportedParameter(
                "target size must be at least 1 MB".to_string(),
            ));
        }
        let bytes = megabytes.checked_mul(BYTES_PER_MB).ok_or_else(|| {
            CompressionError::UnsupportedParameter(format!(
                "target size of {} MB is too large",
                megabytes
            ))
        })?;
        Ok(Self { bytes })
    }

    pub fn from_bytes(bytes: u64) -> Result<Self> {
        if bytes == 0 {
            return Err(CompressionError::UnsupportedParameter(
                "target size must be positive".to_string(),
            ));
        }
        Ok(Self { bytes })
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn is_met_by(&self, size: u64) -> bool {
        size <= self.bytes
    }
}

/// Parses the `size` form field: a whole number of megabytes.
impl FromStr for CompressionTarget {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let megabytes = trimmed.parse::<u64>().map_err(|_| {
            CompressionError::UnsupportedParameter(format!(
                "target size must be a positive whole number of megabytes, got '{}'",
                trimmed
            ))
        })?;
        Self::from_megabytes(megabytes)
    }
}

impl fmt::Display for CompressionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.bytes)
    }
}

/// How a result was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionMethod {
    /// Image re-encoded by the quality sweep
    Recompressed {
        format: ImageKind,
        quality: u8,
        met: bool,
        attempts: usize,
    },
    /// Original bytes wrapped in a single-entry zip
    Archived { entry_name: String },
}

/// The single output produced for one upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    /// Stored artifact on disk
    pub stored: PathBuf,
    pub size: u64,
    pub method: CompressionMethod,
}

impl CompressionResult {
    pub fn quality(&self) -> Option<u8> {
        match self.method {
            CompressionMethod::Recompressed { quality, .. } => Some(quality),
            CompressionMethod::Archived { .. } => None,
        }
    }

    /// Whether the requested size was reached; archives ignore the target.
    pub fn target_met(&self) -> Option<bool> {
        match self.method {
            CompressionMethod::Recompressed { met, .. } => Some(met),
            CompressionMethod::Archived { .. } => None,
        }
    }

    /// Name of the stored artifact, as used in download links.
    pub fn file_name(&self) -> String {
        self.stored
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_megabytes() {
        let target = CompressionTarget::from_megabytes(1).unwrap();
        assert_eq!(target.bytes(), 1_048_576);
        assert_eq!(CompressionTarget::from_megabytes(5).unwrap().bytes(), 5 * 1_048_576);
    }

    #[test]
    fn test_target_rejects_zero_and_overflow() {
        assert!(matches!(
            CompressionTarget::from_megabytes(0),
            Err(CompressionError::UnsupportedParameter(_))
        ));
        assert!(matches!(
            CompressionTarget::from_megabytes(u64::MAX),
            Err(CompressionError::UnsupportedParameter(_))
        ));
        assert!(CompressionTarget::from_bytes(0).is_err());
    }

    #[test]
    fn test_target_from_str() {
        assert_eq!("2".parse::<CompressionTarget>().unwrap().bytes(), 2 * 1_048_576);
        assert_eq!(" 3 ".parse::<CompressionTarget>().unwrap().bytes(), 3 * 1_048_576);

        for bad in ["", "0", "-1", "1.5", "abc", "1MB"] {
            let result = bad.parse::<CompressionTarget>();
            assert!(
                matches!(result, Err(CompressionError::UnsupportedParameter(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_is_met_by() {
        let target = CompressionTarget::from_bytes(100).unwrap();
        assert!(target.is_met_by(100));
        assert!(target.is_met_by(1));
        assert!(!target.is_met_by(101));
    }

    #[test]
    fn test_result_accessors() {
        let image = CompressionResult {
            stored: PathBuf::from("/data/compressed/abc_photo.jpg"),
            size: 10,
            method: CompressionMethod::Recompressed {
                format: ImageKind::Jpeg,
                quality: 80,
                met: true,
                attempts: 4,
            },
        };
        assert_eq!(image.quality(), Some(80));
        assert_eq!(image.target_met(), Some(true));
        assert_eq!(image.file_name(), "abc_photo.jpg");

        let archive = CompressionResult {
            stored: PathBuf::from("notes.txt.zip"),
            size: 10,
            method: CompressionMethod::Archived {
                entry_name: "notes.txt".to_string(),
            },
        };
        assert_eq!(archive.quality(), None);
        assert_eq!(archive.target_met(), None);
    }
}
