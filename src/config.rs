use crate::constants::{BYTES_PER_MB, DEFAULT_HOST, DEFAULT_MAX_UPLOAD_MB, DEFAULT_PORT};
use crate::error::{CompressionError, Result};
use crate::storage::StorageDirs;
use std::net::{SocketAddr, ToSocketAddrs};

/// Everything the web front end needs to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub dirs: StorageDirs,
    /// Largest request body accepted on upload
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn new(host: String, port: u16, dirs: StorageDirs, max_upload_mb: u64) -> Result<Self> {
        if max_upload_mb == 0 {
            return Err(CompressionError::UnsupportedParameter(
                "maximum upload size must be at least 1 MB".to_string(),
            ));
        }
        let max_upload_bytes = max_upload_mb
            .checked_mul(BYTES_PER_MB)
            .and_then(|bytes| usize::try_from(bytes).ok())
            .ok_or_else(|| {
                CompressionError::UnsupportedParameter(format!(
                    "maximum upload size of {} MB is too large",
                    max_upload_mb
                ))
            })?;

        Ok(Self {
            host,
            port,
            dirs,
            max_upload_bytes,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                CompressionError::UnsupportedParameter(format!(
                    "cannot resolve listen address {}:{}",
                    self.host, self.port
                ))
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            dirs: StorageDirs::default(),
            max_upload_bytes: (DEFAULT_MAX_UPLOAD_MB * BYTES_PER_MB) as usize,
        }
    }
}
