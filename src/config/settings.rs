use std::net::{IpAddr, SocketAddr};

use crate::cli::{CompressionOptions, ServeArgs};
use crate::error::ConfigError;

use super::defaults::*;

/// Runtime settings for the compression pipeline
#[derive(Debug, Clone)]
pub struct Settings {
    /// JPEG quality for re-encoded images (1-100)
    pub jpeg_quality: u8,

    /// Reject documents with references to objects that do not exist
    pub strict_references: bool,

    /// When set, only the payload and /Filter of a re-encoded image change.
    /// Otherwise /Width, /Height, /BitsPerComponent and (if the color model
    /// changed) /ColorSpace are synced to what the encoder produced.
    pub preserve_image_dict: bool,

    /// Flate-compress unfiltered non-image streams before saving
    pub compress_streams: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            strict_references: true,
            preserve_image_dict: false,
            compress_streams: false,
        }
    }
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_args(options: &CompressionOptions) -> Self {
        Self {
            jpeg_quality: options.quality,
            strict_references: !options.lenient_references,
            preserve_image_dict: options.preserve_image_dict,
            compress_streams: options.compress_streams,
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::InvalidQuality(self.jpeg_quality));
        }
        Ok(())
    }
}

/// Settings for the HTTP endpoint
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
    /// Upload size cap in bytes; `None` lifts the limit entirely
    pub max_upload_bytes: Option<usize>,
    pub compression: Settings,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.parse().unwrap_or(IpAddr::from([0, 0, 0, 0])),
            port: DEFAULT_PORT,
            max_upload_bytes: None,
            compression: Settings::default(),
        }
    }
}

impl ServerSettings {
    pub fn from_args(args: &ServeArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_upload_bytes: args.max_upload_bytes,
            compression: Settings::from_args(&args.compression),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
