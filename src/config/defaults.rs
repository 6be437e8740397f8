/// JPEG quality used when re-encoding images (1 = smallest, 100 = near-lossless)
pub const DEFAULT_JPEG_QUALITY: u8 = 60;

/// Address the HTTP endpoint binds to
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Port the HTTP endpoint listens on
pub const DEFAULT_PORT: u16 = 3001;

/// Multipart field that carries the uploaded PDF
pub const UPLOAD_FIELD: &str = "file";

/// Static message returned for any fatal compression failure
pub const FAILURE_MESSAGE: &str = "Failed to compress PDF";

/// Content-Disposition sent with the compressed download
pub const DOWNLOAD_DISPOSITION: &str = "attachment; filename=\"compressed.pdf\"";
