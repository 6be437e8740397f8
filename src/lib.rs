pub mod cli;
pub mod compress;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod server;

pub use compress::{compress_pdf, Compressed};
pub use config::{ServerSettings, Settings};
pub use error::{CompressError, ParseError, SerializeError, ServeError, TranscodeError};
pub use model::{CompressionReport, ImageOutcome, KeepReason};

/// Compress a PDF held in memory with the default settings.
///
/// This is the recommended entry point for library consumers: every raw
/// embedded image is re-encoded as a quality-60 JPEG, and images that cannot
/// be re-encoded are left as they were.
///
/// # Example
///
/// ```no_run
/// let input = std::fs::read("lecture-notes.pdf").unwrap();
/// let output = pdf_squeeze::compress_bytes(&input).unwrap();
/// std::fs::write("lecture-notes.small.pdf", output).unwrap();
/// ```
pub fn compress_bytes(input: &[u8]) -> Result<Vec<u8>, CompressError> {
    compress_pdf(input, &Settings::default()).map(|compressed| compressed.data)
}
