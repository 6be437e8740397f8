//! The compression pipeline: parse, locate, transcode, serialize

pub mod locate;
pub mod serialize;
pub mod transcode;

use std::fmt;

use lopdf::Object;

use crate::config::Settings;
use crate::error::CompressError;
use crate::model::{CompressionReport, ImageOutcome, ImageReport, KeepReason};
use crate::parser::load_document;

pub use locate::{list_images, locate_images, ImageSummary};
pub use serialize::serialize;
pub use transcode::{recompress_stream, transcode, EncodedColor, EncodedImage};

/// Where a request is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Receiving,
    Parsing,
    Locating,
    Transcoding,
    Serializing,
    Responding,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Receiving => "receiving",
            Stage::Parsing => "parsing",
            Stage::Locating => "locating",
            Stage::Transcoding => "transcoding",
            Stage::Serializing => "serializing",
            Stage::Responding => "responding",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

impl CompressError {
    /// The stage that produced this error
    pub fn stage(&self) -> Stage {
        match self {
            CompressError::Parse(_) => Stage::Parsing,
            CompressError::Serialize(_) => Stage::Serializing,
        }
    }
}

/// Output of a successful pass
#[derive(Debug)]
pub struct Compressed {
    pub data: Vec<u8>,
    pub report: CompressionReport,
}

/// Re-encode every raw image of a PDF and return the rewritten file.
///
/// Only parsing and serialization can fail. An image keeps its original
/// bytes when it cannot be re-encoded, or when the JPEG would not be smaller
/// than the payload it replaces; both cases are recorded in the report as
/// [`ImageOutcome::KeptOriginal`].
pub fn compress_pdf(input: &[u8], settings: &Settings) -> Result<Compressed, CompressError> {
    log::debug!("{}: {} bytes", Stage::Parsing, input.len());
    let mut doc = load_document(input, settings)?;

    // Candidates are collected up front; the graph is only mutated afterwards
    let candidates = locate_images(&doc);
    log::debug!("{}: {} raw images", Stage::Locating, candidates.len());

    let mut images = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let Some(Object::Stream(stream)) = doc.objects.get_mut(&candidate.id) else {
            continue;
        };

        let outcome = recompress_stream(
            stream,
            &candidate.dict,
            settings.jpeg_quality,
            settings.preserve_image_dict,
        );

        let (num, gen) = candidate.id;
        match &outcome {
            ImageOutcome::Transcoded {
                original_len,
                encoded_len,
            } => log::debug!(
                "{}: image {} {} R {} -> {} bytes",
                Stage::Transcoding,
                num,
                gen,
                original_len,
                encoded_len
            ),
            ImageOutcome::KeptOriginal(reason @ KeepReason::Failed(_)) => {
                log::warn!("Keeping image {} {} R as is: {}", num, gen, reason)
            }
            ImageOutcome::KeptOriginal(reason) => {
                log::debug!("Keeping image {} {} R as is: {}", num, gen, reason)
            }
        }

        images.push(ImageReport {
            id: candidate.id,
            outcome,
        });
    }

    log::debug!("{}", Stage::Serializing);
    let data = serialize(&mut doc, settings)?;

    let report = CompressionReport {
        input_len: input.len(),
        output_len: data.len(),
        images,
    };
    log::info!("Compressed PDF: {}", report);

    Ok(Compressed { data, report })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_junk_input_fails_while_parsing() {
        let err = compress_pdf(&[0x13, 0x37, 0, 1, 2, 3, 4, 5, 6, 7], &Settings::default())
            .unwrap_err();
        assert_eq!(err.stage(), Stage::Parsing);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Transcoding.to_string(), "transcoding");
        assert_eq!(Stage::Failed.to_string(), "failed");
    }
}
