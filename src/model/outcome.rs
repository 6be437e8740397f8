use std::fmt;

use lopdf::ObjectId;

use crate::error::TranscodeError;

/// Why an image candidate kept its original payload
#[derive(Debug)]
pub enum KeepReason {
    Failed(TranscodeError),
    /// The re-encoded payload was not smaller than the original
    NoGain {
        original_len: usize,
        encoded_len: usize,
    },
}

impl fmt::Display for KeepReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeepReason::Failed(err) => write!(f, "{}", err),
            KeepReason::NoGain {
                original_len,
                encoded_len,
            } => write!(
                f,
                "re-encoded size {} is not below original {}",
                encoded_len, original_len
            ),
        }
    }
}

#[derive(Debug)]
pub enum ImageOutcome {
    Transcoded {
        original_len: usize,
        encoded_len: usize,
    },
    KeptOriginal(KeepReason),
}

impl ImageOutcome {
    pub fn is_transcoded(&self) -> bool {
        matches!(self, ImageOutcome::Transcoded { .. })
    }
}

#[derive(Debug)]
pub struct ImageReport {
    pub id: ObjectId,
    pub outcome: ImageOutcome,
}

/// Summary of one pass over a document
#[derive(Debug, Default)]
pub struct CompressionReport {
    pub input_len: usize,
    pub output_len: usize,
    pub images: Vec<ImageReport>,
}

impl CompressionReport {
    /// Number of image candidates found
    pub fn found(&self) -> usize {
        self.images.len()
    }

    pub fn transcoded(&self) -> usize {
        self.images
            .iter()
            .filter(|r| r.outcome.is_transcoded())
            .count()
    }

    pub fn kept(&self) -> usize {
        self.found() - self.transcoded()
    }

    /// Bytes saved; negative when the output grew
    pub fn saved_bytes(&self) -> i64 {
        self.input_len as i64 - self.output_len as i64
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} bytes, {} of {} images re-encoded",
            self.input_len,
            self.output_len,
            self.transcoded(),
            self.found()
        )
    }
}
