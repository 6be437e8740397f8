pub mod image;
pub mod object;
pub mod outcome;

pub use image::{ColorSpace, ImageCandidate, ImageDict};
pub use object::{classify, filter_names, stream_kind, ImageEncoding, ObjectKind, StreamKind};
pub use outcome::{CompressionReport, ImageOutcome, ImageReport, KeepReason};
