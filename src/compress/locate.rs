use lopdf::Document;
use serde::Serialize;

use crate::model::{
    classify, ImageCandidate, ImageDict, ImageEncoding, ObjectKind, StreamKind,
};

/// Collect the raw image streams of a document, in ascending object id order.
///
/// Filtered images are left out: their payload would have to go through the
/// filter chain before a codec could read it.
pub fn locate_images(doc: &Document) -> Vec<ImageCandidate> {
    doc.objects
        .iter()
        .filter_map(|(&id, object)| match classify(object) {
            ObjectKind::Stream(StreamKind::Image(ImageEncoding::Raw), stream) => {
                Some(ImageCandidate {
                    id,
                    dict: ImageDict::from_dict(doc, &stream.dict),
                    original_len: stream.content.len(),
                })
            }
            ObjectKind::Stream(StreamKind::Image(ImageEncoding::Filtered(filters)), _) => {
                log::debug!(
                    "Skipping image {} {} R: filtered with {}",
                    id.0,
                    id.1,
                    filters.join(", ")
                );
                None
            }
            _ => None,
        })
        .collect()
}

/// One row of the `inspect` listing
#[derive(Debug, Clone, Serialize)]
pub struct ImageSummary {
    pub object: String,
    pub encoding: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub bits_per_component: Option<i64>,
    pub color_space: String,
    pub bytes: usize,
    pub candidate: bool,
}

/// Describe every image stream, candidate or not
pub fn list_images(doc: &Document) -> Vec<ImageSummary> {
    doc.objects
        .iter()
        .filter_map(|(&id, object)| match classify(object) {
            ObjectKind::Stream(StreamKind::Image(encoding), stream) => {
                let dict = ImageDict::from_dict(doc, &stream.dict);
                let (encoding, candidate) = match encoding {
                    ImageEncoding::Raw => ("raw".to_string(), true),
                    ImageEncoding::Filtered(filters) => (filters.join("+"), false),
                };
                Some(ImageSummary {
                    object: format!("{} {} R", id.0, id.1),
                    encoding,
                    width: dict.width,
                    height: dict.height,
                    bits_per_component: dict.bits_per_component,
                    color_space: format!("{:?}", dict.color_space),
                    bytes: stream.content.len(),
                    candidate,
                })
            }
            _ => None,
        })
        .collect()
}
