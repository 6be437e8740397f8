//! PDF serialization
//!
//! Uses lopdf to write the object graph back out. lopdf recomputes stream
//! lengths from their content and rebuilds the xref table and trailer.

use std::io::Cursor;

use lopdf::Document;

use crate::config::Settings;
use crate::error::SerializeError;

/// Serialize a document to bytes.
///
/// With `compress_streams` set, every stream that has no filter yet (page
/// content, fonts, images that kept their raw samples) is Flate-compressed
/// first. Streams already carrying a filter, including freshly re-encoded
/// JPEGs, are left alone by lopdf.
pub fn serialize(doc: &mut Document, settings: &Settings) -> Result<Vec<u8>, SerializeError> {
    if settings.compress_streams {
        doc.compress();
    }

    let mut output = Cursor::new(Vec::new());
    doc.save_to(&mut output)?;

    Ok(output.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Dictionary, Object, Stream};

    fn doc_with_content(content: &[u8]) -> (Document, lopdf::ObjectId) {
        let mut doc = Document::with_version("1.5");
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.to_vec()));
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog" });
        doc.trailer.set("Root", catalog_id);
        (doc, content_id)
    }

    #[test]
    fn test_serialize_produces_pdf() {
        let (mut doc, _) = doc_with_content(b"BT /F1 12 Tf (Hello) Tj ET");
        let bytes = serialize(&mut doc, &Settings::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(Document::load_mem(&bytes).is_ok());
    }

    #[test]
    fn test_streams_untouched_by_default() {
        let content = b"BT /F1 12 Tf (Hello) Tj ET".repeat(20);
        let (mut doc, id) = doc_with_content(&content);
        let bytes = serialize(&mut doc, &Settings::default()).unwrap();

        let reloaded = Document::load_mem(&bytes).unwrap();
        let stream = reloaded.get_object(id).unwrap().as_stream().unwrap();
        assert_eq!(stream.content, content);
    }

    #[test]
    fn test_compress_streams_option() {
        let content = b"BT /F1 12 Tf (Hello) Tj ET\n".repeat(50);
        let (mut doc, id) = doc_with_content(&content);
        let settings = Settings {
            compress_streams: true,
            ..Settings::default()
        };
        let bytes = serialize(&mut doc, &settings).unwrap();

        let reloaded = Document::load_mem(&bytes).unwrap();
        let stream = reloaded.get_object(id).unwrap().as_stream().unwrap();
        assert!(matches!(stream.dict.get(b"Filter"), Ok(Object::Name(name)) if name == b"FlateDecode"));
        assert!(stream.content.len() < content.len());
    }
}
