use lopdf::xref::XrefEntry;
use lopdf::{Document, Object, ObjectId};

use crate::config::Settings;
use crate::error::ParseError;

/// Parse PDF bytes into an in-memory object graph
pub fn load_document(bytes: &[u8], settings: &Settings) -> Result<Document, ParseError> {
    if bytes.is_empty() {
        return Err(ParseError::Empty);
    }

    let doc = Document::load_mem(bytes)?;
    check_objects_loaded(&doc)?;

    match doc.trailer.get(b"Root") {
        Ok(Object::Reference(_)) => {}
        _ => return Err(ParseError::MissingRoot),
    }

    if settings.strict_references {
        validate_references(&doc)?;
    }

    log::debug!(
        "Loaded PDF {} with {} objects",
        doc.version,
        doc.objects.len()
    );

    Ok(doc)
}

/// Check that every in-use cross-reference entry produced an object.
///
/// lopdf skips objects it cannot parse and keeps going, so a document can
/// load with pieces missing. Entries are matched by object number: the
/// reader keys objects by the id written in the object header, which does
/// not always carry the generation the table lists.
pub fn check_objects_loaded(doc: &Document) -> Result<(), ParseError> {
    for (&num, entry) in &doc.reference_table.entries {
        let id = match *entry {
            XrefEntry::Normal { generation, .. } => (num, generation),
            XrefEntry::Compressed { .. } => (num, 0),
            XrefEntry::Free | XrefEntry::UnusableFree => continue,
        };
        if doc.objects.range((num, 0)..=(num, u16::MAX)).next().is_none() {
            return Err(ParseError::UnreadableObject(id));
        }
    }

    Ok(())
}

/// Check that every reference in the document points at an object that exists.
///
/// Objects are visited in ascending id order and the trailer last, so the
/// reported reference is the same on every run.
pub fn validate_references(doc: &Document) -> Result<(), ParseError> {
    for (&id, object) in &doc.objects {
        if let Some(missing) = find_dangling(doc, object) {
            return Err(ParseError::DanglingReference {
                from: Some(id),
                to: missing,
            });
        }
    }

    for (_, value) in doc.trailer.iter() {
        if let Some(missing) = find_dangling(doc, value) {
            return Err(ParseError::DanglingReference {
                from: None,
                to: missing,
            });
        }
    }

    Ok(())
}

fn find_dangling(doc: &Document, object: &Object) -> Option<ObjectId> {
    // Explicit stack: deeply nested arrays must not blow the call stack
    let mut pending = vec![object];

    while let Some(current) = pending.pop() {
        match current {
            Object::Reference(id) => {
                if !doc.objects.contains_key(id) {
                    return Some(*id);
                }
            }
            Object::Array(items) => pending.extend(items.iter().rev()),
            Object::Dictionary(dict) => pending.extend(dict.iter().map(|(_, v)| v)),
            Object::Stream(stream) => pending.extend(stream.dict.iter().map(|(_, v)| v)),
            _ => {}
        }
    }

    None
}
