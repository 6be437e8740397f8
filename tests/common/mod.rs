//! PDF fixtures built in memory with lopdf.

#![allow(dead_code)]

use std::io::Cursor;

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

pub const HELLO_CONTENT: &[u8] = b"BT /F1 24 Tf 72 720 Td (Hello) Tj ET";

/// A saved fixture plus the ids of the objects tests want to look at
pub struct Fixture {
    pub bytes: Vec<u8>,
    pub content_id: ObjectId,
    pub font_file_id: ObjectId,
    pub image_ids: Vec<ObjectId>,
}

/// Packed 8-bit RGB samples of a smooth gradient
pub fn rgb_gradient(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push((x * 255 / width) as u8);
            data.push((y * 255 / height) as u8);
            data.push(((x + y) * 127 / (width + height)) as u8);
        }
    }
    data
}

/// An uncompressed DeviceRGB image XObject
pub fn raw_rgb_image(width: u32, height: u32) -> Stream {
    image_stream(width, height, "DeviceRGB", rgb_gradient(width, height))
}

pub fn image_stream(width: u32, height: u32, color_space: &str, samples: Vec<u8>) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => color_space,
            "BitsPerComponent" => 8,
        },
        samples,
    )
}

/// Claims to be 32x32 RGB but carries a handful of bytes
pub fn broken_image() -> Stream {
    image_stream(32, 32, "DeviceRGB", vec![0xAB; 7])
}

/// A one-page document whose content stream shows "Hello" and paints every image
pub fn build_pdf(images: Vec<Stream>) -> Fixture {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_file_id = doc.add_object(Stream::new(
        dictionary! { "Length1" => 64 },
        (0u8..64).collect::<Vec<u8>>(),
    ));
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut xobjects = Dictionary::new();
    let mut image_ids = Vec::new();
    let mut content = HELLO_CONTENT.to_vec();
    for (i, image) in images.into_iter().enumerate() {
        let id = doc.add_object(image);
        let name = format!("Im{}", i + 1);
        content.extend_from_slice(format!("\nq 100 0 0 100 72 {} cm /{} Do Q", 500 - 110 * i as i64, name).as_bytes());
        xobjects.set(name, Object::Reference(id));
        image_ids.push(id);
    }
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
            "XObject" => xobjects,
        },
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Cursor::new(Vec::new());
    doc.save_to(&mut out).expect("Failed to save fixture");

    Fixture {
        bytes: out.into_inner(),
        content_id,
        font_file_id,
        image_ids,
    }
}

/// Overwrite the `<<` that opens object `num`'s dictionary so it no longer parses
pub fn corrupt_object(bytes: &mut [u8], num: u32) {
    let header = format!("{} 0 obj", num).into_bytes();
    let start = bytes
        .windows(header.len())
        .enumerate()
        .position(|(i, w)| w == header.as_slice() && (i == 0 || !bytes[i - 1].is_ascii_digit()))
        .expect("Object header not found");
    let open = start
        + bytes[start..]
            .windows(2)
            .position(|w| w == b"<<")
            .expect("Object dictionary not found");
    bytes[open..open + 2].copy_from_slice(b")]");
}

/// Cross-reference streams are rewritten under a fresh id on every save
pub fn is_xref_stream(object: &Object) -> bool {
    match object {
        Object::Stream(stream) => stream.dict.has_type(b"XRef"),
        _ => false,
    }
}

/// Ids of every object except cross-reference streams
pub fn content_object_ids(doc: &Document) -> Vec<ObjectId> {
    doc.objects
        .iter()
        .filter(|(_, object)| !is_xref_stream(object))
        .map(|(&id, _)| id)
        .collect()
}

pub fn stream(doc: &Document, id: ObjectId) -> &Stream {
    doc.get_object(id)
        .and_then(|object| object.as_stream())
        .expect("Expected a stream object")
}

pub fn filter_name(stream: &Stream) -> Option<Vec<u8>> {
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => Some(name.clone()),
        _ => None,
    }
}
