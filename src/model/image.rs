//! Dictionary-level view of an image XObject
//!
//! Only the entries the transcoder needs to turn raw samples into pixels are
//! read here: size, bit depth, color space and the stencil-mask flag.

use lopdf::{Dictionary, Document, Object, ObjectId};

/// Color space of an image, reduced to what decoding raw samples cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
    /// ICC-based space; component count comes from the profile's /N when present
    IccBased { components: Option<u8> },
    Unsupported(String),
    Missing,
}

impl ColorSpace {
    pub fn from_object(doc: &Document, object: &Object) -> Self {
        match resolve(doc, object) {
            Object::Name(name) => Self::from_family(name),
            Object::Array(items) => {
                let Some(Object::Name(family)) = items.first().map(|o| resolve(doc, o)) else {
                    return ColorSpace::Unsupported("malformed array".to_string());
                };
                match family.as_slice() {
                    b"ICCBased" => {
                        let components = items
                            .get(1)
                            .and_then(|profile| match resolve(doc, profile) {
                                Object::Stream(stream) => stream.dict.get(b"N").ok(),
                                _ => None,
                            })
                            .and_then(|n| resolve(doc, n).as_i64().ok())
                            .and_then(|n| u8::try_from(n).ok());
                        ColorSpace::IccBased { components }
                    }
                    _ => Self::from_family(family),
                }
            }
            _ => ColorSpace::Missing,
        }
    }

    fn from_family(name: &[u8]) -> Self {
        match name {
            b"DeviceGray" | b"G" | b"CalGray" => ColorSpace::Gray,
            b"DeviceRGB" | b"RGB" | b"CalRGB" => ColorSpace::Rgb,
            b"DeviceCMYK" | b"CMYK" => ColorSpace::Cmyk,
            other => ColorSpace::Unsupported(String::from_utf8_lossy(other).into_owned()),
        }
    }

    /// Components per sample, if the space pins it down
    pub fn components(&self) -> Option<u8> {
        match self {
            ColorSpace::Gray => Some(1),
            ColorSpace::Rgb => Some(3),
            ColorSpace::Cmyk => Some(4),
            ColorSpace::IccBased { components } => *components,
            ColorSpace::Unsupported(_) | ColorSpace::Missing => None,
        }
    }
}

/// The entries of an image dictionary used for decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDict {
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub bits_per_component: Option<i64>,
    pub color_space: ColorSpace,
    pub image_mask: bool,
}

impl ImageDict {
    pub fn from_dict(doc: &Document, dict: &Dictionary) -> Self {
        let int = |key: &[u8]| {
            dict.get(key)
                .ok()
                .and_then(|o| resolve(doc, o).as_i64().ok())
        };

        Self {
            width: int(b"Width"),
            height: int(b"Height"),
            bits_per_component: int(b"BitsPerComponent"),
            color_space: dict
                .get(b"ColorSpace")
                .map(|cs| ColorSpace::from_object(doc, cs))
                .unwrap_or(ColorSpace::Missing),
            image_mask: matches!(
                dict.get(b"ImageMask").map(|o| resolve(doc, o)),
                Ok(Object::Boolean(true))
            ),
        }
    }
}

/// An image stream selected for re-encoding
#[derive(Debug, Clone)]
pub struct ImageCandidate {
    pub id: ObjectId,
    pub dict: ImageDict,
    pub original_len: usize,
}

/// Follow one level of indirection; unresolvable references stay as they are
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        other => other,
    }
}
