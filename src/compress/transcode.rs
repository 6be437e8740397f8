//! Image re-encoding
//!
//! Turns the payload of one raw image stream into pixels and writes them back
//! out as a JPEG. Every failure here is local to the image: the caller keeps
//! the original payload and moves on.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Object, Stream};

use crate::error::TranscodeError;
use crate::model::{ColorSpace, ImageDict, ImageOutcome, KeepReason};

/// Color model of the JPEG written by the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedColor {
    Gray,
    Rgb,
}

impl EncodedColor {
    pub fn components(self) -> u8 {
        match self {
            EncodedColor::Gray => 1,
            EncodedColor::Rgb => 3,
        }
    }

    pub fn pdf_name(self) -> &'static str {
        match self {
            EncodedColor::Gray => "DeviceGray",
            EncodedColor::Rgb => "DeviceRGB",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub color: EncodedColor,
}

/// Decode `content` and re-encode it as JPEG at `quality`
pub fn transcode(
    content: &[u8],
    dict: &ImageDict,
    quality: u8,
) -> Result<EncodedImage, TranscodeError> {
    let image = decode(content, dict)?;
    encode_jpeg(&image, quality)
}

/// Decode an image payload into pixels.
///
/// A payload that is itself a raster container (PNG, JPEG, ...) is handed to
/// the codec, which reads the size from the bytes. Anything else is treated
/// as packed 8-bit samples described by the image dictionary.
pub fn decode(content: &[u8], dict: &ImageDict) -> Result<DynamicImage, TranscodeError> {
    if dict.image_mask {
        return Err(TranscodeError::ImageMask);
    }

    let mut codec_error = None;
    if let Ok(format) = image::guess_format(content) {
        match image::load_from_memory_with_format(content, format) {
            Ok(image) => {
                if image.width() == 0 || image.height() == 0 {
                    return Err(TranscodeError::ZeroDimension);
                }
                return Ok(image);
            }
            Err(err) => {
                log::debug!(
                    "Payload looks like {:?} but did not decode ({}), reading as samples",
                    format,
                    err
                );
                codec_error = Some(err);
            }
        }
    }

    // If the bytes looked like a container and are not usable samples either,
    // the codec's complaint is the more useful one
    match (decode_samples(content, dict), codec_error) {
        (Err(_), Some(err)) => Err(TranscodeError::Decode(err)),
        (result, _) => result,
    }
}

fn decode_samples(content: &[u8], dict: &ImageDict) -> Result<DynamicImage, TranscodeError> {
    let width = dimension(dict.width, "Width")?;
    let height = dimension(dict.height, "Height")?;

    match dict.bits_per_component {
        Some(8) | None => {}
        Some(bpc) => return Err(TranscodeError::UnsupportedBitDepth(bpc)),
    }

    let pixels = width as usize * height as usize;
    let components = match &dict.color_space {
        ColorSpace::Unsupported(name) => {
            return Err(TranscodeError::UnsupportedColorSpace(name.clone()))
        }
        ColorSpace::Missing => {
            return Err(TranscodeError::UnsupportedColorSpace("none".to_string()))
        }
        space => space
            .components()
            .or_else(|| infer_components(content.len(), pixels))
            .ok_or_else(|| TranscodeError::UnsupportedColorSpace(format!("{:?}", space)))?,
    };

    let expected = pixels
        .checked_mul(components as usize)
        .unwrap_or(usize::MAX);
    if content.len() < expected {
        return Err(TranscodeError::Truncated {
            expected,
            actual: content.len(),
        });
    }
    let samples = &content[..expected];

    let truncated = || TranscodeError::Truncated {
        expected,
        actual: content.len(),
    };
    match components {
        1 => GrayImage::from_raw(width, height, samples.to_vec())
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(truncated),
        3 => RgbImage::from_raw(width, height, samples.to_vec())
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(truncated),
        4 => RgbImage::from_raw(width, height, cmyk_to_rgb(samples))
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(truncated),
        n => Err(TranscodeError::UnsupportedColorSpace(format!(
            "{} components",
            n
        ))),
    }
}

fn dimension(value: Option<i64>, key: &'static str) -> Result<u32, TranscodeError> {
    match value {
        None => Err(TranscodeError::MissingDimension(key)),
        Some(n) if n <= 0 => Err(TranscodeError::ZeroDimension),
        Some(n) => u32::try_from(n).map_err(|_| TranscodeError::MissingDimension(key)),
    }
}

/// Guess components per pixel from the payload size when the color space
/// does not say (an ICC profile without /N)
fn infer_components(len: usize, pixels: usize) -> Option<u8> {
    if pixels == 0 {
        return None;
    }
    match len / pixels {
        0 => None,
        1 | 2 => Some(1),
        3 => Some(3),
        _ => Some(4),
    }
}

fn cmyk_to_rgb(samples: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(samples.len() / 4 * 3);
    for chunk in samples.chunks_exact(4) {
        let k = 255 - chunk[3] as u16;
        for &ink in &chunk[..3] {
            rgb.push(((255 - ink as u16) * k / 255) as u8);
        }
    }
    rgb
}

/// Encode pixels as baseline JPEG; gray sources stay single-channel
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<EncodedImage, TranscodeError> {
    let color = match image {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_) => EncodedColor::Gray,
        _ => EncodedColor::Rgb,
    };

    let mut data = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut data, quality);
    let written = match color {
        EncodedColor::Gray => encoder.encode_image(&image.to_luma8()),
        EncodedColor::Rgb => encoder.encode_image(&image.to_rgb8()),
    };
    drop(encoder);
    written.map_err(TranscodeError::Encode)?;

    Ok(EncodedImage {
        data,
        width: image.width(),
        height: image.height(),
        color,
    })
}

/// Re-encode one image stream in place.
///
/// The stream is only touched when the new payload is strictly smaller.
pub fn recompress_stream(
    stream: &mut Stream,
    dict: &ImageDict,
    quality: u8,
    preserve_dict: bool,
) -> ImageOutcome {
    let original_len = stream.content.len();

    match transcode(&stream.content, dict, quality) {
        Err(err) => ImageOutcome::KeptOriginal(KeepReason::Failed(err)),
        Ok(encoded) if encoded.data.len() >= original_len => {
            ImageOutcome::KeptOriginal(KeepReason::NoGain {
                original_len,
                encoded_len: encoded.data.len(),
            })
        }
        Ok(encoded) => {
            let encoded_len = encoded.data.len();
            replace_payload(stream, encoded, dict, preserve_dict);
            ImageOutcome::Transcoded {
                original_len,
                encoded_len,
            }
        }
    }
}

/// Swap in a JPEG payload. /Length follows the new content; /Filter must say
/// DCTDecode or readers would treat the JPEG bytes as samples.
pub fn replace_payload(
    stream: &mut Stream,
    encoded: EncodedImage,
    source: &ImageDict,
    preserve_dict: bool,
) {
    let EncodedImage {
        data,
        width,
        height,
        color,
    } = encoded;

    stream.set_content(data);
    stream.dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
    stream.dict.remove(b"DecodeParms");

    if preserve_dict {
        return;
    }

    stream.dict.set("Width", width as i64);
    stream.dict.set("Height", height as i64);
    stream.dict.set("BitsPerComponent", 8);

    if source.color_space.components() != Some(color.components()) {
        log::debug!(
            "Color space {:?} rewritten to {}",
            source.color_space,
            color.pdf_name()
        );
        stream.dict.set("ColorSpace", Object::Name(color.pdf_name().as_bytes().to_vec()));
        // A /Decode array sized for the old color model would now be wrong
        stream.dict.remove(b"Decode");
    }
}
