use lopdf::ObjectId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Input is empty")]
    Empty,

    #[error("Malformed PDF: {0}")]
    Malformed(#[from] lopdf::Error),

    #[error("Trailer has no /Root reference")]
    MissingRoot,

    #[error("Object {} {} is listed in the cross-reference table but could not be read", .0.0, .0.1)]
    UnreadableObject(ObjectId),

    #[error("Dangling reference to {} {} R from {}", .to.0, .to.1, describe_owner(.from))]
    DanglingReference {
        from: Option<ObjectId>,
        to: ObjectId,
    },
}

fn describe_owner(from: &Option<ObjectId>) -> String {
    match from {
        Some((num, gen)) => format!("object {} {}", num, gen),
        None => "trailer".to_string(),
    }
}

/// Why a single image could not be re-encoded. Never fatal for the document.
#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("Image dictionary has no usable /{0}")]
    MissingDimension(&'static str),

    #[error("Image has zero width or height")]
    ZeroDimension,

    #[error("Unsupported bits per component: {0}")]
    UnsupportedBitDepth(i64),

    #[error("Unsupported color space: {0}")]
    UnsupportedColorSpace(String),

    #[error("Stencil masks are not re-encoded")]
    ImageMask,

    #[error("Sample data truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode JPEG: {0}")]
    Encode(#[source] image::ImageError),
}

#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("Failed to write PDF: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal failure of the whole compression pipeline.
#[derive(Error, Debug)]
pub enum CompressError {
    #[error("Failed to parse PDF: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to serialize PDF: {0}")]
    Serialize(#[from] SerializeError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JPEG quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),
}

#[derive(Error, Debug)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server failed: {0}")]
    Io(#[from] std::io::Error),
}
