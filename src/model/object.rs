use lopdf::{Dictionary, Object, Stream};

/// How an image stream's payload is stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageEncoding {
    /// No /Filter: the payload is the sample data (or a self-describing raster)
    Raw,
    /// One or more filters, outermost first
    Filtered(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamKind {
    Image(ImageEncoding),
    Other,
}

/// A borrowed view of an indirect object, tagged by what it holds
#[derive(Debug)]
pub enum ObjectKind<'a> {
    Dictionary(&'a Dictionary),
    Array(&'a [Object]),
    Stream(StreamKind, &'a Stream),
    Primitive(&'a Object),
}

impl ObjectKind<'_> {
    /// True for image streams the transcoder is allowed to touch
    pub fn is_raw_image(&self) -> bool {
        matches!(
            self,
            ObjectKind::Stream(StreamKind::Image(ImageEncoding::Raw), _)
        )
    }
}

pub fn classify(object: &Object) -> ObjectKind<'_> {
    match object {
        Object::Dictionary(dict) => ObjectKind::Dictionary(dict),
        Object::Array(items) => ObjectKind::Array(items),
        Object::Stream(stream) => ObjectKind::Stream(stream_kind(&stream.dict), stream),
        other => ObjectKind::Primitive(other),
    }
}

pub fn stream_kind(dict: &Dictionary) -> StreamKind {
    let is_image = matches!(dict.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Image");
    if !is_image {
        return StreamKind::Other;
    }

    let filters = filter_names(dict);
    if filters.is_empty() {
        StreamKind::Image(ImageEncoding::Raw)
    } else {
        StreamKind::Image(ImageEncoding::Filtered(filters))
    }
}

/// Names listed under /Filter, whether given as a single name or an array
pub fn filter_names(dict: &Dictionary) -> Vec<String> {
    match dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![String::from_utf8_lossy(name).into_owned()],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
