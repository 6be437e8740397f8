pub mod document;

pub use document::{load_document, validate_references};
