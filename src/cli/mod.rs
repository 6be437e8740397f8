pub mod args;

pub use args::{Args, Command, CompressArgs, CompressionOptions, InspectArgs, ServeArgs};
