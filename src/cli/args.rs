use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::config::defaults::{DEFAULT_HOST, DEFAULT_JPEG_QUALITY, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(name = "pdf-squeeze")]
#[command(
    author,
    version,
    about = "Shrink PDFs by re-encoding their embedded raster images as JPEG"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP compression endpoint
    Serve(ServeArgs),
    /// Compress a single PDF file on disk
    Compress(CompressArgs),
    /// List the image streams of a PDF and whether they would be re-encoded
    Inspect(InspectArgs),
}

/// Knobs shared by every command that runs the compression pipeline
#[derive(clap::Args, Debug, Clone)]
pub struct CompressionOptions {
    /// JPEG quality for re-encoded images (1-100)
    #[arg(short, long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Accept documents containing references to missing objects
    #[arg(long)]
    pub lenient_references: bool,

    /// Only swap the image payload and filter; leave size/depth/color entries alone
    #[arg(long)]
    pub preserve_image_dict: bool,

    /// Also Flate-compress unfiltered non-image streams
    #[arg(long)]
    pub compress_streams: bool,
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Reject uploads larger than this many bytes (unlimited when omitted)
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    #[command(flatten)]
    pub compression: CompressionOptions,
}

#[derive(clap::Args, Debug)]
pub struct CompressArgs {
    /// Input PDF file path
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output PDF file path (defaults to <input>.compressed.pdf)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub compression: CompressionOptions,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Input PDF file path
    #[arg(required = true)]
    pub input: PathBuf,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,

    /// Accept documents containing references to missing objects
    #[arg(long)]
    pub lenient_references: bool,
}

impl CompressArgs {
    /// Get the output path, defaulting to the input with a .compressed.pdf extension
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("compressed.pdf"))
    }
}
