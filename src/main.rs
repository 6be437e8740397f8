use anyhow::{Context, Result};
use clap::Parser;
use std::fs;

use pdf_squeeze::cli::{Args, Command, CompressArgs, InspectArgs};
use pdf_squeeze::compress::{compress_pdf, list_images};
use pdf_squeeze::config::{ServerSettings, Settings};
use pdf_squeeze::parser::load_document;
use pdf_squeeze::server;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    match args.command {
        Command::Serve(serve) => server::serve(ServerSettings::from_args(&serve))
            .await
            .context("Server stopped"),
        Command::Compress(compress) => run_compress(&compress),
        Command::Inspect(inspect) => run_inspect(&inspect),
    }
}

fn run_compress(args: &CompressArgs) -> Result<()> {
    let settings = Settings::from_args(&args.compression);
    settings.validate()?;

    let input = fs::read(&args.input)
        .with_context(|| format!("Failed to read input file: {}", args.input.display()))?;

    let compressed = compress_pdf(&input, &settings)
        .with_context(|| format!("Failed to compress {}", args.input.display()))?;

    for image in &compressed.report.images {
        if let pdf_squeeze::ImageOutcome::KeptOriginal(reason) = &image.outcome {
            log::info!("Image {} {} R kept: {}", image.id.0, image.id.1, reason);
        }
    }

    let output_path = args.output_path();
    fs::write(&output_path, &compressed.data)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

    println!(
        "Wrote {} ({})",
        output_path.display(),
        compressed.report
    );

    Ok(())
}

fn run_inspect(args: &InspectArgs) -> Result<()> {
    let settings = Settings {
        strict_references: !args.lenient_references,
        ..Settings::default()
    };

    let input = fs::read(&args.input)
        .with_context(|| format!("Failed to read input file: {}", args.input.display()))?;
    let doc = load_document(&input, &settings)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    let images = list_images(&doc);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&images)?);
        return Ok(());
    }

    println!(
        "{} pages, {} objects, {} image streams",
        doc.get_pages().len(),
        doc.objects.len(),
        images.len()
    );
    for image in &images {
        println!(
            "{:>10}  {:<16} {:>5}x{:<5} {:<24} {:>10} bytes  {}",
            image.object,
            image.encoding,
            image.width.map(|w| w.to_string()).unwrap_or_else(|| "?".into()),
            image.height.map(|h| h.to_string()).unwrap_or_else(|| "?".into()),
            image.color_space,
            image.bytes,
            if image.candidate { "candidate" } else { "skipped" }
        );
    }

    Ok(())
}
