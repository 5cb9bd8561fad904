use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use idscan_ocr::FieldExtractor;

mod args;
mod logging;

use args::{Cli, Command, ParseArgs, ScanArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    match cli.command {
        Command::Scan(args) => scan(args).await,
        Command::Parse(args) => parse(args),
    }
}

#[cfg(feature = "tesseract")]
async fn scan(args: ScanArgs) -> Result<()> {
    use idscan_ocr::{IdentityPipeline, TesseractRecognizer};

    let config = args.resolve_config()?;
    let mut pipeline = IdentityPipeline::new(TesseractRecognizer::new(args.tessdata.clone()), config);
    if let Some(dir) = &args.work_dir {
        pipeline = pipeline.with_artifact_dir(dir.clone());
    }

    let report = pipeline
        .process_paths(args.aadhaar.as_deref(), args.pan.as_deref())
        .await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(not(feature = "tesseract"))]
async fn scan(args: ScanArgs) -> Result<()> {
    args.resolve_config()?;
    Err(idscan_ocr::OcrError::NotAvailable.into())
}

fn parse(args: ParseArgs) -> Result<()> {
    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    let fields = FieldExtractor::new(args.kind)
        .with_name_lines(args.name_lines)
        .extract(&text);
    tracing::debug!(kind = %args.kind, name_found = fields.name.is_some(), "parsed text");
    println!("{}", serde_json::to_string_pretty(&fields)?);
    Ok(())
}
