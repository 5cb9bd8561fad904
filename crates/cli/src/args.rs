use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use idscan_core::{DocumentKind, NameLines, ScanConfig};

#[derive(Parser, Debug)]
#[command(
    name = "idscan",
    version,
    about = "Extract name and identifier number from Aadhaar and PAN card photos"
)]
pub struct Cli {
    /// Log level filter; RUST_LOG takes precedence when set
    #[arg(long = "log-level", default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full OCR pipeline over one or both card photos
    Scan(ScanArgs),
    /// Parse already-recognized text without running OCR
    Parse(ParseArgs),
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Aadhaar card photo
    #[arg(long)]
    pub aadhaar: Option<PathBuf>,

    /// PAN card photo
    #[arg(long)]
    pub pan: Option<PathBuf>,

    /// TOML config file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Write processed images under this directory
    #[arg(long = "work-dir")]
    pub work_dir: Option<PathBuf>,

    /// Tesseract data directory
    #[arg(long)]
    pub tessdata: Option<String>,

    /// OCR language hint
    #[arg(long)]
    pub lang: Option<String>,

    /// Run all recognition modes at once
    #[arg(long)]
    pub concurrent: bool,

    /// Per-call OCR timeout in milliseconds
    #[arg(long = "timeout-ms")]
    pub timeout_ms: Option<u64>,

    /// Which lines the name heuristics read: recognized or corrected
    #[arg(long = "name-lines")]
    pub name_lines: Option<NameLines>,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Document kind: aadhaar or pan
    #[arg(short = 'k', long)]
    pub kind: DocumentKind,

    /// Text file to parse; stdin when omitted
    pub file: Option<PathBuf>,

    /// Which lines the name heuristics read: recognized or corrected
    #[arg(long = "name-lines", default_value = "recognized")]
    pub name_lines: NameLines,
}

impl ScanArgs {
    /// Load the config file (or defaults) and apply flag overrides on top.
    pub fn resolve_config(&self) -> Result<ScanConfig> {
        if self.aadhaar.is_none() && self.pan.is_none() {
            bail!("nothing to scan: pass --aadhaar and/or --pan");
        }

        let mut cfg = match &self.config {
            Some(path) => ScanConfig::load(path)?,
            None => ScanConfig::default(),
        };
        if let Some(lang) = &self.lang {
            cfg.recognition.language = lang.clone();
        }
        if self.concurrent {
            cfg.recognition.concurrent = true;
        }
        if let Some(ms) = self.timeout_ms {
            cfg.recognition.timeout_ms = ms;
        }
        if let Some(name_lines) = self.name_lines {
            cfg.extraction.name_lines = name_lines;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
