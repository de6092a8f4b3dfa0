#![warn(clippy::all, rust_2018_idioms)]
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use itertools::Itertools;
use log4rs::config::Deserializers;
use strum::IntoEnumIterator;
use textlift::{
    CaptureParameter, ExtractParameter, OcrBackend, load_parameter, prepare, run_extract,
};

/// Lifts cleaned text lines out of an image or a screen region.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Image to read text from
    image: Option<PathBuf>,

    /// Capture a screen region instead of reading a file
    #[arg(long, value_name = "X,Y,WxH", conflicts_with = "image")]
    capture: Option<String>,

    /// Recognition backend (EasyOcr, Tesseract)
    #[arg(long)]
    backend: Option<String>,

    /// Recognition language, repeatable
    #[arg(long = "lang", value_name = "LANG")]
    languages: Vec<String>,

    /// Maximum vertical distance for fragments to share a line
    #[arg(long)]
    line_threshold: Option<f32>,

    /// Binarization cutoff for image enhancement
    #[arg(long)]
    threshold: Option<u8>,

    /// Pass the image to the backend untouched
    #[arg(long)]
    no_enhance: bool,

    /// Write the enhanced image to this path before recognition
    #[arg(long, value_name = "PATH")]
    dump_enhanced: Option<PathBuf>,

    /// Read extraction parameters from a JSON file
    #[arg(long, value_name = "PATH")]
    params: Option<PathBuf>,

    /// Prefix every line with its confidence
    #[arg(long)]
    confidence: bool,
}

fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse();
    let parameter = build_parameter(&cli)?;

    let image = match (&cli.image, &cli.capture) {
        (Some(path), None) => prepare::open_image(path)?,
        (None, Some(region)) => parse_capture(region)?.get_screenshot()?,
        _ => bail!("Provide an image path or --capture x,y,WxH"),
    };

    let result = run_extract(&parameter, &image)?;

    if cli.confidence {
        for line in &result.lines {
            println!("{:.2} {}", line.confidence, line.text);
        }
    } else if !result.lines.is_empty() {
        println!("{}", result.text());
    }

    Ok(())
}

fn build_parameter(cli: &Cli) -> Result<ExtractParameter> {
    let mut parameter = match &cli.params {
        Some(path) => load_parameter(path)?,
        None => ExtractParameter::default(),
    };

    if let Some(backend) = &cli.backend {
        parameter.backend = OcrBackend::from_str(backend).map_err(|_| {
            anyhow!(
                "Unknown backend {backend}, available: {}",
                OcrBackend::iter().map(|b| b.to_string()).join(", ")
            )
        })?;
    }
    if !cli.languages.is_empty() {
        parameter.languages = cli.languages.clone();
    }
    if let Some(line_threshold) = cli.line_threshold {
        parameter.line_threshold = line_threshold;
    }
    if let Some(threshold) = cli.threshold {
        parameter.enhance_parameter.threshold = threshold;
    }
    if cli.no_enhance {
        parameter.enhance = false;
    }
    if let Some(path) = &cli.dump_enhanced {
        parameter.dump_enhanced = Some(path.clone());
    }

    Ok(parameter)
}

fn parse_capture(region: &str) -> Result<CaptureParameter> {
    let parts: Vec<&str> = region.split(',').collect();
    let &[x, y, size] = parts.as_slice() else {
        bail!("Capture region must be x,y,WxH, got {region:?}");
    };
    let (width, height) = size
        .split_once('x')
        .with_context(|| format!("Capture size must be WxH, got {size:?}"))?;

    Ok(CaptureParameter {
        x: x.trim().parse()?,
        y: y.trim().parse()?,
        width: width.trim().parse()?,
        height: height.trim().parse()?,
    })
}

const LOG_CONFIG_DIR: &str = "config";
const LOG_CONFIG: &str = "config/log4rs.yaml";

fn init_logger() {
    fs::create_dir_all(LOG_CONFIG_DIR).expect("Config directory creation failed");
    if !Path::new(&LOG_CONFIG).exists() {
        fs::write(LOG_CONFIG, include_str!("../config/log4rs.yaml"))
            .expect("Config file creation failed");
    }

    log4rs::init_file("config/log4rs.yaml", Deserializers::default()).expect("Logger init failed");
}
