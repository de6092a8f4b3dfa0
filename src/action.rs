use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use image::DynamicImage;
use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};

use crate::cleanup::TextCleaner;
use crate::lines::{DEFAULT_LINE_THRESHOLD, Line, aggregate_lines};
use crate::ocr::OcrBackend;
use crate::prepare::{EnhanceParameter, enhance, write_image};

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct ExtractParameter {
    pub backend: OcrBackend,
    pub languages: Vec<String>,
    pub enhance: bool,
    pub enhance_parameter: EnhanceParameter,
    pub line_threshold: f32,
    pub dump_enhanced: Option<PathBuf>,
}

impl Default for ExtractParameter {
    fn default() -> Self {
        Self {
            backend: OcrBackend::default(),
            languages: vec!["eng".to_string()],
            enhance: true,
            enhance_parameter: EnhanceParameter::default(),
            line_threshold: DEFAULT_LINE_THRESHOLD,
            dump_enhanced: None,
        }
    }
}

pub fn load_parameter(path: &Path) -> Result<ExtractParameter> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file {}", path.display()))?;
    let parameter = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse parameter file {}", path.display()))?;
    Ok(parameter)
}

#[derive(Deserialize, Serialize, Default, Debug, PartialEq)]
#[serde(default)]
pub struct ExtractResult {
    pub lines: Vec<Line>,
}

impl ExtractResult {
    pub fn text(&self) -> String {
        self.lines.iter().map(|line| line.text.as_str()).join("\n")
    }
}

pub fn run_extract(parameter: &ExtractParameter, image: &DynamicImage) -> Result<ExtractResult> {
    let now = Instant::now();

    //Enhance
    let image = if parameter.enhance {
        let enhanced = enhance(image, &parameter.enhance_parameter);
        if let Some(path) = &parameter.dump_enhanced {
            write_image(&enhanced, path)?;
            info!("Wrote enhanced image to {}", path.display());
        }
        DynamicImage::ImageLuma8(enhanced)
    } else {
        image.clone()
    };

    //Recognize
    info!("run {} backend...", parameter.backend);
    let fragments = parameter
        .backend
        .run_backend(&image, &parameter.languages)?;
    info!("run {} backend done with {} fragments", parameter.backend, fragments.len());

    //Group and clean
    let cleaner = TextCleaner::new();
    let lines = aggregate_lines(
        fragments,
        |text| cleaner.process(text),
        parameter.line_threshold,
    );

    let elapsed = now.elapsed();
    info!("extract done with {} lines, elapsed: {elapsed:.2?}", lines.len());

    Ok(ExtractResult { lines })
}
