use anyhow::Result;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

pub mod easy_ocr;
pub mod tesseract;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Four corners of a detected text region, in pixel coordinates with the
/// origin at the top left and y growing downwards.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl BoundingBox {
    pub fn from_rect(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            top_left: Point { x: left, y: top },
            top_right: Point {
                x: left + width,
                y: top,
            },
            bottom_right: Point {
                x: left + width,
                y: top + height,
            },
            bottom_left: Point {
                x: left,
                y: top + height,
            },
        }
    }
}

/// One recognized piece of text as the engine reported it, before any
/// grouping or cleanup.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    pub bbox: BoundingBox,
    pub text: String,
    pub confidence: f32,
}

#[derive(
    Debug, Clone, PartialEq, strum::Display, EnumString, EnumIter, Serialize, Deserialize, Default,
)]
pub enum OcrBackend {
    #[strum(ascii_case_insensitive)]
    #[default]
    EasyOcr,
    #[strum(ascii_case_insensitive)]
    Tesseract,
}

impl OcrBackend {
    pub fn run_backend(
        &self,
        image: &DynamicImage,
        languages: &[String],
    ) -> Result<Vec<Fragment>> {
        match self {
            OcrBackend::EasyOcr => easy_ocr::run_ocr_easy_ocr(image, languages),
            OcrBackend::Tesseract => tesseract::run_ocr_tesseract(image, languages),
        }
    }
}
