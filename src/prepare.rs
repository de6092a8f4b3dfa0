use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage};
use imageproc::contrast::{ThresholdType, equalize_histogram, threshold};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy)]
#[serde(default)]
pub struct EnhanceParameter {
    /// Binarization cutoff, everything above turns white.
    pub threshold: u8,
    pub equalize: bool,
}

impl Default for EnhanceParameter {
    fn default() -> Self {
        Self {
            threshold: 150,
            equalize: true,
        }
    }
}

pub fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| format!("Failed to open image {}", path.display()))
}

/// Prepares an image for recognition: grayscale, then a global binary
/// threshold, then optional histogram equalization, in that order.
pub fn enhance(image: &DynamicImage, parameter: &EnhanceParameter) -> GrayImage {
    let gray = image.to_luma8();
    let binarized = threshold(&gray, parameter.threshold, ThresholdType::Binary);

    if parameter.equalize {
        equalize_histogram(&binarized)
    } else {
        binarized
    }
}

pub fn write_image(image: &GrayImage, path: &Path) -> Result<()> {
    image
        .save(path)
        .with_context(|| format!("Failed to write image {}", path.display()))
}
