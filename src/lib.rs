#![warn(clippy::all, rust_2018_idioms)]
#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]

pub use action::{ExtractParameter, ExtractResult, load_parameter, run_extract};
pub use lines::{DEFAULT_LINE_THRESHOLD, Line, aggregate_lines};
pub use ocr::{BoundingBox, Fragment, OcrBackend, Point};

use anyhow::{Context, Ok, Result};
use image::{DynamicImage, RgbaImage};
use screenshots::Screen;
use serde::{Deserialize, Serialize};

pub mod action;
pub mod cleanup;
pub mod lines;
pub mod ocr;
pub mod prepare;

#[derive(Serialize, Deserialize, PartialEq, Debug, Default, Clone, Copy)]
pub struct CaptureParameter {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureParameter {
    pub fn get_screenshot(&self) -> Result<DynamicImage> {
        let screen = Screen::from_point(self.x, self.y)?;
        let image = screen.capture_area(
            self.x - screen.display_info.x,
            self.y - screen.display_info.y,
            self.width,
            self.height,
        )?;

        let bytes = image.to_vec();
        let image = RgbaImage::from_raw(image.width(), image.height(), bytes)
            .context("screenshot failed")?;

        Ok(DynamicImage::ImageRgba8(image))
    }
}
