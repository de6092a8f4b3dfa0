use anyhow::Result;
use image::DynamicImage;
use itertools::Itertools;
use rusty_tesseract::{Args, Image};

use crate::ocr::{BoundingBox, Fragment};

pub fn run_ocr_tesseract(image: &DynamicImage, languages: &[String]) -> Result<Vec<Fragment>> {
    let image = Image::from_dynamic_image(image)?;
    let args = Args {
        lang: languages.iter().join("+"),
        ..Args::default()
    };

    let output = rusty_tesseract::image_to_data(&image, &args)?;

    //Word-level records carry a percent confidence, structural rows are -1
    let fragments = output
        .data
        .iter()
        .filter_map(|record| {
            fragment_from_record(
                record.left,
                record.top,
                record.width,
                record.height,
                record.conf,
                &record.text,
            )
        })
        .collect();

    Ok(fragments)
}

fn fragment_from_record(
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    conf: f32,
    text: &str,
) -> Option<Fragment> {
    if conf < 0.0 || text.trim().is_empty() {
        return None;
    }

    Some(Fragment {
        bbox: BoundingBox::from_rect(left as f32, top as f32, width as f32, height as f32),
        text: text.trim().to_string(),
        confidence: conf / 100.0,
    })
}
