use std::process::Command;
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use image::DynamicImage;
use itertools::Itertools;
use log::debug;
use regex::Regex;
use rusty_tesseract::Image;

use crate::ocr::{BoundingBox, Fragment, Point};

//One detection per stdout line:
//([[86, 80], [134, 80], [134, 128], [86, 128]], 'NO LITTER', 0.9704155489572499)
//Newer easyocr builds wrap the scalars, e.g. np.int32(86) and np.float64(0.97)
static FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\((\[\[.*\]\])\s*,\s*["'](.*)["']\s*,\s*(?:np\.\w+\()?([0-9eE.+-]+)\)?\s*\)$"#)
        .expect("fragment pattern is invalid")
});

static POINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[\s*(?:np\.\w+\()?(-?\d+(?:\.\d+)?)\)?\s*,\s*(?:np\.\w+\()?(-?\d+(?:\.\d+)?)\)?\s*\]",
    )
    .expect("point pattern is invalid")
});

pub fn run_ocr_easy_ocr(image: &DynamicImage, languages: &[String]) -> Result<Vec<Fragment>> {
    let image = Image::from_dynamic_image(image)?;
    let image_path = image.get_image_path()?;

    let languages = languages.iter().map(|lang| map_language(lang)).collect_vec();

    let output = run_easy_ocr_command(&image_path, &languages)?;
    Ok(parse_easy_ocr_output(&output))
}

fn run_easy_ocr_command(image_path: &str, languages: &[&str]) -> Result<String> {
    let mut command = Command::new("python");
    command
        .args(["-X", "utf8", "-m", "easyocr.cli"])
        .arg("-l")
        .args(languages)
        .args(["-f", image_path, "--verbose=False"]);
    debug!("running {command:?}");

    let output = command
        .output()
        .context("Failed to run easyocr, is it installed?")?;
    let result = String::from_utf8(output.stdout)?;
    Ok(result)
}

/// easyocr takes two-letter codes; map the common tesseract-style names,
/// pass anything else through untouched.
fn map_language(lang: &str) -> &str {
    match lang {
        x if x.contains("jpn") => "ja",
        x if x.contains("eng") => "en",
        x => x,
    }
}

pub fn parse_easy_ocr_output(output: &str) -> Vec<Fragment> {
    output
        .lines()
        .filter_map(|line| match parse_easy_ocr_line(line) {
            Ok(fragment) => Some(fragment),
            Err(e) => {
                debug!("skipping easyocr line {line:?}: {e}");
                None
            }
        })
        .collect()
}

fn parse_easy_ocr_line(line: &str) -> Result<Fragment> {
    let capture = FRAGMENT_RE
        .captures(line.trim())
        .context("no fragment capture")?;

    let points: Vec<Point> = POINT_RE
        .captures_iter(&capture[1])
        .filter_map(|pair| {
            let x = pair[1].parse().ok()?;
            let y = pair[2].parse().ok()?;
            Some(Point { x, y })
        })
        .collect();

    let &[top_left, top_right, bottom_right, bottom_left] = points.as_slice() else {
        bail!("expected four corner points, got {}", points.len());
    };

    let confidence = capture[3]
        .parse()
        .with_context(|| format!("bad confidence {}", &capture[3]))?;

    Ok(Fragment {
        bbox: BoundingBox {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        },
        text: capture[2].to_string(),
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_line() {
        let line = "([[86, 80], [134, 80], [134, 128], [86, 128]], 'NO LITTER', 0.9704155489572499)";
        let fragment = parse_easy_ocr_line(line).unwrap();

        assert_eq!(fragment.text, "NO LITTER");
        assert_eq!(fragment.bbox.top_left, Point { x: 86.0, y: 80.0 });
        assert_eq!(fragment.bbox.bottom_right, Point { x: 134.0, y: 128.0 });
        assert!((fragment.confidence - 0.9704155).abs() < 1e-4);
    }

    #[test]
    fn parse_numpy_wrapped_line() {
        let line = "([[np.int32(86), np.int32(80)], [np.int32(134), np.int32(80)], \
                    [np.int32(134), np.int32(128)], [np.int32(86), np.int32(128)]], \
                    'MINATO CITY', np.float64(0.86))";
        let fragment = parse_easy_ocr_line(line).unwrap();

        assert_eq!(fragment.text, "MINATO CITY");
        assert_eq!(fragment.bbox.top_left, Point { x: 86.0, y: 80.0 });
        assert_eq!(fragment.confidence, 0.86);
    }

    #[test]
    fn parse_float_coordinates_and_double_quotes() {
        let line = r#"([[10.5, 7.25], [50.0, 7.25], [50.0, 20.0], [10.5, 20.0]], "it's here", 0.5)"#;
        let fragment = parse_easy_ocr_line(line).unwrap();

        assert_eq!(fragment.text, "it's here");
        assert_eq!(fragment.bbox.top_left, Point { x: 10.5, y: 7.25 });
        assert_eq!(fragment.confidence, 0.5);
    }

    #[test]
    fn parse_output_skips_non_detection_lines() {
        let output = "Using CPU. Note: This module is much faster with a GPU.\n\
            ([[0, 0], [10, 0], [10, 10], [0, 10]], 'first', 0.9)\n\
            \n\
            ([[0, 30], [10, 30], [10, 40], [0, 40]], 'second', 0.8)\n";
        let fragments = parse_easy_ocr_output(output);

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "first");
        assert_eq!(fragments[1].text, "second");
    }

    #[test]
    fn parse_line_with_wrong_point_count_fails() {
        let line = "([[86, 80], [134, 80]], 'broken', 0.9)";
        assert!(parse_easy_ocr_line(line).is_err());
    }

    #[test]
    fn language_mapping() {
        assert_eq!(map_language("jpn"), "ja");
        assert_eq!(map_language("eng"), "en");
        assert_eq!(map_language("de"), "de");
    }

    #[test]
    #[ignore]
    fn test_easy_ocr() {
        let image = image::open("input/sample.png").expect("Failed to open image");
        let fragments = run_ocr_easy_ocr(&image, &["eng".to_string()]).unwrap();

        assert!(!fragments.is_empty());
    }
}
