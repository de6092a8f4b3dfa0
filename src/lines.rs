use serde::{Deserialize, Serialize};

use crate::ocr::Fragment;

/// Maximum vertical pixel distance between a fragment and the open line's
/// anchor for the fragment to still count as part of that line.
pub const DEFAULT_LINE_THRESHOLD: f32 = 10.0;

/// One visual text row, merged from one or more fragments.
///
/// `anchor_y` is the top-left y of the line's first fragment and never moves
/// as further fragments merge in. `confidence` is the character-count-weighted
/// average over all merged fragments.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Line {
    pub anchor_y: f32,
    pub text: String,
    pub confidence: f32,
}

/// Groups fragments into lines in a single pass over the input order.
///
/// A fragment either merges into the most recently opened line (its top-left y
/// lies strictly within `threshold` of that line's anchor) or opens a new one.
/// Output order is the order in which lines were opened, never re-sorted by y.
/// `clean` runs on every fragment text and again on every merged line, so
/// artifacts spanning a fragment boundary get normalized as one string.
pub fn aggregate_lines<I, F>(fragments: I, clean: F, threshold: f32) -> Vec<Line>
where
    I: IntoIterator<Item = Fragment>,
    F: Fn(&str) -> String,
{
    let mut lines: Vec<Line> = vec![];

    for fragment in fragments {
        let y = fragment.bbox.top_left.y;
        let text = clean(&fragment.text);

        match lines.last_mut() {
            Some(current) if (y - current.anchor_y).abs() < threshold => {
                merge_fragment(current, &text, fragment.confidence, &clean);
            }
            _ => lines.push(Line {
                anchor_y: y,
                text,
                confidence: fragment.confidence,
            }),
        }
    }

    lines
}

fn merge_fragment(line: &mut Line, text: &str, confidence: f32, clean: &impl Fn(&str) -> String) {
    //Weights are the character counts before this merge
    let n1 = line.text.chars().count() as f32;
    let n2 = text.chars().count() as f32;

    line.confidence = if n1 + n2 > 0.0 {
        (line.confidence * n1 + confidence * n2) / (n1 + n2)
    } else {
        confidence
    };

    line.text = clean(&format!("{} {}", line.text, text));
}
