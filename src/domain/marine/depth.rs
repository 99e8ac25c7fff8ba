//! Depth parsing from free text (spec §4.6.6).

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::model::{Depth, DepthUnit};

fn depth_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d{1,3}(?:[.,]\d+)?)\s*(m|meters?|metri|ft|feet|piedi)\b")
            .expect("depth regex must compile")
    })
}

/// Parses the first depth mention in `text`, preferring meters but
/// converting feet mentions to the canonical [`DepthUnit::Meters`]
/// representation is left to callers via [`Depth::meters`].
#[must_use]
pub fn parse_depth(text: &str) -> Option<Depth> {
    let caps = depth_regex().captures(text)?;
    let value: f64 = caps[1].replace(',', ".").parse().ok()?;
    let unit = match caps[2].to_lowercase().as_str() {
        "ft" | "feet" | "piedi" => DepthUnit::Feet,
        _ => DepthUnit::Meters,
    };
    Some(Depth { value, unit })
}
