//! Coordinate-window extraction (spec §4.6.3): finds a lat/lng pair in the
//! text window surrounding a candidate name mention, since diving-page
//! prose rarely places coordinates directly inside the sentence naming
//! the wreck.

use regex::Regex;
use std::sync::OnceLock;

/// How many characters on either side of a name mention to search for a
/// coordinate pair.
const WINDOW_CHARS: usize = 200;

fn coordinate_pair_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(-?\d{1,3}\.\d{3,8})\s*[,;/]\s*(-?\d{1,3}\.\d{3,8})")
            .expect("coordinate pair regex must compile")
    })
}

/// Searches the `WINDOW_CHARS`-character window around the first
/// occurrence of `name` in `text` for a `lat, lng` decimal-degree pair.
#[must_use]
pub fn extract_coordinate_window(text: &str, name: &str) -> Option<(f64, f64)> {
    let position = text.find(name)?;
    let start = position.saturating_sub(WINDOW_CHARS);
    let end = (position + name.len() + WINDOW_CHARS).min(text.len());
    let window = char_boundary_slice(text, start, end);

    let caps = coordinate_pair_regex().captures(window)?;
    let lat: f64 = caps[1].parse().ok()?;
    let lng: f64 = caps[2].parse().ok()?;
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
        Some((lat, lng))
    } else {
        None
    }
}

fn char_boundary_slice(text: &str, start: usize, end: usize) -> &str {
    let start = (start..=end).find(|&i| text.is_char_boundary(i)).unwrap_or(end);
    let end = (start..=text.len()).rev().find(|&i| text.is_char_boundary(i)).unwrap_or(start);
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_coordinates_near_name_mention() {
        let text = "Il relitto Mohawk Deer si trova a 44.0342, 9.8956 di fronte alla costa.";
        let result = extract_coordinate_window(text, "Mohawk Deer");
        assert_eq!(result, Some((44.0342, 9.8956)));
    }

    #[test]
    fn returns_none_when_name_absent() {
        assert_eq!(extract_coordinate_window("no mention here", "Mohawk Deer"), None);
    }

    #[test]
    fn returns_none_when_no_coordinates_in_window() {
        let text = "Il relitto Mohawk Deer non ha coordinate indicate in questo articolo lungo.";
        assert_eq!(extract_coordinate_window(text, "Mohawk Deer"), None);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let text = "Relitto X a 444.034, 9.895 qui.";
        assert_eq!(extract_coordinate_window(text, "X"), None);
    }
}
