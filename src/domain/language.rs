//! Country-to-language mapping for wiki/SPARQL query localization (spec
//! §4.7: "Country drives language selection for wiki queries").
//!
//! Grounded in `original_source/.../semantic_search.py`'s `lang_map`: a
//! fixed ISO-3166-1-alpha-2 to IETF language tag table covering the
//! Mediterranean and neighbouring countries the original targets, with
//! `"en"` as the fallback for anything outside it.

/// Default language tag used when no country was detected, or the detected
/// country has no entry in [`tag_for_country_code`].
pub const DEFAULT_LANGUAGE: &str = "en";

/// Maps an ISO 3166-1 alpha-2 country code to an IETF language tag.
/// Lookup is case-insensitive. Falls back to [`DEFAULT_LANGUAGE`] for
/// unmapped or missing codes.
#[must_use]
pub fn tag_for_country_code(code: Option<&str>) -> &'static str {
    let Some(code) = code else { return DEFAULT_LANGUAGE };
    let upper = code.to_uppercase();
    match upper.as_str() {
        "IT" | "CH" => "it",
        "FR" => "fr",
        "ES" => "es",
        "GR" | "CY" => "el",
        "HR" => "hr",
        "DE" | "AT" => "de",
        "SI" => "sl",
        "GB" | "US" => "en",
        "PT" => "pt",
        "NL" | "BE" => "nl",
        "DK" => "da",
        "SE" => "sv",
        "NO" => "no",
        "FI" => "fi",
        "PL" => "pl",
        "CZ" => "cs",
        "SK" => "sk",
        "HU" => "hu",
        "RO" => "ro",
        "BG" => "bg",
        "TR" => "tr",
        "RU" => "ru",
        "UA" => "uk",
        "IL" => "he",
        "EG" | "TN" | "MA" | "DZ" | "LY" => "ar",
        _ => DEFAULT_LANGUAGE,
    }
}
