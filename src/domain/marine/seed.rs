//! Web-search query seeding and domain allow/block-listing for the marine
//! sub-pipeline (spec §4.6.1), grounded in `original_source/.../web_search.py`.

/// Trusted top-level domains, checked before the keyword allow-list.
const TRUSTED_TLDS: &[&str] = &["it", "com", "org", "net", "info"];

/// Keywords whose presence in a hostname marks the domain as a plausible
/// diving-center or dive-site resource.
const TRUSTED_DOMAIN_KEYWORDS: &[&str] = &[
    "diving", "dive", "sub", "scuba", "immersion", "plongee", "plongée",
];

/// Keywords that exclude a domain even if it otherwise looks trusted
/// (government/institutional sites rarely host the granular wreck detail
/// the pipeline needs, and are better served by the Overpass/wiki paths).
const EXCLUDED_DOMAIN_KEYWORDS: &[&str] =
    &["wikipedia.org", "gov.", ".gov", "government", "ministero"];

/// Multilingual diving-center query templates, one per language, each
/// taking the municipality name.
const QUERY_TEMPLATES: &[&str] = &[
    "diving center {municipality}",
    "centro immersioni {municipality}",
    "dive site {municipality}",
    "relitti {municipality}",
    "plongée {municipality}",
];

/// Builds the set of web-search queries to seed diving-center discovery
/// for `municipality`.
#[must_use]
pub fn build_semantic_queries(municipality: &str) -> Vec<String> {
    QUERY_TEMPLATES.iter().map(|tpl| tpl.replace("{municipality}", municipality)).collect()
}

/// Returns `true` if `url`'s host passes the domain allow-list: not
/// excluded, and either on a trusted TLD with a diving-related keyword in
/// the host, or directly matching a trusted keyword.
#[must_use]
pub fn is_domain_allowed(url: &str) -> bool {
    let Ok(parsed) = url::Url::parse(url) else { return false };
    let Some(host) = parsed.host_str() else { return false };
    let host_lower = host.to_lowercase();

    if EXCLUDED_DOMAIN_KEYWORDS.iter().any(|kw| host_lower.contains(kw)) {
        return false;
    }

    let has_trusted_tld = TRUSTED_TLDS.iter().any(|tld| host_lower.ends_with(&format!(".{tld}")));
    let has_domain_keyword = TRUSTED_DOMAIN_KEYWORDS.iter().any(|kw| host_lower.contains(kw));

    has_trusted_tld && has_domain_keyword
}
