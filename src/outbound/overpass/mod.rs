//! Overpass adapter (spec C2.1): OpenStreetMap land and marine tag queries.

mod dto;
mod http_source;

pub use http_source::OverpassHttpSource;
