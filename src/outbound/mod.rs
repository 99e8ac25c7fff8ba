//! Outbound adapters implementing domain ports against real infrastructure.
//!
//! Each submodule is a thin translator between one external provider's wire
//! format and the domain's [`Poi`](crate::domain::model::Poi)/port types,
//! sharing the transport policy in [`http`].

pub mod cache;
pub mod diving_page;
pub mod geocoder;
pub mod http;
pub mod overpass;
pub mod sparql;
pub mod web_search;
pub mod wiki_encyclopedia;
