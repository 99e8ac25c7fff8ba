//! DTOs for the Nominatim `jsonv2` reverse/search responses.

use serde::Deserialize;

use crate::domain::ports::ReverseGeocodeResult;

#[derive(Debug, Deserialize)]
pub(super) struct ReverseGeocodeResponseDto {
    #[serde(default)]
    pub(super) display_name: String,
    #[serde(default)]
    pub(super) address: Option<AddressDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AddressDto {
    #[serde(default)]
    pub(super) city: Option<String>,
    #[serde(default)]
    pub(super) town: Option<String>,
    #[serde(default)]
    pub(super) village: Option<String>,
    #[serde(default)]
    pub(super) hamlet: Option<String>,
    #[serde(default)]
    pub(super) country: Option<String>,
    /// ISO 3166-1 alpha-2 country code (spec §4.7 language selection).
    #[serde(default)]
    pub(super) country_code: Option<String>,
    /// Present when Nominatim classifies the point as sea/ocean/water, the
    /// primary land-vs-water signal used by the marine water-check (spec
    /// §4.6.5).
    #[serde(default)]
    pub(super) ocean: Option<String>,
    #[serde(default)]
    pub(super) sea: Option<String>,
    #[serde(default)]
    pub(super) water: Option<String>,
}

impl ReverseGeocodeResponseDto {
    pub(super) fn into_result(self) -> ReverseGeocodeResult {
        let land_indicator = self.address.as_ref().and_then(|address| {
            address
                .city
                .clone()
                .or_else(|| address.town.clone())
                .or_else(|| address.village.clone())
                .or_else(|| address.hamlet.clone())
                .or_else(|| address.country.clone())
                .filter(|_| address.ocean.is_none() && address.sea.is_none() && address.water.is_none())
        });
        let country_code = self.address.as_ref().and_then(|address| address.country_code.clone());
        ReverseGeocodeResult { display_name: self.display_name, land_indicator, country_code }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchResultDto {
    pub(super) lat: String,
    pub(super) lon: String,
}

impl SearchResultDto {
    pub(super) fn coordinates(&self) -> Option<(f64, f64)> {
        let lat: f64 = self.lat.parse().ok()?;
        let lon: f64 = self.lon.parse().ok()?;
        if lat.is_finite() && lon.is_finite() {
            Some((lat, lon))
        } else {
            None
        }
    }
}
