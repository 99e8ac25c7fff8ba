//! Polygon and bounding-box geometry (spec C1).
//!
//! Grounded in `original_source/.../utils.py`'s `GeoBoundingBox` and
//! `point_in_polygon`/`is_in_zone`: a mid-latitude cosine approximation for
//! km-to-degree conversion, and an even-odd ray-cast for containment.
//! Deliberately not using a full geodesic/projection crate — the source
//! zones are small enough (single municipality to small region) that the
//! flat-earth approximation the original makes is adequate and keeps the
//! dependency list aligned with the teacher.

use crate::domain::model::Vertex;

/// Mean Earth radius in kilometers, used by the great-circle distance and
/// the km-to-degree bbox extension.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Axis-aligned lat/lng bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Computes the smallest bbox enclosing every vertex.
    ///
    /// # Panics
    /// Panics if `polygon` is empty; callers must validate non-empty
    /// polygons before reaching geometry code (spec §4.1 precondition).
    #[must_use]
    pub fn from_polygon(polygon: &[Vertex]) -> Self {
        assert!(!polygon.is_empty(), "polygon must have at least one vertex");
        let mut min_lat = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        let mut min_lng = f64::INFINITY;
        let mut max_lng = f64::NEG_INFINITY;
        for &[lat, lng] in polygon {
            min_lat = min_lat.min(lat);
            max_lat = max_lat.max(lat);
            min_lng = min_lng.min(lng);
            max_lng = max_lng.max(lng);
        }
        Self { min_lat, max_lat, min_lng, max_lng }
    }

    /// Midpoint of the bbox, used as a cheap centroid substitute for
    /// km-to-degree conversion.
    #[must_use]
    pub fn mid_lat(&self) -> f64 {
        (self.min_lat + self.max_lat) / 2.0
    }

    /// Extends the bbox's southern and western edges outward by `km`
    /// kilometers, for marine searches that need to look beyond the
    /// coastline (spec §4.1, `extend_toward_sea`: the sea lies south/west
    /// of the source zones this was grounded on, so only those two edges
    /// move; `max_lat`/`max_lng` are untouched). Longitude extension is
    /// scaled by the cosine of the bbox's mid-latitude so the extension is
    /// a roughly constant physical distance regardless of latitude.
    #[must_use]
    pub fn extend_toward_sea(&self, km: f64) -> Self {
        let lat_delta = km / 111.0;
        let lng_scale = self.mid_lat().to_radians().cos().max(0.01);
        let lng_delta = km / (111.0 * lng_scale);
        Self {
            min_lat: self.min_lat - lat_delta,
            max_lat: self.max_lat,
            min_lng: self.min_lng - lng_delta,
            max_lng: self.max_lng,
        }
    }

    #[must_use]
    pub fn contains_point(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

/// Even-odd ray-cast point-in-polygon test. `polygon` vertices are
/// `[lat, lng]`; the ray is cast along increasing longitude.
///
/// Points exactly on an edge are treated as outside, matching the
/// half-open interval test the original implementation performs.
#[must_use]
pub fn point_in_polygon(polygon: &[Vertex], lat: f64, lng: f64) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let n = polygon.len();
    let mut j = n - 1;
    for i in 0..n {
        let [lat_i, lng_i] = polygon[i];
        let [lat_j, lng_j] = polygon[j];
        let straddles = (lat_i > lat) != (lat_j > lat);
        if straddles {
            let lng_intersect = lng_i + (lat - lat_i) / (lat_j - lat_i) * (lng_j - lng_i);
            if lng < lng_intersect {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Arithmetic-mean centroid of the polygon's vertices (not the true
/// area centroid, matching the original's simplification for small zones).
///
/// # Panics
/// Panics if `polygon` is empty.
#[must_use]
pub fn centroid(polygon: &[Vertex]) -> (f64, f64) {
    assert!(!polygon.is_empty(), "polygon must have at least one vertex");
    let (sum_lat, sum_lng) = polygon
        .iter()
        .fold((0.0, 0.0), |(slat, slng), &[lat, lng]| (slat + lat, slng + lng));
    #[allow(clippy::cast_precision_loss)]
    let n = polygon.len() as f64;
    (sum_lat / n, sum_lng / n)
}

/// Great-circle distance between two points, in meters (haversine).
#[must_use]
pub fn geodesic_distance_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let (lat1_r, lat2_r) = (lat1.to_radians(), lat2.to_radians());
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();
    let a = (dlat / 2.0).sin().powi(2) + lat1_r.cos() * lat2_r.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_KM * c * 1000.0
}
