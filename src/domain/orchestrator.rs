//! Search orchestrator (spec C7): the engine's public API and its state
//! machine, `Received -> CountryDetect -> CacheLookup -> Fanout -> Merge ->
//! Enrich? -> CacheStore -> Return`.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use tokio::sync::Semaphore;
use tokio::time::timeout;

use crate::config::EngineConfig;
use crate::domain::dedup::deduplicate;
use crate::domain::enrichment::{enrich_if_needed, DescriptionEnricher};
use crate::domain::error::Error;
use crate::domain::geometry::{centroid, point_in_polygon, BoundingBox};
use crate::domain::language::tag_for_country_code;
use crate::domain::marine;
use crate::domain::model::{
    AnalysisReport, Country, DepthAnalysis, MarineAnalysis, Municipality, Poi, PoiKind, PoiSource,
    SearchMode, SearchRequest, SearchResult, SearchStatistics,
};
use crate::domain::municipality::{discover_municipalities, DEFAULT_HAMLET_TO_MUNICIPALITY};
use crate::domain::ports::{
    Cache, CacheEntry, CacheKey, DivingPageFetcher, LlmExtractor, ProviderClient, ReverseGeocoder,
    WebSearchClient,
};
use crate::domain::validator::{is_known_irrelevant_wreck, is_valid_land_poi};
use crate::logging::Throttle;

/// Maximum concurrent provider fetches in flight at once (spec §5).
const MAX_CONCURRENT_FETCHES: usize = 3;

/// Overall deadline for a single search request before outstanding fetches
/// are cancelled (spec §5).
const REQUEST_DEADLINE: Duration = Duration::from_secs(30);

/// Marine bbox extension distance when `extend_marine` is set (spec §4.1).
const MARINE_EXTENSION_KM: f64 = 5.0;

/// Bundles the capabilities the orchestrator depends on. Constructed once
/// at startup and shared via `Arc` across requests, per SPEC_FULL §5.
pub struct Engine {
    providers: Vec<Arc<dyn ProviderClient>>,
    cache: Arc<dyn Cache>,
    throttle: Arc<Throttle>,
    config: EngineConfig,
    web_search: Arc<dyn WebSearchClient>,
    diving_page_fetcher: Arc<dyn DivingPageFetcher>,
    geocoder: Arc<dyn ReverseGeocoder>,
    llm_extractor: Option<Arc<dyn LlmExtractor>>,
    enricher: Option<Arc<dyn DescriptionEnricher>>,
}

impl Engine {
    #[must_use]
    pub fn new(
        providers: Vec<Arc<dyn ProviderClient>>,
        cache: Arc<dyn Cache>,
        throttle: Arc<Throttle>,
        config: EngineConfig,
        web_search: Arc<dyn WebSearchClient>,
        diving_page_fetcher: Arc<dyn DivingPageFetcher>,
        geocoder: Arc<dyn ReverseGeocoder>,
        llm_extractor: Option<Arc<dyn LlmExtractor>>,
        enricher: Option<Arc<dyn DescriptionEnricher>>,
    ) -> Self {
        Self {
            providers,
            cache,
            throttle,
            config,
            web_search,
            diving_page_fetcher,
            geocoder,
            llm_extractor,
            enricher,
        }
    }

    /// Liveness/readiness self-check: does not call any upstream provider,
    /// only confirms the engine was constructed with at least one provider
    /// and a usable cache handle (spec §6 `health`).
    ///
    /// # Errors
    /// Returns [`Error::internal`] if no providers are configured.
    pub fn health(&self) -> Result<(), Error> {
        if self.providers.is_empty() {
            return Err(Error::internal("no providers configured"));
        }
        Ok(())
    }

    /// Runs the full search pipeline for `request` (spec §6 `search`).
    ///
    /// # Errors
    /// Returns [`Error::invalid_request`] for a malformed request (empty
    /// zone name, degenerate polygon), or [`Error::internal`] if every
    /// provider failed. A subset of providers failing yields a successful
    /// result whose `statistics.sources_used` reflects only the providers
    /// that actually returned data.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult, Error> {
        validate_request(request)?;

        let country = detect_country(request, self.geocoder.as_ref()).await;
        let language = tag_for_country_code(country.as_ref().map(|c| c.code.as_str()));
        let cache_key = compute_cache_key(request)?;

        if !self.config.invalidate_cache {
            if let Some(result) = self.try_cache_lookup(&cache_key, request).await {
                return Ok(result);
            }
        } else {
            let _ = self.cache.invalidate(&cache_key).await;
        }

        let bbox = BoundingBox::from_polygon(&request.polygon);
        let fetch_bbox =
            if request.extend_marine { bbox.extend_toward_sea(MARINE_EXTENSION_KM) } else { bbox };

        let (land_pois, marine_pois, sources_used) =
            self.fan_out_providers(request, fetch_bbox, language).await;

        let is_coastal = request.extend_marine || request.marine_only;
        let municipalities = self
            .discover_municipalities_for(request, &land_pois, is_coastal)
            .await;
        let municipality_names: Vec<String> =
            municipalities.iter().map(|m| m.name.clone()).collect();

        let (extracted_marine, marine_route) = if request.extend_marine || request.marine_only {
            marine::run(
                &request.zone_name,
                &request.polygon,
                &municipality_names,
                self.web_search.as_ref(),
                self.diving_page_fetcher.as_ref(),
                self.geocoder.as_ref(),
                self.llm_extractor.as_deref(),
                matches!(request.mode, SearchMode::Enhanced) && self.config.enable_llm_filter,
            )
            .await
        } else {
            (Vec::new(), Vec::new())
        };

        let mut all_marine = marine_pois;
        all_marine.extend(extracted_marine);

        let mut pois = if request.marine_only {
            all_marine
        } else {
            let mut merged = land_pois;
            merged.extend(all_marine);
            merged
        };

        pois = deduplicate(pois);
        pois.retain(|p| p.kind != PoiKind::Land || is_valid_land_poi(p));
        sort_pois(&mut pois);

        if self.config.enable_extended_enrichment
            && !matches!(request.mode, SearchMode::Enhanced)
        {
            if let Some(enricher) = &self.enricher {
                for poi in &mut pois {
                    enrich_if_needed(poi, enricher.as_ref()).await;
                }
            }
        }

        let statistics = build_statistics(&pois, &sources_used);
        let marine_analysis = (request.extend_marine || request.marine_only || !marine_route.is_empty())
            .then(|| build_marine_analysis(&pois, marine_route, is_coastal));

        let result = SearchResult {
            zone_name: request.zone_name.clone(),
            country,
            municipalities,
            pois,
            statistics,
            marine_analysis,
        };

        self.store_in_cache(&cache_key, &result, request).await;
        Ok(result)
    }

    /// Discovers municipalities within a zone without running the full
    /// search pipeline (spec §6 `discover_municipalities`).
    ///
    /// # Errors
    /// Returns [`Error::invalid_request`] for a malformed request.
    pub async fn discover_municipalities(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<Municipality>, Error> {
        validate_request(request)?;
        let bbox = BoundingBox::from_polygon(&request.polygon);
        let country = detect_country(request, self.geocoder.as_ref()).await;
        let language = tag_for_country_code(country.as_ref().map(|c| c.code.as_str()));
        let (land_pois, _, _) = self.fan_out_providers(request, bbox, language).await;
        Ok(self.discover_municipalities_for(request, &land_pois, request.extend_marine).await)
    }

    /// Computes a quality report (`quality_score`, `source_distribution`,
    /// `description_quality`, `recommendations`) for an already-produced
    /// [`SearchResult`] (spec §6 `analyze`).
    ///
    /// # Errors
    /// Never returns an error; an empty `pois` list yields a zeroed report
    /// rather than `Err`, mirroring `analyze_poi_quality`'s `{quality_score:
    /// 0, recommendations: []}` short-circuit on empty input.
    pub fn analyze(&self, result: &SearchResult) -> Result<AnalysisReport, Error> {
        Ok(build_analysis_report(&result.pois))
    }

    /// Re-runs enrichment for a single POI on demand (spec §6 `enrich_poi`).
    ///
    /// # Errors
    /// Returns [`Error::unavailable_source`] if no enricher is configured.
    pub async fn enrich_poi(&self, poi: &mut Poi) -> Result<(), Error> {
        let enricher = self
            .enricher
            .as_ref()
            .ok_or_else(|| Error::unavailable_source("no description enricher configured"))?;
        enrich_if_needed(poi, enricher.as_ref()).await;
        Ok(())
    }

    async fn discover_municipalities_for(
        &self,
        request: &SearchRequest,
        land_pois: &[Poi],
        is_coastal: bool,
    ) -> Vec<Municipality> {
        discover_municipalities(
            &request.zone_name,
            &request.polygon,
            land_pois,
            is_coastal,
            self.geocoder.as_ref(),
            DEFAULT_HAMLET_TO_MUNICIPALITY,
        )
        .await
    }

    async fn fan_out_providers(
        &self,
        request: &SearchRequest,
        bbox: BoundingBox,
        language: &str,
    ) -> (Vec<Poi>, Vec<Poi>, Vec<&'static str>) {
        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_FETCHES));
        let mut land_handles = Vec::new();
        let mut marine_handles = Vec::new();

        for provider in &self.providers {
            let provider = Arc::clone(provider);
            let permit = Arc::clone(&semaphore);
            let throttle = Arc::clone(&self.throttle);
            let language = language.to_string();
            if !request.marine_only {
                let provider = Arc::clone(&provider);
                let permit = Arc::clone(&permit);
                let throttle = Arc::clone(&throttle);
                let language = language.clone();
                land_handles.push(tokio::spawn(async move {
                    let _permit = permit.acquire().await;
                    match timeout(REQUEST_DEADLINE, provider.fetch_land(bbox, &language)).await {
                        Ok(Ok(pois)) => Some((provider.name(), pois)),
                        Ok(Err(err)) => {
                            throttle.warn(provider.name(), &format!("land fetch failed: {err}"));
                            None
                        }
                        Err(_) => {
                            throttle.warn(provider.name(), "land fetch timed out");
                            None
                        }
                    }
                }));
            }
            if provider.supports_marine() {
                marine_handles.push(tokio::spawn(async move {
                    let _permit = permit.acquire().await;
                    match timeout(REQUEST_DEADLINE, provider.fetch_marine(bbox, &language)).await {
                        Ok(Ok(pois)) => Some((provider.name(), pois)),
                        Ok(Err(err)) => {
                            throttle.warn(provider.name(), &format!("marine fetch failed: {err}"));
                            None
                        }
                        Err(_) => {
                            throttle.warn(provider.name(), "marine fetch timed out");
                            None
                        }
                    }
                }));
            }
        }

        let mut land_pois = Vec::new();
        let mut marine_pois = Vec::new();
        let mut sources_used = Vec::new();

        for handle in land_handles {
            if let Ok(Some((name, pois))) = handle.await {
                sources_used.push(name);
                land_pois.extend(pois);
            }
        }
        for handle in marine_handles {
            if let Ok(Some((name, pois))) = handle.await {
                if !sources_used.contains(&name) {
                    sources_used.push(name);
                }
                marine_pois.extend(pois);
            }
        }

        (land_pois, marine_pois, sources_used)
    }

    async fn try_cache_lookup(
        &self,
        cache_key: &CacheKey,
        request: &SearchRequest,
    ) -> Option<SearchResult> {
        let entry = self.cache.get(cache_key).await.ok().flatten()?;
        if is_cache_entry_expired(&entry, self.config.cache_ttl_secs) {
            return None;
        }
        if request.marine_only && entry.content_fingerprint != marine_only_fingerprint() {
            return None;
        }
        let result: SearchResult = serde_json::from_slice(&entry.payload).ok()?;
        if request.marine_only && !passes_content_aware_invalidation(&result, request) {
            return None;
        }
        Some(result)
    }

    async fn store_in_cache(&self, cache_key: &CacheKey, result: &SearchResult, request: &SearchRequest) {
        let Ok(payload) = serde_json::to_vec(result) else { return };
        let fingerprint =
            if request.marine_only { marine_only_fingerprint() } else { "mixed".to_string() };
        if let Err(err) = self.cache.put(cache_key, payload, fingerprint).await {
            self.throttle.warn("cache", &format!("failed to store cache entry: {err}"));
        }
    }
}

fn marine_only_fingerprint() -> String {
    "marine_only".to_string()
}

/// Final result ordering (spec §8): all land POIs precede all marine
/// POIs; within each group, `relevance_score` is non-increasing. Stable,
/// so equal-score ties keep their fan-out/dedup arrival order.
fn sort_pois(pois: &mut [Poi]) {
    pois.sort_by(|a, b| {
        (a.kind != PoiKind::Land).cmp(&(b.kind != PoiKind::Land)).then_with(|| {
            b.relevance_score.partial_cmp(&a.relevance_score).unwrap_or(std::cmp::Ordering::Equal)
        })
    });
}

fn is_cache_entry_expired(entry: &CacheEntry, ttl_secs: u64) -> bool {
    let Ok(now) = SystemTime::now().duration_since(UNIX_EPOCH) else { return true };
    now.as_secs().saturating_sub(entry.stored_at_unix_secs) > ttl_secs
}

/// Content-aware invalidation for marine-only cache hits (spec §4.7):
/// discard the entry if it holds zero POIs, any item from a source
/// forbidden in marine-only mode (encyclopedia/wikibase/dbpedia; that mode
/// must only surface web-search-derived POIs), any known-collision wreck
/// name, or any POI whose coordinates now fall outside the requested
/// polygon. The schema-version guard in the filesystem cache adapter
/// handles wholesale format changes; this heuristic handles a
/// structurally valid entry whose *content* has gone stale.
fn passes_content_aware_invalidation(result: &SearchResult, request: &SearchRequest) -> bool {
    if result.pois.is_empty() {
        return false;
    }
    result.pois.iter().all(|poi| {
        matches!(poi.source, PoiSource::WebSearch)
            && !is_known_irrelevant_wreck(&poi.name, poi.lat, poi.lng)
            && point_in_polygon(&request.polygon, poi.lat, poi.lng)
    })
}

fn validate_request(request: &SearchRequest) -> Result<(), Error> {
    if request.zone_name.trim().is_empty() {
        return Err(Error::invalid_request("zone_name must not be empty"));
    }
    if request.polygon.len() < 3 {
        return Err(Error::invalid_request("polygon must have at least three vertices"));
    }
    Ok(())
}

async fn detect_country(request: &SearchRequest, geocoder: &dyn ReverseGeocoder) -> Option<Country> {
    let (lat, lng) = centroid(&request.polygon);
    let result = geocoder.reverse_geocode(lat, lng).await.ok()?;
    let code = result.country_code?;
    Some(Country { code, name: result.display_name })
}

/// Computes the cache key as a hash of the canonical JSON of the full
/// request (spec §4.7: "order-sensitive" — vertex order is part of the
/// key, matching `generate_cache_key`'s polygon-sensitive hashing in
/// `original_source/.../utils.py`).
fn compute_cache_key(request: &SearchRequest) -> Result<CacheKey, Error> {
    let canonical = serde_json::to_vec(request)
        .map_err(|err| Error::internal(format!("failed to serialize request: {err}")))?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    let digest = hasher.finalize();
    let key = format!("{}:{}", request.zone_name.to_lowercase().replace(' ', "_"), hex::encode(digest));
    CacheKey::new(key).map_err(|err| Error::internal(format!("invalid cache key: {err}")))
}

fn build_statistics(pois: &[Poi], sources_used: &[&'static str]) -> SearchStatistics {
    let land = pois.iter().filter(|p| p.kind == PoiKind::Land).count();
    let marine = pois.len() - land;
    let mut sources: Vec<_> = pois.iter().map(|p| p.source).collect();
    sources.sort();
    sources.dedup();
    let _ = sources_used;
    SearchStatistics { total: pois.len(), land, marine, sources_used: sources }
}

/// Quality report over a result's POIs, grounded in
/// `semantic_search.py`'s `analyze_poi_quality`: average relevance score,
/// a per-source count breakdown, a description-length histogram, and a
/// handful of threshold-triggered recommendations.
fn build_analysis_report(pois: &[Poi]) -> AnalysisReport {
    if pois.is_empty() {
        return AnalysisReport::default();
    }

    let mut source_distribution = std::collections::BTreeMap::new();
    let mut description_quality = crate::domain::model::DescriptionQuality::default();
    let mut total_score = 0.0;

    for poi in pois {
        total_score += poi.relevance_score;
        *source_distribution.entry(poi.source.as_str().to_string()).or_insert(0) += 1;
        match poi.description.len() {
            len if len > 100 => description_quality.detailed += 1,
            len if len > 20 => description_quality.basic += 1,
            _ => description_quality.poor += 1,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let count = pois.len() as f64;
    let quality_score = (total_score / count * 100.0).round() / 100.0;

    #[allow(clippy::cast_precision_loss)]
    let poor_count = description_quality.poor as f64;

    let mut recommendations = Vec::new();
    if quality_score < 2.0 {
        recommendations.push("Consider additional sources to improve quality".to_string());
    }
    if poor_count > count * 0.3 {
        recommendations.push("Enrich descriptions with tourist information".to_string());
    }
    if source_distribution.len() < 2 {
        recommendations.push("Diversify information sources".to_string());
    }

    AnalysisReport { quality_score, source_distribution, description_quality, recommendations }
}

fn build_marine_analysis(pois: &[Poi], route: Vec<String>, is_coastal: bool) -> MarineAnalysis {
    let mut depth_analysis = DepthAnalysis::default();
    for poi in pois.iter().filter(|p| p.kind == PoiKind::Marine) {
        if let Some(depth) = poi.depth {
            depth_analysis.record(depth.meters());
        }
    }
    MarineAnalysis { route, depth_analysis, is_coastal }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(zone: &str, polygon: Vec<[f64; 2]>, marine_only: bool, extend_marine: bool) -> SearchRequest {
        SearchRequest {
            zone_name: zone.to_string(),
            polygon,
            extend_marine,
            marine_only,
            enable_enrichment: false,
            mode: SearchMode::Standard,
        }
    }

    #[test]
    fn validate_request_rejects_empty_zone_name() {
        let req = request("", vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]], false, false);
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn validate_request_rejects_degenerate_polygon() {
        let req = request("zone", vec![[0.0, 0.0], [0.0, 1.0]], false, false);
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn validate_request_accepts_marine_only_without_extend_marine() {
        let req = request("zone", vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]], true, false);
        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn validate_request_accepts_well_formed_request() {
        let req = request("zone", vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]], false, false);
        assert!(validate_request(&req).is_ok());
    }

    #[tokio::test]
    async fn detect_country_uses_the_geocoders_country_code() {
        use crate::domain::ports::MockReverseGeocoder;

        let req = request("zone", vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]], false, false);
        let mut geocoder = MockReverseGeocoder::new();
        geocoder.expect_reverse_geocode().returning(|_, _| {
            Ok(crate::domain::ports::ReverseGeocodeResult {
                display_name: "La Spezia, Italy".to_string(),
                land_indicator: Some("La Spezia".to_string()),
                country_code: Some("it".to_string()),
            })
        });

        let country = detect_country(&req, &geocoder).await.expect("geocoder succeeded");
        assert_eq!(country.code, "it");
        assert_eq!(country.name, "La Spezia, Italy");
    }

    #[tokio::test]
    async fn detect_country_never_fabricates_a_code_when_missing() {
        use crate::domain::ports::MockReverseGeocoder;

        let req = request("zone", vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]], false, false);
        let mut geocoder = MockReverseGeocoder::new();
        geocoder.expect_reverse_geocode().returning(|_, _| {
            Ok(crate::domain::ports::ReverseGeocodeResult {
                display_name: "open sea".to_string(),
                land_indicator: None,
                country_code: None,
            })
        });

        assert!(detect_country(&req, &geocoder).await.is_none());
    }

    #[test]
    fn cache_key_is_order_sensitive() {
        let a = request("zone", vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]], false, false);
        let b = request("zone", vec![[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]], false, false);
        assert_ne!(compute_cache_key(&a).unwrap(), compute_cache_key(&b).unwrap());
    }

    #[test]
    fn cache_key_is_deterministic_for_identical_requests() {
        let a = request("zone", vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]], false, false);
        let b = request("zone", vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]], false, false);
        assert_eq!(compute_cache_key(&a).unwrap(), compute_cache_key(&b).unwrap());
    }

    fn web_search_poi(name: &str, lat: f64, lng: f64) -> Poi {
        Poi {
            name: name.to_string(),
            lat,
            lng,
            kind: PoiKind::Marine,
            marine_subkind: None,
            source: PoiSource::WebSearch,
            description: String::new(),
            depth: None,
            accessibility: Default::default(),
            relevance_score: 3.0,
            external_ids: Default::default(),
            language_tag: None,
        }
    }

    fn marine_result(pois: Vec<Poi>) -> SearchResult {
        SearchResult {
            zone_name: "zone".to_string(),
            country: None,
            municipalities: Vec::new(),
            pois,
            statistics: SearchStatistics::default(),
            marine_analysis: None,
        }
    }

    #[test]
    fn content_aware_invalidation_rejects_empty_result() {
        let req = request("zone", vec![[44.00, 9.80], [44.10, 9.80], [44.10, 9.95]], true, true);
        assert!(!passes_content_aware_invalidation(&marine_result(Vec::new()), &req));
    }

    #[test]
    fn content_aware_invalidation_rejects_known_irrelevant_wreck() {
        let req = request("zone", vec![[44.0, 28.0], [44.0, 35.0], [45.0, 30.0]], true, true);
        let result = marine_result(vec![web_search_poi("Moskva cruiser wreck", 44.5, 30.0)]);
        assert!(!passes_content_aware_invalidation(&result, &req));
    }

    #[test]
    fn content_aware_invalidation_rejects_forbidden_source_in_marine_only_mode() {
        let req = request("zone", vec![[44.00, 9.80], [44.10, 9.80], [44.10, 9.95]], true, true);
        let mut poi = web_search_poi("Relitto", 44.05, 9.85);
        poi.source = PoiSource::Osm;
        assert!(!passes_content_aware_invalidation(&marine_result(vec![poi]), &req));
    }

    #[test]
    fn content_aware_invalidation_rejects_poi_now_outside_the_polygon() {
        let req = request("zone", vec![[44.00, 9.80], [44.10, 9.80], [44.10, 9.95]], true, true);
        let result = marine_result(vec![web_search_poi("Relitto fuori zona", 50.0, 20.0)]);
        assert!(!passes_content_aware_invalidation(&result, &req));
    }

    #[test]
    fn content_aware_invalidation_accepts_clean_marine_only_result() {
        let req = request("zone", vec![[44.00, 9.80], [44.10, 9.80], [44.10, 9.95]], true, true);
        let result = marine_result(vec![web_search_poi("Relitto locale", 44.05, 9.85)]);
        assert!(passes_content_aware_invalidation(&result, &req));
    }

    #[test]
    fn sort_pois_places_all_land_before_marine_regardless_of_score() {
        let mut land = web_search_poi("Land", 44.0, 9.8);
        land.kind = PoiKind::Land;
        land.relevance_score = 1.0;
        let mut marine = web_search_poi("Marine", 44.0, 9.8);
        marine.kind = PoiKind::Marine;
        marine.relevance_score = 5.0;

        let mut pois = vec![marine, land];
        sort_pois(&mut pois);

        assert_eq!(pois[0].kind, PoiKind::Land);
        assert_eq!(pois[1].kind, PoiKind::Marine);
    }

    #[test]
    fn sort_pois_orders_by_descending_relevance_within_each_group() {
        let mut low = web_search_poi("Low", 44.0, 9.8);
        low.kind = PoiKind::Land;
        low.relevance_score = 1.0;
        let mut high = web_search_poi("High", 44.0, 9.8);
        high.kind = PoiKind::Land;
        high.relevance_score = 4.0;

        let mut pois = vec![low, high];
        sort_pois(&mut pois);

        assert_eq!(pois[0].name, "High");
        assert_eq!(pois[1].name, "Low");
    }

    #[test]
    fn analysis_report_of_empty_result_is_zeroed() {
        let report = build_analysis_report(&[]);
        assert_eq!(report, AnalysisReport::default());
    }

    #[test]
    fn analysis_report_tallies_sources_and_description_quality() {
        let mut poor = web_search_poi("A", 44.0, 9.8);
        poor.relevance_score = 1.0;
        let mut detailed = web_search_poi("B", 44.0, 9.8);
        detailed.source = PoiSource::Osm;
        detailed.relevance_score = 4.0;
        detailed.description = "x".repeat(150);

        let report = build_analysis_report(&[poor, detailed]);
        assert!((report.quality_score - 2.5).abs() < f64::EPSILON);
        assert_eq!(report.source_distribution.get("web_search"), Some(&1));
        assert_eq!(report.source_distribution.get("osm"), Some(&1));
        assert_eq!(report.description_quality.poor, 1);
        assert_eq!(report.description_quality.detailed, 1);
    }

    #[test]
    fn analysis_report_flags_low_quality_and_single_source() {
        let mut poi = web_search_poi("A", 44.0, 9.8);
        poi.relevance_score = 1.0;
        let report = build_analysis_report(&[poi]);
        assert!(report.recommendations.iter().any(|r| r.contains("additional sources")));
        assert!(report.recommendations.iter().any(|r| r.contains("Diversify")));
    }
}
