//! Behaviour tests for the search orchestrator's end-to-end scenarios.
//!
//! Fakes stand in for every outbound port so the pipeline runs fully
//! in-memory; a shared call counter on the fake providers and cache lets
//! the degenerate-polygon scenario assert that validation short-circuits
//! before any outbound work happens.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sha2::{Digest, Sha256};

use poi_engine::domain::geometry::{point_in_polygon, BoundingBox};
use poi_engine::domain::model::{
    Accessibility, AccessibilityLevel, Depth, DepthUnit, MarineSubkind, Poi, PoiKind, PoiSource,
    SearchMode, SearchRequest, SearchResult, SearchStatistics,
};
use poi_engine::domain::ports::{
    Cache, CacheEntry, CacheError, CacheKey, DivingPageFetcher, DivingPageFetcherError,
    ProviderClient, ProviderError, ReverseGeocodeResult, ReverseGeocoder, ReverseGeocoderError,
    WebSearchClient, WebSearchError, WebSearchHit,
};
use poi_engine::logging::Throttle;
use poi_engine::{Engine, EngineConfig, ErrorCode};

const COASTAL_POLYGON: [[f64; 2]; 4] =
    [[44.00, 9.80], [44.10, 9.80], [44.10, 9.95], [44.00, 9.95]];

fn default_request() -> SearchRequest {
    SearchRequest {
        zone_name: "Test Bay Zone".to_string(),
        polygon: COASTAL_POLYGON.to_vec(),
        extend_marine: false,
        marine_only: false,
        enable_enrichment: false,
        mode: SearchMode::Standard,
    }
}

fn land_poi(name: &str, lat: f64, lng: f64, source: PoiSource, description: &str) -> Poi {
    Poi {
        name: name.to_string(),
        lat,
        lng,
        kind: PoiKind::Land,
        marine_subkind: None,
        source,
        description: description.to_string(),
        depth: None,
        accessibility: Accessibility::default(),
        relevance_score: 1.0,
        external_ids: Default::default(),
        language_tag: None,
    }
}

fn marine_poi(name: &str, lat: f64, lng: f64, depth_m: f64, level: AccessibilityLevel) -> Poi {
    Poi {
        name: name.to_string(),
        lat,
        lng,
        kind: PoiKind::Marine,
        marine_subkind: Some(MarineSubkind::Wreck),
        source: PoiSource::WebSearch,
        description: "a wreck reported by a diving page".to_string(),
        depth: Some(Depth { value: depth_m, unit: DepthUnit::Meters }),
        accessibility: Accessibility { level, requirements: String::new() },
        relevance_score: 1.0,
        external_ids: Default::default(),
        language_tag: None,
    }
}

fn accessibility_for_depth(meters: f64) -> AccessibilityLevel {
    if meters < 18.0 {
        AccessibilityLevel::Easy
    } else if meters < 30.0 {
        AccessibilityLevel::Moderate
    } else if meters < 40.0 {
        AccessibilityLevel::Advanced
    } else {
        AccessibilityLevel::Expert
    }
}

/// Mirrors `compute_cache_key` in the orchestrator: a hash of the
/// canonical JSON of the full request, so a pre-seeded cache entry lands
/// under the exact key the engine will look up.
fn cache_key_for(request: &SearchRequest) -> CacheKey {
    let canonical = serde_json::to_vec(request).expect("request serializes");
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    let digest = hasher.finalize();
    let key =
        format!("{}:{}", request.zone_name.to_lowercase().replace(' ', "_"), hex::encode(digest));
    CacheKey::new(key).expect("well-formed cache key")
}

fn now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock").as_secs()
}

struct FakeProvider {
    id: &'static str,
    marine_capable: bool,
    land: Vec<Poi>,
    marine: Vec<Poi>,
    unreachable: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ProviderClient for FakeProvider {
    fn name(&self) -> &'static str {
        self.id
    }

    fn supports_marine(&self) -> bool {
        self.marine_capable
    }

    async fn fetch_land(&self, _bbox: BoundingBox, _language: &str) -> Result<Vec<Poi>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(ProviderError { message: "connection refused".to_string(), retryable: true });
        }
        Ok(self.land.clone())
    }

    async fn fetch_marine(&self, _bbox: BoundingBox, _language: &str) -> Result<Vec<Poi>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(ProviderError { message: "connection refused".to_string(), retryable: true });
        }
        Ok(self.marine.clone())
    }
}

struct FakeCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    writes: AtomicUsize,
}

impl FakeCache {
    fn new() -> Self {
        Self { entries: Mutex::new(HashMap::new()), writes: AtomicUsize::new(0) }
    }

    fn seed(&self, key: &CacheKey, entry: CacheEntry) {
        self.entries.lock().expect("lock").insert(key.as_ref().to_string(), entry);
    }
}

#[async_trait]
impl Cache for FakeCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.entries.lock().expect("lock").get(key.as_ref()).cloned())
    }

    async fn put(
        &self,
        key: &CacheKey,
        payload: Vec<u8>,
        content_fingerprint: String,
    ) -> Result<(), CacheError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().expect("lock").insert(
            key.as_ref().to_string(),
            CacheEntry { payload, stored_at_unix_secs: now_secs(), content_fingerprint },
        );
        Ok(())
    }

    async fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.entries.lock().expect("lock").remove(key.as_ref());
        Ok(())
    }
}

struct FakeGeocoder;

#[async_trait]
impl ReverseGeocoder for FakeGeocoder {
    async fn reverse_geocode(
        &self,
        _lat: f64,
        _lng: f64,
    ) -> Result<ReverseGeocodeResult, ReverseGeocoderError> {
        Ok(ReverseGeocodeResult {
            display_name: "Test Bay Zone".to_string(),
            land_indicator: None,
            country_code: None,
        })
    }

    async fn forward_geocode(&self, _query: &str) -> Result<Vec<(f64, f64)>, ReverseGeocoderError> {
        Ok(Vec::new())
    }
}

struct FakeWebSearch;

#[async_trait]
impl WebSearchClient for FakeWebSearch {
    async fn search(&self, _query: &str) -> Result<Vec<WebSearchHit>, WebSearchError> {
        Ok(Vec::new())
    }
}

struct FakeDivingPageFetcher;

#[async_trait]
impl DivingPageFetcher for FakeDivingPageFetcher {
    async fn fetch_text(&self, _url: &str) -> Result<String, DivingPageFetcherError> {
        Err(DivingPageFetcherError::not_found())
    }
}

fn test_config() -> EngineConfig {
    EngineConfig {
        enable_extended_enrichment: false,
        enable_llm_filter: false,
        enable_cse_dive_wreck: false,
        invalidate_cache: false,
        llm_model: None,
        llm_api_key: None,
        cache_dir: ".".to_string(),
        cache_ttl_secs: 86_400,
        overpass_url: "http://overpass.invalid".to_string(),
        wiki_encyclopedia_url: "http://wiki.invalid".to_string(),
        wikibase_sparql_url: "http://wikibase.invalid".to_string(),
        dbpedia_sparql_url: "http://dbpedia.invalid".to_string(),
        geocoder_url: "http://geocoder.invalid".to_string(),
        web_search_url: "http://web-search.invalid".to_string(),
        web_search_api_key: None,
        web_search_engine_id: None,
    }
}

struct PipelineWorld {
    request: RefCell<SearchRequest>,
    providers: RefCell<Vec<Arc<dyn ProviderClient>>>,
    calls: Arc<AtomicUsize>,
    cache: Arc<FakeCache>,
    outcome: RefCell<Option<Result<SearchResult, poi_engine::Error>>>,
}

impl PipelineWorld {
    fn new() -> Self {
        Self {
            request: RefCell::new(default_request()),
            providers: RefCell::new(Vec::new()),
            calls: Arc::new(AtomicUsize::new(0)),
            cache: Arc::new(FakeCache::new()),
            outcome: RefCell::new(None),
        }
    }

    fn add_provider(&self, provider: FakeProvider) {
        self.providers.borrow_mut().push(Arc::new(provider));
    }

    fn run(&self) {
        let engine = Engine::new(
            self.providers.borrow().clone(),
            self.cache.clone(),
            Arc::new(Throttle::new()),
            test_config(),
            Arc::new(FakeWebSearch),
            Arc::new(FakeDivingPageFetcher),
            Arc::new(FakeGeocoder),
            None,
            None,
        );
        let request = self.request.borrow().clone();
        let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
        let result = runtime.block_on(async { engine.search(&request).await });
        *self.outcome.borrow_mut() = Some(result);
    }

    fn ok_result(&self) -> SearchResult {
        self.outcome
            .borrow()
            .as_ref()
            .expect("search ran")
            .as_ref()
            .expect("search succeeded")
            .clone()
    }
}

#[fixture]
fn world() -> PipelineWorld {
    PipelineWorld::new()
}

#[given("a rectangular coastal polygon")]
fn a_rectangular_coastal_polygon(world: &PipelineWorld) {
    *world.request.borrow_mut() = default_request();
}

#[given("a degenerate polygon with two vertices")]
fn a_degenerate_polygon_with_two_vertices(world: &PipelineWorld) {
    let mut request = world.request.borrow_mut();
    request.polygon = vec![[0.0, 0.0], [0.0, 0.0]];
}

#[given("extend_marine is enabled")]
fn extend_marine_is_enabled(world: &PipelineWorld) {
    world.request.borrow_mut().extend_marine = true;
}

#[given("marine_only is enabled")]
fn marine_only_is_enabled(world: &PipelineWorld) {
    world.request.borrow_mut().marine_only = true;
}

#[given("every provider is unreachable")]
fn every_provider_is_unreachable(world: &PipelineWorld) {
    world.add_provider(FakeProvider {
        id: "unreachable-provider",
        marine_capable: false,
        land: Vec::new(),
        marine: Vec::new(),
        unreachable: true,
        calls: world.calls.clone(),
    });
}

#[given("a land provider returning Castello di Lerici inside the polygon")]
fn a_land_provider_returning_castello_di_lerici(world: &PipelineWorld) {
    world.add_provider(FakeProvider {
        id: "land-provider",
        marine_capable: false,
        land: vec![land_poi(
            "Castello di Lerici",
            44.05,
            9.85,
            PoiSource::Osm,
            "a medieval castle overlooking the bay",
        )],
        marine: Vec::new(),
        unreachable: false,
        calls: world.calls.clone(),
    });
}

#[given("a marine provider returning Relitto del Golfo at 25 meters depth")]
fn a_marine_provider_returning_relitto_del_golfo(world: &PipelineWorld) {
    world.add_provider(FakeProvider {
        id: "marine-provider-golfo",
        marine_capable: true,
        land: Vec::new(),
        marine: vec![marine_poi("Relitto del Golfo", 44.02, 9.82, 25.0, accessibility_for_depth(25.0))],
        unreachable: false,
        calls: world.calls.clone(),
    });
}

#[given("a marine provider returning Relitto Locale at 15 meters depth")]
fn a_marine_provider_returning_relitto_locale(world: &PipelineWorld) {
    world.add_provider(FakeProvider {
        id: "marine-provider-locale",
        marine_capable: true,
        land: Vec::new(),
        marine: vec![marine_poi("Relitto Locale", 44.05, 9.85, 15.0, accessibility_for_depth(15.0))],
        unreachable: false,
        calls: world.calls.clone(),
    });
}

#[given("the cache already contains a Moskva entry for the current request")]
fn the_cache_already_contains_a_moskva_entry(world: &PipelineWorld) {
    let request = world.request.borrow().clone();
    let key = cache_key_for(&request);
    let stale_result = SearchResult {
        zone_name: request.zone_name.clone(),
        country: None,
        municipalities: Vec::new(),
        pois: vec![marine_poi("Moskva", 44.5, 30.0, 40.0, AccessibilityLevel::Expert)],
        statistics: SearchStatistics::default(),
        marine_analysis: None,
    };
    let payload = serde_json::to_vec(&stale_result).expect("stale result serializes");
    world.cache.seed(
        &key,
        CacheEntry { payload, stored_at_unix_secs: now_secs(), content_fingerprint: "marine_only".to_string() },
    );
}

#[given("two providers return Castello di X as near-duplicate points of interest")]
fn two_providers_return_castello_di_x(world: &PipelineWorld) {
    world.add_provider(FakeProvider {
        id: "provider-wiki",
        marine_capable: false,
        land: vec![land_poi(
            "Castello di X",
            44.100,
            9.900,
            PoiSource::WikiEncyclopedia,
            "a well documented castle with a long history",
        )],
        marine: Vec::new(),
        unreachable: false,
        calls: world.calls.clone(),
    });
    world.add_provider(FakeProvider {
        id: "provider-osm",
        marine_capable: false,
        land: vec![land_poi("castello di x", 44.1001, 9.9001, PoiSource::Osm, "short")],
        marine: Vec::new(),
        unreachable: false,
        calls: world.calls.clone(),
    });
}

#[when("the search is run")]
fn the_search_is_run(world: &PipelineWorld) {
    world.run();
}

#[then("the result contains at least one land point of interest")]
fn the_result_contains_at_least_one_land_point_of_interest(world: &PipelineWorld) {
    assert!(world.ok_result().pois.iter().any(|p| p.kind == PoiKind::Land));
}

#[then("the result contains zero marine points of interest")]
fn the_result_contains_zero_marine_points_of_interest(world: &PipelineWorld) {
    assert!(world.ok_result().pois.iter().all(|p| p.kind != PoiKind::Marine));
}

#[then("every point of interest in the result lies inside the polygon")]
fn every_point_of_interest_lies_inside_the_polygon(world: &PipelineWorld) {
    let request = world.request.borrow().clone();
    for poi in &world.ok_result().pois {
        assert!(point_in_polygon(&request.polygon, poi.lat, poi.lng));
    }
}

#[then("marine_analysis is_coastal is false when present")]
fn marine_analysis_is_coastal_is_false_when_present(world: &PipelineWorld) {
    if let Some(analysis) = &world.ok_result().marine_analysis {
        assert!(!analysis.is_coastal);
    }
}

#[then("marine points of interest appear after all land points of interest")]
fn marine_points_of_interest_appear_after_land(world: &PipelineWorld) {
    let mut seen_marine = false;
    for poi in &world.ok_result().pois {
        if poi.kind == PoiKind::Marine {
            seen_marine = true;
        } else {
            assert!(!seen_marine, "a land point of interest followed a marine one");
        }
    }
    assert!(seen_marine, "expected at least one marine point of interest");
}

#[then("every marine point of interest has an accessibility level and a marine subkind")]
fn every_marine_poi_has_accessibility_and_subkind(world: &PipelineWorld) {
    let result = world.ok_result();
    let marine: Vec<_> = result.pois.iter().filter(|p| p.kind == PoiKind::Marine).collect();
    assert!(!marine.is_empty());
    for poi in marine {
        assert!(poi.marine_subkind.is_some());
        assert_ne!(poi.accessibility.level, AccessibilityLevel::Unknown);
    }
}

#[then("the depth analysis accounts for every marine point of interest with a depth")]
fn depth_analysis_accounts_for_every_marine_poi(world: &PipelineWorld) {
    let result = world.ok_result();
    let analysis = result.marine_analysis.expect("marine analysis present");
    let buckets = analysis.depth_analysis.shallow_0_10m
        + analysis.depth_analysis.moderate_10_20m
        + analysis.depth_analysis.deep_20_30m
        + analysis.depth_analysis.very_deep_30_40m
        + analysis.depth_analysis.technical_40m_plus;
    let with_depth =
        result.pois.iter().filter(|p| p.kind == PoiKind::Marine && p.depth.is_some()).count();
    assert_eq!(buckets as usize, with_depth);
}

#[then("the operation fails with invalid_request")]
fn the_operation_fails_with_invalid_request(world: &PipelineWorld) {
    let outcome = world.outcome.borrow();
    match outcome.as_ref().expect("search ran") {
        Ok(_) => panic!("expected the search to fail"),
        Err(err) => assert_eq!(err.code(), ErrorCode::InvalidRequest),
    }
}

#[then("no outbound provider call was made")]
fn no_outbound_provider_call_was_made(world: &PipelineWorld) {
    assert_eq!(world.calls.load(Ordering::SeqCst), 0);
}

#[then("no cache entry was written")]
fn no_cache_entry_was_written(world: &PipelineWorld) {
    assert_eq!(world.cache.writes.load(Ordering::SeqCst), 0);
}

#[then("the result is a well-formed empty search result")]
fn the_result_is_a_well_formed_empty_search_result(world: &PipelineWorld) {
    let result = world.ok_result();
    assert!(result.pois.is_empty());
    assert_eq!(result.statistics.total, 0);
    assert!(result.statistics.sources_used.is_empty());
}

#[then("the result excludes the Moskva point of interest")]
fn the_result_excludes_the_moskva_point_of_interest(world: &PipelineWorld) {
    assert!(!world
        .ok_result()
        .pois
        .iter()
        .any(|p| p.name.to_lowercase().contains("moskva")));
}

#[then("the result contains exactly one point of interest named Castello di X")]
fn the_result_contains_exactly_one_castello_di_x(world: &PipelineWorld) {
    let matches: Vec<_> = world
        .ok_result()
        .pois
        .iter()
        .filter(|p| p.name.eq_ignore_ascii_case("Castello di X"))
        .cloned()
        .collect();
    assert_eq!(matches.len(), 1);
}

#[then("its source is the higher-priority provider")]
fn its_source_is_the_higher_priority_provider(world: &PipelineWorld) {
    let result = world.ok_result();
    let poi = result
        .pois
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case("castello di x"))
        .expect("deduplicated point of interest present");
    assert_eq!(poi.source, PoiSource::WikiEncyclopedia);
}

#[scenario(path = "tests/features/search_pipeline.feature")]
fn search_pipeline_scenarios(world: PipelineWorld) {
    drop(world);
}
