//! Local/ops CLI entrypoint (spec §6): wires concrete outbound adapters to
//! [`Engine`] and dispatches the `health`/`search`/`discover-municipalities`
//! operations named in the external-interface contract.

use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ortho_config::OrthoConfig;
use url::Url;

use poi_engine::config::{Cli, Command, EngineConfig};
use poi_engine::domain::model::SearchRequest;
use poi_engine::domain::ports::ProviderClient;
use poi_engine::outbound::cache::FsCache;
use poi_engine::outbound::diving_page::HttpDivingPageFetcher;
use poi_engine::outbound::geocoder::NominatimGeocoder;
use poi_engine::outbound::overpass::OverpassHttpSource;
use poi_engine::outbound::sparql::SparqlHttpSource;
use poi_engine::outbound::web_search::CseWebSearchClient;
use poi_engine::outbound::wiki_encyclopedia::WikiEncyclopediaHttpSource;
use poi_engine::Engine;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();
    let config = match EngineConfig::load() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "failed to load engine configuration");
            return ExitCode::FAILURE;
        }
    };

    let engine = match build_engine(config) {
        Ok(engine) => engine,
        Err(error) => {
            tracing::error!(%error, "failed to build engine from configuration");
            return ExitCode::FAILURE;
        }
    };

    match run(&engine, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(code = ?error.code(), message = %error.message(), "command failed");
            ExitCode::FAILURE
        }
    }
}

fn build_engine(config: EngineConfig) -> Result<Engine, url::ParseError> {
    let overpass = Arc::new(OverpassHttpSource::new(Url::parse(&config.overpass_url)?));
    let wiki_encyclopedia =
        Arc::new(WikiEncyclopediaHttpSource::new(Url::parse(&config.wiki_encyclopedia_url)?));
    let wikibase = Arc::new(SparqlHttpSource::wikibase(Url::parse(&config.wikibase_sparql_url)?));
    let dbpedia = Arc::new(SparqlHttpSource::dbpedia(Url::parse(&config.dbpedia_sparql_url)?));

    let providers: Vec<Arc<dyn ProviderClient>> = vec![overpass, wiki_encyclopedia, wikibase, dbpedia];

    let geocoder = Arc::new(NominatimGeocoder::new(Url::parse(&config.geocoder_url)?));
    let diving_page_fetcher = Arc::new(HttpDivingPageFetcher::new());
    let web_search: Arc<dyn poi_engine::domain::ports::WebSearchClient> =
        Arc::new(CseWebSearchClient::new(
            Url::parse(&config.web_search_url)?,
            config.web_search_api_key.clone().unwrap_or_default(),
            config.web_search_engine_id.clone().unwrap_or_default(),
        ));
    let cache = Arc::new(FsCache::new(config.cache_dir.clone()));
    let throttle = Arc::new(poi_engine::logging::Throttle::new());

    Ok(Engine::new(
        providers,
        cache,
        throttle,
        config,
        web_search,
        diving_page_fetcher,
        geocoder,
        None,
        None,
    ))
}

async fn run(engine: &Engine, command: Command) -> Result<(), poi_engine::Error> {
    match command {
        Command::Health => {
            engine.health()?;
            println!("{{\"status\":\"ok\"}}");
            Ok(())
        }
        Command::Search { request } => {
            let request = read_request(&request)?;
            let result = engine.search(&request).await?;
            print_json(&result)
        }
        Command::DiscoverMunicipalities { request } => {
            let request = read_request(&request)?;
            let municipalities = engine.discover_municipalities(&request).await?;
            print_json(&municipalities)
        }
    }
}

fn read_request(path: &str) -> Result<SearchRequest, poi_engine::Error> {
    let body = fs::read_to_string(path)
        .map_err(|err| poi_engine::Error::invalid_request(format!("cannot read {path}: {err}")))?;
    serde_json::from_str(&body)
        .map_err(|err| poi_engine::Error::invalid_request(format!("invalid request JSON: {err}")))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), poi_engine::Error> {
    let rendered = serde_json::to_string_pretty(value).map_err(|err| {
        poi_engine::Error::internal(format!("failed to serialize response: {err}"))
    })?;
    println!("{rendered}");
    Ok(())
}
