pub mod company;
pub mod resolve;
pub mod score;
pub mod time_serde;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

pub use error::{Error, Result};
pub use resolve::{
	AttributionView, CompanyView, EcoScoreView, ProductView, ResolveRequest, ResolveResponse,
	ScoringMode,
};

use eco_config::{Config, ScoringProviderConfig};
use eco_domain::normalized::NormalizedProduct;
use eco_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One external product data source. The default set mirrors the clients in
/// eco-providers; tests swap in stubs and spies.
pub trait SourceClient
where
	Self: Send + Sync,
{
	fn source(&self) -> &'static str;

	fn enabled(&self, _cfg: &Config) -> bool {
		true
	}

	fn fetch<'a>(
		&'a self,
		cfg: &'a Config,
		barcode: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Option<NormalizedProduct>>>;
}

/// The AI inference gateway used by the score generator.
pub trait ScoringClient
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a ScoringProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub sources: Vec<Arc<dyn SourceClient>>,
	pub scoring: Arc<dyn ScoringClient>,
}

pub struct ScanService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
}

struct OpenFoodFactsClient;
struct OpenBeautyFactsClient;
struct ProductDataClient;
struct DefaultScoringClient;

impl SourceClient for OpenFoodFactsClient {
	fn source(&self) -> &'static str {
		eco_providers::open_food_facts::SOURCE
	}

	fn enabled(&self, cfg: &Config) -> bool {
		cfg.sources.open_food_facts.enabled
	}

	fn fetch<'a>(
		&'a self,
		cfg: &'a Config,
		barcode: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Option<NormalizedProduct>>> {
		Box::pin(eco_providers::open_food_facts::fetch(&cfg.sources.open_food_facts, barcode))
	}
}

impl SourceClient for OpenBeautyFactsClient {
	fn source(&self) -> &'static str {
		eco_providers::open_beauty_facts::SOURCE
	}

	fn enabled(&self, cfg: &Config) -> bool {
		cfg.sources.open_beauty_facts.enabled
	}

	fn fetch<'a>(
		&'a self,
		cfg: &'a Config,
		barcode: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Option<NormalizedProduct>>> {
		Box::pin(eco_providers::open_beauty_facts::fetch(&cfg.sources.open_beauty_facts, barcode))
	}
}

impl SourceClient for ProductDataClient {
	fn source(&self) -> &'static str {
		eco_providers::product_data::SOURCE
	}

	fn enabled(&self, cfg: &Config) -> bool {
		cfg.sources.product_data.enabled
	}

	fn fetch<'a>(
		&'a self,
		cfg: &'a Config,
		barcode: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Option<NormalizedProduct>>> {
		Box::pin(eco_providers::product_data::fetch(&cfg.sources.product_data, barcode))
	}
}

impl ScoringClient for DefaultScoringClient {
	fn complete<'a>(
		&'a self,
		cfg: &'a ScoringProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(eco_providers::scoring::complete(cfg, messages))
	}
}

impl Providers {
	pub fn new(sources: Vec<Arc<dyn SourceClient>>, scoring: Arc<dyn ScoringClient>) -> Self {
		Self { sources, scoring }
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self {
			sources: vec![
				Arc::new(OpenFoodFactsClient),
				Arc::new(OpenBeautyFactsClient),
				Arc::new(ProductDataClient),
			],
			scoring: Arc::new(DefaultScoringClient),
		}
	}
}

impl ScanService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		Self { cfg, db, providers }
	}
}
