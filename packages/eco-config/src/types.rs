use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub sources: Sources,
	pub scoring: Scoring,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Sources {
	pub open_food_facts: SourceConfig,
	pub open_beauty_facts: SourceConfig,
	pub product_data: SourceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
	#[serde(default = "default_enabled")]
	pub enabled: bool,
	pub api_base: String,
	#[serde(default)]
	pub api_key: Option<String>,
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Scoring {
	/// Default trigger mode for the pipeline, either "async" or "sync".
	#[serde(default = "default_scoring_mode")]
	pub mode: String,
	pub sync_timeout_ms: u64,
	pub provider: ScoringProviderConfig,
	pub attribution: Attribution,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScoringProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Provenance recorded next to every AI-derived score.
#[derive(Debug, Deserialize, Clone)]
pub struct Attribution {
	pub name: String,
	pub url: Option<String>,
	#[serde(default = "default_reliability_score")]
	pub reliability_score: i32,
}

fn default_enabled() -> bool {
	true
}

fn default_scoring_mode() -> String {
	"async".to_string()
}

fn default_reliability_score() -> i32 {
	85
}
