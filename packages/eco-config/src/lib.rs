mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Attribution, Config, Postgres, Scoring, ScoringProviderConfig, Service, SourceConfig, Sources,
	Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	for (label, source) in [
		("open_food_facts", &cfg.sources.open_food_facts),
		("open_beauty_facts", &cfg.sources.open_beauty_facts),
		("product_data", &cfg.sources.product_data),
	] {
		if source.api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("sources.{label}.api_base must be non-empty."),
			});
		}
		if source.timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("sources.{label}.timeout_ms must be greater than zero."),
			});
		}
	}

	if !cfg.sources.open_food_facts.enabled
		&& !cfg.sources.open_beauty_facts.enabled
		&& !cfg.sources.product_data.enabled
	{
		return Err(Error::Validation {
			message: "At least one source must be enabled.".to_string(),
		});
	}

	if !matches!(cfg.scoring.mode.as_str(), "async" | "sync") {
		return Err(Error::Validation {
			message: "scoring.mode must be one of async or sync.".to_string(),
		});
	}
	if cfg.scoring.sync_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "scoring.sync_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.scoring.provider.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "scoring.provider.api_key must be non-empty.".to_string(),
		});
	}
	if cfg.scoring.provider.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "scoring.provider.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !cfg.scoring.provider.temperature.is_finite() || cfg.scoring.provider.temperature < 0.0 {
		return Err(Error::Validation {
			message: "scoring.provider.temperature must be zero or greater.".to_string(),
		});
	}
	if cfg.scoring.attribution.name.trim().is_empty() {
		return Err(Error::Validation {
			message: "scoring.attribution.name must be non-empty.".to_string(),
		});
	}
	if !(0..=100).contains(&cfg.scoring.attribution.reliability_score) {
		return Err(Error::Validation {
			message: "scoring.attribution.reliability_score must be in the range 0-100."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for source in [
		&mut cfg.sources.open_food_facts,
		&mut cfg.sources.open_beauty_facts,
		&mut cfg.sources.product_data,
	] {
		if source.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
			source.api_key = None;
		}

		source.api_base = source.api_base.trim_end_matches('/').to_string();
	}

	cfg.scoring.provider.api_base = cfg.scoring.provider.api_base.trim_end_matches('/').to_string();
}
