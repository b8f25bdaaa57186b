use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, ScanService};
use eco_domain::score::{self, ProductFacts};
use eco_storage::{
	models::{DataSourceAttribution, EcoScore},
	queries,
};

impl ScanService {
	/// One scoring exchange: prompt, completion, typed extraction, clamped
	/// persistence with provenance. A parse failure writes nothing; callers
	/// decide whether to retry (the worker) or degrade to no score (the
	/// synchronous path).
	pub async fn generate_score(
		&self,
		product_id: Uuid,
		facts: &ProductFacts,
	) -> Result<EcoScore> {
		let messages = score_messages(facts);
		let content = self
			.providers
			.scoring
			.complete(&self.cfg.scoring.provider, &messages)
			.await
			.map_err(|err| Error::Provider { message: err.to_string() })?;
		let card = score::extract_score_card(&content)
			.map_err(|err| Error::ScoreParse { message: err.to_string() })?;

		let now = OffsetDateTime::now_utc();
		let eco_score = EcoScore {
			id: Uuid::new_v4(),
			product_id,
			overall: card.overall,
			carbon_emissions: card.carbon_emissions,
			recyclability: card.recyclability,
			ethical_sourcing: card.ethical_sourcing,
			energy_consumption: card.energy_consumption,
			last_updated: now,
		};

		let mut tx = self.db.pool.begin().await?;
		let stored = queries::upsert_eco_score_tx(&mut tx, &eco_score).await?;
		let attribution = DataSourceAttribution {
			id: Uuid::new_v4(),
			eco_score_id: stored.id,
			name: self.cfg.scoring.attribution.name.clone(),
			url: self.cfg.scoring.attribution.url.clone(),
			reliability_score: self.cfg.scoring.attribution.reliability_score,
		};

		queries::insert_attribution_tx(&mut tx, &attribution).await?;
		tx.commit().await?;

		tracing::info!(%product_id, overall = stored.overall, "Persisted eco score.");

		Ok(stored)
	}
}

pub(crate) fn score_messages(facts: &ProductFacts) -> Vec<Value> {
	vec![
		serde_json::json!({ "role": "system", "content": score::SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": score::build_prompt(facts) }),
	]
}
