use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, ScanService, company};
use eco_domain::{barcode, merge, normalized::NormalizedProduct, score::ProductFacts};
use eco_storage::{
	models::{Company, DataSourceAttribution, EcoScore, Product},
	outbox, queries,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
	/// Scoring is queued and the response returns without a score.
	Async,
	/// The response waits for scoring, bounded by the configured timeout.
	Sync,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolveRequest {
	pub barcode: String,
	#[serde(default)]
	pub mode: Option<ScoringMode>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProductView {
	pub id: Uuid,
	pub barcode: String,
	pub name: String,
	pub brand: Option<String>,
	pub category: Option<String>,
	pub image_url: Option<String>,
	pub description: Option<String>,
	pub company_id: Option<Uuid>,
	pub certifications: Vec<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, Serialize)]
pub struct CompanyView {
	pub id: Uuid,
	pub name: String,
	pub sustainability_rating: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct AttributionView {
	pub name: String,
	pub url: Option<String>,
	pub reliability_score: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct EcoScoreView {
	pub id: Uuid,
	pub overall: i32,
	pub carbon_emissions: i32,
	pub recyclability: i32,
	pub ethical_sourcing: i32,
	pub energy_consumption: i32,
	#[serde(with = "crate::time_serde")]
	pub last_updated: OffsetDateTime,
	pub attributions: Vec<AttributionView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResolveResponse {
	pub product: ProductView,
	pub company: Option<CompanyView>,
	/// Legitimately absent while scoring has not completed.
	pub eco_score: Option<EcoScoreView>,
	pub cached: bool,
	pub sources_consulted: u32,
	pub confidence_score: Option<f32>,
}

impl From<Product> for ProductView {
	fn from(product: Product) -> Self {
		Self {
			id: product.id,
			barcode: product.barcode,
			name: product.name,
			brand: product.brand,
			category: product.category,
			image_url: product.image_url,
			description: product.description,
			company_id: product.company_id,
			certifications: product.certifications,
			created_at: product.created_at,
			updated_at: product.updated_at,
		}
	}
}

impl From<Company> for CompanyView {
	fn from(company: Company) -> Self {
		Self {
			id: company.id,
			name: company.name,
			sustainability_rating: company.sustainability_rating,
		}
	}
}

impl From<DataSourceAttribution> for AttributionView {
	fn from(attribution: DataSourceAttribution) -> Self {
		Self {
			name: attribution.name,
			url: attribution.url,
			reliability_score: attribution.reliability_score,
		}
	}
}

impl ScanService {
	/// The scan pipeline: cache check, provider fan-out, merge, company
	/// resolution, persist, scoring trigger.
	pub async fn resolve(&self, req: ResolveRequest) -> Result<ResolveResponse> {
		let barcode = req.barcode.as_str();

		if !barcode::is_valid(barcode) {
			return Err(Error::Validation {
				message: "Barcode must be 6-14 alphanumeric characters.".to_string(),
			});
		}

		if let Some(product) = queries::find_product_by_barcode(&self.db, barcode).await? {
			tracing::info!(%barcode, "Cache hit. Returning stored product.");

			return self.assemble_response(product, true, 0, None).await;
		}

		let fragments = self.fan_out(barcode).await;
		let sources_consulted = fragments.len() as u32;

		if fragments.is_empty() {
			return Err(Error::NotFound {
				message: format!("Product {barcode} was not found in any source."),
			});
		}

		tracing::info!(%barcode, sources = sources_consulted, "Merging source fragments.");

		let merged = merge::merge_fragments(fragments);

		if merged.name.is_empty() {
			return Err(Error::NotFound {
				message: format!("No source supplied a usable name for {barcode}."),
			});
		}

		let confidence = merged.confidence_score;
		let now = OffsetDateTime::now_utc();
		let resolved_company = company::resolve_company(&self.db, &merged.brand, now).await?;
		let mode = req.mode.unwrap_or_else(|| self.default_mode());
		let facts = product_facts(&merged);
		let product = build_product(barcode, merged, resolved_company.as_ref(), now);

		let mut tx = self.db.pool.begin().await?;

		match queries::insert_product_tx(&mut tx, &product).await {
			Ok(()) => {
				if mode == ScoringMode::Async {
					let facts_json = serde_json::to_value(&facts)
						.map_err(|err| Error::Storage { message: err.to_string() })?;

					outbox::enqueue_scoring_tx(&mut tx, Uuid::new_v4(), product.id, &facts_json, now)
						.await?;
				}

				tx.commit().await?;
			},
			Err(err) if err.is_conflict() => {
				tx.rollback().await?;
				tracing::info!(%barcode, "Lost product insert race. Re-reading winner row.");

				let winner = queries::find_product_by_barcode(&self.db, barcode)
					.await?
					.ok_or_else(|| Error::Storage {
						message: format!(
							"Product {barcode} conflicted on insert but cannot be read."
						),
					})?;

				return self
					.assemble_response(winner, true, sources_consulted, Some(confidence))
					.await;
			},
			Err(err) => return Err(err.into()),
		}

		let eco_score = match mode {
			ScoringMode::Async => None,
			ScoringMode::Sync => self.score_synchronously(product.id, &facts).await,
		};

		Ok(ResolveResponse {
			product: product.into(),
			company: resolved_company.map(CompanyView::from),
			eco_score,
			cached: false,
			sources_consulted,
			confidence_score: Some(confidence),
		})
	}

	/// Read-only lookup used by score polling. Never calls a provider.
	pub async fn lookup(&self, barcode: &str) -> Result<ResolveResponse> {
		if !barcode::is_valid(barcode) {
			return Err(Error::Validation {
				message: "Barcode must be 6-14 alphanumeric characters.".to_string(),
			});
		}

		let product = queries::find_product_by_barcode(&self.db, barcode).await?.ok_or_else(
			|| Error::NotFound { message: format!("Product {barcode} has not been resolved.") },
		)?;

		self.assemble_response(product, true, 0, None).await
	}

	/// Concurrent fetch over every enabled source. Waits for all of them:
	/// a slow high-confidence source must not lose to a fast low-confidence
	/// one. Individual failures are logged and collapse to absent.
	async fn fan_out(&self, barcode: &str) -> Vec<NormalizedProduct> {
		let fetches = self.providers.sources.iter().map(|client| {
			let client = Arc::clone(client);

			async move {
				if !client.enabled(&self.cfg) {
					return None;
				}

				match client.fetch(&self.cfg, barcode).await {
					Ok(fragment) => fragment,
					Err(err) => {
						tracing::warn!(source = client.source(), error = %err, "Source fetch failed.");

						None
					},
				}
			}
		});

		join_all(fetches).await.into_iter().flatten().collect()
	}

	async fn assemble_response(
		&self,
		product: Product,
		cached: bool,
		sources_consulted: u32,
		confidence_score: Option<f32>,
	) -> Result<ResolveResponse> {
		let resolved_company = match product.company_id {
			Some(company_id) => queries::find_company(&self.db, company_id).await?,
			None => None,
		};
		let eco_score = match queries::find_eco_score(&self.db, product.id).await? {
			Some(score) => Some(self.score_view(score).await?),
			None => None,
		};

		Ok(ResolveResponse {
			product: product.into(),
			company: resolved_company.map(CompanyView::from),
			eco_score,
			cached,
			sources_consulted,
			confidence_score,
		})
	}

	async fn score_synchronously(
		&self,
		product_id: Uuid,
		facts: &ProductFacts,
	) -> Option<EcoScoreView> {
		let timeout = std::time::Duration::from_millis(self.cfg.scoring.sync_timeout_ms);

		match tokio::time::timeout(timeout, self.generate_score(product_id, facts)).await {
			Ok(Ok(score)) => self.score_view(score).await.ok(),
			Ok(Err(err)) => {
				tracing::warn!(%product_id, error = %err, "Synchronous scoring failed.");

				None
			},
			Err(_) => {
				tracing::warn!(%product_id, "Synchronous scoring timed out.");

				None
			},
		}
	}

	pub(crate) async fn score_view(&self, score: EcoScore) -> Result<EcoScoreView> {
		let attributions = queries::find_attributions(&self.db, score.id).await?;

		Ok(EcoScoreView {
			id: score.id,
			overall: score.overall,
			carbon_emissions: score.carbon_emissions,
			recyclability: score.recyclability,
			ethical_sourcing: score.ethical_sourcing,
			energy_consumption: score.energy_consumption,
			last_updated: score.last_updated,
			attributions: attributions.into_iter().map(AttributionView::from).collect(),
		})
	}

	fn default_mode(&self) -> ScoringMode {
		match self.cfg.scoring.mode.as_str() {
			"sync" => ScoringMode::Sync,
			_ => ScoringMode::Async,
		}
	}
}

fn build_product(
	barcode: &str,
	merged: NormalizedProduct,
	resolved_company: Option<&Company>,
	now: OffsetDateTime,
) -> Product {
	Product {
		id: Uuid::new_v4(),
		barcode: barcode.to_string(),
		name: merged.name,
		brand: non_empty(merged.brand),
		category: non_empty(merged.category),
		image_url: non_empty(merged.image_url),
		description: non_empty(merged.description),
		company_id: resolved_company.map(|c| c.id),
		certifications: merged.certifications,
		created_at: now,
		updated_at: now,
	}
}

fn product_facts(merged: &NormalizedProduct) -> ProductFacts {
	ProductFacts {
		name: merged.name.clone(),
		brand: merged.brand.clone(),
		category: merged.category.clone(),
		materials: merged.materials.clone(),
		packaging: merged.packaging.clone(),
		country_of_origin: merged.country_of_origin.clone(),
		certifications: merged.certifications.clone(),
	}
}

fn non_empty(value: String) -> Option<String> {
	if value.is_empty() { None } else { Some(value) }
}
