use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
	Error, Result,
	db::Db,
	models::{Company, DataSourceAttribution, EcoScore, Product},
};

pub async fn find_product_by_barcode(db: &Db, barcode: &str) -> Result<Option<Product>> {
	let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE barcode = $1")
		.bind(barcode)
		.fetch_optional(&db.pool)
		.await?;

	Ok(product)
}

pub async fn insert_product_tx(
	tx: &mut Transaction<'_, Postgres>,
	product: &Product,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO products (
	id,
	barcode,
	name,
	brand,
	category,
	image_url,
	description,
	company_id,
	certifications,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
	)
	.bind(product.id)
	.bind(product.barcode.as_str())
	.bind(product.name.as_str())
	.bind(product.brand.as_deref())
	.bind(product.category.as_deref())
	.bind(product.image_url.as_deref())
	.bind(product.description.as_deref())
	.bind(product.company_id)
	.bind(&product.certifications)
	.bind(product.created_at)
	.bind(product.updated_at)
	.execute(&mut **tx)
	.await
	.map_err(|err| map_unique_violation(err, "Product barcode"))?;

	Ok(())
}

pub async fn find_company(db: &Db, id: Uuid) -> Result<Option<Company>> {
	let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
		.bind(id)
		.fetch_optional(&db.pool)
		.await?;

	Ok(company)
}

pub async fn find_company_by_name(db: &Db, name: &str) -> Result<Option<Company>> {
	let company =
		sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE LOWER(name) = LOWER($1)")
			.bind(name)
			.fetch_optional(&db.pool)
			.await?;

	Ok(company)
}

pub async fn insert_company(db: &Db, company: &Company) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO companies (id, name, sustainability_rating, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5)",
	)
	.bind(company.id)
	.bind(company.name.as_str())
	.bind(company.sustainability_rating)
	.bind(company.created_at)
	.bind(company.updated_at)
	.execute(&db.pool)
	.await
	.map_err(|err| map_unique_violation(err, "Company name"))?;

	Ok(())
}

pub async fn find_eco_score(db: &Db, product_id: Uuid) -> Result<Option<EcoScore>> {
	let score = sqlx::query_as::<_, EcoScore>("SELECT * FROM eco_scores WHERE product_id = $1")
		.bind(product_id)
		.fetch_optional(&db.pool)
		.await?;

	Ok(score)
}

/// A product has at most one score row; a repeated scoring attempt refreshes
/// the existing row in place and keeps its id.
pub async fn upsert_eco_score_tx(
	tx: &mut Transaction<'_, Postgres>,
	score: &EcoScore,
) -> Result<EcoScore> {
	let stored = sqlx::query_as::<_, EcoScore>(
		"\
INSERT INTO eco_scores (
	id,
	product_id,
	overall,
	carbon_emissions,
	recyclability,
	ethical_sourcing,
	energy_consumption,
	last_updated
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
ON CONFLICT (product_id) DO UPDATE
SET
	overall = EXCLUDED.overall,
	carbon_emissions = EXCLUDED.carbon_emissions,
	recyclability = EXCLUDED.recyclability,
	ethical_sourcing = EXCLUDED.ethical_sourcing,
	energy_consumption = EXCLUDED.energy_consumption,
	last_updated = EXCLUDED.last_updated
RETURNING *",
	)
	.bind(score.id)
	.bind(score.product_id)
	.bind(score.overall)
	.bind(score.carbon_emissions)
	.bind(score.recyclability)
	.bind(score.ethical_sourcing)
	.bind(score.energy_consumption)
	.bind(score.last_updated)
	.fetch_one(&mut **tx)
	.await?;

	Ok(stored)
}

pub async fn insert_attribution_tx(
	tx: &mut Transaction<'_, Postgres>,
	attribution: &DataSourceAttribution,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO data_sources (id, eco_score_id, name, url, reliability_score)
VALUES ($1, $2, $3, $4, $5)
ON CONFLICT (eco_score_id, name) DO UPDATE
SET
	url = EXCLUDED.url,
	reliability_score = EXCLUDED.reliability_score",
	)
	.bind(attribution.id)
	.bind(attribution.eco_score_id)
	.bind(attribution.name.as_str())
	.bind(attribution.url.as_deref())
	.bind(attribution.reliability_score)
	.execute(&mut **tx)
	.await?;

	Ok(())
}

pub async fn find_attributions(db: &Db, eco_score_id: Uuid) -> Result<Vec<DataSourceAttribution>> {
	let attributions = sqlx::query_as::<_, DataSourceAttribution>(
		"SELECT * FROM data_sources WHERE eco_score_id = $1 ORDER BY name",
	)
	.bind(eco_score_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(attributions)
}

fn map_unique_violation(err: sqlx::Error, what: &str) -> Error {
	if let sqlx::Error::Database(db_err) = &err
		&& db_err.code().as_deref() == Some("23505")
	{
		return Error::Conflict(format!("{what} already exists."));
	}

	Error::Sqlx(err)
}
