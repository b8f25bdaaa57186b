use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
	pub id: Uuid,
	pub barcode: String,
	pub name: String,
	pub brand: Option<String>,
	pub category: Option<String>,
	pub image_url: Option<String>,
	pub description: Option<String>,
	pub company_id: Option<Uuid>,
	pub certifications: Vec<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Company {
	pub id: Uuid,
	pub name: String,
	pub sustainability_rating: i32,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EcoScore {
	pub id: Uuid,
	pub product_id: Uuid,
	pub overall: i32,
	pub carbon_emissions: i32,
	pub recyclability: i32,
	pub ethical_sourcing: i32,
	pub energy_consumption: i32,
	pub last_updated: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DataSourceAttribution {
	pub id: Uuid,
	pub eco_score_id: Uuid,
	pub name: String,
	pub url: Option<String>,
	pub reliability_score: i32,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ScoringOutboxEntry {
	pub outbox_id: Uuid,
	pub product_id: Uuid,
	pub facts: Value,
	pub status: String,
	pub attempts: i32,
	pub last_error: Option<String>,
	pub available_at: OffsetDateTime,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
