use serde::{Deserialize, Serialize};

/// Provider-agnostic intermediate record produced by a single external source.
///
/// Scalar text fields use the empty string for "the source did not supply
/// this"; the merge walks non-empty values in source-priority order. The
/// record is discarded once merged.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizedProduct {
	pub barcode: String,
	pub name: String,
	pub brand: String,
	pub category: String,
	pub materials: Vec<String>,
	pub packaging: String,
	pub country_of_origin: String,
	pub certifications: Vec<String>,
	pub carbon_footprint: String,
	pub water_usage: String,
	pub energy_consumption: String,
	pub recyclability: String,
	/// Raw eco grade or score as reported by the source, unparsed.
	pub eco_score: String,
	pub source: String,
	pub confidence_score: f32,
	pub image_url: String,
	pub description: String,
}
