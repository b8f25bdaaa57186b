use std::time::Duration;

use color_eyre::Result;
use reqwest::Client;
use serde_json::Value;

use eco_domain::normalized::NormalizedProduct;

pub const SOURCE: &str = "Open Beauty Facts";
pub const CONFIDENCE: f32 = 0.85;

pub async fn fetch(
	cfg: &eco_config::SourceConfig,
	barcode: &str,
) -> Result<Option<NormalizedProduct>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}/api/v2/product/{barcode}.json", cfg.api_base);
	let res = client.get(url).send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	Ok(parse_response(barcode, &json))
}

pub fn parse_response(barcode: &str, json: &Value) -> Option<NormalizedProduct> {
	if json.get("status").and_then(Value::as_i64) != Some(1) {
		return None;
	}

	let product = json.get("product")?;
	let ingredients = crate::text(product, "ingredients_text");
	let materials = if ingredients.is_empty() { Vec::new() } else { vec![ingredients] };

	Some(NormalizedProduct {
		barcode: barcode.to_string(),
		name: crate::text(product, "product_name"),
		brand: crate::text(product, "brands"),
		category: crate::text(product, "categories"),
		materials,
		packaging: crate::text(product, "packaging"),
		country_of_origin: crate::text(product, "countries"),
		certifications: crate::text_list(product, "labels_tags"),
		eco_score: crate::number_as_text(product, "ecoscore_score"),
		source: SOURCE.to_string(),
		confidence_score: CONFIDENCE,
		image_url: crate::first_text(product, &["image_url", "image_front_url"]),
		description: crate::first_text(product, &["generic_name", "product_name"]),
		..NormalizedProduct::default()
	})
}
