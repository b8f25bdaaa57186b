use std::time::Duration;

use color_eyre::Result;
use reqwest::Client;
use serde_json::Value;

use eco_domain::normalized::NormalizedProduct;

pub const SOURCE: &str = "Open Product Data";
pub const CONFIDENCE: f32 = 0.70;

pub async fn fetch(
	cfg: &eco_config::SourceConfig,
	barcode: &str,
) -> Result<Option<NormalizedProduct>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}/v3/products", cfg.api_base);
	let key = cfg.api_key.as_deref().unwrap_or_default();
	let res = client
		.get(url)
		.query(&[("barcode", barcode), ("formatted", "y"), ("key", key)])
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	Ok(parse_response(barcode, &json))
}

pub fn parse_response(barcode: &str, json: &Value) -> Option<NormalizedProduct> {
	let product = json.get("products").and_then(Value::as_array)?.first()?;

	Some(NormalizedProduct {
		barcode: barcode.to_string(),
		name: crate::first_text(product, &["title", "product_name"]),
		brand: crate::first_text(product, &["brand", "manufacturer"]),
		category: crate::text(product, "category"),
		country_of_origin: crate::text(product, "country"),
		source: SOURCE.to_string(),
		confidence_score: CONFIDENCE,
		image_url: crate::text_list(product, "images").into_iter().next().unwrap_or_default(),
		description: crate::text(product, "description"),
		..NormalizedProduct::default()
	})
}
