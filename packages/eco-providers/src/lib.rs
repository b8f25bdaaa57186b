pub mod open_beauty_facts;
pub mod open_food_facts;
pub mod product_data;
pub mod scoring;

use color_eyre::{Result, eyre};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(eyre::eyre!("Default header values must be strings."));
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

pub(crate) fn text(value: &Value, key: &str) -> String {
	value.get(key).and_then(Value::as_str).unwrap_or_default().trim().to_string()
}

pub(crate) fn first_text(value: &Value, keys: &[&str]) -> String {
	for key in keys {
		let candidate = text(value, key);

		if !candidate.is_empty() {
			return candidate;
		}
	}

	String::new()
}

pub(crate) fn text_list(value: &Value, key: &str) -> Vec<String> {
	value
		.get(key)
		.and_then(Value::as_array)
		.map(|items| {
			items
				.iter()
				.filter_map(Value::as_str)
				.map(str::trim)
				.filter(|item| !item.is_empty())
				.map(ToString::to_string)
				.collect()
		})
		.unwrap_or_default()
}

pub(crate) fn number_as_text(value: &Value, key: &str) -> String {
	match value.get(key) {
		Some(Value::Number(number)) => number.to_string(),
		Some(Value::String(text)) => text.trim().to_string(),
		_ => String::new(),
	}
}
