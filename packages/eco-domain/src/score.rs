use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SYSTEM_PROMPT: &str = "You are an environmental impact analyst. Analyze products and \
	provide realistic sustainability scores based on available data. Be objective and scientific \
	in your assessment.";

/// Everything the scoring prompt embeds about a product. Snapshotted into
/// the scoring queue so the worker does not depend on what the product row
/// happens to persist.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductFacts {
	pub name: String,
	pub brand: String,
	pub category: String,
	pub materials: Vec<String>,
	pub packaging: String,
	pub country_of_origin: String,
	pub certifications: Vec<String>,
}

/// Validated, clamped output of one scoring exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreCard {
	pub overall: i32,
	pub carbon_emissions: i32,
	pub recyclability: i32,
	pub ethical_sourcing: i32,
	pub energy_consumption: i32,
	pub reasoning: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScoreParseError {
	#[error("Response contains no balanced JSON object.")]
	NoObject,
	#[error("Response object is not valid JSON.")]
	InvalidJson,
	#[error("Score field {0} is missing.")]
	MissingField(&'static str),
	#[error("Score field {0} is not numeric.")]
	NonNumericField(&'static str),
}

pub fn build_prompt(facts: &ProductFacts) -> String {
	format!(
		"Analyze this product and provide environmental impact scores (0-100, where 100 is best):\n\
		\n\
		Product: {name}\n\
		Brand: {brand}\n\
		Category: {category}\n\
		Certifications: {certifications}\n\
		Materials: {materials}\n\
		Packaging: {packaging}\n\
		Country of origin: {origin}\n\
		\n\
		Provide scores for:\n\
		1. Carbon Emissions (0-100): transportation, manufacturing energy, packaging\n\
		2. Recyclability (0-100): packaging materials and end-of-life recyclability\n\
		3. Ethical Sourcing (0-100): fair trade, labor practices, supply chain transparency\n\
		4. Energy Consumption (0-100): manufacturing and lifecycle energy usage\n\
		\n\
		Return ONLY a JSON object with this exact structure:\n\
		{{\n\
		  \"carbon_emissions\": <number>,\n\
		  \"recyclability\": <number>,\n\
		  \"ethical_sourcing\": <number>,\n\
		  \"energy_consumption\": <number>,\n\
		  \"overall\": <number>,\n\
		  \"reasoning\": \"<brief explanation>\"\n\
		}}",
		name = or_unknown(&facts.name),
		brand = or_unknown(&facts.brand),
		category = or_unknown(&facts.category),
		certifications = or_none(&facts.certifications),
		materials = or_none(&facts.materials),
		packaging = or_not_specified(&facts.packaging),
		origin = or_not_specified(&facts.country_of_origin),
	)
}

/// Locates the outermost balanced JSON object in free-form model text,
/// parses it, and clamps every component into [0,100]. A response with any
/// missing or non-numeric component yields an error so no partial score is
/// ever persisted.
pub fn extract_score_card(text: &str) -> Result<ScoreCard, ScoreParseError> {
	let object = balanced_object(text).ok_or(ScoreParseError::NoObject)?;
	let value: Value = serde_json::from_str(object).map_err(|_| ScoreParseError::InvalidJson)?;

	Ok(ScoreCard {
		overall: component(&value, "overall")?,
		carbon_emissions: component(&value, "carbon_emissions")?,
		recyclability: component(&value, "recyclability")?,
		ethical_sourcing: component(&value, "ethical_sourcing")?,
		energy_consumption: component(&value, "energy_consumption")?,
		reasoning: value.get("reasoning").and_then(Value::as_str).map(ToString::to_string),
	})
}

pub fn clamp_component(value: f64) -> i32 {
	value.round().clamp(0.0, 100.0) as i32
}

fn component(value: &Value, name: &'static str) -> Result<i32, ScoreParseError> {
	let field = value.get(name).ok_or(ScoreParseError::MissingField(name))?;
	let number = field.as_f64().ok_or(ScoreParseError::NonNumericField(name))?;

	Ok(clamp_component(number))
}

fn balanced_object(text: &str) -> Option<&str> {
	let start = text.find('{')?;
	let mut depth = 0_usize;
	let mut in_string = false;
	let mut escaped = false;

	for (idx, ch) in text[start..].char_indices() {
		if escaped {
			escaped = false;

			continue;
		}

		match ch {
			'\\' if in_string => escaped = true,
			'"' => in_string = !in_string,
			'{' if !in_string => depth += 1,
			'}' if !in_string => {
				depth -= 1;

				if depth == 0 {
					return Some(&text[start..start + idx + ch.len_utf8()]);
				}
			},
			_ => {},
		}
	}

	None
}

fn or_unknown(value: &str) -> &str {
	if value.is_empty() { "Unknown" } else { value }
}

fn or_not_specified(value: &str) -> &str {
	if value.is_empty() { "Not specified" } else { value }
}

fn or_none(items: &[String]) -> String {
	if items.is_empty() { "None".to_string() } else { items.join(", ") }
}
