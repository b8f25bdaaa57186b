use crate::normalized::NormalizedProduct;

/// Source name stamped on every merged record.
pub const MERGED_SOURCE: &str = "Multi-source";

/// Static ranking of known source names. Certification feeds outrank curated
/// category databases, which outrank generic lookup aggregators.
pub fn source_priority(source: &str) -> u32 {
	match source {
		"Certifications" => 100,
		"Manufacturer" => 90,
		"Open Food Facts" | "Open Beauty Facts" => 85,
		"Open Product Data" => 70,
		_ => 0,
	}
}

/// Combines the non-absent fragments of one resolution into a single record.
///
/// Per-field first-writer-wins over fragments sorted by descending source
/// priority: a lower-priority fragment still fills any gap the fragments
/// above it left empty. List fields are unioned and deduplicated. The merged
/// confidence is the unweighted mean over all fragments, independent of
/// which fields each one contributed. Never fails; with no fragments every
/// field stays empty.
pub fn merge_fragments(mut fragments: Vec<NormalizedProduct>) -> NormalizedProduct {
	fragments.sort_by(|a, b| source_priority(&b.source).cmp(&source_priority(&a.source)));

	let mut merged =
		NormalizedProduct { source: MERGED_SOURCE.to_string(), ..NormalizedProduct::default() };

	for fragment in &fragments {
		fill_scalar(&mut merged.barcode, &fragment.barcode);
		fill_scalar(&mut merged.name, &fragment.name);
		fill_scalar(&mut merged.brand, &fragment.brand);
		fill_scalar(&mut merged.category, &fragment.category);
		fill_scalar(&mut merged.packaging, &fragment.packaging);
		fill_scalar(&mut merged.country_of_origin, &fragment.country_of_origin);
		fill_scalar(&mut merged.carbon_footprint, &fragment.carbon_footprint);
		fill_scalar(&mut merged.water_usage, &fragment.water_usage);
		fill_scalar(&mut merged.energy_consumption, &fragment.energy_consumption);
		fill_scalar(&mut merged.recyclability, &fragment.recyclability);
		fill_scalar(&mut merged.eco_score, &fragment.eco_score);
		fill_scalar(&mut merged.image_url, &fragment.image_url);
		fill_scalar(&mut merged.description, &fragment.description);
		union_into(&mut merged.materials, &fragment.materials);
		union_into(&mut merged.certifications, &fragment.certifications);
	}

	if !fragments.is_empty() {
		merged.confidence_score = fragments.iter().map(|f| f.confidence_score).sum::<f32>()
			/ fragments.len() as f32;
	}

	merged
}

fn fill_scalar(target: &mut String, candidate: &str) {
	if target.is_empty() && !candidate.is_empty() {
		*target = candidate.to_string();
	}
}

fn union_into(target: &mut Vec<String>, items: &[String]) {
	for item in items {
		if !item.is_empty() && !target.iter().any(|existing| existing == item) {
			target.push(item.clone());
		}
	}
}
