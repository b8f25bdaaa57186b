use regex::Regex;

/// Accepted barcode shapes: EAN-8/13, UPC-A, and alphanumeric vendor codes.
pub fn is_valid(barcode: &str) -> bool {
	Regex::new(r"^[0-9A-Za-z]{6,14}$").map(|re| re.is_match(barcode)).unwrap_or(false)
}
