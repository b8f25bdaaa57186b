use std::sync::Arc;

use eco_service::ResolveRequest;

use super::{StubSource, fragment, providers_with_sources};

// The canonical three-source scan: one source names the product, one is
// absent, one only knows the packaging.
#[tokio::test]
#[ignore = "Requires external Postgres. Set ECO_PG_DSN to run."]
async fn partial_fragments_merge_into_one_product() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping partial_fragments_merge_into_one_product; set ECO_PG_DSN to run.");

		return;
	};
	let mut named = fragment("Open Food Facts", 0.85);

	named.name = "Bar Soap".to_string();
	named.brand = "GreenCo".to_string();

	let mut packaging_only = fragment("Open Product Data", 0.70);

	packaging_only.packaging = "cardboard".to_string();

	let providers = providers_with_sources(vec![
		Arc::new(StubSource { name: "Open Food Facts", fragment: Some(named) }),
		Arc::new(StubSource { name: "Open Beauty Facts", fragment: None }),
		Arc::new(StubSource { name: "Open Product Data", fragment: Some(packaging_only) }),
	]);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await;

	let response = service
		.resolve(ResolveRequest { barcode: "0123456789012".to_string(), mode: None })
		.await
		.expect("Resolution failed.");

	assert_eq!(response.product.name, "Bar Soap");
	assert_eq!(response.product.brand.as_deref(), Some("GreenCo"));
	assert_eq!(response.sources_consulted, 2);
	assert!((response.confidence_score.expect("Expected a confidence score.") - 0.775).abs() < 1e-6);
	// Async mode: the immediate response carries no score.
	assert!(response.eco_score.is_none());
	assert!(!response.cached);

	let company = response.company.expect("Expected a company.");

	assert_eq!(company.name, "GreenCo");
	assert_eq!(company.sustainability_rating, 50);

	// The merged packaging came from the lower-priority fragment and is
	// snapshotted for the scoring prompt.
	let facts: serde_json::Value =
		sqlx::query_scalar("SELECT facts FROM scoring_outbox WHERE product_id = $1")
			.bind(response.product.id)
			.fetch_one(&service.db.pool)
			.await
			.expect("Expected a queued scoring job.");

	assert_eq!(facts["packaging"], "cardboard");
	assert_eq!(facts["name"], "Bar Soap");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
