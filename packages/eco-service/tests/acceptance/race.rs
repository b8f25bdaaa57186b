use std::sync::Arc;

use eco_service::ResolveRequest;

use super::{StubSource, fragment, providers_with_sources};

#[tokio::test]
#[ignore = "Requires external Postgres. Set ECO_PG_DSN to run."]
async fn concurrent_resolutions_converge_to_one_product() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping concurrent_resolutions_converge_to_one_product; set ECO_PG_DSN to run.");

		return;
	};
	let mut food = fragment("Open Food Facts", 0.85);

	food.name = "Trail Mix".to_string();
	food.brand = "NutWorks".to_string();

	let providers = providers_with_sources(vec![Arc::new(StubSource {
		name: "Open Food Facts",
		fragment: Some(food),
	})]);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await;
	let request = ResolveRequest { barcode: "4006381333931".to_string(), mode: None };

	let (first, second) = tokio::join!(service.resolve(request.clone()), service.resolve(request));
	let first = first.expect("First concurrent resolution failed.");
	let second = second.expect("Second concurrent resolution failed.");

	// Both callers observe the same row regardless of who won the insert.
	assert_eq!(first.product.id, second.product.id);
	assert_eq!(super::count_rows(&service.db, "products").await, 1);
	assert_eq!(super::count_rows(&service.db, "companies").await, 1);
	// The losing transaction rolled back its enqueue along with its insert.
	assert_eq!(super::count_rows(&service.db, "scoring_outbox").await, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
